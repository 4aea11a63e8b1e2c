//! Validation and filtering system
//!
//! Form payloads are normalized by filters and checked by validators before
//! they reach the handlers. Each form type declares its rules once through
//! [`ValidatedForm`].

pub mod extractor;
pub mod filters;
pub mod rules;
pub mod validators;

pub use extractor::{Validated, ValidatedForm};
pub use rules::{FieldRules, FormRules};
