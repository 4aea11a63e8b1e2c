//! Marketplace records and the macros that implement `Record` for them

pub mod course;
pub mod macros;
pub mod principal;
pub mod status;

pub use course::{Course, Enrollment};
pub use principal::{Principal, Profile, Vendor, VendorDocument};
pub use status::{CourseMode, CourseStatus, VendorStatus};
