//! Shared test harness for repository implementations
//!
//! Provides `TestCargo` implementing `Record` with fields covering every
//! `FieldValue` variant the marketplace uses, plus helpers for creating test
//! data.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod repository_tests;

use chrono::NaiveDate;
use coursedeck::core::field::FieldValue;
use coursedeck::core::record::Record;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TestCargo: one manifest line per record
// ---------------------------------------------------------------------------

/// A test record with fields spanning the `FieldValue` variants.
///
/// Fields:
/// - `name`: String (searchable)
/// - `port`: String (filter testing)
/// - `weight`: i64 (Integer variant)
/// - `draft`: f64 (Float variant)
/// - `hazardous`: bool (Boolean variant)
/// - `loaded_on`: NaiveDate (Date variant)
/// - `inspector`: Option<String> (Null when absent)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestCargo {
    pub id: String,
    pub name: String,
    pub port: String,
    pub weight: i64,
    pub draft: f64,
    pub hazardous: bool,
    pub loaded_on: NaiveDate,
    pub inspector: Option<String>,
}

impl Record for TestCargo {
    fn resource_name() -> &'static str {
        "test_cargo"
    }

    fn resource_name_singular() -> &'static str {
        "test_cargo_item"
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn indexed_fields() -> &'static [&'static str] {
        &["name", "port"]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(FieldValue::String(self.id.clone())),
            "name" => Some(FieldValue::String(self.name.clone())),
            "port" => Some(FieldValue::String(self.port.clone())),
            "weight" => Some(FieldValue::Integer(self.weight)),
            "draft" => Some(FieldValue::Float(self.draft)),
            "hazardous" => Some(FieldValue::Boolean(self.hazardous)),
            "loaded_on" => Some(FieldValue::Date(self.loaded_on)),
            "inspector" => Some(self.inspector.clone().into()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Create a `TestCargo` with sensible defaults
pub fn create_cargo(id: &str, name: &str, port: &str, weight: i64) -> TestCargo {
    TestCargo {
        id: id.to_string(),
        name: name.to_string(),
        port: port.to_string(),
        weight,
        draft: weight as f64 / 1000.0,
        hazardous: false,
        loaded_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        inspector: None,
    }
}

/// Generate `n` diverse records with ids `k0..k{n-1}`
///
/// Ports rotate through Mumbai, Chennai and Kochi; every third record is
/// hazardous; `loaded_on` advances one day per record.
pub fn sample_batch(n: usize) -> Vec<TestCargo> {
    const PORTS: [&str; 3] = ["Mumbai", "Chennai", "Kochi"];
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    (0..n)
        .map(|i| TestCargo {
            id: format!("k{}", i),
            name: format!("Cargo {}", i),
            port: PORTS[i % PORTS.len()].to_string(),
            weight: 1000 + (i as i64) * 250,
            draft: 4.0 + i as f64 * 0.5,
            hazardous: i % 3 == 0,
            loaded_on: start + chrono::Duration::days(i as i64),
            inspector: (i % 2 == 0).then(|| format!("Inspector {}", i)),
        })
        .collect()
}
