//! Record trait: the only shape the table engine and repositories rely on

use crate::core::field::FieldValue;

/// Base trait for every record served by the marketplace.
///
/// A record has a stable identifier and exposes its attributes through
/// `field_value`, keyed by snake_case field names. Unknown keys return
/// `None`; callers treat that as an undefined projection rather than an
/// error.
pub trait Record: Clone + Send + Sync + 'static {
    /// The plural resource name used in URLs and error messages (e.g., "courses")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "course")
    fn resource_name_singular() -> &'static str;

    /// Get the stable identifier for this record
    fn id(&self) -> &str;

    /// Get the value of a specific field by name
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Fields that participate in free-text search by default
    fn indexed_fields() -> &'static [&'static str] {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct Buoy {
        id: String,
        colour: String,
        depth: Option<i64>,
    }

    impl Record for Buoy {
        fn resource_name() -> &'static str {
            "buoys"
        }

        fn resource_name_singular() -> &'static str {
            "buoy"
        }

        fn id(&self) -> &str {
            &self.id
        }

        fn field_value(&self, field: &str) -> Option<FieldValue> {
            match field {
                "id" => Some(self.id.as_str().into()),
                "colour" => Some(self.colour.as_str().into()),
                "depth" => Some(self.depth.into()),
                _ => None,
            }
        }
    }

    #[test]
    fn test_record_metadata() {
        assert_eq!(Buoy::resource_name(), "buoys");
        assert_eq!(Buoy::resource_name_singular(), "buoy");
        assert!(Buoy::indexed_fields().is_empty());
    }

    #[test]
    fn test_field_projection() {
        let buoy = Buoy {
            id: "b1".to_string(),
            colour: "red".to_string(),
            depth: None,
        };

        assert_eq!(buoy.id(), "b1");
        assert_eq!(buoy.field_value("colour"), Some(FieldValue::from("red")));
        assert_eq!(buoy.field_value("depth"), Some(FieldValue::Null));
        assert_eq!(buoy.field_value("missing"), None);
    }
}
