//! Macros for reducing boilerplate when defining records
//!
//! These macros generate the repetitive `Record` implementation needed for
//! each record type: resource names, identifier access and the field
//! projection table used by filters, search and sorting.

/// Implement [`Record`](crate::core::record::Record) for a struct
///
/// Each projected field is converted with `FieldValue::from`, so its type
/// needs a `From` conversion (strings, numbers, dates, status enums and
/// `Option`s of those). The `id` key is always projected.
///
/// # Example
/// ```rust,ignore
/// impl_record!(
///     Enrollment,
///     "enrollment",
///     "enrollments",
///     id: id,
///     indexed: [],
///     {
///         "user_id" => user_id,
///         "course_id" => course_id,
///         "enrollment_date" => enrollment_date,
///     }
/// );
/// ```
#[macro_export]
macro_rules! impl_record {
    (
        $type:ty,
        $singular:expr,
        $plural:expr,
        id: $( $id_path:ident ).+,
        indexed: [ $( $indexed_field:expr ),* $(,)? ],
        {
            $( $key:literal => $( $path:ident ).+ ),* $(,)?
        }
    ) => {
        impl $crate::core::record::Record for $type {
            fn resource_name() -> &'static str {
                $plural
            }

            fn resource_name_singular() -> &'static str {
                $singular
            }

            fn id(&self) -> &str {
                &self.$( $id_path ).+
            }

            fn indexed_fields() -> &'static [&'static str] {
                &[ $( $indexed_field ),* ]
            }

            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                match field {
                    "id" => Some($crate::core::field::FieldValue::from(
                        self.$( $id_path ).+.as_str(),
                    )),
                    $(
                        $key => Some($crate::core::field::FieldValue::from(
                            self.$( $path ).+.clone(),
                        )),
                    )*
                    _ => None,
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::field::FieldValue;
    use crate::core::record::Record;

    #[derive(Clone, Debug)]
    struct Hull {
        code: String,
    }

    #[derive(Clone, Debug)]
    struct Tug {
        id: String,
        hull: Hull,
        bollard_pull: i64,
        call_sign: Option<String>,
    }

    impl_record!(
        Tug,
        "tug",
        "tugs",
        id: id,
        indexed: ["call_sign"],
        {
            "hull_code" => hull.code,
            "bollard_pull" => bollard_pull,
            "call_sign" => call_sign,
        }
    );

    #[test]
    fn test_generated_record() {
        let tug = Tug {
            id: "t1".to_string(),
            hull: Hull {
                code: "H-77".to_string(),
            },
            bollard_pull: 60,
            call_sign: None,
        };

        assert_eq!(Tug::resource_name(), "tugs");
        assert_eq!(Tug::resource_name_singular(), "tug");
        assert_eq!(Tug::indexed_fields(), &["call_sign"]);
        assert_eq!(tug.id(), "t1");
        assert_eq!(tug.field_value("id"), Some(FieldValue::from("t1")));
        assert_eq!(tug.field_value("hull_code"), Some(FieldValue::from("H-77")));
        assert_eq!(tug.field_value("bollard_pull"), Some(FieldValue::Integer(60)));
        assert_eq!(tug.field_value("call_sign"), Some(FieldValue::Null));
        assert_eq!(tug.field_value("tonnage"), None);
    }
}
