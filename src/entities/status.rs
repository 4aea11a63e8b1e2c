//! Enumerated attributes shared by marketplace records

use crate::core::field::FieldValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! string_enum {
    ($type:ident { $( $variant:ident => $text:literal ),+ $(,)? }) => {
        impl $type {
            pub const ALL: &'static [$type] = &[ $( $type::$variant ),+ ];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $type::$variant => $text ),+
                }
            }
        }

        impl fmt::Display for $type {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $type {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $type::ALL
                    .iter()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                    .copied()
                    .ok_or_else(|| format!("unknown {} '{}'", stringify!($type), s))
            }
        }

        impl From<$type> for FieldValue {
            fn from(value: $type) -> Self {
                FieldValue::String(value.as_str().to_string())
            }
        }
    };
}

/// Lifecycle of a course listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseStatus {
    Active,
    Pending,
    Approved,
    Rejected,
    Disabled,
}

string_enum!(CourseStatus {
    Active => "Active",
    Pending => "Pending",
    Approved => "Approved",
    Rejected => "Rejected",
    Disabled => "Disabled",
});

impl CourseStatus {
    /// Whether seafarers can see and enroll in the course
    pub fn is_published(&self) -> bool {
        matches!(self, CourseStatus::Approved | CourseStatus::Active)
    }
}

/// Verification state of a vendor application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VendorStatus {
    Pending,
    Approved,
    Rejected,
}

string_enum!(VendorStatus {
    Pending => "Pending",
    Approved => "Approved",
    Rejected => "Rejected",
});

/// How a course is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseMode {
    Online,
    Offline,
}

string_enum!(CourseMode {
    Online => "Online",
    Offline => "Offline",
});
