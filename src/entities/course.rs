//! Course listings and enrollments

use crate::entities::status::{CourseMode, CourseStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A certification course offered by a vendor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub course_code: String,
    pub title: String,
    pub description: String,

    /// Id of the owning vendor
    pub institute_id: String,

    /// Display name, always copied from the owning vendor
    pub institute_name: String,

    pub duration_days: u32,
    pub fee: i64,
    pub location: String,
    pub mode: CourseMode,
    pub status: CourseStatus,
    pub seats: u32,
    pub start_date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default)]
    pub dg_approved: bool,
}

crate::impl_record!(
    Course,
    "course",
    "courses",
    id: id,
    indexed: ["title", "institute_name"],
    {
        "course_code" => course_code,
        "title" => title,
        "description" => description,
        "institute_id" => institute_id,
        "institute_name" => institute_name,
        "duration_days" => duration_days,
        "fee" => fee,
        "location" => location,
        "mode" => mode,
        "status" => status,
        "seats" => seats,
        "start_date" => start_date,
        "dg_approved" => dg_approved,
    }
);

impl Course {
    pub fn is_published(&self) -> bool {
        self.status.is_published()
    }
}

/// A seafarer's enrollment in a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub enrollment_date: NaiveDate,
}

crate::impl_record!(
    Enrollment,
    "enrollment",
    "enrollments",
    id: id,
    indexed: [],
    {
        "user_id" => user_id,
        "course_id" => course_id,
        "enrollment_date" => enrollment_date,
    }
);
