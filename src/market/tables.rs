//! Column configuration for every marketplace listing

use crate::core::table::{Column, TableView};
use crate::entities::{Course, Enrollment, Principal, Profile, Vendor};
use chrono::NaiveDate;
use serde::Serialize;

/// Public catalog: published courses only (the caller pre-filters)
pub fn catalog() -> TableView<Course> {
    TableView::new("catalog")
        .column(Column::field("title").searchable().sortable())
        .column(Column::field("institute_name").searchable().filterable())
        .column(Column::field("institute_id").filterable())
        .column(Column::field("location").filterable())
        .column(Column::field("mode").filterable())
        .column(Column::field("fee").filterable().sortable())
        .column(Column::field("start_date").filterable().sortable())
        .column(Column::field("seats").sortable())
        .column(Column::field("dg_approved").filterable())
}

/// A vendor's own courses, with status tabs
pub fn vendor_courses() -> TableView<Course> {
    TableView::new("vendor_courses")
        .column(Column::field("title").searchable().sortable())
        .column(Column::field("course_code").searchable().sortable())
        .column(Column::field("status").filterable())
        .column(Column::field("mode").filterable())
        .column(Column::field("fee").sortable())
        .column(Column::field("start_date").sortable())
        .column(Column::field("seats").sortable())
}

/// A seafarer's enrolled courses
pub fn enrolled_courses() -> TableView<Course> {
    TableView::new("enrolled_courses")
        .column(Column::field("title").searchable().sortable())
        .column(Column::field("institute_name").searchable())
        .column(Column::field("status").filterable())
        .column(Column::field("start_date").sortable())
}

/// Every course, for moderation
pub fn admin_courses() -> TableView<Course> {
    TableView::new("admin_courses")
        .column(Column::field("title").searchable().sortable())
        .column(Column::field("course_code").searchable())
        .column(Column::field("institute_name").searchable().sortable())
        .column(Column::field("institute_id").filterable())
        .column(Column::field("status").filterable())
        .column(Column::field("fee").sortable())
        .column(Column::field("start_date").sortable())
}

/// Vendor applications and accounts
pub fn vendors() -> TableView<Vendor> {
    TableView::new("vendors")
        .column(Column::field("institute_name").searchable().sortable())
        .column(Column::field("name").searchable())
        .column(Column::field("email").searchable())
        .column(Column::field("accreditation_no").searchable())
        .column(Column::field("status").filterable())
        .column(Column::field("submission_date").sortable())
}

/// Seafarer accounts
pub fn seafarers() -> TableView<Profile> {
    TableView::new("seafarers")
        .column(Column::field("name").searchable().sortable())
        .column(Column::field("email").searchable())
        .column(Column::field("rank").filterable().sortable())
}

/// One enrollment in a vendor's course, joined with the student and course
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentEnrollment {
    pub id: String,
    pub user_id: String,
    pub student_name: String,
    pub student_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    pub course_id: String,
    pub course_title: String,
    pub enrollment_date: NaiveDate,
}

impl StudentEnrollment {
    pub fn join(enrollment: &Enrollment, student: &Principal, course: &Course) -> Self {
        Self {
            id: enrollment.id.clone(),
            user_id: enrollment.user_id.clone(),
            student_name: student.name().to_string(),
            student_email: student.email().to_string(),
            rank: student.profile().rank.clone(),
            course_id: course.id.clone(),
            course_title: course.title.clone(),
            enrollment_date: enrollment.enrollment_date,
        }
    }
}

crate::impl_record!(
    StudentEnrollment,
    "student",
    "students",
    id: id,
    indexed: ["student_name", "course_title"],
    {
        "user_id" => user_id,
        "student_name" => student_name,
        "student_email" => student_email,
        "rank" => rank,
        "course_id" => course_id,
        "course_title" => course_title,
        "enrollment_date" => enrollment_date,
    }
);

/// Students enrolled in a vendor's courses
pub fn students() -> TableView<StudentEnrollment> {
    TableView::new("students")
        .column(Column::field("student_name").searchable().sortable())
        .column(Column::field("student_email").searchable())
        .column(Column::field("course_title").searchable().sortable())
        .column(Column::field("course_id").filterable())
        .column(Column::field("enrollment_date").sortable())
}
