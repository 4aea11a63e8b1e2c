//! Typed form payloads and their validation rules

use crate::core::validation::filters::{empty_as_null, lowercase, parse_number, trim, uppercase};
use crate::core::validation::validators::{
    date_format, email, in_list, max_value, phone, positive, required, string_length, url,
};
use crate::core::validation::{FieldRules, FormRules, ValidatedForm};
use crate::entities::{CourseMode, CourseStatus, VendorStatus};
use chrono::NaiveDate;
use serde::Deserialize;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

fn email_field(f: FieldRules) -> FieldRules {
    f.filter(trim())
        .filter(lowercase())
        .validate(required())
        .validate(email())
}

fn text_field(min: usize, max: usize) -> impl FnOnce(FieldRules) -> FieldRules {
    move |f| {
        f.filter(trim())
            .validate(required())
            .validate(string_length(min, max))
    }
}

fn optional_text(f: FieldRules) -> FieldRules {
    f.filter(trim()).filter(empty_as_null())
}

fn optional_phone(f: FieldRules) -> FieldRules {
    optional_text(f).validate(phone())
}

fn whole_number(max: f64) -> impl FnOnce(FieldRules) -> FieldRules {
    move |f| {
        f.filter(parse_number())
            .validate(required())
            .validate(positive())
            .validate(max_value(max))
    }
}

fn one_of(allowed: &[&str]) -> impl FnOnce(FieldRules) -> FieldRules {
    let allowed: Vec<String> = allowed.iter().map(|s| s.to_string()).collect();
    move |f| f.filter(trim()).validate(required()).validate(in_list(allowed))
}

/// Email and password
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl ValidatedForm for LoginForm {
    fn rules() -> FormRules {
        FormRules::new()
            .field("email", email_field)
            .field("password", |f| f.validate(required()))
    }
}

/// Seafarer sign-up
#[derive(Debug, Clone, Deserialize)]
pub struct SeafarerRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl ValidatedForm for SeafarerRegistration {
    fn rules() -> FormRules {
        FormRules::new()
            .field("name", text_field(2, 80))
            .field("email", email_field)
            .field("password", |f| f.validate(required()).validate(string_length(6, 128)))
            .field("rank", optional_text)
            .field("phone", optional_phone)
    }
}

/// Training institute sign-up; the account starts out pending review
#[derive(Debug, Clone, Deserialize)]
pub struct VendorRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub institute_name: String,
    pub accreditation_no: String,
    pub address: String,
    pub contact_person: String,
}

impl ValidatedForm for VendorRegistration {
    fn rules() -> FormRules {
        FormRules::new()
            .field("name", text_field(2, 120))
            .field("email", email_field)
            .field("password", |f| f.validate(required()).validate(string_length(6, 128)))
            .field("phone", optional_phone)
            .field("institute_name", text_field(2, 120))
            .field("accreditation_no", |f| {
                text_field(3, 40)(f.filter(uppercase()))
            })
            .field("address", text_field(5, 200))
            .field("contact_person", text_field(2, 80))
    }
}

/// A new course submitted by a vendor
#[derive(Debug, Clone, Deserialize)]
pub struct CourseSubmission {
    pub course_code: String,
    pub title: String,
    pub description: String,
    pub duration_days: u32,
    pub fee: i64,
    pub location: String,
    pub mode: CourseMode,
    pub seats: u32,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub dg_approved: bool,
}

impl ValidatedForm for CourseSubmission {
    fn rules() -> FormRules {
        let modes: Vec<&str> = CourseMode::ALL.iter().map(CourseMode::as_str).collect();
        FormRules::new()
            .field("course_code", |f| text_field(2, 20)(f.filter(uppercase())))
            .field("title", text_field(3, 120))
            .field("description", text_field(10, 2000))
            .field("duration_days", whole_number(365.0))
            .field("fee", whole_number(1_000_000.0))
            .field("location", text_field(2, 120))
            .field("mode", one_of(&modes))
            .field("seats", whole_number(500.0))
            .field("start_date", |f| {
                f.filter(trim())
                    .validate(required())
                    .validate(date_format(DATE_FORMAT))
            })
            .field("image_url", |f| optional_text(f).validate(url()))
    }
}

/// Admin decision on a pending vendor application
#[derive(Debug, Clone, Deserialize)]
pub struct VendorReview {
    pub decision: VendorStatus,
}

impl ValidatedForm for VendorReview {
    fn rules() -> FormRules {
        FormRules::new().field(
            "decision",
            one_of(&[VendorStatus::Approved.as_str(), VendorStatus::Rejected.as_str()]),
        )
    }
}

/// Admin override of a course's status
#[derive(Debug, Clone, Deserialize)]
pub struct CourseStatusUpdate {
    pub status: CourseStatus,
}

impl ValidatedForm for CourseStatusUpdate {
    fn rules() -> FormRules {
        let statuses: Vec<&str> = CourseStatus::ALL.iter().map(CourseStatus::as_str).collect();
        FormRules::new().field("status", one_of(&statuses))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{MarketError, ValidationError};
    use serde_json::json;

    fn field_errors(err: MarketError) -> Vec<String> {
        match err {
            MarketError::Validation(ValidationError::FieldErrors(errors)) => {
                errors.into_iter().map(|e| e.field).collect()
            }
            other => panic!("Expected field errors, got {:?}", other),
        }
    }

    #[test]
    fn test_login_normalizes_email() {
        let form = LoginForm::from_payload(json!({
            "email": "  User@Example.com ",
            "password": "password"
        }))
        .unwrap();
        assert_eq!(form.email, "user@example.com");
    }

    #[test]
    fn test_course_submission_from_html_strings() {
        let form = CourseSubmission::from_payload(json!({
            "course_code": " stcw-bst ",
            "title": "Basic Safety",
            "description": "Five-day STCW basic safety course.",
            "duration_days": "5",
            "fee": "4500",
            "location": "Mumbai, India",
            "mode": "Offline",
            "seats": "20",
            "start_date": "2024-11-01",
            "image_url": ""
        }))
        .unwrap();

        assert_eq!(form.course_code, "STCW-BST");
        assert_eq!(form.fee, 4500);
        assert_eq!(form.duration_days, 5);
        assert_eq!(form.mode, CourseMode::Offline);
        assert_eq!(form.image_url, None);
        assert!(!form.dg_approved);
    }

    #[test]
    fn test_course_submission_reports_every_field() {
        let err = CourseSubmission::from_payload(json!({
            "course_code": "X",
            "title": "Ok title",
            "description": "A long enough description",
            "duration_days": 0,
            "fee": -10,
            "location": "Goa",
            "mode": "Hybrid",
            "seats": 10,
            "start_date": "01/11/2024"
        }))
        .unwrap_err();

        assert_eq!(
            field_errors(err),
            vec!["course_code", "duration_days", "fee", "mode", "start_date"]
        );
    }

    #[test]
    fn test_vendor_review_only_accepts_decisions() {
        let err = VendorReview::from_payload(json!({"decision": "Pending"})).unwrap_err();
        assert_eq!(field_errors(err), vec!["decision"]);

        let review = VendorReview::from_payload(json!({"decision": "Approved"})).unwrap();
        assert_eq!(review.decision, VendorStatus::Approved);
    }

    #[test]
    fn test_seafarer_registration_optional_fields() {
        let form = SeafarerRegistration::from_payload(json!({
            "name": "Ana Reyes",
            "email": "ana@example.com",
            "password": "s3cret!",
            "phone": "  "
        }))
        .unwrap();

        assert_eq!(form.phone, None);
        assert_eq!(form.rank, None);
    }

    #[test]
    fn test_type_mismatch_after_validation_is_invalid_payload() {
        let update =
            CourseStatusUpdate::from_payload(json!({"status": "Approved", "extra": 1})).unwrap();
        assert_eq!(update.status, CourseStatus::Approved);

        let err = LoginForm::from_payload(json!({"email": "a@b.io", "password": 42})).unwrap_err();
        assert!(matches!(
            err,
            MarketError::Validation(ValidationError::InvalidPayload { .. })
        ));
    }
}
