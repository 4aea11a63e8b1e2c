//! Principals: the accounts that can log in

use crate::core::auth::Role;
use crate::core::field::FieldValue;
use crate::core::record::Record;
use crate::entities::status::VendorStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Personal details shared by every principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub email: String,

    /// Plain-text in the seed data; never written back out
    #[serde(skip_serializing, default)]
    pub password: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
}

impl Profile {
    pub fn password_matches(&self, password: &str) -> bool {
        !self.password.is_empty() && self.password == password
    }
}

crate::impl_record!(
    Profile,
    "user",
    "users",
    id: id,
    indexed: ["name", "email"],
    {
        "name" => name,
        "email" => email,
        "rank" => rank,
        "phone" => phone,
    }
);

/// A document uploaded with a vendor application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorDocument {
    pub name: String,
    pub url: String,
    pub size: String,
    pub uploaded_date: NaiveDate,
}

/// A training institute account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    #[serde(flatten)]
    pub profile: Profile,
    pub institute_name: String,
    pub accreditation_no: String,
    pub address: String,
    pub contact_person: String,
    #[serde(default)]
    pub documents: Vec<VendorDocument>,
    pub status: VendorStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_date: Option<NaiveDate>,
}

crate::impl_record!(
    Vendor,
    "vendor",
    "vendors",
    id: profile.id,
    indexed: ["institute_name", "name", "email"],
    {
        "name" => profile.name,
        "email" => profile.email,
        "phone" => profile.phone,
        "institute_name" => institute_name,
        "accreditation_no" => accreditation_no,
        "address" => address,
        "contact_person" => contact_person,
        "status" => status,
        "submission_date" => submission_date,
    }
);

/// Anyone who can hold a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role")]
pub enum Principal {
    #[serde(rename = "user")]
    Seafarer(Profile),
    #[serde(rename = "vendor")]
    Vendor(Vendor),
    #[serde(rename = "admin")]
    Admin(Profile),
}

impl Principal {
    pub fn role(&self) -> Role {
        match self {
            Principal::Seafarer(_) => Role::Seafarer,
            Principal::Vendor(_) => Role::Vendor,
            Principal::Admin(_) => Role::Admin,
        }
    }

    pub fn profile(&self) -> &Profile {
        match self {
            Principal::Seafarer(profile) | Principal::Admin(profile) => profile,
            Principal::Vendor(vendor) => &vendor.profile,
        }
    }

    pub fn profile_mut(&mut self) -> &mut Profile {
        match self {
            Principal::Seafarer(profile) | Principal::Admin(profile) => profile,
            Principal::Vendor(vendor) => &mut vendor.profile,
        }
    }

    pub fn email(&self) -> &str {
        &self.profile().email
    }

    pub fn name(&self) -> &str {
        &self.profile().name
    }

    pub fn as_vendor(&self) -> Option<&Vendor> {
        match self {
            Principal::Vendor(vendor) => Some(vendor),
            _ => None,
        }
    }
}

impl Record for Principal {
    fn resource_name() -> &'static str {
        "users"
    }

    fn resource_name_singular() -> &'static str {
        "user"
    }

    fn id(&self) -> &str {
        &self.profile().id
    }

    fn indexed_fields() -> &'static [&'static str] {
        &["name", "email"]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        if field == "role" {
            return Some(self.role().as_str().into());
        }
        match self {
            Principal::Vendor(vendor) => vendor.field_value(field),
            Principal::Seafarer(profile) | Principal::Admin(profile) => profile.field_value(field),
        }
    }
}
