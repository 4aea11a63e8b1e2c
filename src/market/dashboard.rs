//! Role-specific dashboard pages
//!
//! Every role has its own set of pages. A page is resolved from the
//! session's role and the path segment after `/dashboard`; any combination
//! not listed here does not exist.

use crate::core::auth::Role;
use crate::core::error::RequestError;
use crate::core::query::PaginatedResponse;
use crate::entities::{Course, Principal, Profile, Vendor, VendorStatus};
use crate::market::tables::StudentEnrollment;
use indexmap::IndexMap;
use serde::Serialize;

/// A dashboard page a role can open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardPage {
    SeafarerOverview,
    SeafarerCourses,
    SeafarerProfile,
    VendorOverview,
    VendorCourses,
    VendorNewCourse,
    VendorStudents,
    VendorProfile,
    AdminOverview,
    AdminVendors,
    AdminCourses,
    AdminUsers,
    AdminProfile,
}

impl DashboardPage {
    /// Resolve the page for `role` at `segment` (`""` is the overview)
    pub fn resolve(role: Role, segment: &str) -> Result<Self, RequestError> {
        let segment = segment.trim_matches('/');
        let page = match (role, segment) {
            (Role::Seafarer, "" | "overview") => DashboardPage::SeafarerOverview,
            (Role::Seafarer, "courses") => DashboardPage::SeafarerCourses,
            (Role::Seafarer, "profile") => DashboardPage::SeafarerProfile,

            (Role::Vendor, "" | "overview") => DashboardPage::VendorOverview,
            (Role::Vendor, "courses") => DashboardPage::VendorCourses,
            (Role::Vendor, "courses/new") => DashboardPage::VendorNewCourse,
            (Role::Vendor, "students") => DashboardPage::VendorStudents,
            (Role::Vendor, "profile") => DashboardPage::VendorProfile,

            (Role::Admin, "" | "overview") => DashboardPage::AdminOverview,
            (Role::Admin, "vendors") => DashboardPage::AdminVendors,
            (Role::Admin, "courses") => DashboardPage::AdminCourses,
            (Role::Admin, "users") => DashboardPage::AdminUsers,
            (Role::Admin, "profile") => DashboardPage::AdminProfile,

            _ => {
                return Err(RequestError::UnknownPage {
                    page: format!("{}/{}", role, segment),
                });
            }
        };
        Ok(page)
    }

    /// The role this page belongs to
    pub fn role(&self) -> Role {
        match self {
            DashboardPage::SeafarerOverview
            | DashboardPage::SeafarerCourses
            | DashboardPage::SeafarerProfile => Role::Seafarer,
            DashboardPage::VendorOverview
            | DashboardPage::VendorCourses
            | DashboardPage::VendorNewCourse
            | DashboardPage::VendorStudents
            | DashboardPage::VendorProfile => Role::Vendor,
            DashboardPage::AdminOverview
            | DashboardPage::AdminVendors
            | DashboardPage::AdminCourses
            | DashboardPage::AdminUsers
            | DashboardPage::AdminProfile => Role::Admin,
        }
    }

    /// Path segment under `/dashboard`
    pub fn path(&self) -> &'static str {
        match self {
            DashboardPage::SeafarerOverview
            | DashboardPage::VendorOverview
            | DashboardPage::AdminOverview => "overview",
            DashboardPage::SeafarerCourses
            | DashboardPage::VendorCourses
            | DashboardPage::AdminCourses => "courses",
            DashboardPage::VendorNewCourse => "courses/new",
            DashboardPage::VendorStudents => "students",
            DashboardPage::AdminVendors => "vendors",
            DashboardPage::AdminUsers => "users",
            DashboardPage::SeafarerProfile
            | DashboardPage::VendorProfile
            | DashboardPage::AdminProfile => "profile",
        }
    }

    /// Every page available to `role`, overview first
    pub fn for_role(role: Role) -> &'static [DashboardPage] {
        match role {
            Role::Seafarer => &[
                DashboardPage::SeafarerOverview,
                DashboardPage::SeafarerCourses,
                DashboardPage::SeafarerProfile,
            ],
            Role::Vendor => &[
                DashboardPage::VendorOverview,
                DashboardPage::VendorCourses,
                DashboardPage::VendorNewCourse,
                DashboardPage::VendorStudents,
                DashboardPage::VendorProfile,
            ],
            Role::Admin => &[
                DashboardPage::AdminOverview,
                DashboardPage::AdminVendors,
                DashboardPage::AdminCourses,
                DashboardPage::AdminUsers,
                DashboardPage::AdminProfile,
            ],
        }
    }
}

/// Seafarer landing page
#[derive(Debug, Clone, Serialize)]
pub struct SeafarerOverview {
    pub profile: Profile,
    pub enrolled_courses: Vec<Course>,
}

/// Vendor landing page
#[derive(Debug, Clone, Serialize)]
pub struct VendorOverview {
    pub vendor: Vendor,
    pub verification_status: VendorStatus,
    /// Course counts keyed by status, every status present
    pub course_counts: IndexMap<String, usize>,
    pub courses: Vec<Course>,
}

/// Admin landing page
#[derive(Debug, Clone, Serialize)]
pub struct AdminOverview {
    pub pending_vendors: Vec<Vendor>,
    pub seafarer_count: usize,
    pub vendor_count: usize,
    pub course_count: usize,
    pub pending_course_count: usize,
}

/// What the new-course page needs to render its form
#[derive(Debug, Clone, Serialize)]
pub struct CourseFormView {
    pub can_submit: bool,
    pub verification_status: VendorStatus,
    pub fields: Vec<String>,
    pub modes: Vec<&'static str>,
}

/// The rendered content of a dashboard page
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum DashboardView {
    SeafarerOverview(SeafarerOverview),
    VendorOverview(VendorOverview),
    AdminOverview(AdminOverview),
    Courses { table: PaginatedResponse<Course> },
    NewCourse(CourseFormView),
    Students { table: PaginatedResponse<StudentEnrollment> },
    Vendors { table: PaginatedResponse<Vendor> },
    Users { table: PaginatedResponse<Profile> },
    Profile { principal: Principal },
}
