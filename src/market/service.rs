//! Marketplace operations
//!
//! [`Marketplace`] ties the repositories to the table views and enforces
//! who may do what. Every listing goes through the table engine; every
//! write is checked against the current session.

use crate::config::TableConfig;
use crate::core::auth::{AuthPolicy, Role};
use crate::core::error::{AuthError, EntityError, MarketError};
use crate::core::query::{FilterValue, Filters, PaginatedResponse, QueryParams};
use crate::core::store::Repository;
use crate::core::validation::ValidatedForm;
use crate::entities::{
    Course, CourseMode, CourseStatus, Enrollment, Principal, Profile, Vendor, VendorStatus,
};
use crate::market::dashboard::{
    AdminOverview, CourseFormView, DashboardPage, DashboardView, SeafarerOverview, VendorOverview,
};
use crate::market::forms::{
    CourseStatusUpdate, CourseSubmission, SeafarerRegistration, VendorRegistration, VendorReview,
};
use crate::market::session::Session;
use crate::market::tables::{self, StudentEnrollment};
use crate::storage::InMemoryRepository;
use crate::storage::seed::Dataset;
use chrono::Utc;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// The marketplace: repositories plus the rules around them
#[derive(Clone)]
pub struct Marketplace {
    courses: Arc<dyn Repository<Course>>,
    principals: Arc<dyn Repository<Principal>>,
    enrollments: Arc<dyn Repository<Enrollment>>,
    tables: TableConfig,
    /// Serializes check-then-insert sequences (unique emails, enrollments)
    writes: Arc<Mutex<()>>,
}

impl Marketplace {
    pub fn new(
        courses: Arc<dyn Repository<Course>>,
        principals: Arc<dyn Repository<Principal>>,
        enrollments: Arc<dyn Repository<Enrollment>>,
        tables: TableConfig,
    ) -> Self {
        Self {
            courses,
            principals,
            enrollments,
            tables,
            writes: Arc::new(Mutex::new(())),
        }
    }

    /// Build a marketplace over in-memory copies of a dataset
    pub fn from_dataset(dataset: Dataset, tables: TableConfig) -> Self {
        tracing::info!(
            principals = dataset.principals.len(),
            courses = dataset.courses.len(),
            enrollments = dataset.enrollments.len(),
            "Loading marketplace dataset"
        );
        Self::new(
            Arc::new(InMemoryRepository::from_records(dataset.courses)),
            Arc::new(InMemoryRepository::from_records(dataset.principals)),
            Arc::new(InMemoryRepository::from_records(dataset.enrollments)),
            tables,
        )
    }

    /// The principal repository, shared with the session manager
    pub fn principals(&self) -> Arc<dyn Repository<Principal>> {
        self.principals.clone()
    }

    pub fn tables(&self) -> &TableConfig {
        &self.tables
    }

    // ------------------------------------------------------------------
    // Public catalog
    // ------------------------------------------------------------------

    /// Published courses, searched, filtered, sorted and paginated
    pub async fn catalog(
        &self,
        params: &QueryParams,
    ) -> Result<PaginatedResponse<Course>, MarketError> {
        let courses: Vec<Course> = self
            .courses
            .list()
            .await?
            .into_iter()
            .filter(Course::is_published)
            .collect();

        let state = params.to_state(&self.tables);
        Ok(tables::catalog().window(&courses, &state).to_response())
    }

    /// Any course by id, whatever its status
    pub async fn course(&self, id: &str) -> Result<Course, MarketError> {
        self.courses
            .find(id)
            .await?
            .ok_or_else(|| MarketError::not_found("course", id))
    }

    /// A course visible in the public catalog
    ///
    /// Unpublished courses are reported as missing.
    pub async fn published_course(&self, id: &str) -> Result<Course, MarketError> {
        let course = self.course(id).await?;
        if !course.is_published() {
            return Err(MarketError::not_found("course", id));
        }
        Ok(course)
    }

    // ------------------------------------------------------------------
    // Vendor
    // ------------------------------------------------------------------

    /// The vendor's own courses, any status
    pub async fn vendor_courses(
        &self,
        session: &Session,
        params: &QueryParams,
    ) -> Result<PaginatedResponse<Course>, MarketError> {
        let vendor = require_vendor(session)?;
        let courses = self.courses_of(&vendor.profile.id).await?;

        let state = params.to_state(&self.tables);
        Ok(tables::vendor_courses()
            .window(&courses, &state)
            .to_response())
    }

    /// Enrollments in the vendor's courses, joined with student details
    pub async fn vendor_students(
        &self,
        session: &Session,
        params: &QueryParams,
    ) -> Result<PaginatedResponse<StudentEnrollment>, MarketError> {
        let vendor = require_vendor(session)?;

        let courses: HashMap<String, Course> = self
            .courses_of(&vendor.profile.id)
            .await?
            .into_iter()
            .map(|course| (course.id.clone(), course))
            .collect();
        let principals: HashMap<String, Principal> = self
            .principals
            .list()
            .await?
            .into_iter()
            .map(|principal| (principal.profile().id.clone(), principal))
            .collect();

        let rows: Vec<StudentEnrollment> = self
            .enrollments
            .list()
            .await?
            .iter()
            .filter_map(|enrollment| {
                let course = courses.get(&enrollment.course_id)?;
                let student = principals.get(&enrollment.user_id)?;
                Some(StudentEnrollment::join(enrollment, student, course))
            })
            .collect();

        let state = params.to_state(&self.tables);
        Ok(tables::students().window(&rows, &state).to_response())
    }

    /// Submit a new course; it waits in `Pending` until an admin acts
    ///
    /// Only approved vendors may submit. Course codes are unique,
    /// case-insensitively.
    pub async fn submit_course(
        &self,
        session: &Session,
        form: CourseSubmission,
    ) -> Result<Course, MarketError> {
        let vendor = require_vendor(session)?;
        if vendor.status != VendorStatus::Approved {
            return Err(AuthError::NotVerified {
                status: vendor.status,
            }
            .into());
        }

        let _guard = self.writes.lock().await;

        let taken = self
            .courses
            .list()
            .await?
            .iter()
            .any(|course| course.course_code.eq_ignore_ascii_case(&form.course_code));
        if taken {
            return Err(EntityError::AlreadyExists {
                entity_type: "course".to_string(),
                key: form.course_code,
            }
            .into());
        }

        let course = Course {
            id: Uuid::new_v4().to_string(),
            course_code: form.course_code,
            title: form.title,
            description: form.description,
            institute_id: vendor.profile.id.clone(),
            institute_name: vendor.institute_name.clone(),
            duration_days: form.duration_days,
            fee: form.fee,
            location: form.location,
            mode: form.mode,
            status: CourseStatus::Pending,
            seats: form.seats,
            start_date: form.start_date,
            image_url: form.image_url,
            dg_approved: form.dg_approved,
        };

        let course = self.courses.insert(course).await?;
        tracing::info!(
            course = %course.id,
            code = %course.course_code,
            vendor = %vendor.profile.id,
            "Course submitted for review"
        );
        Ok(course)
    }

    // ------------------------------------------------------------------
    // Seafarer
    // ------------------------------------------------------------------

    /// Courses the seafarer is enrolled in
    pub async fn seafarer_courses(
        &self,
        session: &Session,
        params: &QueryParams,
    ) -> Result<PaginatedResponse<Course>, MarketError> {
        let profile = require_seafarer(session)?;
        let courses = self.enrolled_courses(&profile.id).await?;

        let state = params.to_state(&self.tables);
        Ok(tables::enrolled_courses()
            .window(&courses, &state)
            .to_response())
    }

    /// Enroll the seafarer in a published course
    pub async fn enroll(
        &self,
        session: &Session,
        course_id: &str,
    ) -> Result<Enrollment, MarketError> {
        let profile = require_seafarer(session)?;
        let course = self.published_course(course_id).await?;

        let _guard = self.writes.lock().await;

        let already_enrolled = self
            .enrollments
            .filter(&by_field("user_id", &profile.id))
            .await?
            .iter()
            .any(|enrollment| enrollment.course_id == course.id);
        if already_enrolled {
            return Err(EntityError::AlreadyExists {
                entity_type: "enrollment".to_string(),
                key: format!("{}/{}", profile.id, course.id),
            }
            .into());
        }

        let enrollment = Enrollment {
            id: Uuid::new_v4().to_string(),
            user_id: profile.id.clone(),
            course_id: course.id.clone(),
            enrollment_date: Utc::now().date_naive(),
        };

        let enrollment = self.enrollments.insert(enrollment).await?;
        tracing::info!(user = %profile.id, course = %course.id, "Seafarer enrolled");
        Ok(enrollment)
    }

    // ------------------------------------------------------------------
    // Admin
    // ------------------------------------------------------------------

    /// Every course, for moderation
    pub async fn admin_courses(
        &self,
        session: &Session,
        params: &QueryParams,
    ) -> Result<PaginatedResponse<Course>, MarketError> {
        require_admin(session)?;
        let courses = self.courses.list().await?;

        let state = params.to_state(&self.tables);
        Ok(tables::admin_courses()
            .window(&courses, &state)
            .to_response())
    }

    /// Every vendor account and application
    pub async fn admin_vendors(
        &self,
        session: &Session,
        params: &QueryParams,
    ) -> Result<PaginatedResponse<Vendor>, MarketError> {
        require_admin(session)?;
        let vendors = self.vendors().await?;

        let state = params.to_state(&self.tables);
        Ok(tables::vendors().window(&vendors, &state).to_response())
    }

    /// Every seafarer account
    pub async fn admin_seafarers(
        &self,
        session: &Session,
        params: &QueryParams,
    ) -> Result<PaginatedResponse<Profile>, MarketError> {
        require_admin(session)?;
        let seafarers: Vec<Profile> = self
            .principals
            .list()
            .await?
            .into_iter()
            .filter_map(|principal| match principal {
                Principal::Seafarer(profile) => Some(profile),
                Principal::Vendor(_) | Principal::Admin(_) => None,
            })
            .collect();

        let state = params.to_state(&self.tables);
        Ok(tables::seafarers().window(&seafarers, &state).to_response())
    }

    /// Approve or reject a pending vendor application
    pub async fn review_vendor(
        &self,
        session: &Session,
        vendor_id: &str,
        review: VendorReview,
    ) -> Result<Vendor, MarketError> {
        require_admin(session)?;

        let _guard = self.writes.lock().await;

        let mut vendor = match self.principals.find(vendor_id).await? {
            Some(Principal::Vendor(vendor)) => vendor,
            Some(Principal::Seafarer(_) | Principal::Admin(_)) | None => {
                return Err(MarketError::not_found("vendor", vendor_id));
            }
        };

        if vendor.status != VendorStatus::Pending || review.decision == VendorStatus::Pending {
            return Err(EntityError::InvalidTransition {
                entity_type: "vendor".to_string(),
                id: vendor_id.to_string(),
                from: vendor.status.to_string(),
                to: review.decision.to_string(),
            }
            .into());
        }

        vendor.status = review.decision;
        self.principals
            .update(vendor_id, Principal::Vendor(vendor.clone()))
            .await?;

        tracing::info!(
            vendor = %vendor_id,
            decision = %review.decision,
            admin = %session.principal_id(),
            "Vendor application reviewed"
        );
        Ok(vendor)
    }

    /// Set a course's status
    pub async fn set_course_status(
        &self,
        session: &Session,
        course_id: &str,
        update: CourseStatusUpdate,
    ) -> Result<Course, MarketError> {
        require_admin(session)?;

        let _guard = self.writes.lock().await;

        let mut course = self.course(course_id).await?;
        let previous = course.status;
        course.status = update.status;
        let course = self.courses.update(course_id, course).await?;

        tracing::info!(
            course = %course_id,
            from = %previous,
            to = %course.status,
            admin = %session.principal_id(),
            "Course status changed"
        );
        Ok(course)
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Create a seafarer account
    pub async fn register_seafarer(
        &self,
        form: SeafarerRegistration,
    ) -> Result<Principal, MarketError> {
        let _guard = self.writes.lock().await;
        self.ensure_email_free(&form.email).await?;

        let principal = Principal::Seafarer(Profile {
            id: Uuid::new_v4().to_string(),
            name: form.name,
            email: form.email,
            password: form.password,
            rank: form.rank,
            phone: form.phone,
            profile_picture_url: None,
        });

        let principal = self.principals.insert(principal).await?;
        tracing::info!(user = %principal.profile().id, "Seafarer registered");
        Ok(principal)
    }

    /// Create a vendor account; it stays `Pending` until reviewed
    pub async fn register_vendor(
        &self,
        form: VendorRegistration,
    ) -> Result<Principal, MarketError> {
        let _guard = self.writes.lock().await;
        self.ensure_email_free(&form.email).await?;

        let principal = Principal::Vendor(Vendor {
            profile: Profile {
                id: Uuid::new_v4().to_string(),
                name: form.name,
                email: form.email,
                password: form.password,
                rank: None,
                phone: form.phone,
                profile_picture_url: None,
            },
            institute_name: form.institute_name,
            accreditation_no: form.accreditation_no,
            address: form.address,
            contact_person: form.contact_person,
            documents: Vec::new(),
            status: VendorStatus::Pending,
            submission_date: Some(Utc::now().date_naive()),
        });

        let principal = self.principals.insert(principal).await?;
        tracing::info!(vendor = %principal.profile().id, "Vendor application received");
        Ok(principal)
    }

    // ------------------------------------------------------------------
    // Dashboard
    // ------------------------------------------------------------------

    /// The landing page for the session's role
    pub async fn overview(&self, session: &Session) -> Result<DashboardView, MarketError> {
        let view = match &session.principal {
            Principal::Seafarer(profile) => DashboardView::SeafarerOverview(SeafarerOverview {
                profile: profile.clone(),
                enrolled_courses: self.enrolled_courses(&profile.id).await?,
            }),

            Principal::Vendor(vendor) => {
                let courses = self.courses_of(&vendor.profile.id).await?;
                let course_counts: IndexMap<String, usize> = CourseStatus::ALL
                    .iter()
                    .map(|status| {
                        let count = courses.iter().filter(|c| c.status == *status).count();
                        (status.to_string(), count)
                    })
                    .collect();

                DashboardView::VendorOverview(VendorOverview {
                    vendor: vendor.clone(),
                    verification_status: vendor.status,
                    course_counts,
                    courses,
                })
            }

            Principal::Admin(_) => {
                let principals = self.principals.list().await?;
                let courses = self.courses.list().await?;

                let vendors: Vec<&Vendor> =
                    principals.iter().filter_map(Principal::as_vendor).collect();
                let pending_vendors = vendors
                    .iter()
                    .filter(|v| v.status == VendorStatus::Pending)
                    .map(|v| (*v).clone())
                    .collect();

                DashboardView::AdminOverview(AdminOverview {
                    pending_vendors,
                    seafarer_count: principals
                        .iter()
                        .filter(|p| p.role() == Role::Seafarer)
                        .count(),
                    vendor_count: vendors.len(),
                    course_count: courses.len(),
                    pending_course_count: courses
                        .iter()
                        .filter(|c| c.status == CourseStatus::Pending)
                        .count(),
                })
            }
        };
        Ok(view)
    }

    /// Render the dashboard page at `segment` for the session's role
    pub async fn dashboard(
        &self,
        session: &Session,
        segment: &str,
        params: &QueryParams,
    ) -> Result<DashboardView, MarketError> {
        let page = DashboardPage::resolve(session.role(), segment)?;

        let view = match page {
            DashboardPage::SeafarerOverview
            | DashboardPage::VendorOverview
            | DashboardPage::AdminOverview => self.overview(session).await?,

            DashboardPage::SeafarerCourses => DashboardView::Courses {
                table: self.seafarer_courses(session, params).await?,
            },
            DashboardPage::VendorCourses => DashboardView::Courses {
                table: self.vendor_courses(session, params).await?,
            },
            DashboardPage::AdminCourses => DashboardView::Courses {
                table: self.admin_courses(session, params).await?,
            },

            DashboardPage::VendorNewCourse => {
                let vendor = require_vendor(session)?;
                DashboardView::NewCourse(CourseFormView {
                    can_submit: vendor.status == VendorStatus::Approved,
                    verification_status: vendor.status,
                    fields: CourseSubmission::rules()
                        .field_names()
                        .map(str::to_string)
                        .collect(),
                    modes: CourseMode::ALL.iter().map(CourseMode::as_str).collect(),
                })
            }

            DashboardPage::VendorStudents => DashboardView::Students {
                table: self.vendor_students(session, params).await?,
            },
            DashboardPage::AdminVendors => DashboardView::Vendors {
                table: self.admin_vendors(session, params).await?,
            },
            DashboardPage::AdminUsers => DashboardView::Users {
                table: self.admin_seafarers(session, params).await?,
            },

            DashboardPage::SeafarerProfile
            | DashboardPage::VendorProfile
            | DashboardPage::AdminProfile => DashboardView::Profile {
                principal: session.principal.clone(),
            },
        };

        tracing::debug!(role = %session.role(), page = page.path(), "Rendered dashboard page");
        Ok(view)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    async fn courses_of(&self, vendor_id: &str) -> Result<Vec<Course>, MarketError> {
        Ok(self
            .courses
            .filter(&by_field("institute_id", vendor_id))
            .await?)
    }

    /// Courses the user is enrolled in, in enrollment order
    async fn enrolled_courses(&self, user_id: &str) -> Result<Vec<Course>, MarketError> {
        let enrollments = self.enrollments.filter(&by_field("user_id", user_id)).await?;

        let mut courses = Vec::with_capacity(enrollments.len());
        for enrollment in enrollments {
            match self.courses.find(&enrollment.course_id).await? {
                Some(course) => courses.push(course),
                None => tracing::warn!(
                    enrollment = %enrollment.id,
                    course = %enrollment.course_id,
                    "Enrollment references a missing course"
                ),
            }
        }
        Ok(courses)
    }

    async fn vendors(&self) -> Result<Vec<Vendor>, MarketError> {
        Ok(self
            .principals
            .list()
            .await?
            .into_iter()
            .filter_map(|principal| match principal {
                Principal::Vendor(vendor) => Some(vendor),
                Principal::Seafarer(_) | Principal::Admin(_) => None,
            })
            .collect())
    }

    async fn ensure_email_free(&self, email: &str) -> Result<(), MarketError> {
        let taken = self
            .principals
            .list()
            .await?
            .iter()
            .any(|principal| principal.email().eq_ignore_ascii_case(email));
        if taken {
            return Err(EntityError::AlreadyExists {
                entity_type: "user".to_string(),
                key: email.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

fn by_field(key: &str, value: &str) -> Filters {
    let mut filters = Filters::new();
    filters.insert(key.to_string(), FilterValue::equals(value));
    filters
}

fn require_admin(session: &Session) -> Result<(), MarketError> {
    AuthPolicy::AdminOnly.require(Some(session.role()))?;
    Ok(())
}

fn require_vendor(session: &Session) -> Result<&Vendor, MarketError> {
    match &session.principal {
        Principal::Vendor(vendor) => Ok(vendor),
        Principal::Seafarer(_) | Principal::Admin(_) => Err(AuthError::Forbidden {
            allowed: vec![Role::Vendor],
        }
        .into()),
    }
}

fn require_seafarer(session: &Session) -> Result<&Profile, MarketError> {
    match &session.principal {
        Principal::Seafarer(profile) => Ok(profile),
        Principal::Vendor(_) | Principal::Admin(_) => Err(AuthError::Forbidden {
            allowed: vec![Role::Seafarer],
        }
        .into()),
    }
}
