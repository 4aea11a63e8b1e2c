//! Route table for the marketplace API

use crate::server::handlers::{
    AppState, dashboard_overview, dashboard_page, enroll, get_course, health_check, list_courses,
    login, logout, register_seafarer, register_vendor, review_vendor, set_course_status,
    submit_course,
};
use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build every marketplace route
///
/// - GET  /health, /healthz
/// - POST /auth/login, /auth/logout
/// - POST /auth/register/seafarer, /auth/register/vendor
/// - GET  /courses, /courses/{id}
/// - POST /courses/{id}/enroll
/// - GET  /dashboard, /dashboard/{*page}
/// - POST /vendor/courses
/// - POST /admin/vendors/{id}/review
/// - POST /admin/courses/{id}/status
pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/register/seafarer", post(register_seafarer))
        .route("/auth/register/vendor", post(register_vendor))
        .route("/courses", get(list_courses))
        .route("/courses/{id}", get(get_course))
        .route("/courses/{id}/enroll", post(enroll))
        .route("/dashboard", get(dashboard_overview))
        .route("/dashboard/{*page}", get(dashboard_page))
        .route("/vendor/courses", post(submit_course))
        .route("/admin/vendors/{id}/review", post(review_vendor))
        .route("/admin/courses/{id}/status", post(set_course_status))
        .with_state(state)
}

/// Request tracing and CORS around the routes
pub fn with_middleware(router: Router) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}
