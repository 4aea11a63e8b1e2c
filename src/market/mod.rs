//! The course marketplace built on the table engine

pub mod dashboard;
pub mod forms;
pub mod service;
pub mod session;
pub mod tables;

pub use dashboard::{DashboardPage, DashboardView};
pub use service::Marketplace;
pub use session::{Session, SessionManager};
