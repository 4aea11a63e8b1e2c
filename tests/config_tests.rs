//! Configuration and dataset loading from files
//!
//! Writes YAML to temporary files and checks that the server picks up the
//! configured page sizes, session lifetime and dataset.

use axum_test::TestServer;
use coursedeck::config::ConfigError;
use coursedeck::prelude::*;
use coursedeck::storage::DatasetError;
use serde_json::{Value, json};
use std::io::Write;
use tempfile::NamedTempFile;

const SMALL_DATASET: &str = r##"
principals:
  - role: user
    id: s1
    name: Priya Nair
    email: priya@example.com
    password: secret
    rank: Third Officer
  - role: vendor
    id: i1
    name: Kochi Marine Academy
    email: office@kochimarine.in
    password: secret
    institute_name: Kochi Marine Academy
    accreditation_no: DGS-77
    address: Fort Kochi
    contact_person: Capt. Thomas
    status: Approved
courses:
  - id: k1
    course_code: AFF-01
    title: Advanced Fire Fighting
    description: Shipboard fire command and control.
    institute_id: i1
    institute_name: Someone Else
    duration_days: 4
    fee: 7200
    location: Kochi
    mode: Offline
    status: Approved
    seats: 16
    start_date: 2024-09-02
    image_url: "#"
  - id: k2
    course_code: MFA-01
    title: Medical First Aid
    description: First aid aboard ship.
    institute_id: i1
    institute_name: Kochi Marine Academy
    duration_days: 3
    fee: 5400
    location: Kochi
    mode: Online
    status: Active
    seats: 30
    start_date: 2024-09-16
  - id: k3
    course_code: PSC-01
    title: Proficiency in Survival Craft
    description: Lifeboats and rescue boats.
    institute_id: i1
    institute_name: Kochi Marine Academy
    duration_days: 5
    fee: 6100
    location: Kochi
    mode: Offline
    status: Approved
    seats: 20
    start_date: 2024-10-07
enrollments:
  - { id: n1, user_id: s1, course_id: k1, enrollment_date: 2024-08-20 }
"##;

fn yaml_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write yaml");
    file
}

// =============================================================================
// MarketConfig
// =============================================================================

mod market_config_tests {
    use super::*;

    #[test]
    fn test_load_full_config_file() {
        let file = yaml_file(
            "server:\n  bind: 0.0.0.0:8080\ntables:\n  default_page_size: 2\n  max_page_size: 4\nsessions:\n  ttl_minutes: 15\n",
        );

        let config = MarketConfig::from_yaml_file(file.path()).unwrap();

        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.tables.default_page_size, 2);
        assert_eq!(config.tables.max_page_size, 4);
        assert_eq!(config.sessions.ttl(), chrono::Duration::minutes(15));
    }

    #[test]
    fn test_empty_file_is_default() {
        let file = yaml_file("{}\n");
        let config = MarketConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config, MarketConfig::default());
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let file = yaml_file("tables: [unclosed\n");
        let err = MarketConfig::from_yaml_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_oversized_session_ttl_is_rejected() {
        let err = MarketConfig::from_yaml_str("sessions:\n  ttl_minutes: 1000000000000\n")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "sessions.ttl_minutes",
                ..
            }
        ));

        let year = format!("sessions:\n  ttl_minutes: {}\n", coursedeck::config::MAX_TTL_MINUTES);
        assert!(MarketConfig::from_yaml_str(&year).is_ok());
    }

    #[test]
    fn test_zero_purge_interval_is_rejected() {
        let err = MarketConfig::from_yaml_str("sessions:\n  purge_interval_seconds: 0\n")
            .unwrap_err();
        assert!(err.to_string().contains("sessions.purge_interval_seconds"));
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let err = MarketConfig::from_yaml_str("tables:\n  default_page_size: 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "tables.default_page_size",
                ..
            }
        ));
    }
}

// =============================================================================
// Dataset files
// =============================================================================

mod dataset_tests {
    use super::*;

    #[test]
    fn test_dataset_file_is_normalized() {
        let file = yaml_file(SMALL_DATASET);
        let dataset = Dataset::from_yaml_file(file.path()).unwrap();

        assert_eq!(dataset.principals.len(), 2);
        assert_eq!(dataset.courses.len(), 3);

        let k1 = &dataset.courses[0];
        assert_eq!(k1.institute_name, "Kochi Marine Academy");
        assert_eq!(k1.image_url, None);
    }

    #[test]
    fn test_dangling_enrollment_is_rejected() {
        let yaml = SMALL_DATASET.replace("course_id: k1", "course_id: k9");
        let err = Dataset::from_yaml_str(&yaml).unwrap_err();

        assert!(matches!(
            err,
            DatasetError::DanglingReference {
                entity: "enrollment",
                target: "course",
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "enrollment 'n1' references unknown course 'k9'"
        );
    }

    #[test]
    fn test_course_with_unknown_vendor_is_rejected() {
        let yaml = SMALL_DATASET.replace(
            "institute_id: i1\n    institute_name: Someone Else",
            "institute_id: i7\n    institute_name: Someone Else",
        );
        let err = Dataset::from_yaml_str(&yaml).unwrap_err();
        assert!(err.to_string().contains("unknown vendor 'i7'"));
    }

    #[test]
    fn test_duplicate_email_keeps_first() {
        let yaml = SMALL_DATASET.replace("office@kochimarine.in", "PRIYA@example.com");
        // The vendor is dropped, so its courses now dangle
        let err = Dataset::from_yaml_str(&yaml).unwrap_err();
        assert!(matches!(err, DatasetError::DanglingReference { target: "vendor", .. }));
    }
}

// =============================================================================
// Server wired from files
// =============================================================================

mod configured_server_tests {
    use super::*;

    fn configured_server(data: &NamedTempFile) -> TestServer {
        let config = MarketConfig::from_yaml_str(&format!(
            "tables:\n  default_page_size: 2\n  max_page_size: 2\ndata_path: {}\n",
            data.path().display()
        ))
        .unwrap();

        let app = ServerBuilder::new()
            .with_config(config)
            .build()
            .expect("Failed to build app");
        TestServer::new(app).expect("Failed to create test server")
    }

    #[tokio::test]
    async fn test_catalog_uses_configured_dataset_and_page_size() {
        let data = yaml_file(SMALL_DATASET);
        let server = configured_server(&data);

        let response = server.get("/courses").await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["pagination"]["total"], 3);
        assert_eq!(body["pagination"]["limit"], 2);
        assert_eq!(body["pagination"]["total_pages"], 2);
    }

    #[tokio::test]
    async fn test_limit_is_capped_by_max_page_size() {
        let data = yaml_file(SMALL_DATASET);
        let server = configured_server(&data);

        let response = server.get("/courses").add_query_param("limit", 50).await;
        let body: Value = response.json();
        assert_eq!(body["pagination"]["limit"], 2);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_dataset_accounts_can_log_in() {
        let data = yaml_file(SMALL_DATASET);
        let server = configured_server(&data);

        let response = server
            .post("/auth/login")
            .json(&json!({ "email": "priya@example.com", "password": "secret" }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["principal"]["id"], "s1");
    }
}
