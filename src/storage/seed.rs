//! Seed dataset loading and normalization
//!
//! The marketplace ships with an embedded YAML dataset. A different file can
//! be loaded instead (see `MarketConfig::data_path`). Either way the records
//! pass through [`Dataset::normalize`] before they reach a repository.

use crate::core::field::FieldFormat;
use crate::core::record::Record;
use crate::entities::{Course, Enrollment, Principal};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

const EMBEDDED_SEED: &str = include_str!("../../data/marketplace.yaml");

/// Errors raised while loading a dataset
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid dataset YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{entity} '{id}' references unknown {target} '{target_id}'")]
    DanglingReference {
        entity: &'static str,
        id: String,
        target: &'static str,
        target_id: String,
    },
}

/// Every collection the marketplace starts from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub principals: Vec<Principal>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub enrollments: Vec<Enrollment>,
}

impl Dataset {
    /// The dataset compiled into the crate, normalized
    pub fn embedded() -> Result<Self, DatasetError> {
        Self::from_yaml_str(EMBEDDED_SEED)
    }

    /// Load and normalize a dataset from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load and normalize a dataset from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DatasetError> {
        let raw: Self = serde_yaml::from_str(yaml)?;
        raw.normalize()
    }

    /// Load `path` if given, otherwise the embedded dataset
    pub fn load(path: Option<&Path>) -> Result<Self, DatasetError> {
        match path {
            Some(path) => Self::from_yaml_file(path),
            None => Self::embedded(),
        }
    }

    /// Bring the raw collections in line with the data model
    ///
    /// - principals with an id or email already seen are dropped (first wins)
    /// - each course's institute name is taken from its owning vendor
    /// - image URLs that are not http(s) are cleared
    /// - duplicate course ids and duplicate (user, course) enrollments are dropped
    ///
    /// References to unknown vendors, users or courses are errors.
    pub fn normalize(self) -> Result<Self, DatasetError> {
        let mut seen_ids = HashSet::new();
        let mut seen_emails = HashSet::new();
        let mut principals = Vec::with_capacity(self.principals.len());
        for principal in self.principals {
            let email = principal.email().to_lowercase();
            if !seen_ids.insert(principal.id().to_string()) || !seen_emails.insert(email) {
                tracing::warn!(
                    id = principal.id(),
                    email = principal.email(),
                    "Dropping duplicate principal from dataset"
                );
                continue;
            }
            principals.push(principal);
        }

        let institutes: HashMap<&str, &str> = principals
            .iter()
            .filter_map(Principal::as_vendor)
            .map(|v| (v.profile.id.as_str(), v.institute_name.as_str()))
            .collect();

        let mut course_ids = HashSet::new();
        let mut courses = Vec::with_capacity(self.courses.len());
        for mut course in self.courses {
            if !course_ids.insert(course.id.clone()) {
                tracing::warn!(id = %course.id, "Dropping duplicate course from dataset");
                continue;
            }

            let Some(institute_name) = institutes.get(course.institute_id.as_str()) else {
                return Err(DatasetError::DanglingReference {
                    entity: "course",
                    id: course.id,
                    target: "vendor",
                    target_id: course.institute_id,
                });
            };
            if course.institute_name != *institute_name {
                tracing::debug!(
                    id = %course.id,
                    from = %course.institute_name,
                    to = %institute_name,
                    "Normalizing course institute name"
                );
                course.institute_name = institute_name.to_string();
            }

            course.image_url = course
                .image_url
                .map(|url| url.trim().to_string())
                .filter(|url| FieldFormat::Url.validate_str(url));

            courses.push(course);
        }

        let user_ids: HashSet<&str> = principals.iter().map(|p| p.id()).collect();
        let mut enrollment_ids = HashSet::new();
        let mut pairs = HashSet::new();
        let mut enrollments = Vec::with_capacity(self.enrollments.len());
        for enrollment in self.enrollments {
            if !user_ids.contains(enrollment.user_id.as_str()) {
                return Err(DatasetError::DanglingReference {
                    entity: "enrollment",
                    id: enrollment.id,
                    target: "user",
                    target_id: enrollment.user_id,
                });
            }
            if !course_ids.contains(&enrollment.course_id) {
                return Err(DatasetError::DanglingReference {
                    entity: "enrollment",
                    id: enrollment.id,
                    target: "course",
                    target_id: enrollment.course_id,
                });
            }
            let pair = (enrollment.user_id.clone(), enrollment.course_id.clone());
            if !enrollment_ids.insert(enrollment.id.clone()) || !pairs.insert(pair) {
                tracing::warn!(id = %enrollment.id, "Dropping duplicate enrollment from dataset");
                continue;
            }
            enrollments.push(enrollment);
        }

        Ok(Self {
            principals,
            courses,
            enrollments,
        })
    }
}
