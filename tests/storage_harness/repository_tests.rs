//! Macro-generated test suite for `Repository<TestCargo>` contract validation.
//!
//! The `repository_tests!` macro generates a test module that validates any
//! `Repository<TestCargo>` implementation against the full contract: lookups,
//! insertion order, updates, filtering across `FieldValue` variants and
//! concurrent access.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use coursedeck::storage::InMemoryRepository;
//!
//! repository_tests!(InMemoryRepository::<TestCargo>::new());
//! ```
//!
//! # Generated Tests
//!
//! ## Lookups
//! - `test_insert_and_find`: insert then find, verify all fields
//! - `test_find_nonexistent`: unknown id returns None
//! - `test_list_empty`: empty store lists nothing
//! - `test_list_keeps_insertion_order`: list order equals insert order
//!
//! ## Writes
//! - `test_insert_duplicate_id`: second insert with the same id fails
//! - `test_update_existing`: update replaces and keeps position
//! - `test_update_nonexistent`: unknown id fails
//! - `test_update_mismatched_id`: record id must equal the target id
//!
//! ## Filters
//! - `test_filter_string_field`, `test_filter_integer_range`,
//!   `test_filter_float_range`, `test_filter_boolean_field`,
//!   `test_filter_date_range`, `test_filter_null_field`
//! - `test_filter_combines_with_and`
//! - `test_filter_unknown_field`: never matches
//! - `test_filter_empty_is_identity`
//!
//! ## Concurrency
//! - `test_concurrent_inserts`: parallel inserts from spawned tasks

/// Generate a full `Repository<TestCargo>` conformance test suite.
///
/// `$factory` must evaluate to an empty repository. It is re-evaluated for
/// each test. For the concurrent test the repository must also be
/// `Clone + 'static` (shared state via Arc).
#[macro_export]
macro_rules! repository_tests {
    ($factory:expr) => {
        mod repository_contract_tests {
            use super::*;
            use chrono::NaiveDate;
            use coursedeck::core::field::FieldValue;
            use coursedeck::core::query::{FilterValue, Filters};
            use coursedeck::core::record::Record;
            use coursedeck::core::store::Repository;

            async fn seeded(n: usize) -> impl Repository<TestCargo> + Clone + 'static {
                let repo = $factory;
                for cargo in sample_batch(n) {
                    repo.insert(cargo).await.unwrap();
                }
                repo
            }

            fn filters(entries: Vec<(&str, FilterValue)>) -> Filters {
                entries
                    .into_iter()
                    .map(|(key, value)| (key.to_string(), value))
                    .collect()
            }

            fn ids(records: &[TestCargo]) -> Vec<&str> {
                records.iter().map(|r| r.id()).collect()
            }

            // ==================================================================
            // Lookups
            // ==================================================================

            #[tokio::test]
            async fn test_insert_and_find() {
                let repo = $factory;
                let cargo = create_cargo("x1", "Steel coils", "Mumbai", 2500);

                let inserted = repo.insert(cargo.clone()).await.unwrap();
                assert_eq!(inserted, cargo);

                let found = repo.find("x1").await.unwrap();
                assert_eq!(found, Some(cargo));
            }

            #[tokio::test]
            async fn test_find_nonexistent() {
                let repo = seeded(3).await;
                assert!(repo.find("missing").await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_list_empty() {
                let repo = $factory;
                assert!(repo.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_list_keeps_insertion_order() {
                let repo = $factory;
                for id in ["k3", "k1", "k2"] {
                    repo.insert(create_cargo(id, id, "Kochi", 1000))
                        .await
                        .unwrap();
                }

                let all = repo.list().await.unwrap();
                assert_eq!(ids(&all), vec!["k3", "k1", "k2"]);
            }

            // ==================================================================
            // Writes
            // ==================================================================

            #[tokio::test]
            async fn test_insert_duplicate_id() {
                let repo = $factory;
                repo.insert(create_cargo("d1", "First", "Mumbai", 1000))
                    .await
                    .unwrap();

                let result = repo
                    .insert(create_cargo("d1", "Second", "Chennai", 2000))
                    .await;
                assert!(result.is_err(), "Duplicate id must be rejected");

                let kept = repo.find("d1").await.unwrap().unwrap();
                assert_eq!(kept.name, "First");
            }

            #[tokio::test]
            async fn test_update_existing() {
                let repo = seeded(3).await;
                let mut cargo = repo.find("k1").await.unwrap().unwrap();
                cargo.name = "Renamed".to_string();
                cargo.weight = 9999;

                let updated = repo.update("k1", cargo).await.unwrap();
                assert_eq!(updated.name, "Renamed");

                let all = repo.list().await.unwrap();
                assert_eq!(ids(&all), vec!["k0", "k1", "k2"]);
                assert_eq!(all[1].weight, 9999);
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let repo = seeded(2).await;
                let result = repo
                    .update("ghost", create_cargo("ghost", "Ghost", "Nowhere", 1))
                    .await;
                assert!(result.is_err());
                assert_eq!(repo.list().await.unwrap().len(), 2);
            }

            #[tokio::test]
            async fn test_update_mismatched_id() {
                let repo = seeded(2).await;
                let result = repo
                    .update("k0", create_cargo("k1", "Swapped", "Kochi", 1))
                    .await;
                assert!(result.is_err());
            }

            // ==================================================================
            // Filters
            // ==================================================================

            #[tokio::test]
            async fn test_filter_string_field() {
                let repo = seeded(6).await;
                let found = repo
                    .filter(&filters(vec![("port", FilterValue::equals("Chennai"))]))
                    .await
                    .unwrap();
                assert_eq!(ids(&found), vec!["k1", "k4"]);
            }

            #[tokio::test]
            async fn test_filter_integer_range() {
                let repo = seeded(6).await;
                // weights: 1000, 1250, 1500, 1750, 2000, 2250
                let found = repo
                    .filter(&filters(vec![(
                        "weight",
                        FilterValue::Range {
                            min: Some(FieldValue::Integer(1250)),
                            max: Some(FieldValue::Integer(1750)),
                        },
                    )]))
                    .await
                    .unwrap();
                assert_eq!(ids(&found), vec!["k1", "k2", "k3"]);
            }

            #[tokio::test]
            async fn test_filter_float_range() {
                let repo = seeded(6).await;
                // drafts: 4.0, 4.5, 5.0, 5.5, 6.0, 6.5
                let found = repo
                    .filter(&filters(vec![("draft", FilterValue::at_least(5.5))]))
                    .await
                    .unwrap();
                assert_eq!(ids(&found), vec!["k3", "k4", "k5"]);
            }

            #[tokio::test]
            async fn test_filter_boolean_field() {
                let repo = seeded(6).await;
                let found = repo
                    .filter(&filters(vec![("hazardous", FilterValue::equals(true))]))
                    .await
                    .unwrap();
                assert_eq!(ids(&found), vec!["k0", "k3"]);
            }

            #[tokio::test]
            async fn test_filter_date_range() {
                let repo = seeded(6).await;
                let found = repo
                    .filter(&filters(vec![(
                        "loaded_on",
                        FilterValue::Range {
                            min: Some(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().into()),
                            max: Some("2024-01-03".into()),
                        },
                    )]))
                    .await
                    .unwrap();
                assert_eq!(ids(&found), vec!["k1", "k2"]);
            }

            #[tokio::test]
            async fn test_filter_null_field() {
                let repo = seeded(4).await;
                let found = repo
                    .filter(&filters(vec![("inspector", FilterValue::contains("inspector"))]))
                    .await
                    .unwrap();
                assert_eq!(ids(&found), vec!["k0", "k2"]);
            }

            #[tokio::test]
            async fn test_filter_combines_with_and() {
                let repo = seeded(9).await;
                let found = repo
                    .filter(&filters(vec![
                        ("port", FilterValue::one_of(["Mumbai", "Kochi"])),
                        ("hazardous", FilterValue::equals(false)),
                    ]))
                    .await
                    .unwrap();
                assert_eq!(ids(&found), vec!["k2", "k5", "k8"]);
            }

            #[tokio::test]
            async fn test_filter_unknown_field() {
                let repo = seeded(3).await;
                let found = repo
                    .filter(&filters(vec![("colour", FilterValue::equals("red"))]))
                    .await
                    .unwrap();
                assert!(found.is_empty());

                let all = repo
                    .filter(&filters(vec![("colour", FilterValue::All)]))
                    .await
                    .unwrap();
                assert_eq!(all.len(), 3);
            }

            #[tokio::test]
            async fn test_filter_empty_is_identity() {
                let repo = seeded(5).await;
                let found = repo.filter(&Filters::new()).await.unwrap();
                assert_eq!(found, repo.list().await.unwrap());
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_inserts() {
                let repo = $factory;
                let mut handles = Vec::new();

                for i in 0..20 {
                    let repo = repo.clone();
                    handles.push(tokio::spawn(async move {
                        let id = format!("c{}", i);
                        repo.insert(create_cargo(&id, &id, "Mumbai", i)).await
                    }));
                }

                for handle in handles {
                    handle.await.unwrap().unwrap();
                }

                assert_eq!(repo.list().await.unwrap().len(), 20);
            }
        }
    };
}
