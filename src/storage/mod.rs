//! Storage implementations for the repository trait

pub mod in_memory;
pub mod seed;

pub use in_memory::InMemoryRepository;
pub use seed::{Dataset, DatasetError};
