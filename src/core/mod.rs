pub mod matching;
pub mod query;
pub mod service;

pub use crate::domain::model::{PatternEntry, ReferenceEntry};
pub use crate::domain::ports::ReferenceStore;
pub use crate::utils::error::Result;
