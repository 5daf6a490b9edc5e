pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::ConfigArgs;

pub use adapters::{connect_store, DataApiStore, InMemoryStore};
pub use config::ServiceConfig;
pub use core::query::ValidatedQuery;
pub use core::service::{LookupService, MatchResult, MAX_RESULTS};
pub use utils::error::{LookupError, Result};
