// Adapters layer: concrete reference stores behind the ReferenceStore port.

pub mod data_api;
pub mod memory;

use crate::config::{StoreBackend, StoreSettings};
use crate::domain::ports::ReferenceStore;
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;
use std::sync::Arc;

pub use data_api::DataApiStore;
pub use memory::InMemoryStore;

/// Builds the process-wide store handle selected by the configuration.
pub async fn connect_store(settings: &StoreSettings) -> Result<Arc<dyn ReferenceStore>> {
    match settings.backend {
        StoreBackend::DataApi => {
            let store = DataApiStore::new(settings)?;
            tracing::info!(
                "🔌 Using Data API store {}.{}",
                settings.database,
                settings.collection
            );
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            let path = validate_required_field("store.fixture_path", &settings.fixture_path)?;
            let store = InMemoryStore::from_file(path).await?;
            Ok(Arc::new(store))
        }
    }
}
