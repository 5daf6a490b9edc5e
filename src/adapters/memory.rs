use crate::core::query::ValidatedQuery;
use crate::domain::model::{ReferenceEntry, StoredDocument};
use crate::domain::ports::ReferenceStore;
use crate::utils::error::{LookupError, Result};
use async_trait::async_trait;
use std::path::Path;

/// Reference collection held in memory, in storage order.
///
/// Loaded from a JSON export of the collection (an array of documents,
/// `_id` optional). Used for local runs and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    documents: Vec<StoredDocument>,
}

impl InMemoryStore {
    pub fn new(entries: Vec<ReferenceEntry>) -> Result<Self> {
        Self::from_documents(
            entries
                .into_iter()
                .map(|entry| StoredDocument { id: None, entry })
                .collect(),
        )
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Self::from_documents(serde_json::from_str(content)?)
    }

    // 每份文件都必須有非空的 organ
    fn from_documents(documents: Vec<StoredDocument>) -> Result<Self> {
        if let Some(position) = documents
            .iter()
            .position(|doc| doc.entry.organ.trim().is_empty())
        {
            return Err(LookupError::InvalidData {
                message: format!("document #{} has an empty 'organ' field", position),
            });
        }

        Ok(Self { documents })
    }

    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        let store = Self::from_json_str(&content)?;
        tracing::info!(
            "📚 Loaded {} reference documents from {}",
            store.len(),
            path.as_ref().display()
        );
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn entries(&self) -> impl Iterator<Item = &ReferenceEntry> {
        self.documents.iter().map(|doc| &doc.entry)
    }
}

#[async_trait]
impl ReferenceStore for InMemoryStore {
    async fn find_exact(&self, query: &ValidatedQuery) -> Result<Option<ReferenceEntry>> {
        Ok(self
            .documents
            .iter()
            .find(|doc| doc.entry.is_exact_match(query))
            .cloned()
            .map(StoredDocument::into_entry))
    }

    async fn find_partial(
        &self,
        query: &ValidatedQuery,
        limit: usize,
    ) -> Result<Vec<ReferenceEntry>> {
        Ok(self
            .entries()
            .filter_map(|entry| entry.reshaped(query))
            .take(limit)
            .collect())
    }

    async fn count_exact(&self, query: &ValidatedQuery, limit: usize) -> Result<u64> {
        let count = self
            .entries()
            .filter(|entry| entry.is_exact_match(query))
            .take(limit)
            .count();
        Ok(count as u64)
    }

    async fn count_partial(&self, query: &ValidatedQuery, limit: usize) -> Result<u64> {
        let count = self
            .entries()
            .filter(|entry| entry.has_partial_match(query))
            .take(limit)
            .count();
        Ok(count as u64)
    }
}
