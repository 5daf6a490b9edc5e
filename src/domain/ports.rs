use crate::core::query::ValidatedQuery;
use crate::domain::model::ReferenceEntry;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Read-only query capability over the reference collection.
///
/// Exact lookups compare the whole `organ` field ignoring ASCII case.
/// Partial lookups test each pattern's name and symptoms for a
/// case-insensitive substring and may already return reshaped entries;
/// the service re-applies the per-pattern filter either way.
#[async_trait]
pub trait ReferenceStore: Send + Sync {
    /// First document in storage order whose organ equals the query.
    async fn find_exact(&self, query: &ValidatedQuery) -> Result<Option<ReferenceEntry>>;

    /// Candidate documents with at least one matching pattern, at most `limit`.
    async fn find_partial(&self, query: &ValidatedQuery, limit: usize)
        -> Result<Vec<ReferenceEntry>>;

    async fn count_exact(&self, query: &ValidatedQuery, limit: usize) -> Result<u64>;

    async fn count_partial(&self, query: &ValidatedQuery, limit: usize) -> Result<u64>;
}

#[async_trait]
impl<S: ReferenceStore + ?Sized> ReferenceStore for Arc<S> {
    async fn find_exact(&self, query: &ValidatedQuery) -> Result<Option<ReferenceEntry>> {
        (**self).find_exact(query).await
    }

    async fn find_partial(
        &self,
        query: &ValidatedQuery,
        limit: usize,
    ) -> Result<Vec<ReferenceEntry>> {
        (**self).find_partial(query, limit).await
    }

    async fn count_exact(&self, query: &ValidatedQuery, limit: usize) -> Result<u64> {
        (**self).count_exact(query, limit).await
    }

    async fn count_partial(&self, query: &ValidatedQuery, limit: usize) -> Result<u64> {
        (**self).count_partial(query, limit).await
    }
}
