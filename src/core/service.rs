use crate::core::query::ValidatedQuery;
use crate::domain::model::ReferenceEntry;
use crate::domain::ports::ReferenceStore;
use crate::utils::error::{LookupError, Result};
use serde::{Serialize, Serializer};

/// Upper bound on entries returned by a partial match.
pub const MAX_RESULTS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// Organ matched as a whole word; the document is returned unmodified.
    Exact(ReferenceEntry),
    /// Pattern/symptom match; each entry keeps only its matching patterns.
    Partial(Vec<ReferenceEntry>),
}

impl MatchResult {
    pub fn entries(&self) -> &[ReferenceEntry] {
        match self {
            MatchResult::Exact(entry) => std::slice::from_ref(entry),
            MatchResult::Partial(entries) => entries,
        }
    }

    pub fn into_entries(self) -> Vec<ReferenceEntry> {
        match self {
            MatchResult::Exact(entry) => vec![entry],
            MatchResult::Partial(entries) => entries,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, MatchResult::Exact(_))
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

// 兩種結果都序列化為陣列
impl Serialize for MatchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Alive {
    pub status: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Availability {
    pub detail: &'static str,
}

impl Availability {
    pub const AVAILABLE: Availability = Availability {
        detail: "Resource available",
    };
}

pub struct LookupService<S: ReferenceStore> {
    store: S,
}

impl<S: ReferenceStore> LookupService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates a raw term, then runs [`LookupService::search`].
    pub async fn lookup(&self, raw_query: &str) -> Result<MatchResult> {
        let query = ValidatedQuery::parse(raw_query)?;
        self.search(&query).await
    }

    /// Validates a raw term, then runs [`LookupService::exists`].
    pub async fn check_availability(&self, raw_query: &str) -> Result<Availability> {
        let query = ValidatedQuery::parse(raw_query)?;
        if self.exists(&query).await? {
            Ok(Availability::AVAILABLE)
        } else {
            Err(LookupError::not_found())
        }
    }

    pub async fn search(&self, query: &ValidatedQuery) -> Result<MatchResult> {
        // 1. 器官完全比對 (命中即返回完整文件)
        if let Some(entry) = self.store.find_exact(query).await? {
            tracing::debug!("Exact organ match for '{}': {}", query, entry.organ);
            return Ok(MatchResult::Exact(entry));
        }

        // 2. pattern / symptom 部分比對
        let candidates = self.store.find_partial(query, MAX_RESULTS).await?;
        let candidate_count = candidates.len();

        let entries: Vec<ReferenceEntry> = candidates
            .iter()
            .filter_map(|entry| entry.reshaped(query))
            .take(MAX_RESULTS)
            .collect();

        if entries.len() < candidate_count {
            tracing::debug!(
                "Dropped {} candidate(s) without matching patterns for '{}'",
                candidate_count - entries.len(),
                query
            );
        }

        if entries.is_empty() {
            tracing::info!("No matching data found for '{}'", query);
            return Err(LookupError::not_found());
        }

        tracing::debug!("Partial match for '{}': {} entries", query, entries.len());
        Ok(MatchResult::Partial(entries))
    }

    pub async fn exists(&self, query: &ValidatedQuery) -> Result<bool> {
        if self.store.count_exact(query, 1).await? > 0 {
            return Ok(true);
        }

        Ok(self.store.count_partial(query, 1).await? > 0)
    }

    pub fn ping(&self) -> Alive {
        Alive { status: "ok" }
    }
}
