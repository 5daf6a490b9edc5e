use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternEntry {
    pub pattern: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default, alias = "treatmentPoints")]
    pub treatment_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub organ: String,
    #[serde(default)]
    pub patterns: Vec<PatternEntry>,
}

/// A reference entry as persisted, including the store's internal `_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredDocument {
    #[serde(rename = "_id", default)]
    pub id: Option<serde_json::Value>,
    #[serde(flatten)]
    pub entry: ReferenceEntry,
}

impl StoredDocument {
    /// Drops the storage identifier; callers never see `_id`.
    pub fn into_entry(self) -> ReferenceEntry {
        self.entry
    }
}
