use crate::core::query::ValidatedQuery;
use crate::domain::model::{PatternEntry, ReferenceEntry};

impl PatternEntry {
    /// True when the pattern name or any symptom contains the query.
    pub fn matches(&self, query: &ValidatedQuery) -> bool {
        query.is_contained_in(&self.pattern)
            || self.symptoms.iter().any(|symptom| query.is_contained_in(symptom))
    }
}

impl ReferenceEntry {
    pub fn is_exact_match(&self, query: &ValidatedQuery) -> bool {
        query.matches_exactly(&self.organ)
    }

    /// Candidate condition for the partial phase: at least one pattern matches.
    pub fn has_partial_match(&self, query: &ValidatedQuery) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(query))
    }

    /// Same organ, patterns filtered to the ones that match on their own.
    /// `None` when nothing is left after filtering.
    pub fn reshaped(&self, query: &ValidatedQuery) -> Option<ReferenceEntry> {
        let patterns: Vec<PatternEntry> = self
            .patterns
            .iter()
            .filter(|pattern| pattern.matches(query))
            .cloned()
            .collect();

        if patterns.is_empty() {
            return None;
        }

        Some(ReferenceEntry {
            organ: self.organ.clone(),
            patterns,
        })
    }
}
