use crate::utils::error::{LookupError, Result};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

const SEARCH_TERM_PATTERN: &str = r"^[a-zA-Z0-9 ]*$";

fn search_term_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SEARCH_TERM_PATTERN).expect("search term pattern is valid"))
}

/// A search term restricted to ASCII letters, digits and spaces.
///
/// Because of that restriction the term is safe to embed in the store's
/// filter language and its lowercase form is a plain ASCII fold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuery {
    term: String,
    folded: String,
}

impl ValidatedQuery {
    pub fn parse(query: &str) -> Result<Self> {
        if !search_term_regex().is_match(query) {
            return Err(LookupError::invalid_input());
        }

        Ok(Self {
            term: query.to_string(),
            folded: query.to_ascii_lowercase(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.term
    }

    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Whole-string equality, ignoring ASCII case.
    pub fn matches_exactly(&self, value: &str) -> bool {
        value.eq_ignore_ascii_case(&self.term)
    }

    /// Substring containment, ignoring ASCII case.
    pub fn is_contained_in(&self, value: &str) -> bool {
        value.to_ascii_lowercase().contains(&self.folded)
    }
}

impl fmt::Display for ValidatedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.term)
    }
}
