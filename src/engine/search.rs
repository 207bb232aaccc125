//! Free-text search over declared fields.

use crate::domain::Record;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a search query is matched against a record's searchable fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// The whole query must appear, case-insensitively, inside at least one
    /// searchable field.
    #[default]
    Substring,

    /// Every whitespace-separated token must fuzzy-match at least one
    /// searchable field (skim scoring, case-insensitive).
    Fuzzy,
}

/// A compiled search query.
///
/// Built once per derivation so the query is lowercased and tokenized a single
/// time rather than once per record.
pub struct Searcher {
    needle: String,
    tokens: Vec<String>,
    matcher: Option<SkimMatcherV2>,
}

impl Searcher {
    /// Compiles `query`. Returns `None` for an empty query, which matches
    /// everything.
    #[must_use]
    pub fn new(mode: SearchMode, query: &str) -> Option<Self> {
        if query.is_empty() {
            return None;
        }

        let needle = query.to_lowercase();
        let (tokens, matcher) = match mode {
            SearchMode::Substring => (Vec::new(), None),
            SearchMode::Fuzzy => {
                let tokens: Vec<String> = needle.split_whitespace().map(String::from).collect();
                if tokens.is_empty() {
                    // whitespace-only query: fall back to a literal substring match
                    (tokens, None)
                } else {
                    (tokens, Some(SkimMatcherV2::default()))
                }
            }
        };

        Some(Self {
            needle,
            tokens,
            matcher,
        })
    }

    /// Tests whether `record` matches on any of `fields`.
    #[must_use]
    pub fn matches(&self, record: &Record, fields: &[String]) -> bool {
        let haystacks: Vec<String> = fields
            .iter()
            .filter_map(|field| record.get(field).and_then(searchable_text))
            .collect();

        match &self.matcher {
            None => haystacks.iter().any(|text| text.contains(&self.needle)),
            Some(matcher) => self.tokens.iter().all(|token| {
                haystacks
                    .iter()
                    .any(|text| matcher.fuzzy_match(text, token).is_some())
            }),
        }
    }
}

/// Lowercased text form of a scalar value. Objects and arrays are not
/// searchable.
fn searchable_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.to_lowercase()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
