//! Free-text matching of search queries against record fields

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::config::SearchConfig;
use crate::error::{AccessError, AccessResult};

/// Text-match tuning
///
/// With every flag off a field matches when it contains the trimmed query,
/// ignoring case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// The whole field must equal the query
    pub exact: bool,
    pub case_sensitive: bool,
    /// Occurrences must not be embedded in a longer word
    pub whole_word: bool,
    /// Split the query on whitespace; any word may match
    pub any_word: bool,
}

/// A compiled query. An empty query matches everything.
#[derive(Debug, Clone)]
pub struct TextMatcher {
    needles: Vec<String>,
    options: MatchOptions,
}

impl TextMatcher {
    /// Compile `query`, rejecting queries outside the configured length bounds.
    pub fn new(
        query: Option<&str>,
        options: MatchOptions,
        config: &SearchConfig,
    ) -> AccessResult<Self> {
        let query = query.map(str::trim).unwrap_or_default();
        if query.is_empty() {
            return Ok(Self {
                needles: Vec::new(),
                options,
            });
        }

        let length = query.chars().count();
        if length < config.query_min_length {
            return Err(AccessError::invalid(format!(
                "Query must be at least {} characters",
                config.query_min_length
            )));
        }
        if length > config.query_max_length {
            return Err(AccessError::invalid(format!(
                "Query must be at most {} characters",
                config.query_max_length
            )));
        }

        let mut matcher = Self {
            needles: Vec::new(),
            options,
        };
        matcher.needles = if options.any_word {
            query
                .split_whitespace()
                .map(|word| matcher.fold(word).into_owned())
                .collect()
        } else {
            vec![matcher.fold(query).into_owned()]
        };

        Ok(matcher)
    }

    pub fn matches_everything(&self) -> bool {
        self.needles.is_empty()
    }

    /// Query words as compared, lowercased unless matching is case sensitive.
    pub fn needles(&self) -> &[String] {
        &self.needles
    }

    pub fn options(&self) -> MatchOptions {
        self.options
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        if self.needles.is_empty() {
            return true;
        }

        let haystack = self.fold(haystack);
        self.needles
            .iter()
            .any(|needle| self.matches_needle(&haystack, needle))
    }

    fn fold<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.options.case_sensitive {
            Cow::Borrowed(text)
        } else {
            Cow::Owned(text.to_lowercase())
        }
    }

    fn matches_needle(&self, haystack: &str, needle: &str) -> bool {
        if self.options.exact {
            return haystack.trim() == needle;
        }

        if self.options.whole_word {
            return haystack.match_indices(needle).any(|(start, found)| {
                let before = haystack[..start].chars().next_back();
                let after = haystack[start + found.len()..].chars().next();
                !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
            });
        }

        haystack.contains(needle)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
