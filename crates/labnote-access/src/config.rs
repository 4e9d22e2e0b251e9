//! Search constants supplied by the deployment

use serde::{Deserialize, Serialize};

use crate::error::{AccessError, AccessResult};

/// Tunables for paginated search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Page size for paginated results
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Raw page value meaning "return everything"
    #[serde(default = "default_no_limit_sentinel")]
    pub no_limit_sentinel: i64,

    /// Shortest accepted non-empty query, in characters
    #[serde(default = "default_query_min_length")]
    pub query_min_length: usize,

    /// Longest accepted query, in characters
    #[serde(default = "default_query_max_length")]
    pub query_max_length: usize,
}

fn default_search_limit() -> usize {
    20
}

fn default_no_limit_sentinel() -> i64 {
    -1
}

fn default_query_min_length() -> usize {
    2
}

fn default_query_max_length() -> usize {
    10_000
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            search_limit: default_search_limit(),
            no_limit_sentinel: default_no_limit_sentinel(),
            query_min_length: default_query_min_length(),
            query_max_length: default_query_max_length(),
        }
    }
}

impl SearchConfig {
    /// Reject configurations the pagination rules cannot work with.
    pub fn validate(&self) -> AccessResult<()> {
        if self.search_limit == 0 {
            return Err(AccessError::invalid("search_limit must be at least 1"));
        }
        if self.no_limit_sentinel >= 1 {
            return Err(AccessError::invalid(format!(
                "no_limit_sentinel {} collides with a page number",
                self.no_limit_sentinel
            )));
        }
        if self.query_min_length > self.query_max_length {
            return Err(AccessError::invalid(
                "query_min_length exceeds query_max_length",
            ));
        }
        Ok(())
    }
}
