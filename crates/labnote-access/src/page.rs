//! Pagination

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

use crate::config::SearchConfig;
use crate::error::{AccessError, AccessResult};

/// Which slice of an ordered result set to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageRequest {
    /// One-based page number
    Number(NonZeroU32),
    /// Everything, unpaginated
    All,
}

impl PageRequest {
    pub fn first() -> Self {
        PageRequest::Number(NonZeroU32::MIN)
    }

    /// Interpret a raw page value: the configured sentinel means "no limit",
    /// positive numbers are pages, anything else is rejected.
    pub fn from_raw(raw: i64, config: &SearchConfig) -> AccessResult<Self> {
        if raw == config.no_limit_sentinel {
            return Ok(PageRequest::All);
        }

        u32::try_from(raw)
            .ok()
            .and_then(NonZeroU32::new)
            .map(PageRequest::Number)
            .ok_or_else(|| {
                AccessError::invalid(format!(
                    "Page must be a positive number or {}, got {}",
                    config.no_limit_sentinel, raw
                ))
            })
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// One page of an ordered result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Page number, absent for unpaginated results
    pub page: Option<u32>,
    /// Page size, absent for unpaginated results
    pub per_page: Option<usize>,
    /// Number of results across all pages
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// Cut `items` (already filtered, deduplicated and ordered) to the requested page.
    pub fn paginate(items: Vec<T>, request: PageRequest, limit: usize) -> Self {
        let total = items.len();

        match request {
            PageRequest::All => Self {
                items,
                page: None,
                per_page: None,
                total,
                total_pages: usize::from(total > 0),
                has_next: false,
            },
            PageRequest::Number(number) => {
                let limit = limit.max(1);
                let offset = (number.get() as usize - 1).saturating_mul(limit);
                let items: Vec<T> = items.into_iter().skip(offset).take(limit).collect();

                Self {
                    has_next: offset.saturating_add(items.len()) < total,
                    items,
                    page: Some(number.get()),
                    per_page: Some(limit),
                    total,
                    total_pages: total.div_ceil(limit),
                }
            }
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
            has_next: self.has_next,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: u32) -> PageRequest {
        PageRequest::Number(NonZeroU32::new(n).unwrap())
    }

    #[test]
    fn test_from_raw() {
        let config = SearchConfig::default();

        assert_eq!(PageRequest::from_raw(-1, &config).unwrap(), PageRequest::All);
        assert_eq!(PageRequest::from_raw(1, &config).unwrap(), page(1));
        assert_eq!(PageRequest::from_raw(7, &config).unwrap(), page(7));

        for bad in [0, -2, i64::MIN, i64::from(u32::MAX) + 1] {
            assert!(matches!(
                PageRequest::from_raw(bad, &config),
                Err(AccessError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_custom_sentinel() {
        let config = SearchConfig {
            no_limit_sentinel: 0,
            ..SearchConfig::default()
        };
        assert_eq!(PageRequest::from_raw(0, &config).unwrap(), PageRequest::All);
        assert!(PageRequest::from_raw(-1, &config).is_err());
    }

    #[test]
    fn test_paginate_offsets() {
        let items: Vec<u32> = (1..=7).collect();

        let first = Page::paginate(items.clone(), page(1), 3);
        assert_eq!(first.items, vec![1, 2, 3]);
        assert_eq!(first.total, 7);
        assert_eq!(first.total_pages, 3);
        assert!(first.has_next);

        let last = Page::paginate(items.clone(), page(3), 3);
        assert_eq!(last.items, vec![7]);
        assert!(!last.has_next);

        let beyond = Page::paginate(items, page(9), 3);
        assert!(beyond.is_empty());
        assert_eq!(beyond.total, 7);
        assert!(!beyond.has_next);
    }

    #[test]
    fn test_pages_partition_the_full_set() {
        let items: Vec<u32> = (1..=10).collect();
        let all = Page::paginate(items.clone(), PageRequest::All, 4);
        assert_eq!(all.page, None);

        let mut joined = Vec::new();
        for n in 1..=all.total.div_ceil(4) as u32 {
            joined.extend(Page::paginate(items.clone(), page(n), 4).items);
        }
        assert_eq!(joined, all.items);
    }
}
