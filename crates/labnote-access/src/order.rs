//! Result ordering

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::AccessError;
use crate::model::{ProjectRecord, RowRecord};

/// Sort key for search results. Defaults to newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Creation time, newest first
    #[default]
    New,
    /// Creation time, oldest first
    Old,
    /// Name ascending
    Atoz,
    /// Name descending
    Ztoa,
    /// Archive time, most recently archived first
    ArchivedNew,
    /// Archive time, earliest archived first
    ArchivedOld,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::New => "new",
            SortKey::Old => "old",
            SortKey::Atoz => "atoz",
            SortKey::Ztoa => "ztoa",
            SortKey::ArchivedNew => "archived_new",
            SortKey::ArchivedOld => "archived_old",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(SortKey::New),
            "old" => Ok(SortKey::Old),
            "atoz" => Ok(SortKey::Atoz),
            "ztoa" => Ok(SortKey::Ztoa),
            "archived_new" => Ok(SortKey::ArchivedNew),
            "archived_old" => Ok(SortKey::ArchivedOld),
            other => Err(AccessError::invalid(format!("Unknown sort key '{}'", other))),
        }
    }
}

/// Fields every sortable search result exposes
pub trait Sortable {
    type Id: Ord;

    fn sort_id(&self) -> Self::Id;
    fn sort_name(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
    fn archived_on(&self) -> Option<DateTime<Utc>>;
}

impl Sortable for ProjectRecord {
    type Id = uuid::Uuid;

    fn sort_id(&self) -> Self::Id {
        self.id
    }
    fn sort_name(&self) -> &str {
        &self.name
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn archived_on(&self) -> Option<DateTime<Utc>> {
        self.archived_on
    }
}

impl Sortable for RowRecord {
    type Id = i32;

    fn sort_id(&self) -> Self::Id {
        self.id
    }
    fn sort_name(&self) -> &str {
        &self.name
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn archived_on(&self) -> Option<DateTime<Utc>> {
        self.archived_on
    }
}

/// Sort in place. Ties fall back to the record id so the order is total.
pub fn sort_by_key<T: Sortable>(items: &mut [T], key: SortKey) {
    items.sort_by(|a, b| compare(a, b, key).then_with(|| a.sort_id().cmp(&b.sort_id())));
}

fn compare<T: Sortable>(a: &T, b: &T, key: SortKey) -> Ordering {
    match key {
        SortKey::New => b.created_at().cmp(&a.created_at()),
        SortKey::Old => a.created_at().cmp(&b.created_at()),
        SortKey::Atoz => compare_names(a.sort_name(), b.sort_name()),
        SortKey::Ztoa => compare_names(b.sort_name(), a.sort_name()),
        SortKey::ArchivedNew => compare_archived(a.archived_on(), b.archived_on(), true),
        SortKey::ArchivedOld => compare_archived(a.archived_on(), b.archived_on(), false),
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

// Records that were never archived sort last in both directions
fn compare_archived(
    a: Option<DateTime<Utc>>,
    b: Option<DateTime<Utc>>,
    newest_first: bool,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if newest_first => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
