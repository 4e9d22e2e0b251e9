//! Visibility policy and permission-scoped search.
//!
//! The crate decides which projects and repositories a principal may see and
//! builds paginated, deterministically ordered search results over them.
//! Persistence sits behind [`SearchStore`]; everything else is pure.

pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod matcher;
pub mod model;
pub mod order;
pub mod page;
pub mod policy;
pub mod projects;
pub mod rows;
pub mod store;

pub use config::SearchConfig;
pub use engine::SearchEngine;
pub use error::{AccessError, AccessResult};
pub use matcher::{MatchOptions, TextMatcher};
pub use model::{
    CellRecord, Membership, Principal, ProjectMember, ProjectRecord, RepositoryRecord,
    RepositoryShare, RowRecord,
};
pub use order::SortKey;
pub use page::{Page, PageRequest};
pub use policy::RepositoryAccess;
pub use projects::ProjectSearch;
pub use rows::{RowQuery, RowSearch, RowSearchResult, TextFilter};
pub use store::{SeaOrmStore, SearchStore};

pub use labnote_db::entities::{
    project::Visibility, repository::PermissionLevel, repository_column::ColumnKind,
    team_member::TeamRole, user_project::ProjectRole,
};
