//! Database entities

pub mod project;
pub mod repository;
pub mod repository_cell;
pub mod repository_column;
pub mod repository_row;
pub mod team;
pub mod team_member;
pub mod team_repository;
pub mod user;
pub mod user_project;

pub use project::Entity as Project;
pub use repository::Entity as Repository;
pub use repository_cell::Entity as RepositoryCell;
pub use repository_column::Entity as RepositoryColumn;
pub use repository_row::Entity as RepositoryRow;
pub use team::Entity as Team;
pub use team_member::Entity as TeamMember;
pub use team_repository::Entity as TeamRepository;
pub use user::Entity as User;
pub use user_project::Entity as UserProject;

pub mod prelude {
    pub use super::project::Entity as Project;
    pub use super::repository::Entity as Repository;
    pub use super::repository_cell::Entity as RepositoryCell;
    pub use super::repository_column::Entity as RepositoryColumn;
    pub use super::repository_row::Entity as RepositoryRow;
    pub use super::team::Entity as Team;
    pub use super::team_member::Entity as TeamMember;
    pub use super::team_repository::Entity as TeamRepository;
    pub use super::user::Entity as User;
    pub use super::user_project::Entity as UserProject;
}
