//! Integration tests for labnote-db
//!
//! Tests schema and lifecycle operations with a real SQLite in-memory database

use chrono::Utc;
use labnote_db::{
    connect,
    entities::{
        project::{self, Visibility},
        repository::{self, PermissionLevel},
        repository_cell,
        repository_column::{self, ColumnKind},
        repository_row, team,
        team_member::{self, TeamRole},
        team_repository, user, user_project,
    },
    lifecycle, migrate,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, Set,
};
use uuid::Uuid;

async fn setup_test_db() -> DatabaseConnection {
    let db = connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    migrate(&db).await.expect("Failed to run migrations");

    db
}

async fn insert_user(db: &DatabaseConnection, email: &str, full_name: Option<&str>) -> Uuid {
    let id = Uuid::new_v4();
    user::ActiveModel {
        id: Set(id),
        email: Set(email.to_string()),
        full_name: Set(full_name.map(str::to_string)),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert user");
    id
}

async fn insert_team(db: &DatabaseConnection, name: &str, creator: Uuid) -> Uuid {
    let id = Uuid::new_v4();
    team::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        created_by: Set(creator),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert team");
    id
}

async fn insert_project(db: &DatabaseConnection, team_id: Uuid, creator: Uuid, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    project::ActiveModel {
        id: Set(id),
        team_id: Set(team_id),
        name: Set(name.to_string()),
        visibility: Set(Visibility::Hidden),
        archived: Set(false),
        archived_on: Set(None),
        created_by: Set(creator),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert project");
    id
}

async fn insert_repository(db: &DatabaseConnection, team_id: Uuid, creator: Uuid) -> Uuid {
    let id = Uuid::new_v4();
    repository::ActiveModel {
        id: Set(id),
        team_id: Set(team_id),
        name: Set("Samples".to_string()),
        permission_level: Set(PermissionLevel::Private),
        archived: Set(false),
        archived_on: Set(None),
        created_by: Set(creator),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert repository");
    id
}

#[tokio::test]
async fn test_migrations_run_successfully() {
    let db = connect("sqlite::memory:").await.expect("Failed to connect");

    let result = migrate(&db).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_team_membership_roles_round_trip() {
    let db = setup_test_db().await;
    let owner = insert_user(&db, "owner@lab.test", Some("Olga Owner")).await;
    let member = insert_user(&db, "member@lab.test", None).await;
    let team_id = insert_team(&db, "Lab A", owner).await;

    for (user_id, role) in [(owner, TeamRole::Owner), (member, TeamRole::Member)] {
        team_member::ActiveModel {
            team_id: Set(team_id),
            user_id: Set(user_id),
            role: Set(role),
            joined_at: Set(Utc::now()),
        }
        .insert(&db)
        .await
        .expect("Failed to insert membership");
    }

    let owners = team_member::Entity::find()
        .filter(team_member::Column::TeamId.eq(team_id))
        .filter(team_member::Column::Role.eq(TeamRole::Owner))
        .all(&db)
        .await
        .expect("Failed to query");

    assert_eq!(owners.len(), 1);
    assert_eq!(owners[0].user_id, owner);
    assert!(owners[0].role.is_admin());

    let memberships = team_member::Entity::find()
        .filter(team_member::Column::UserId.eq(member))
        .count(&db)
        .await
        .expect("Failed to count");
    assert_eq!(memberships, 1);
}

#[tokio::test]
async fn test_project_member_links() {
    let db = setup_test_db().await;
    let owner = insert_user(&db, "owner@lab.test", None).await;
    let team_id = insert_team(&db, "Lab A", owner).await;
    let project_id = insert_project(&db, team_id, owner, "Enzyme kinetics").await;

    user_project::ActiveModel {
        project_id: Set(project_id),
        user_id: Set(owner),
        role: Set(Some(user_project::ProjectRole::Owner)),
        created_at: Set(Utc::now()),
    }
    .insert(&db)
    .await
    .expect("Failed to link user");

    let project = project::Entity::find_by_id(project_id)
        .one(&db)
        .await
        .expect("Failed to query")
        .expect("Project not found");
    let links = project
        .find_related(user_project::Entity)
        .all(&db)
        .await
        .expect("Failed to load links");

    assert_eq!(links.len(), 1);
    assert_eq!(links[0].role, Some(user_project::ProjectRole::Owner));
}

#[tokio::test]
async fn test_archive_project_stamps_archive_time() {
    let db = setup_test_db().await;
    let owner = insert_user(&db, "owner@lab.test", None).await;
    let team_id = insert_team(&db, "Lab A", owner).await;
    let project_id = insert_project(&db, team_id, owner, "Old study").await;

    let archived = lifecycle::archive_project(&db, project_id)
        .await
        .expect("Failed to archive");
    assert!(archived.archived);
    assert!(archived.archived_on.is_some());

    // Archiving twice keeps the original timestamp
    let again = lifecycle::archive_project(&db, project_id)
        .await
        .expect("Failed to archive");
    assert_eq!(again.archived_on, archived.archived_on);

    let restored = lifecycle::restore_project(&db, project_id)
        .await
        .expect("Failed to restore");
    assert!(!restored.archived);
    assert!(restored.archived_on.is_none());
}

#[tokio::test]
async fn test_archive_missing_project_is_not_found() {
    let db = setup_test_db().await;

    let result = lifecycle::archive_project(&db, Uuid::new_v4()).await;
    assert!(matches!(result, Err(sea_orm::DbErr::RecordNotFound(_))));
}

#[tokio::test]
async fn test_set_project_visibility() {
    let db = setup_test_db().await;
    let owner = insert_user(&db, "owner@lab.test", None).await;
    let team_id = insert_team(&db, "Lab A", owner).await;
    let project_id = insert_project(&db, team_id, owner, "Open study").await;

    let updated = lifecycle::set_project_visibility(&db, project_id, Visibility::Visible)
        .await
        .expect("Failed to update visibility");
    assert_eq!(updated.visibility, Visibility::Visible);
}

#[tokio::test]
async fn test_share_repository_upserts_link() {
    let db = setup_test_db().await;
    let owner = insert_user(&db, "owner@lab.test", None).await;
    let team_a = insert_team(&db, "Lab A", owner).await;
    let team_b = insert_team(&db, "Lab B", owner).await;
    let repository_id = insert_repository(&db, team_a, owner).await;

    lifecycle::share_repository(&db, repository_id, team_b, PermissionLevel::SharedRead)
        .await
        .expect("Failed to share");
    lifecycle::share_repository(&db, repository_id, team_b, PermissionLevel::SharedWrite)
        .await
        .expect("Failed to reshare");

    let links = team_repository::Entity::find()
        .filter(team_repository::Column::RepositoryId.eq(repository_id))
        .all(&db)
        .await
        .expect("Failed to query links");
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].permission_level, PermissionLevel::SharedWrite);

    let removed = lifecycle::unshare_repository(&db, repository_id, team_b)
        .await
        .expect("Failed to unshare");
    assert!(removed);
    let removed_again = lifecycle::unshare_repository(&db, repository_id, team_b)
        .await
        .expect("Failed to unshare");
    assert!(!removed_again);
}

#[tokio::test]
async fn test_share_repository_rejects_private_level() {
    let db = setup_test_db().await;
    let owner = insert_user(&db, "owner@lab.test", None).await;
    let team_a = insert_team(&db, "Lab A", owner).await;
    let team_b = insert_team(&db, "Lab B", owner).await;
    let repository_id = insert_repository(&db, team_a, owner).await;

    let result =
        lifecycle::share_repository(&db, repository_id, team_b, PermissionLevel::Private).await;
    assert!(matches!(result, Err(DbErr::Custom(_))));

    let links = team_repository::Entity::find()
        .filter(team_repository::Column::RepositoryId.eq(repository_id))
        .all(&db)
        .await
        .expect("Failed to query links");
    assert!(links.is_empty());
}

#[tokio::test]
async fn test_rows_get_sequential_ids_and_cells() {
    let db = setup_test_db().await;
    let owner = insert_user(&db, "owner@lab.test", None).await;
    let team_id = insert_team(&db, "Lab A", owner).await;
    let repository_id = insert_repository(&db, team_id, owner).await;

    let column_id = Uuid::new_v4();
    repository_column::ActiveModel {
        id: Set(column_id),
        repository_id: Set(repository_id),
        name: Set("Concentration".to_string()),
        kind: Set(ColumnKind::Number),
        created_at: Set(Utc::now()),
    }
    .insert(&db)
    .await
    .expect("Failed to insert column");

    let mut ids = Vec::new();
    for name in ["Buffer A", "Buffer B"] {
        let row = repository_row::ActiveModel {
            repository_id: Set(repository_id),
            name: Set(name.to_string()),
            created_by: Set(owner),
            archived: Set(false),
            archived_on: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .expect("Failed to insert row");
        ids.push(row.id);
    }
    assert!(ids[0] < ids[1]);

    repository_cell::ActiveModel {
        row_id: Set(ids[0]),
        column_id: Set(column_id),
        value: Set("0.5".to_string()),
        updated_at: Set(Utc::now()),
    }
    .insert(&db)
    .await
    .expect("Failed to insert cell");

    let row = repository_row::Entity::find_by_id(ids[0])
        .one(&db)
        .await
        .expect("Failed to query")
        .expect("Row not found");
    assert_eq!(row.prefixed_id(), format!("IT{}", ids[0]));

    let cells = row
        .find_related(repository_cell::Entity)
        .all(&db)
        .await
        .expect("Failed to load cells");
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0].value, "0.5");
}

#[test]
fn test_enums_serialize_in_snake_case() {
    assert_eq!(
        serde_json::to_string(&PermissionLevel::SharedWrite).unwrap(),
        "\"shared_write\""
    );
    assert_eq!(serde_json::to_string(&TeamRole::Owner).unwrap(), "\"owner\"");

    let kind: ColumnKind = serde_json::from_str("\"checklist\"").unwrap();
    assert_eq!(kind, ColumnKind::Checklist);
    assert!(kind.is_extra_searchable());
    assert!(!ColumnKind::Asset.is_extra_searchable());
}
