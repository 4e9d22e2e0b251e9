//! Initial schema: tenants, memberships, projects and inventories

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // 1. users
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(uuid(User::Id).primary_key())
                    .col(string_len(User::Email, 255).unique_key())
                    .col(string_len_null(User::FullName, 255))
                    .col(timestamp_with_time_zone(User::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(User::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 2. teams
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Team::Table)
                    .if_not_exists()
                    .col(uuid(Team::Id).primary_key())
                    .col(string_len(Team::Name, 255))
                    .col(uuid(Team::CreatedBy))
                    .col(timestamp_with_time_zone(Team::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Team::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_teams_created_by")
                            .from(Team::Table, Team::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 3. team_members junction table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(TeamMember::Table)
                    .if_not_exists()
                    .col(uuid(TeamMember::TeamId))
                    .col(uuid(TeamMember::UserId))
                    .col(string_len(TeamMember::Role, 32).default("member"))
                    .col(
                        timestamp_with_time_zone(TeamMember::JoinedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(TeamMember::TeamId)
                            .col(TeamMember::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_members_team_id")
                            .from(TeamMember::Table, TeamMember::TeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_members_user_id")
                            .from(TeamMember::Table, TeamMember::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_team_members_user_id")
                    .table(TeamMember::Table)
                    .col(TeamMember::UserId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 4. projects
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Project::Table)
                    .if_not_exists()
                    .col(uuid(Project::Id).primary_key())
                    .col(uuid(Project::TeamId))
                    .col(string_len(Project::Name, 255))
                    .col(string_len(Project::Visibility, 16).default("hidden"))
                    .col(boolean(Project::Archived).default(false))
                    .col(timestamp_with_time_zone_null(Project::ArchivedOn))
                    .col(uuid(Project::CreatedBy))
                    .col(timestamp_with_time_zone(Project::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Project::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_projects_team_id")
                            .from(Project::Table, Project::TeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_projects_team_id")
                    .table(Project::Table)
                    .col(Project::TeamId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 5. user_projects junction table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(UserProject::Table)
                    .if_not_exists()
                    .col(uuid(UserProject::ProjectId))
                    .col(uuid(UserProject::UserId))
                    .col(string_len_null(UserProject::Role, 32))
                    .col(
                        timestamp_with_time_zone(UserProject::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(UserProject::ProjectId)
                            .col(UserProject::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_projects_project_id")
                            .from(UserProject::Table, UserProject::ProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_projects_user_id")
                            .from(UserProject::Table, UserProject::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 6. repositories
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Repository::Table)
                    .if_not_exists()
                    .col(uuid(Repository::Id).primary_key())
                    .col(uuid(Repository::TeamId))
                    .col(string_len(Repository::Name, 255))
                    .col(string_len(Repository::PermissionLevel, 32).default("not_shared"))
                    .col(boolean(Repository::Archived).default(false))
                    .col(timestamp_with_time_zone_null(Repository::ArchivedOn))
                    .col(uuid(Repository::CreatedBy))
                    .col(
                        timestamp_with_time_zone(Repository::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Repository::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_repositories_team_id")
                            .from(Repository::Table, Repository::TeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_repositories_team_id")
                    .table(Repository::Table)
                    .col(Repository::TeamId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 7. team_repositories sharing links
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(TeamRepository::Table)
                    .if_not_exists()
                    .col(uuid(TeamRepository::RepositoryId))
                    .col(uuid(TeamRepository::TeamId))
                    .col(string_len(TeamRepository::PermissionLevel, 32))
                    .col(
                        timestamp_with_time_zone(TeamRepository::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(TeamRepository::RepositoryId)
                            .col(TeamRepository::TeamId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_repositories_repository_id")
                            .from(TeamRepository::Table, TeamRepository::RepositoryId)
                            .to(Repository::Table, Repository::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_repositories_team_id")
                            .from(TeamRepository::Table, TeamRepository::TeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_team_repositories_team_id")
                    .table(TeamRepository::Table)
                    .col(TeamRepository::TeamId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 8. repository_columns
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(RepositoryColumn::Table)
                    .if_not_exists()
                    .col(uuid(RepositoryColumn::Id).primary_key())
                    .col(uuid(RepositoryColumn::RepositoryId))
                    .col(string_len(RepositoryColumn::Name, 255))
                    .col(string_len(RepositoryColumn::Kind, 32))
                    .col(
                        timestamp_with_time_zone(RepositoryColumn::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_repository_columns_repository_id")
                            .from(RepositoryColumn::Table, RepositoryColumn::RepositoryId)
                            .to(Repository::Table, Repository::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 9. repository_rows
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(RepositoryRow::Table)
                    .if_not_exists()
                    .col(pk_auto(RepositoryRow::Id))
                    .col(uuid(RepositoryRow::RepositoryId))
                    .col(string_len(RepositoryRow::Name, 255))
                    .col(uuid(RepositoryRow::CreatedBy))
                    .col(boolean(RepositoryRow::Archived).default(false))
                    .col(timestamp_with_time_zone_null(RepositoryRow::ArchivedOn))
                    .col(
                        timestamp_with_time_zone(RepositoryRow::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(RepositoryRow::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_repository_rows_repository_id")
                            .from(RepositoryRow::Table, RepositoryRow::RepositoryId)
                            .to(Repository::Table, Repository::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_repository_rows_created_by")
                            .from(RepositoryRow::Table, RepositoryRow::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_repository_rows_repository_id")
                    .table(RepositoryRow::Table)
                    .col(RepositoryRow::RepositoryId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 10. repository_cells
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(RepositoryCell::Table)
                    .if_not_exists()
                    .col(integer(RepositoryCell::RowId))
                    .col(uuid(RepositoryCell::ColumnId))
                    .col(text(RepositoryCell::Value))
                    .col(
                        timestamp_with_time_zone(RepositoryCell::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(RepositoryCell::RowId)
                            .col(RepositoryCell::ColumnId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_repository_cells_row_id")
                            .from(RepositoryCell::Table, RepositoryCell::RowId)
                            .to(RepositoryRow::Table, RepositoryRow::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_repository_cells_column_id")
                            .from(RepositoryCell::Table, RepositoryCell::ColumnId)
                            .to(RepositoryColumn::Table, RepositoryColumn::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse dependency order
        manager
            .drop_table(Table::drop().table(RepositoryCell::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RepositoryRow::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RepositoryColumn::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeamRepository::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Repository::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserProject::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Project::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeamMember::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Team::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum User {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Email,
    FullName,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Team {
    #[sea_orm(iden = "teams")]
    Table,
    Id,
    Name,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TeamMember {
    #[sea_orm(iden = "team_members")]
    Table,
    TeamId,
    UserId,
    Role,
    JoinedAt,
}

#[derive(DeriveIden)]
enum Project {
    #[sea_orm(iden = "projects")]
    Table,
    Id,
    TeamId,
    Name,
    Visibility,
    Archived,
    ArchivedOn,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserProject {
    #[sea_orm(iden = "user_projects")]
    Table,
    ProjectId,
    UserId,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Repository {
    #[sea_orm(iden = "repositories")]
    Table,
    Id,
    TeamId,
    Name,
    PermissionLevel,
    Archived,
    ArchivedOn,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TeamRepository {
    #[sea_orm(iden = "team_repositories")]
    Table,
    RepositoryId,
    TeamId,
    PermissionLevel,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RepositoryColumn {
    #[sea_orm(iden = "repository_columns")]
    Table,
    Id,
    RepositoryId,
    Name,
    Kind,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RepositoryRow {
    #[sea_orm(iden = "repository_rows")]
    Table,
    Id,
    RepositoryId,
    Name,
    CreatedBy,
    Archived,
    ArchivedOn,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RepositoryCell {
    #[sea_orm(iden = "repository_cells")]
    Table,
    RowId,
    ColumnId,
    Value,
    UpdatedAt,
}
