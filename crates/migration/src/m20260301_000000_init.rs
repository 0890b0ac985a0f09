//! Initial schema migration - creates all tables from scratch.
//!
//! Consolidated schema for paisa:
//!
//! - `users`: profiles; account_type + group_id route scope resolution
//! - `groups`: shared namespaces with an invite code
//! - `group_members`: (group_id, user_id) -> role
//! - `invitations`: pending group invitations
//! - `categories`: per-scope expense categories
//! - `expenses`, `incomes`, `budgets`: per-scope records
//! - `custom_budget_periods`: user-defined reporting windows

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Uid,
    Email,
    DisplayName,
    Currency,
    Language,
    AccountType,
    GroupId,
    GroupRole,
    BudgetPeriod,
    BudgetStartDate,
    BudgetEndDate,
    SelectedBudgetPeriodId,
    CreatedAt,
}

#[derive(Iden)]
enum Groups {
    Table,
    Id,
    Name,
    OwnerId,
    InviteCode,
    Currency,
    BudgetPeriod,
    CreatedAt,
}

#[derive(Iden)]
enum GroupMembers {
    Table,
    GroupId,
    UserId,
    Role,
}

#[derive(Iden)]
enum Invitations {
    Table,
    Id,
    GroupId,
    Email,
    InviterId,
    InviterName,
    Status,
    CreatedAt,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    ScopeKind,
    ScopeId,
    Name,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    ScopeKind,
    ScopeId,
    Date,
    Category,
    ItemName,
    Quantity,
    Unit,
    Price,
    Currency,
    TotalCost,
    UserId,
    CreatedByName,
    Device,
    EditedDevice,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Incomes {
    Table,
    Id,
    ScopeKind,
    ScopeId,
    Date,
    Amount,
    Currency,
    Description,
    UserId,
    Device,
    EditedDevice,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Budgets {
    Table,
    Id,
    ScopeKind,
    ScopeId,
    BudgetType,
    Period,
    Amount,
    Currency,
    UserId,
    Device,
    EditedDevice,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum CustomBudgetPeriods {
    Table,
    Id,
    UserId,
    Name,
    StartDate,
    EndDate,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Uid).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string().not_null())
                    .col(ColumnDef::new(Users::Currency).string().not_null())
                    .col(ColumnDef::new(Users::Language).string().not_null())
                    .col(ColumnDef::new(Users::AccountType).string().not_null())
                    .col(ColumnDef::new(Users::GroupId).string())
                    .col(ColumnDef::new(Users::GroupRole).string())
                    .col(ColumnDef::new(Users::BudgetPeriod).string())
                    .col(ColumnDef::new(Users::BudgetStartDate).date())
                    .col(ColumnDef::new(Users::BudgetEndDate).date())
                    .col(ColumnDef::new(Users::SelectedBudgetPeriodId).string())
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-group_id")
                    .table(Users::Table)
                    .col(Users::GroupId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Groups
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Groups::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Groups::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Groups::Name).string().not_null())
                    .col(ColumnDef::new(Groups::OwnerId).string().not_null())
                    .col(ColumnDef::new(Groups::InviteCode).string().not_null())
                    .col(ColumnDef::new(Groups::Currency).string().not_null())
                    .col(ColumnDef::new(Groups::BudgetPeriod).string())
                    .col(ColumnDef::new(Groups::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-groups-invite_code")
                    .table(Groups::Table)
                    .col(Groups::InviteCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Group members
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(GroupMembers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GroupMembers::GroupId).string().not_null())
                    .col(ColumnDef::new(GroupMembers::UserId).string().not_null())
                    .col(ColumnDef::new(GroupMembers::Role).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(GroupMembers::GroupId)
                            .col(GroupMembers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GroupMembers::Table, GroupMembers::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Invitations
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Invitations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Invitations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Invitations::GroupId).string().not_null())
                    .col(ColumnDef::new(Invitations::Email).string().not_null())
                    .col(ColumnDef::new(Invitations::InviterId).string().not_null())
                    .col(ColumnDef::new(Invitations::InviterName).string().not_null())
                    .col(ColumnDef::new(Invitations::Status).string().not_null())
                    .col(ColumnDef::new(Invitations::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Invitations::Table, Invitations::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-invitations-group_id-status")
                    .table(Invitations::Table)
                    .col(Invitations::GroupId)
                    .col(Invitations::Status)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Categories
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::ScopeKind).string().not_null())
                    .col(ColumnDef::new(Categories::ScopeId).string().not_null())
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-scope")
                    .table(Categories::Table)
                    .col(Categories::ScopeKind)
                    .col(Categories::ScopeId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::ScopeKind).string().not_null())
                    .col(ColumnDef::new(Expenses::ScopeId).string().not_null())
                    .col(ColumnDef::new(Expenses::Date).date().not_null())
                    .col(ColumnDef::new(Expenses::Category).string().not_null())
                    .col(ColumnDef::new(Expenses::ItemName).string().not_null())
                    .col(ColumnDef::new(Expenses::Quantity).double().not_null())
                    .col(ColumnDef::new(Expenses::Unit).string())
                    .col(ColumnDef::new(Expenses::Price).double().not_null())
                    .col(ColumnDef::new(Expenses::Currency).string().not_null())
                    .col(ColumnDef::new(Expenses::TotalCost).double().not_null())
                    .col(ColumnDef::new(Expenses::UserId).string().not_null())
                    .col(ColumnDef::new(Expenses::CreatedByName).string())
                    .col(ColumnDef::new(Expenses::Device).string())
                    .col(ColumnDef::new(Expenses::EditedDevice).string())
                    .col(ColumnDef::new(Expenses::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Expenses::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-scope-date")
                    .table(Expenses::Table)
                    .col(Expenses::ScopeKind)
                    .col(Expenses::ScopeId)
                    .col(Expenses::Date)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Incomes
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Incomes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Incomes::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Incomes::ScopeKind).string().not_null())
                    .col(ColumnDef::new(Incomes::ScopeId).string().not_null())
                    .col(ColumnDef::new(Incomes::Date).date().not_null())
                    .col(ColumnDef::new(Incomes::Amount).double().not_null())
                    .col(ColumnDef::new(Incomes::Currency).string().not_null())
                    .col(ColumnDef::new(Incomes::Description).string())
                    .col(ColumnDef::new(Incomes::UserId).string().not_null())
                    .col(ColumnDef::new(Incomes::Device).string())
                    .col(ColumnDef::new(Incomes::EditedDevice).string())
                    .col(ColumnDef::new(Incomes::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Incomes::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-incomes-scope-date")
                    .table(Incomes::Table)
                    .col(Incomes::ScopeKind)
                    .col(Incomes::ScopeId)
                    .col(Incomes::Date)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Budgets
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Budgets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Budgets::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Budgets::ScopeKind).string().not_null())
                    .col(ColumnDef::new(Budgets::ScopeId).string().not_null())
                    .col(ColumnDef::new(Budgets::BudgetType).string().not_null())
                    .col(ColumnDef::new(Budgets::Period).string().not_null())
                    .col(ColumnDef::new(Budgets::Amount).double().not_null())
                    .col(ColumnDef::new(Budgets::Currency).string().not_null())
                    .col(ColumnDef::new(Budgets::UserId).string().not_null())
                    .col(ColumnDef::new(Budgets::Device).string())
                    .col(ColumnDef::new(Budgets::EditedDevice).string())
                    .col(ColumnDef::new(Budgets::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Budgets::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-budgets-scope")
                    .table(Budgets::Table)
                    .col(Budgets::ScopeKind)
                    .col(Budgets::ScopeId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 9. Custom budget periods
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(CustomBudgetPeriods::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CustomBudgetPeriods::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CustomBudgetPeriods::UserId).string().not_null())
                    .col(ColumnDef::new(CustomBudgetPeriods::Name).string().not_null())
                    .col(ColumnDef::new(CustomBudgetPeriods::StartDate).date().not_null())
                    .col(ColumnDef::new(CustomBudgetPeriods::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(CustomBudgetPeriods::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CustomBudgetPeriods::Table, CustomBudgetPeriods::UserId)
                            .to(Users::Table, Users::Uid)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-custom_budget_periods-user_id")
                    .table(CustomBudgetPeriods::Table)
                    .col(CustomBudgetPeriods::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(CustomBudgetPeriods::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Budgets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Incomes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Invitations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GroupMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Groups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
