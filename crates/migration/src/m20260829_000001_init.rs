//! Initial schema migration - creates all tables from scratch.
//!
//! - `users`: authentication, one row per sign-in email
//! - `sessions`: bearer tokens issued at sign-in
//! - `balances`: denormalized per-user balance row
//! - `incomes` / `expenses`: dashboard source rows
//! - `transactions`: user-recorded income/expense operations
//! - `categories`: per-user category registry
//! - `profiles` / `preferences` / `security_settings`: settings rows
//! - `payment_methods`: stored cards/accounts

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Email,
    Password,
    ResetCode,
}

#[derive(Iden)]
enum Sessions {
    Table,
    Token,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum Balances {
    Table,
    Id,
    UserId,
    TotalBalanceMinor,
    LastEarnedMinor,
    TotalBonusMinor,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Incomes {
    Table,
    Id,
    UserId,
    Title,
    AmountMinor,
    Category,
    Date,
    CreatedAt,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    UserId,
    Title,
    AmountMinor,
    Category,
    Date,
    CreatedAt,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    UserId,
    Title,
    Description,
    AmountMinor,
    Kind,
    Category,
    PaymentMethod,
    Status,
    Date,
    IsRecurring,
    RecurringDay,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    UserId,
    Name,
    NameNorm,
    Kind,
    Icon,
    Color,
    IsDefault,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Profiles {
    Table,
    UserId,
    FirstName,
    LastName,
    Email,
    Phone,
    AvatarUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Preferences {
    Table,
    UserId,
    NotificationsMobile,
    NotificationsEmail,
    NotificationsSound,
    NotificationsPayment,
    NotificationsSecurity,
    NotificationsPromotions,
    Theme,
    FontSize,
    Language,
    DateFormat,
    Currency,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SecuritySettings {
    Table,
    UserId,
    TwoFactorEnabled,
    LastPasswordChange,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PaymentMethods {
    Table,
    Id,
    UserId,
    Kind,
    Provider,
    LastFour,
    ExpiryDate,
    IsDefault,
    CreatedAt,
    UpdatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users and sessions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(ColumnDef::new(Users::ResetCode).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sessions::Token)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sessions::UserId).string().not_null())
                    .col(
                        ColumnDef::new(Sessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sessions-user_id")
                            .from(Sessions::Table, Sessions::UserId)
                            .to(Users::Table, Users::Email)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-sessions-user_id")
                    .table(Sessions::Table)
                    .col(Sessions::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Balances
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Balances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Balances::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Balances::UserId).string().not_null())
                    .col(
                        ColumnDef::new(Balances::TotalBalanceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Balances::LastEarnedMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Balances::TotalBonusMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Balances::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Balances::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-balances-user_id")
                            .from(Balances::Table, Balances::UserId)
                            .to(Users::Table, Users::Email)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-balances-user_id-unique")
                    .table(Balances::Table)
                    .col(Balances::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Incomes and expenses
        // ───────────────────────────────────────────────────────────────────
        for (table, id, user_id, title, amount, category, date, created_at, idx) in [
            (
                Incomes::Table.into_iden(),
                Incomes::Id.into_iden(),
                Incomes::UserId.into_iden(),
                Incomes::Title.into_iden(),
                Incomes::AmountMinor.into_iden(),
                Incomes::Category.into_iden(),
                Incomes::Date.into_iden(),
                Incomes::CreatedAt.into_iden(),
                "idx-incomes-user_id-date",
            ),
            (
                Expenses::Table.into_iden(),
                Expenses::Id.into_iden(),
                Expenses::UserId.into_iden(),
                Expenses::Title.into_iden(),
                Expenses::AmountMinor.into_iden(),
                Expenses::Category.into_iden(),
                Expenses::Date.into_iden(),
                Expenses::CreatedAt.into_iden(),
                "idx-expenses-user_id-date",
            ),
        ] {
            manager
                .create_table(
                    Table::create()
                        .table(table.clone())
                        .if_not_exists()
                        .col(ColumnDef::new(id.clone()).uuid().not_null().primary_key())
                        .col(ColumnDef::new(user_id.clone()).string().not_null())
                        .col(ColumnDef::new(title.clone()).string().not_null())
                        .col(ColumnDef::new(amount.clone()).big_integer().not_null())
                        .col(ColumnDef::new(category.clone()).string().not_null())
                        .col(
                            ColumnDef::new(date.clone())
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(created_at.clone())
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .from(table.clone(), user_id.clone())
                                .to(Users::Table, Users::Email)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name(idx)
                        .table(table)
                        .col(user_id)
                        .col(date)
                        .to_owned(),
                )
                .await?;
        }

        // ───────────────────────────────────────────────────────────────────
        // 4. Transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::UserId).string().not_null())
                    .col(ColumnDef::new(Transactions::Title).string().not_null())
                    .col(ColumnDef::new(Transactions::Description).string())
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Kind).string().not_null())
                    .col(ColumnDef::new(Transactions::Category).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::PaymentMethod)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Status).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::Date)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::IsRecurring)
                            .boolean()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::RecurringDay).integer())
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-user_id")
                            .from(Transactions::Table, Transactions::UserId)
                            .to(Users::Table, Users::Email)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-user_id-date")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .col(Transactions::Date)
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
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::UserId).string().not_null())
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(ColumnDef::new(Categories::NameNorm).string().not_null())
                    .col(ColumnDef::new(Categories::Kind).string().not_null())
                    .col(ColumnDef::new(Categories::Icon).string())
                    .col(ColumnDef::new(Categories::Color).string())
                    .col(ColumnDef::new(Categories::IsDefault).boolean().not_null())
                    .col(
                        ColumnDef::new(Categories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Categories::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-categories-user_id")
                            .from(Categories::Table, Categories::UserId)
                            .to(Users::Table, Users::Email)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-user_id-name_norm-unique")
                    .table(Categories::Table)
                    .col(Categories::UserId)
                    .col(Categories::NameNorm)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Settings rows
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::UserId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profiles::FirstName).string())
                    .col(ColumnDef::new(Profiles::LastName).string())
                    .col(ColumnDef::new(Profiles::Email).string().not_null())
                    .col(ColumnDef::new(Profiles::Phone).string())
                    .col(ColumnDef::new(Profiles::AvatarUrl).string())
                    .col(
                        ColumnDef::new(Profiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Profiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-profiles-user_id")
                            .from(Profiles::Table, Profiles::UserId)
                            .to(Users::Table, Users::Email)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Preferences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Preferences::UserId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Preferences::NotificationsMobile)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Preferences::NotificationsEmail)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Preferences::NotificationsSound)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Preferences::NotificationsPayment)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Preferences::NotificationsSecurity)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Preferences::NotificationsPromotions)
                            .boolean()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Preferences::Theme).string().not_null())
                    .col(ColumnDef::new(Preferences::FontSize).string().not_null())
                    .col(ColumnDef::new(Preferences::Language).string().not_null())
                    .col(ColumnDef::new(Preferences::DateFormat).string().not_null())
                    .col(ColumnDef::new(Preferences::Currency).string().not_null())
                    .col(
                        ColumnDef::new(Preferences::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Preferences::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-preferences-user_id")
                            .from(Preferences::Table, Preferences::UserId)
                            .to(Users::Table, Users::Email)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SecuritySettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SecuritySettings::UserId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SecuritySettings::TwoFactorEnabled)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SecuritySettings::LastPasswordChange)
                            .timestamp_with_time_zone(),
                    )
                    .col(
                        ColumnDef::new(SecuritySettings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SecuritySettings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-security_settings-user_id")
                            .from(SecuritySettings::Table, SecuritySettings::UserId)
                            .to(Users::Table, Users::Email)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Payment methods
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(PaymentMethods::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentMethods::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PaymentMethods::UserId).string().not_null())
                    .col(ColumnDef::new(PaymentMethods::Kind).string().not_null())
                    .col(ColumnDef::new(PaymentMethods::Provider).string().not_null())
                    .col(ColumnDef::new(PaymentMethods::LastFour).string())
                    .col(ColumnDef::new(PaymentMethods::ExpiryDate).string())
                    .col(
                        ColumnDef::new(PaymentMethods::IsDefault)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentMethods::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentMethods::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payment_methods-user_id")
                            .from(PaymentMethods::Table, PaymentMethods::UserId)
                            .to(Users::Table, Users::Email)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payment_methods-user_id")
                    .table(PaymentMethods::Table)
                    .col(PaymentMethods::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            PaymentMethods::Table.into_iden(),
            SecuritySettings::Table.into_iden(),
            Preferences::Table.into_iden(),
            Profiles::Table.into_iden(),
            Categories::Table.into_iden(),
            Transactions::Table.into_iden(),
            Expenses::Table.into_iden(),
            Incomes::Table.into_iden(),
            Balances::Table.into_iden(),
            Sessions::Table.into_iden(),
            Users::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}
