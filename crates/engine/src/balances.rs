//! Denormalized per-user balance row.
//!
//! One row per user, created at sign-up. Transaction writes do NOT touch
//! this row; `Engine::recompute_balance` is the explicit bridge.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "balances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub total_balance_minor: i64,
    pub last_earned_minor: i64,
    pub total_bonus_minor: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
