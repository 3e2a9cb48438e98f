//! Transaction primitives.
//!
//! A `Transaction` is a user-recorded income or expense with presentation
//! metadata (payment method, status, recurrence). It does not move the
//! balance row by itself; see `Engine::recompute_balance`.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::InvalidName(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Completed,
    Pending,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Failed => "failed",
        }
    }
}

impl TryFrom<&str> for TransactionStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "completed" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            "failed" => Ok(Self::Failed),
            other => Err(EngineError::InvalidName(format!(
                "invalid transaction status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub amount_minor: i64,
    pub kind: TransactionKind,
    pub category: String,
    pub payment_method: String,
    pub status: TransactionStatus,
    pub date: DateTime<Utc>,
    pub is_recurring: bool,
    pub recurring_day: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub amount_minor: i64,
    pub kind: String,
    pub category: String,
    pub payment_method: String,
    pub status: String,
    pub date: DateTimeUtc,
    pub is_recurring: bool,
    pub recurring_day: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id),
            user_id: ActiveValue::Set(tx.user_id.clone()),
            title: ActiveValue::Set(tx.title.clone()),
            description: ActiveValue::Set(tx.description.clone()),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            category: ActiveValue::Set(tx.category.clone()),
            payment_method: ActiveValue::Set(tx.payment_method.clone()),
            status: ActiveValue::Set(tx.status.as_str().to_string()),
            date: ActiveValue::Set(tx.date),
            is_recurring: ActiveValue::Set(tx.is_recurring),
            recurring_day: ActiveValue::Set(tx.recurring_day),
            created_at: ActiveValue::Set(tx.created_at),
            updated_at: ActiveValue::Set(tx.updated_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            description: model.description,
            amount_minor: model.amount_minor,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            category: model.category,
            payment_method: model.payment_method,
            status: TransactionStatus::try_from(model.status.as_str())?,
            date: model.date,
            is_recurring: model.is_recurring,
            recurring_day: model.recurring_day,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
