//! Transaction list and write operations.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, QuerySelect, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, NewTransaction, ResultEngine, Transaction, TransactionPatch, WatchedTable,
    transactions,
};

use super::{Engine, ensure_positive_amount, normalize_required_name, validate_recurring_day};

impl Engine {
    /// Full transaction list for a user, newest first.
    pub async fn list_transactions(&self, user_id: &str) -> ResultEngine<Vec<Transaction>> {
        let rows = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.database)
            .await?;

        rows.into_iter().map(Transaction::try_from).collect()
    }

    /// Most recent transactions, newest first.
    pub async fn recent_transactions(
        &self,
        user_id: &str,
        limit: u64,
    ) -> ResultEngine<Vec<Transaction>> {
        let rows = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::CreatedAt)
            .limit(limit)
            .all(&self.database)
            .await?;

        rows.into_iter().map(Transaction::try_from).collect()
    }

    pub async fn create_transaction(
        &self,
        user_id: &str,
        cmd: NewTransaction,
    ) -> ResultEngine<Uuid> {
        let title = normalize_required_name(&cmd.title, "transaction title")?;
        ensure_positive_amount(cmd.amount_minor)?;
        validate_recurring_day(cmd.is_recurring, cmd.recurring_day)?;

        let now = Utc::now();
        let tx = Transaction {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            title,
            description: cmd.description.filter(|d| !d.trim().is_empty()),
            amount_minor: cmd.amount_minor,
            kind: cmd.kind,
            category: cmd.category,
            payment_method: cmd.payment_method,
            status: cmd.status,
            date: cmd.date,
            is_recurring: cmd.is_recurring,
            recurring_day: cmd.recurring_day,
            created_at: now,
            updated_at: now,
        };

        transactions::ActiveModel::from(&tx)
            .insert(&self.database)
            .await?;

        self.emit(WatchedTable::Transactions);
        Ok(tx.id)
    }

    pub async fn update_transaction(
        &self,
        user_id: &str,
        id: Uuid,
        patch: TransactionPatch,
    ) -> ResultEngine<Transaction> {
        let model = self.require_transaction(user_id, id).await?;
        let mut active: transactions::ActiveModel = model.clone().into();

        if let Some(title) = patch.title {
            active.title = ActiveValue::Set(normalize_required_name(&title, "transaction title")?);
        }
        if let Some(description) = patch.description {
            let trimmed = description.trim().to_string();
            active.description = ActiveValue::Set((!trimmed.is_empty()).then_some(trimmed));
        }
        if let Some(amount_minor) = patch.amount_minor {
            ensure_positive_amount(amount_minor)?;
            active.amount_minor = ActiveValue::Set(amount_minor);
        }
        if let Some(kind) = patch.kind {
            active.kind = ActiveValue::Set(kind.as_str().to_string());
        }
        if let Some(category) = patch.category {
            active.category = ActiveValue::Set(category);
        }
        if let Some(payment_method) = patch.payment_method {
            active.payment_method = ActiveValue::Set(payment_method);
        }
        if let Some(status) = patch.status {
            active.status = ActiveValue::Set(status.as_str().to_string());
        }
        if let Some(date) = patch.date {
            active.date = ActiveValue::Set(date);
        }

        let is_recurring = patch.is_recurring.unwrap_or(model.is_recurring);
        let recurring_day = match (patch.is_recurring, patch.recurring_day) {
            (Some(false), _) => None,
            (_, Some(day)) => Some(day),
            (_, None) => model.recurring_day,
        };
        validate_recurring_day(is_recurring, recurring_day)?;
        active.is_recurring = ActiveValue::Set(is_recurring);
        active.recurring_day = ActiveValue::Set(recurring_day);

        active.updated_at = ActiveValue::Set(Utc::now());
        let updated = active.update(&self.database).await?;

        self.emit(WatchedTable::Transactions);
        Transaction::try_from(updated)
    }

    pub async fn delete_transaction(&self, user_id: &str, id: Uuid) -> ResultEngine<()> {
        let model = self.require_transaction(user_id, id).await?;
        transactions::Entity::delete_by_id(model.id)
            .exec(&self.database)
            .await?;

        self.emit(WatchedTable::Transactions);
        Ok(())
    }

    async fn require_transaction(
        &self,
        user_id: &str,
        id: Uuid,
    ) -> ResultEngine<transactions::Model> {
        transactions::Entity::find_by_id(id)
            .filter(transactions::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))
    }
}
