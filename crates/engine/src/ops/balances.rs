//! Balance row reads and the explicit recompute bridge.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, TransactionKind, TransactionStatus, WatchedTable, balances,
    transactions,
};

use super::{Engine, with_tx};

impl Engine {
    pub async fn balance(&self, user_id: &str) -> ResultEngine<balances::Model> {
        balances::Entity::find()
            .filter(balances::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("balance not exists".to_string()))
    }

    /// Recompute the denormalized balance row from the transactions table.
    ///
    /// - Failed transactions are ignored.
    /// - `total_balance_minor` becomes income minus expense.
    /// - `last_earned_minor` becomes the amount of the most recent income.
    /// - `total_bonus_minor` is left untouched.
    ///
    /// Transaction writes never call this; it is an explicit operation. The
    /// original design had no atomic link between transaction writes and the
    /// balance row, and that separation is preserved here.
    pub async fn recompute_balance(&self, user_id: &str) -> ResultEngine<balances::Model> {
        let user_id = user_id.to_string();
        let model = with_tx!(self, |db_tx| {
            async {
                let balance = balances::Entity::find()
                    .filter(balances::Column::UserId.eq(user_id.as_str()))
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound("balance not exists".to_string()))?;

                let rows: Vec<transactions::Model> = transactions::Entity::find()
                    .filter(transactions::Column::UserId.eq(user_id.as_str()))
                    .filter(transactions::Column::Status.ne(TransactionStatus::Failed.as_str()))
                    .order_by_desc(transactions::Column::Date)
                    .all(&db_tx)
                    .await?;

                let mut total = 0i64;
                let mut last_earned = None;
                for row in &rows {
                    match TransactionKind::try_from(row.kind.as_str())? {
                        TransactionKind::Income => {
                            total += row.amount_minor;
                            // Rows come newest first.
                            if last_earned.is_none() {
                                last_earned = Some(row.amount_minor);
                            }
                        }
                        TransactionKind::Expense => total -= row.amount_minor,
                    }
                }

                let mut active: balances::ActiveModel = balance.into();
                active.total_balance_minor = ActiveValue::Set(total);
                active.last_earned_minor = ActiveValue::Set(last_earned.unwrap_or(0));
                active.updated_at = ActiveValue::Set(Utc::now());
                Ok::<_, EngineError>(active.update(&db_tx).await?)
            }
            .await
        })?;

        self.emit(WatchedTable::Balances);
        Ok(model)
    }
}
