//! Income and expense source rows.
//!
//! The two tables are identical in shape; the dashboard reads both and the
//! aggregation happens client side.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{NewEntry, ResultEngine, WatchedTable, expenses, incomes};

use super::{Engine, ensure_positive_amount, normalize_required_name};

impl Engine {
    pub async fn list_incomes(&self, user_id: &str) -> ResultEngine<Vec<incomes::Model>> {
        Ok(incomes::Entity::find()
            .filter(incomes::Column::UserId.eq(user_id))
            .order_by_desc(incomes::Column::Date)
            .all(&self.database)
            .await?)
    }

    pub async fn list_expenses(&self, user_id: &str) -> ResultEngine<Vec<expenses::Model>> {
        Ok(expenses::Entity::find()
            .filter(expenses::Column::UserId.eq(user_id))
            .order_by_desc(expenses::Column::Date)
            .all(&self.database)
            .await?)
    }

    pub async fn add_income(&self, user_id: &str, entry: NewEntry) -> ResultEngine<Uuid> {
        let title = normalize_required_name(&entry.title, "entry title")?;
        ensure_positive_amount(entry.amount_minor)?;

        let id = Uuid::new_v4();
        incomes::ActiveModel {
            id: ActiveValue::Set(id),
            user_id: ActiveValue::Set(user_id.to_string()),
            title: ActiveValue::Set(title),
            amount_minor: ActiveValue::Set(entry.amount_minor),
            category: ActiveValue::Set(entry.category),
            date: ActiveValue::Set(entry.date),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(&self.database)
        .await?;

        self.emit(WatchedTable::Incomes);
        Ok(id)
    }

    pub async fn add_expense(&self, user_id: &str, entry: NewEntry) -> ResultEngine<Uuid> {
        let title = normalize_required_name(&entry.title, "entry title")?;
        ensure_positive_amount(entry.amount_minor)?;

        let id = Uuid::new_v4();
        expenses::ActiveModel {
            id: ActiveValue::Set(id),
            user_id: ActiveValue::Set(user_id.to_string()),
            title: ActiveValue::Set(title),
            amount_minor: ActiveValue::Set(entry.amount_minor),
            category: ActiveValue::Set(entry.category),
            date: ActiveValue::Set(entry.date),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(&self.database)
        .await?;

        self.emit(WatchedTable::Expenses);
        Ok(id)
    }
}
