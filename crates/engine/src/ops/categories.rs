//! Category CRUD, ordered by name and unique per user on the normalized
//! name.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    Category, CategoryPatch, EngineError, NewCategory, ResultEngine, WatchedTable, categories,
    util::normalize_key,
};

use super::{Engine, normalize_required_name};

impl Engine {
    pub async fn list_categories(&self, user_id: &str) -> ResultEngine<Vec<Category>> {
        let rows = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?;

        rows.into_iter().map(Category::try_from).collect()
    }

    pub async fn create_category(&self, user_id: &str, cmd: NewCategory) -> ResultEngine<Category> {
        let name = normalize_required_name(&cmd.name, "category name")?;
        let name_norm = normalize_key(&name);
        self.ensure_category_name_free(user_id, &name_norm, None)
            .await?;

        let now = Utc::now();
        let model = categories::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            user_id: ActiveValue::Set(user_id.to_string()),
            name: ActiveValue::Set(name),
            name_norm: ActiveValue::Set(name_norm),
            kind: ActiveValue::Set(cmd.kind.as_str().to_string()),
            icon: ActiveValue::Set(cmd.icon),
            color: ActiveValue::Set(cmd.color),
            is_default: ActiveValue::Set(cmd.is_default),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(&self.database)
        .await?;

        self.emit(WatchedTable::Categories);
        Category::try_from(model)
    }

    pub async fn update_category(
        &self,
        user_id: &str,
        id: Uuid,
        patch: CategoryPatch,
    ) -> ResultEngine<Category> {
        let model = self.require_category(user_id, id).await?;
        let mut active: categories::ActiveModel = model.into();

        if let Some(name) = patch.name {
            let name = normalize_required_name(&name, "category name")?;
            let name_norm = normalize_key(&name);
            self.ensure_category_name_free(user_id, &name_norm, Some(id))
                .await?;
            active.name = ActiveValue::Set(name);
            active.name_norm = ActiveValue::Set(name_norm);
        }
        if let Some(kind) = patch.kind {
            active.kind = ActiveValue::Set(kind.as_str().to_string());
        }
        if let Some(icon) = patch.icon {
            active.icon = ActiveValue::Set(Some(icon));
        }
        if let Some(color) = patch.color {
            active.color = ActiveValue::Set(Some(color));
        }
        if let Some(is_default) = patch.is_default {
            active.is_default = ActiveValue::Set(is_default);
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        let updated = active.update(&self.database).await?;
        self.emit(WatchedTable::Categories);
        Category::try_from(updated)
    }

    pub async fn delete_category(&self, user_id: &str, id: Uuid) -> ResultEngine<()> {
        let model = self.require_category(user_id, id).await?;
        categories::Entity::delete_by_id(model.id)
            .exec(&self.database)
            .await?;

        self.emit(WatchedTable::Categories);
        Ok(())
    }

    async fn require_category(&self, user_id: &str, id: Uuid) -> ResultEngine<categories::Model> {
        categories::Entity::find_by_id(id)
            .filter(categories::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))
    }

    async fn ensure_category_name_free(
        &self,
        user_id: &str,
        name_norm: &str,
        exclude: Option<Uuid>,
    ) -> ResultEngine<()> {
        let mut query = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .filter(categories::Column::NameNorm.eq(name_norm));
        if let Some(id) = exclude {
            query = query.filter(categories::Column::Id.ne(id));
        }

        if query.one(&self.database).await?.is_some() {
            return Err(EngineError::ExistingKey(
                "category already exists".to_string(),
            ));
        }
        Ok(())
    }
}
