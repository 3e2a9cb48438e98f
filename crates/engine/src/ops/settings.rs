//! Settings rows: profile, preferences, security settings, payment methods.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, NewPaymentMethod, PaymentMethodPatch, PreferencesPatch, ProfilePatch,
    ResultEngine, SecuritySettingsPatch, WatchedTable, payment_methods, preferences, profiles,
    security_settings,
};

use super::Engine;

impl Engine {
    pub async fn profile(&self, user_id: &str) -> ResultEngine<profiles::Model> {
        profiles::Entity::find_by_id(user_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("profile not exists".to_string()))
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        patch: ProfilePatch,
    ) -> ResultEngine<profiles::Model> {
        let model = self.profile(user_id).await?;
        let mut active: profiles::ActiveModel = model.into();

        if let Some(first_name) = patch.first_name {
            active.first_name = ActiveValue::Set(Some(first_name));
        }
        if let Some(last_name) = patch.last_name {
            active.last_name = ActiveValue::Set(Some(last_name));
        }
        if let Some(phone) = patch.phone {
            active.phone = ActiveValue::Set(Some(phone));
        }
        if let Some(avatar_url) = patch.avatar_url {
            active.avatar_url = ActiveValue::Set(Some(avatar_url));
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        let updated = active.update(&self.database).await?;
        self.emit(WatchedTable::Profiles);
        Ok(updated)
    }

    pub async fn preferences(&self, user_id: &str) -> ResultEngine<preferences::Model> {
        preferences::Entity::find_by_id(user_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("preferences not exists".to_string()))
    }

    pub async fn update_preferences(
        &self,
        user_id: &str,
        patch: PreferencesPatch,
    ) -> ResultEngine<preferences::Model> {
        let model = self.preferences(user_id).await?;
        let mut active: preferences::ActiveModel = model.into();

        if let Some(value) = patch.notifications_mobile {
            active.notifications_mobile = ActiveValue::Set(value);
        }
        if let Some(value) = patch.notifications_email {
            active.notifications_email = ActiveValue::Set(value);
        }
        if let Some(value) = patch.notifications_sound {
            active.notifications_sound = ActiveValue::Set(value);
        }
        if let Some(value) = patch.notifications_payment {
            active.notifications_payment = ActiveValue::Set(value);
        }
        if let Some(value) = patch.notifications_security {
            active.notifications_security = ActiveValue::Set(value);
        }
        if let Some(value) = patch.notifications_promotions {
            active.notifications_promotions = ActiveValue::Set(value);
        }
        if let Some(theme) = patch.theme {
            active.theme = ActiveValue::Set(theme);
        }
        if let Some(font_size) = patch.font_size {
            active.font_size = ActiveValue::Set(font_size);
        }
        if let Some(language) = patch.language {
            active.language = ActiveValue::Set(language);
        }
        if let Some(date_format) = patch.date_format {
            active.date_format = ActiveValue::Set(date_format);
        }
        if let Some(currency) = patch.currency {
            active.currency = ActiveValue::Set(currency);
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        let updated = active.update(&self.database).await?;
        self.emit(WatchedTable::Preferences);
        Ok(updated)
    }

    pub async fn security_settings(&self, user_id: &str) -> ResultEngine<security_settings::Model> {
        security_settings::Entity::find_by_id(user_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("security settings not exists".to_string()))
    }

    pub async fn update_security_settings(
        &self,
        user_id: &str,
        patch: SecuritySettingsPatch,
    ) -> ResultEngine<security_settings::Model> {
        let model = self.security_settings(user_id).await?;
        let mut active: security_settings::ActiveModel = model.into();

        if let Some(enabled) = patch.two_factor_enabled {
            active.two_factor_enabled = ActiveValue::Set(enabled);
        }
        if let Some(changed_at) = patch.last_password_change {
            active.last_password_change = ActiveValue::Set(Some(changed_at));
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        let updated = active.update(&self.database).await?;
        self.emit(WatchedTable::SecuritySettings);
        Ok(updated)
    }

    pub async fn payment_methods(&self, user_id: &str) -> ResultEngine<Vec<payment_methods::Model>> {
        Ok(payment_methods::Entity::find()
            .filter(payment_methods::Column::UserId.eq(user_id))
            .order_by_asc(payment_methods::Column::CreatedAt)
            .all(&self.database)
            .await?)
    }

    pub async fn add_payment_method(
        &self,
        user_id: &str,
        cmd: NewPaymentMethod,
    ) -> ResultEngine<payment_methods::Model> {
        let now = Utc::now();
        let model = payment_methods::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            user_id: ActiveValue::Set(user_id.to_string()),
            kind: ActiveValue::Set(cmd.kind),
            provider: ActiveValue::Set(cmd.provider),
            last_four: ActiveValue::Set(cmd.last_four),
            expiry_date: ActiveValue::Set(cmd.expiry_date),
            is_default: ActiveValue::Set(cmd.is_default),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(&self.database)
        .await?;

        self.emit(WatchedTable::PaymentMethods);
        Ok(model)
    }

    pub async fn update_payment_method(
        &self,
        user_id: &str,
        id: Uuid,
        patch: PaymentMethodPatch,
    ) -> ResultEngine<payment_methods::Model> {
        let model = self.require_payment_method(user_id, id).await?;
        let mut active: payment_methods::ActiveModel = model.into();

        if let Some(kind) = patch.kind {
            active.kind = ActiveValue::Set(kind);
        }
        if let Some(provider) = patch.provider {
            active.provider = ActiveValue::Set(provider);
        }
        if let Some(last_four) = patch.last_four {
            active.last_four = ActiveValue::Set(Some(last_four));
        }
        if let Some(expiry_date) = patch.expiry_date {
            active.expiry_date = ActiveValue::Set(Some(expiry_date));
        }
        if let Some(is_default) = patch.is_default {
            active.is_default = ActiveValue::Set(is_default);
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        let updated = active.update(&self.database).await?;
        self.emit(WatchedTable::PaymentMethods);
        Ok(updated)
    }

    pub async fn delete_payment_method(&self, user_id: &str, id: Uuid) -> ResultEngine<()> {
        let model = self.require_payment_method(user_id, id).await?;
        payment_methods::Entity::delete_by_id(model.id)
            .exec(&self.database)
            .await?;

        self.emit(WatchedTable::PaymentMethods);
        Ok(())
    }

    async fn require_payment_method(
        &self,
        user_id: &str,
        id: Uuid,
    ) -> ResultEngine<payment_methods::Model> {
        payment_methods::Entity::find_by_id(id)
            .filter(payment_methods::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("payment method not exists".to_string()))
    }
}
