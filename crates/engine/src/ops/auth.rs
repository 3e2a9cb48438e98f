//! Sign-up, sign-in and session management.
//!
//! Sign-up provisions the per-user default rows (balance, profile,
//! preferences, security settings) in the same DB transaction, so a signed-up
//! user never observes a missing settings row.

use base64::Engine as _;
use chrono::Utc;
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, balances, preferences, profiles, security_settings, sessions, users,
};

use super::{Engine, with_tx};

const MIN_PASSWORD_LEN: usize = 6;

fn new_token() -> String {
    let mut bytes = Vec::with_capacity(32);
    bytes.extend_from_slice(Uuid::new_v4().as_bytes());
    bytes.extend_from_slice(Uuid::new_v4().as_bytes());
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn validate_email(email: &str) -> ResultEngine<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() || !trimmed.contains('@') {
        return Err(EngineError::InvalidName(
            "invalid email address".to_string(),
        ));
    }
    Ok(trimmed.to_lowercase())
}

fn validate_password(password: &str) -> ResultEngine<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(EngineError::InvalidName(
            "password should be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

impl Engine {
    /// Create a user and its default rows.
    pub async fn sign_up(&self, email: &str, password: &str) -> ResultEngine<()> {
        let email = validate_email(email)?;
        validate_password(password)?;
        let password = password.to_string();

        with_tx!(self, |db_tx| {
            async {
                if users::Entity::find_by_id(email.as_str()).one(&db_tx).await?.is_some() {
                    return Err(EngineError::ExistingKey(
                        "user already registered".to_string(),
                    ));
                }

                let now = Utc::now();

                users::ActiveModel {
                    email: ActiveValue::Set(email.clone()),
                    password: ActiveValue::Set(password),
                    reset_code: ActiveValue::Set(None),
                }
                .insert(&db_tx)
                .await?;

                balances::ActiveModel {
                    id: ActiveValue::Set(Uuid::new_v4()),
                    user_id: ActiveValue::Set(email.clone()),
                    total_balance_minor: ActiveValue::Set(0),
                    last_earned_minor: ActiveValue::Set(0),
                    total_bonus_minor: ActiveValue::Set(0),
                    created_at: ActiveValue::Set(now),
                    updated_at: ActiveValue::Set(now),
                }
                .insert(&db_tx)
                .await?;

                profiles::ActiveModel {
                    user_id: ActiveValue::Set(email.clone()),
                    first_name: ActiveValue::Set(None),
                    last_name: ActiveValue::Set(None),
                    email: ActiveValue::Set(email.clone()),
                    phone: ActiveValue::Set(None),
                    avatar_url: ActiveValue::Set(None),
                    created_at: ActiveValue::Set(now),
                    updated_at: ActiveValue::Set(now),
                }
                .insert(&db_tx)
                .await?;

                preferences::ActiveModel {
                    user_id: ActiveValue::Set(email.clone()),
                    notifications_mobile: ActiveValue::Set(true),
                    notifications_email: ActiveValue::Set(true),
                    notifications_sound: ActiveValue::Set(false),
                    notifications_payment: ActiveValue::Set(true),
                    notifications_security: ActiveValue::Set(true),
                    notifications_promotions: ActiveValue::Set(false),
                    theme: ActiveValue::Set("light".to_string()),
                    font_size: ActiveValue::Set("medium".to_string()),
                    language: ActiveValue::Set("tr".to_string()),
                    date_format: ActiveValue::Set("DD/MM/YYYY".to_string()),
                    currency: ActiveValue::Set("TRY".to_string()),
                    created_at: ActiveValue::Set(now),
                    updated_at: ActiveValue::Set(now),
                }
                .insert(&db_tx)
                .await?;

                security_settings::ActiveModel {
                    user_id: ActiveValue::Set(email.clone()),
                    two_factor_enabled: ActiveValue::Set(false),
                    last_password_change: ActiveValue::Set(None),
                    created_at: ActiveValue::Set(now),
                    updated_at: ActiveValue::Set(now),
                }
                .insert(&db_tx)
                .await?;

                Ok(())
            }
            .await
        })
    }

    /// Verify credentials and issue a session token.
    pub async fn sign_in(&self, email: &str, password: &str) -> ResultEngine<sessions::Model> {
        let email = validate_email(email)
            .map_err(|_| EngineError::Unauthorized("invalid login credentials".to_string()))?;

        let user = users::Entity::find_by_id(email.as_str())
            .one(&self.database)
            .await?
            .filter(|user| user.password == password)
            .ok_or_else(|| EngineError::Unauthorized("invalid login credentials".to_string()))?;

        let session = sessions::ActiveModel {
            token: ActiveValue::Set(new_token()),
            user_id: ActiveValue::Set(user.email),
            created_at: ActiveValue::Set(Utc::now()),
        };
        Ok(session.insert(&self.database).await?)
    }

    /// Resolve a session token to its session row.
    pub async fn session(&self, token: &str) -> ResultEngine<sessions::Model> {
        sessions::Entity::find_by_id(token)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::Unauthorized("invalid session token".to_string()))
    }

    /// Remove a session. Unknown tokens are a no-op, matching the hosted
    /// service the original delegated to.
    pub async fn sign_out(&self, token: &str) -> ResultEngine<()> {
        sessions::Entity::delete_by_id(token)
            .exec(&self.database)
            .await?;
        Ok(())
    }

    /// Store a reset code for the user and return it for out-of-band
    /// delivery. Unknown emails succeed silently (with `None`) so the
    /// endpoint cannot be used to enumerate accounts.
    pub async fn request_password_reset(&self, email: &str) -> ResultEngine<Option<String>> {
        let Ok(email) = validate_email(email) else {
            return Ok(None);
        };

        let Some(user) = users::Entity::find_by_id(email.as_str()).one(&self.database).await? else {
            return Ok(None);
        };

        let code = new_token();
        let mut user: users::ActiveModel = user.into();
        user.reset_code = ActiveValue::Set(Some(code.clone()));
        user.update(&self.database).await?;
        Ok(Some(code))
    }

    /// Redeem a reset code issued by `request_password_reset`.
    pub async fn redeem_password_reset(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> ResultEngine<()> {
        validate_password(new_password)?;
        let email = validate_email(email)?;

        let user = users::Entity::find_by_id(email.as_str())
            .one(&self.database)
            .await?
            .filter(|user| user.reset_code.as_deref() == Some(code))
            .ok_or_else(|| EngineError::Unauthorized("invalid reset code".to_string()))?;

        let mut user: users::ActiveModel = user.into();
        user.password = ActiveValue::Set(new_password.to_string());
        user.reset_code = ActiveValue::Set(None);
        user.update(&self.database).await?;
        Ok(())
    }

    /// Set a new password for an already-authenticated user.
    ///
    /// Verification of the current password is the caller's responsibility
    /// (the settings flow re-authenticates via `sign_in` first).
    pub async fn update_password(&self, user_id: &str, new_password: &str) -> ResultEngine<()> {
        validate_password(new_password)?;

        let user = users::Entity::find_by_id(user_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;

        let mut user: users::ActiveModel = user.into();
        user.password = ActiveValue::Set(new_password.to_string());
        user.reset_code = ActiveValue::Set(None);
        user.update(&self.database).await?;
        Ok(())
    }
}
