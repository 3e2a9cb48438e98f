//! Settings hook: profile, preferences, security settings, payment methods.
//!
//! One parallel read for all four rows; the full read re-runs whenever the
//! session changes. Password change is two-step: re-authenticate with the
//! supplied current password, then issue the update. A failed first step
//! leaves both the password and the security settings untouched.

use api_types::settings::{
    PaymentMethodCreate, PaymentMethodCreated, PaymentMethodUpdate, PaymentMethodView,
    PreferencesUpdate, PreferencesView, ProfileUpdate, ProfileView, SecuritySettingsUpdate,
    SecuritySettingsView,
};
use tokio::sync::watch;
use uuid::Uuid;

use crate::{ApiClient, ClientError, ResultClient};

#[derive(Clone, Debug, Default)]
pub struct SettingsState {
    pub loading: bool,
    pub error: Option<String>,
    pub profile: Option<ProfileView>,
    pub preferences: Option<PreferencesView>,
    pub security: Option<SecuritySettingsView>,
    pub payment_methods: Vec<PaymentMethodView>,
}

pub struct SettingsHook {
    api: ApiClient,
    user_id: Option<String>,
    state: watch::Sender<SettingsState>,
}

impl SettingsHook {
    pub fn new(api: ApiClient) -> Self {
        let (state, _) = watch::channel(SettingsState {
            loading: true,
            ..Default::default()
        });

        Self {
            api,
            user_id: None,
            state,
        }
    }

    /// Swap in a new session token and re-run the full read.
    pub async fn set_session(&mut self, token: &str) -> ResultClient<()> {
        self.api = self.api.with_token(token);
        let session = self.api.session().await?;
        self.user_id = Some(session.user_id);
        self.refetch().await;
        Ok(())
    }

    pub async fn refetch(&self) {
        let result = tokio::try_join!(
            self.api.profile(),
            self.api.preferences(),
            self.api.security_settings(),
            self.api.payment_methods(),
        );

        let next = match result {
            Ok((profile, preferences, security, payment_methods)) => SettingsState {
                loading: false,
                error: None,
                profile: Some(profile),
                preferences: Some(preferences),
                security: Some(security),
                payment_methods: payment_methods.payment_methods,
            },
            Err(err) => SettingsState {
                loading: false,
                error: Some(err.human_message()),
                ..Default::default()
            },
        };

        let _ = self.state.send(next);
    }

    pub fn state(&self) -> SettingsState {
        self.state.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<SettingsState> {
        self.state.subscribe()
    }

    /// Verify the current password by signing in again, then set the new
    /// one. The server stamps `last_password_change` only after the update
    /// succeeds.
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> ResultClient<()> {
        let user_id = self
            .user_id
            .as_deref()
            .ok_or_else(|| ClientError::Unauthorized("no active session".to_string()))?;

        self.api.sign_in(user_id, current_password).await?;
        self.api.update_password(new_password).await?;
        self.refetch().await;
        Ok(())
    }

    pub async fn update_profile(&self, payload: &ProfileUpdate) -> ResultClient<ProfileView> {
        let updated = self.api.update_profile(payload).await?;
        self.refetch().await;
        Ok(updated)
    }

    pub async fn update_preferences(
        &self,
        payload: &PreferencesUpdate,
    ) -> ResultClient<PreferencesView> {
        let updated = self.api.update_preferences(payload).await?;
        self.refetch().await;
        Ok(updated)
    }

    pub async fn update_security_settings(
        &self,
        payload: &SecuritySettingsUpdate,
    ) -> ResultClient<SecuritySettingsView> {
        let updated = self.api.update_security_settings(payload).await?;
        self.refetch().await;
        Ok(updated)
    }

    pub async fn add_payment_method(
        &self,
        payload: &PaymentMethodCreate,
    ) -> ResultClient<PaymentMethodCreated> {
        let created = self.api.add_payment_method(payload).await?;
        self.refetch().await;
        Ok(created)
    }

    pub async fn update_payment_method(
        &self,
        id: Uuid,
        payload: &PaymentMethodUpdate,
    ) -> ResultClient<PaymentMethodView> {
        let updated = self.api.update_payment_method(id, payload).await?;
        self.refetch().await;
        Ok(updated)
    }

    pub async fn delete_payment_method(&self, id: Uuid) -> ResultClient<()> {
        self.api.delete_payment_method(id).await?;
        self.refetch().await;
        Ok(())
    }
}
