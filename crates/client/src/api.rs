//! Typed HTTP client for the Kasa server.
//!
//! One method per endpoint; every non-2xx response is decoded into a
//! `ClientError` from the server's `{ "error": ... }` body.

use api_types::auth::{
    PasswordResetConfirm, PasswordResetRequest, PasswordUpdate, SessionCreated, SessionView,
    SignIn, SignUp,
};
use api_types::balance::BalanceView;
use api_types::category::{
    CategoryCreate, CategoryCreated, CategoryListResponse, CategoryUpdate, CategoryView,
};
use api_types::entry::{EntryCreated, EntryListResponse, EntryNew};
use api_types::settings::{
    PaymentMethodCreate, PaymentMethodCreated, PaymentMethodListResponse, PaymentMethodUpdate,
    PaymentMethodView, PreferencesUpdate, PreferencesView, ProfileUpdate, ProfileView,
    SecuritySettingsUpdate, SecuritySettingsView,
};
use api_types::transaction::{
    TransactionCreate, TransactionCreated, TransactionListResponse, TransactionUpdate,
    TransactionView,
};
use reqwest::{Method, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::{ClientError, ResultClient};

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> ResultClient<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))?;
        Ok(Self {
            base_url,
            token: None,
            http: reqwest::Client::new(),
        })
    }

    /// A copy of this client that authenticates with `token`.
    pub fn with_token(&self, token: &str) -> Self {
        Self {
            base_url: self.base_url.clone(),
            token: Some(token.to_string()),
            http: self.http.clone(),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn request(&self, method: Method, path: &str) -> ResultClient<reqwest::RequestBuilder> {
        let endpoint = self
            .base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))?;

        let mut builder = self.http.request(method, endpoint);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    async fn decode_error(res: reqwest::Response) -> ClientError {
        let status = res.status();
        let body = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());

        match status.as_u16() {
            401 => ClientError::Unauthorized(body),
            404 => ClientError::NotFound(body),
            409 => ClientError::Conflict(body),
            422 => ClientError::Validation(body),
            _ => ClientError::Server(body),
        }
    }

    async fn send_json<T: DeserializeOwned>(
        builder: reqwest::RequestBuilder,
    ) -> ResultClient<T> {
        let res = builder.send().await.map_err(ClientError::Transport)?;
        if res.status().is_success() {
            return res.json::<T>().await.map_err(ClientError::Transport);
        }
        Err(Self::decode_error(res).await)
    }

    async fn send_empty(builder: reqwest::RequestBuilder) -> ResultClient<()> {
        let res = builder.send().await.map_err(ClientError::Transport)?;
        if res.status().is_success() {
            return Ok(());
        }
        Err(Self::decode_error(res).await)
    }

    // ── auth ────────────────────────────────────────────────────────────

    pub async fn sign_up(&self, email: &str, password: &str) -> ResultClient<()> {
        let payload = SignUp {
            email: email.to_string(),
            password: password.to_string(),
        };
        Self::send_empty(self.request(Method::POST, "auth/signUp")?.json(&payload)).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> ResultClient<SessionCreated> {
        let payload = SignIn {
            email: email.to_string(),
            password: password.to_string(),
        };
        Self::send_json(self.request(Method::POST, "auth/signIn")?.json(&payload)).await
    }

    pub async fn session(&self) -> ResultClient<SessionView> {
        Self::send_json(self.request(Method::GET, "auth/session")?).await
    }

    pub async fn sign_out(&self) -> ResultClient<()> {
        Self::send_empty(self.request(Method::POST, "auth/signOut")?).await
    }

    pub async fn request_password_reset(&self, email: &str) -> ResultClient<()> {
        let payload = PasswordResetRequest {
            email: email.to_string(),
        };
        Self::send_empty(self.request(Method::POST, "auth/resetPassword")?.json(&payload)).await
    }

    pub async fn confirm_password_reset(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> ResultClient<()> {
        let payload = PasswordResetConfirm {
            email: email.to_string(),
            code: code.to_string(),
            new_password: new_password.to_string(),
        };
        Self::send_empty(
            self.request(Method::POST, "auth/resetPassword/confirm")?
                .json(&payload),
        )
        .await
    }

    pub async fn update_password(&self, new_password: &str) -> ResultClient<()> {
        let payload = PasswordUpdate {
            new_password: new_password.to_string(),
        };
        Self::send_empty(self.request(Method::PUT, "auth/password")?.json(&payload)).await
    }

    // ── balance and source rows ─────────────────────────────────────────

    pub async fn balance(&self) -> ResultClient<BalanceView> {
        Self::send_json(self.request(Method::GET, "balance")?).await
    }

    pub async fn recompute_balance(&self) -> ResultClient<BalanceView> {
        Self::send_json(self.request(Method::POST, "balance/recompute")?).await
    }

    pub async fn incomes(&self) -> ResultClient<EntryListResponse> {
        Self::send_json(self.request(Method::GET, "incomes")?).await
    }

    pub async fn expenses(&self) -> ResultClient<EntryListResponse> {
        Self::send_json(self.request(Method::GET, "expenses")?).await
    }

    pub async fn add_income(&self, entry: &EntryNew) -> ResultClient<EntryCreated> {
        Self::send_json(self.request(Method::POST, "incomes")?.json(entry)).await
    }

    pub async fn add_expense(&self, entry: &EntryNew) -> ResultClient<EntryCreated> {
        Self::send_json(self.request(Method::POST, "expenses")?.json(entry)).await
    }

    // ── transactions ────────────────────────────────────────────────────

    pub async fn transactions(&self) -> ResultClient<TransactionListResponse> {
        Self::send_json(self.request(Method::GET, "transactions")?).await
    }

    pub async fn recent_transactions(&self, limit: u64) -> ResultClient<TransactionListResponse> {
        Self::send_json(self.request(Method::GET, &format!("transactions?limit={limit}"))?).await
    }

    pub async fn create_transaction(
        &self,
        payload: &TransactionCreate,
    ) -> ResultClient<TransactionCreated> {
        Self::send_json(self.request(Method::POST, "transactions")?.json(payload)).await
    }

    pub async fn update_transaction(
        &self,
        id: Uuid,
        payload: &TransactionUpdate,
    ) -> ResultClient<TransactionView> {
        Self::send_json(
            self.request(Method::PATCH, &format!("transactions/{id}"))?
                .json(payload),
        )
        .await
    }

    pub async fn delete_transaction(&self, id: Uuid) -> ResultClient<()> {
        Self::send_empty(self.request(Method::DELETE, &format!("transactions/{id}"))?).await
    }

    // ── categories ──────────────────────────────────────────────────────

    pub async fn categories(&self) -> ResultClient<CategoryListResponse> {
        Self::send_json(self.request(Method::GET, "categories")?).await
    }

    pub async fn create_category(&self, payload: &CategoryCreate) -> ResultClient<CategoryCreated> {
        Self::send_json(self.request(Method::POST, "categories")?.json(payload)).await
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        payload: &CategoryUpdate,
    ) -> ResultClient<CategoryView> {
        Self::send_json(
            self.request(Method::PATCH, &format!("categories/{id}"))?
                .json(payload),
        )
        .await
    }

    pub async fn delete_category(&self, id: Uuid) -> ResultClient<()> {
        Self::send_empty(self.request(Method::DELETE, &format!("categories/{id}"))?).await
    }

    // ── settings ────────────────────────────────────────────────────────

    pub async fn profile(&self) -> ResultClient<ProfileView> {
        Self::send_json(self.request(Method::GET, "profile")?).await
    }

    pub async fn update_profile(&self, payload: &ProfileUpdate) -> ResultClient<ProfileView> {
        Self::send_json(self.request(Method::PUT, "profile")?.json(payload)).await
    }

    pub async fn preferences(&self) -> ResultClient<PreferencesView> {
        Self::send_json(self.request(Method::GET, "preferences")?).await
    }

    pub async fn update_preferences(
        &self,
        payload: &PreferencesUpdate,
    ) -> ResultClient<PreferencesView> {
        Self::send_json(self.request(Method::PUT, "preferences")?.json(payload)).await
    }

    pub async fn security_settings(&self) -> ResultClient<SecuritySettingsView> {
        Self::send_json(self.request(Method::GET, "security")?).await
    }

    pub async fn update_security_settings(
        &self,
        payload: &SecuritySettingsUpdate,
    ) -> ResultClient<SecuritySettingsView> {
        Self::send_json(self.request(Method::PUT, "security")?.json(payload)).await
    }

    pub async fn payment_methods(&self) -> ResultClient<PaymentMethodListResponse> {
        Self::send_json(self.request(Method::GET, "paymentMethods")?).await
    }

    pub async fn add_payment_method(
        &self,
        payload: &PaymentMethodCreate,
    ) -> ResultClient<PaymentMethodCreated> {
        Self::send_json(self.request(Method::POST, "paymentMethods")?.json(payload)).await
    }

    pub async fn update_payment_method(
        &self,
        id: Uuid,
        payload: &PaymentMethodUpdate,
    ) -> ResultClient<PaymentMethodView> {
        Self::send_json(
            self.request(Method::PATCH, &format!("paymentMethods/{id}"))?
                .json(payload),
        )
        .await
    }

    pub async fn delete_payment_method(&self, id: Uuid) -> ResultClient<()> {
        Self::send_empty(self.request(Method::DELETE, &format!("paymentMethods/{id}"))?).await
    }

    // ── events ──────────────────────────────────────────────────────────

    /// Open the server-sent-events endpoint; the caller reads the body
    /// stream. Used by `ChangeFeed`.
    pub(crate) async fn open_events(&self) -> ResultClient<reqwest::Response> {
        let res = self
            .request(Method::GET, "events")?
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if res.status().is_success() {
            return Ok(res);
        }
        Err(Self::decode_error(res).await)
    }
}
