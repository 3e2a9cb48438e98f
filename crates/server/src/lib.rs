use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{run, run_with_listener, spawn_with_listener};

mod auth;
mod balance;
mod categories;
mod entries;
mod events;
mod server;
mod settings;
mod transactions;

pub mod types {
    pub mod auth {
        pub use api_types::auth::{
            PasswordResetConfirm, PasswordResetRequest, PasswordUpdate, SessionCreated,
            SessionView, SignIn, SignUp,
        };
    }

    pub mod balance {
        pub use api_types::balance::BalanceView;
    }

    pub mod entry {
        pub use api_types::entry::{EntryCreated, EntryListResponse, EntryNew, EntryView};
    }

    pub mod transaction {
        pub use api_types::transaction::{
            TransactionCreate, TransactionCreated, TransactionKind, TransactionListResponse,
            TransactionStatus, TransactionUpdate, TransactionView,
        };
    }

    pub mod category {
        pub use api_types::category::{
            CategoryCreate, CategoryCreated, CategoryKind, CategoryListResponse, CategoryUpdate,
            CategoryView,
        };
    }

    pub mod settings {
        pub use api_types::settings::{
            PaymentMethodCreate, PaymentMethodCreated, PaymentMethodListResponse,
            PaymentMethodUpdate, PaymentMethodView, PreferencesUpdate, PreferencesView,
            ProfileUpdate, ProfileView, SecuritySettingsUpdate, SecuritySettingsView,
        };
    }

    pub mod events {
        pub use api_types::events::{ChangeEvent, WatchedTable};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

//TODO: Find a better solution
#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_) | EngineError::InvalidName(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_unauthorized_maps_to_401() {
        let res =
            ServerError::from(EngineError::Unauthorized("invalid login credentials".to_string()))
                .into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        let res = ServerError::from(EngineError::InvalidAmount("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let res = ServerError::from(EngineError::InvalidName("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
