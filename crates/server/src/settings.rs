//! Settings API endpoints: profile, preferences, security, payment methods.

use api_types::settings::{
    PaymentMethodCreate, PaymentMethodCreated, PaymentMethodListResponse, PaymentMethodUpdate,
    PaymentMethodView, PreferencesUpdate, PreferencesView, ProfileUpdate, ProfileView,
    SecuritySettingsUpdate, SecuritySettingsView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{
    NewPaymentMethod, PaymentMethodPatch, PreferencesPatch, ProfilePatch, SecuritySettingsPatch,
    sessions,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_profile(model: engine::profiles::Model) -> ProfileView {
    ProfileView {
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        phone: model.phone,
        avatar_url: model.avatar_url,
    }
}

fn map_preferences(model: engine::preferences::Model) -> PreferencesView {
    PreferencesView {
        notifications_mobile: model.notifications_mobile,
        notifications_email: model.notifications_email,
        notifications_sound: model.notifications_sound,
        notifications_payment: model.notifications_payment,
        notifications_security: model.notifications_security,
        notifications_promotions: model.notifications_promotions,
        theme: model.theme,
        font_size: model.font_size,
        language: model.language,
        date_format: model.date_format,
        currency: model.currency,
    }
}

fn map_security(model: engine::security_settings::Model) -> SecuritySettingsView {
    SecuritySettingsView {
        two_factor_enabled: model.two_factor_enabled,
        last_password_change: model.last_password_change,
    }
}

fn map_payment_method(model: engine::payment_methods::Model) -> PaymentMethodView {
    PaymentMethodView {
        id: model.id,
        kind: model.kind,
        provider: model.provider,
        last_four: model.last_four,
        expiry_date: model.expiry_date,
        is_default: model.is_default,
    }
}

pub async fn profile_get(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ProfileView>, ServerError> {
    let model = state.engine.profile(&session.user_id).await?;
    Ok(Json(map_profile(model)))
}

pub async fn profile_update(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<ProfileView>, ServerError> {
    let patch = ProfilePatch {
        first_name: payload.first_name,
        last_name: payload.last_name,
        phone: payload.phone,
        avatar_url: payload.avatar_url,
    };

    let updated = state.engine.update_profile(&session.user_id, patch).await?;
    Ok(Json(map_profile(updated)))
}

pub async fn preferences_get(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
) -> Result<Json<PreferencesView>, ServerError> {
    let model = state.engine.preferences(&session.user_id).await?;
    Ok(Json(map_preferences(model)))
}

pub async fn preferences_update(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<PreferencesUpdate>,
) -> Result<Json<PreferencesView>, ServerError> {
    let patch = PreferencesPatch {
        notifications_mobile: payload.notifications_mobile,
        notifications_email: payload.notifications_email,
        notifications_sound: payload.notifications_sound,
        notifications_payment: payload.notifications_payment,
        notifications_security: payload.notifications_security,
        notifications_promotions: payload.notifications_promotions,
        theme: payload.theme,
        font_size: payload.font_size,
        language: payload.language,
        date_format: payload.date_format,
        currency: payload.currency,
    };

    let updated = state
        .engine
        .update_preferences(&session.user_id, patch)
        .await?;
    Ok(Json(map_preferences(updated)))
}

pub async fn security_get(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
) -> Result<Json<SecuritySettingsView>, ServerError> {
    let model = state.engine.security_settings(&session.user_id).await?;
    Ok(Json(map_security(model)))
}

pub async fn security_update(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<SecuritySettingsUpdate>,
) -> Result<Json<SecuritySettingsView>, ServerError> {
    let patch = SecuritySettingsPatch {
        two_factor_enabled: payload.two_factor_enabled,
        last_password_change: payload.last_password_change,
    };

    let updated = state
        .engine
        .update_security_settings(&session.user_id, patch)
        .await?;
    Ok(Json(map_security(updated)))
}

pub async fn payment_methods_list(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
) -> Result<Json<PaymentMethodListResponse>, ServerError> {
    let payment_methods = state
        .engine
        .payment_methods(&session.user_id)
        .await?
        .into_iter()
        .map(map_payment_method)
        .collect();

    Ok(Json(PaymentMethodListResponse { payment_methods }))
}

pub async fn payment_method_new(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<PaymentMethodCreate>,
) -> Result<Json<PaymentMethodCreated>, ServerError> {
    let cmd = NewPaymentMethod {
        kind: payload.kind,
        provider: payload.provider,
        last_four: payload.last_four,
        expiry_date: payload.expiry_date,
        is_default: payload.is_default.unwrap_or(false),
    };

    let model = state
        .engine
        .add_payment_method(&session.user_id, cmd)
        .await?;
    Ok(Json(PaymentMethodCreated { id: model.id }))
}

pub async fn payment_method_update(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PaymentMethodUpdate>,
) -> Result<Json<PaymentMethodView>, ServerError> {
    let patch = PaymentMethodPatch {
        kind: payload.kind,
        provider: payload.provider,
        last_four: payload.last_four,
        expiry_date: payload.expiry_date,
        is_default: payload.is_default,
    };

    let updated = state
        .engine
        .update_payment_method(&session.user_id, id, patch)
        .await?;
    Ok(Json(map_payment_method(updated)))
}

pub async fn payment_method_remove(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_payment_method(&session.user_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
