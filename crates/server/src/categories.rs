//! Category API endpoints.

use api_types::category::{
    CategoryCreate, CategoryCreated, CategoryKind, CategoryListResponse, CategoryUpdate,
    CategoryView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{CategoryPatch, NewCategory, sessions};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_kind(kind: engine::TransactionKind) -> CategoryKind {
    match kind {
        engine::TransactionKind::Income => CategoryKind::Income,
        engine::TransactionKind::Expense => CategoryKind::Expense,
    }
}

fn kind_from_api(kind: CategoryKind) -> engine::TransactionKind {
    match kind {
        CategoryKind::Income => engine::TransactionKind::Income,
        CategoryKind::Expense => engine::TransactionKind::Expense,
    }
}

fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        kind: map_kind(category.kind),
        icon: category.icon,
        color: category.color,
        is_default: category.is_default,
    }
}

pub async fn list(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
) -> Result<Json<CategoryListResponse>, ServerError> {
    let categories = state
        .engine
        .list_categories(&session.user_id)
        .await?
        .into_iter()
        .map(map_category)
        .collect();

    Ok(Json(CategoryListResponse { categories }))
}

pub async fn create(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> Result<Json<CategoryCreated>, ServerError> {
    let cmd = NewCategory {
        name: payload.name,
        kind: kind_from_api(payload.kind),
        icon: payload.icon,
        color: payload.color,
        is_default: payload.is_default.unwrap_or(false),
    };

    let category = state.engine.create_category(&session.user_id, cmd).await?;
    Ok(Json(CategoryCreated {
        id: category.id,
        name: category.name,
    }))
}

pub async fn update(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<CategoryView>, ServerError> {
    let patch = CategoryPatch {
        name: payload.name,
        kind: payload.kind.map(kind_from_api),
        icon: payload.icon,
        color: payload.color,
        is_default: payload.is_default,
    };

    let updated = state
        .engine
        .update_category(&session.user_id, id, patch)
        .await?;
    Ok(Json(map_category(updated)))
}

pub async fn remove(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_category(&session.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
