//! Transactions API endpoints.

use api_types::transaction::{
    TransactionCreate, TransactionCreated, TransactionKind as ApiKind, TransactionListResponse,
    TransactionStatus as ApiStatus, TransactionUpdate, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{NewTransaction, TransactionPatch, sessions};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u64>,
}

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
    }
}

fn kind_from_api(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Expense => engine::TransactionKind::Expense,
    }
}

fn map_status(status: engine::TransactionStatus) -> ApiStatus {
    match status {
        engine::TransactionStatus::Completed => ApiStatus::Completed,
        engine::TransactionStatus::Pending => ApiStatus::Pending,
        engine::TransactionStatus::Failed => ApiStatus::Failed,
    }
}

fn status_from_api(status: ApiStatus) -> engine::TransactionStatus {
    match status {
        ApiStatus::Completed => engine::TransactionStatus::Completed,
        ApiStatus::Pending => engine::TransactionStatus::Pending,
        ApiStatus::Failed => engine::TransactionStatus::Failed,
    }
}

fn map_transaction(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        title: tx.title,
        description: tx.description,
        amount_minor: tx.amount_minor,
        kind: map_kind(tx.kind),
        category: tx.category,
        payment_method: tx.payment_method,
        status: map_status(tx.status),
        date: tx.date,
        is_recurring: tx.is_recurring,
        recurring_day: tx.recurring_day,
        created_at: tx.created_at,
        updated_at: tx.updated_at,
    }
}

pub async fn list(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let rows = match query.limit {
        Some(limit) => {
            state
                .engine
                .recent_transactions(&session.user_id, limit)
                .await?
        }
        None => state.engine.list_transactions(&session.user_id).await?,
    };

    let transactions = rows
        .into_iter()
        .map(map_transaction)
        .collect();

    Ok(Json(TransactionListResponse { transactions }))
}

pub async fn create(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionCreate>,
) -> Result<Json<TransactionCreated>, ServerError> {
    let cmd = NewTransaction {
        title: payload.title,
        description: payload.description,
        amount_minor: payload.amount_minor,
        kind: kind_from_api(payload.kind),
        category: payload.category,
        payment_method: payload.payment_method,
        status: status_from_api(payload.status),
        date: payload.date,
        is_recurring: payload.is_recurring,
        recurring_day: payload.recurring_day,
    };

    let id = state.engine.create_transaction(&session.user_id, cmd).await?;
    Ok(Json(TransactionCreated { id }))
}

pub async fn update(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let patch = TransactionPatch {
        title: payload.title,
        description: payload.description,
        amount_minor: payload.amount_minor,
        kind: payload.kind.map(kind_from_api),
        category: payload.category,
        payment_method: payload.payment_method,
        status: payload.status.map(status_from_api),
        date: payload.date,
        is_recurring: payload.is_recurring,
        recurring_day: payload.recurring_day,
    };

    let updated = state
        .engine
        .update_transaction(&session.user_id, id, patch)
        .await?;
    Ok(Json(map_transaction(updated)))
}

pub async fn remove(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_transaction(&session.user_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
