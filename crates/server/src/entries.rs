//! Income and expense source-row endpoints.
//!
//! The two tables have the same shape; the path picks the table.

use api_types::entry::{EntryCreated, EntryListResponse, EntryNew, EntryView};
use axum::{Extension, Json, extract::State};
use engine::{NewEntry, sessions};

use crate::{ServerError, server::ServerState};

fn map_income(model: engine::incomes::Model) -> EntryView {
    EntryView {
        id: model.id,
        title: model.title,
        amount_minor: model.amount_minor,
        category: model.category,
        date: model.date,
    }
}

fn map_expense(model: engine::expenses::Model) -> EntryView {
    EntryView {
        id: model.id,
        title: model.title,
        amount_minor: model.amount_minor,
        category: model.category,
        date: model.date,
    }
}

fn map_new(payload: EntryNew) -> NewEntry {
    NewEntry {
        title: payload.title,
        amount_minor: payload.amount_minor,
        category: payload.category,
        date: payload.date,
    }
}

pub async fn incomes_list(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
) -> Result<Json<EntryListResponse>, ServerError> {
    let entries = state
        .engine
        .list_incomes(&session.user_id)
        .await?
        .into_iter()
        .map(map_income)
        .collect();

    Ok(Json(EntryListResponse { entries }))
}

pub async fn expenses_list(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
) -> Result<Json<EntryListResponse>, ServerError> {
    let entries = state
        .engine
        .list_expenses(&session.user_id)
        .await?
        .into_iter()
        .map(map_expense)
        .collect();

    Ok(Json(EntryListResponse { entries }))
}

pub async fn income_new(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<EntryNew>,
) -> Result<Json<EntryCreated>, ServerError> {
    let id = state
        .engine
        .add_income(&session.user_id, map_new(payload))
        .await?;
    Ok(Json(EntryCreated { id }))
}

pub async fn expense_new(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<EntryNew>,
) -> Result<Json<EntryCreated>, ServerError> {
    let id = state
        .engine
        .add_expense(&session.user_id, map_new(payload))
        .await?;
    Ok(Json(EntryCreated { id }))
}
