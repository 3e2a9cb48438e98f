//! Balance API endpoints.

use api_types::balance::BalanceView;
use axum::{Extension, Json, extract::State};
use engine::sessions;

use crate::{ServerError, server::ServerState};

fn map_balance(model: engine::balances::Model) -> BalanceView {
    BalanceView {
        id: model.id,
        total_balance_minor: model.total_balance_minor,
        last_earned_minor: model.last_earned_minor,
        total_bonus_minor: model.total_bonus_minor,
        updated_at: model.updated_at,
    }
}

pub async fn get(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
) -> Result<Json<BalanceView>, ServerError> {
    let model = state.engine.balance(&session.user_id).await?;
    Ok(Json(map_balance(model)))
}

/// Rebuild the balance row from the transactions table.
pub async fn recompute(
    Extension(session): Extension<sessions::Model>,
    State(state): State<ServerState>,
) -> Result<Json<BalanceView>, ServerError> {
    let model = state.engine.recompute_balance(&session.user_id).await?;
    Ok(Json(map_balance(model)))
}
