//! Debt API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::payments;
use crate::utils::AppResult;
use shared::models::Debt;

/// POST /api/debts/:id/pay - settle one debt at the counter
///
/// Idempotent: paying an already-settled debt returns it unchanged.
pub async fn pay(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Debt>> {
    let settled = payments::mark_debt_as_paid(&state.pool, &state.notifier, id).await?;
    Ok(Json(settled))
}
