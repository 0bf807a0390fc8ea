//! Customer API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::{RepoError, customer, debt, order};
use crate::payments;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};
use shared::Money;
use shared::models::{Customer, CustomerIdentify, Debt, Order};
use shared::util::normalize_phone;

/// POST /api/customers/identify - find-or-create by phone
///
/// The phone is normalized to digits before the lookup, so
/// "(11) 98765-4321" and "11987654321" resolve to the same customer.
/// An existing customer keeps their stored name.
pub async fn identify(
    State(state): State<ServerState>,
    Json(payload): Json<CustomerIdentify>,
) -> AppResult<Json<Customer>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    let phone = normalize_phone(&payload.phone);
    if phone.len() < 8 || phone.len() > 15 {
        return Err(AppError::validation("phone must have 8 to 15 digits"));
    }

    if let Some(existing) = customer::find_by_phone(&state.pool, &phone).await? {
        return Ok(Json(existing));
    }

    match customer::insert(&state.pool, payload.name.trim(), &phone).await {
        Ok(created) => {
            tracing::info!(customer_id = created.id, "customer registered");
            Ok(Json(created))
        }
        // Concurrent identify for the same phone; the other writer won.
        Err(RepoError::Duplicate(_)) => {
            let existing = customer::find_by_phone(&state.pool, &phone)
                .await?
                .ok_or_else(|| AppError::not_found("Customer not found"))?;
            Ok(Json(existing))
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /api/customers/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Customer>> {
    let cust = customer::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Customer {}", id)))?;
    Ok(Json(cust))
}

/// GET /api/customers/:id/debts
///
/// Listing degrades to an empty collection when the store misbehaves;
/// the error is logged, the till keeps working.
pub async fn list_debts(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Json<Vec<Debt>> {
    match debt::find_by_customer(&state.pool, id).await {
        Ok(debts) => Json(debts),
        Err(e) => {
            tracing::error!(customer_id = id, error = %e, "debt listing failed");
            Json(Vec::new())
        }
    }
}

/// GET /api/customers/:id/orders
pub async fn list_orders(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Json<Vec<Order>> {
    match order::find_by_customer(&state.pool, id).await {
        Ok(orders) => Json(orders),
        Err(e) => {
            tracing::error!(customer_id = id, error = %e, "order listing failed");
            Json(Vec::new())
        }
    }
}

#[derive(serde::Serialize)]
pub struct RecalculatedDebt {
    pub customer_id: i64,
    pub total_debt: Money,
}

/// POST /api/customers/:id/recalculate-debt - rebuild the cached total
/// from the unpaid debt rows
pub async fn recalculate_debt(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RecalculatedDebt>> {
    let total_debt = payments::recalculate_customer_debt(&state.pool, id).await?;
    Ok(Json(RecalculatedDebt {
        customer_id: id,
        total_debt,
    }))
}
