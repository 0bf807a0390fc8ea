//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::core::ServerState;
use crate::db::repository::order;
use crate::orders;
use crate::payments;
use crate::pix;
use crate::utils::{AppError, AppResult};
use shared::Money;
use shared::models::{Order, OrderCreate, OrderDetail, OrderStatus, PaymentStatus};

#[derive(serde::Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// POST /api/orders - create an order from a cart
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<OrderDetail>> {
    let detail = orders::create_order(&state.pool, &state.notifier, payload).await?;
    Ok(Json(detail))
}

/// GET /api/orders?limit=&offset= - newest first
///
/// Degrades to an empty collection on store errors so the counter
/// display never blanks out.
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Order>> {
    let limit = query.limit.unwrap_or(100).clamp(1, 500);
    let offset = query.offset.unwrap_or(0).max(0);
    match order::find_all(&state.pool, limit, offset).await {
        Ok(list) => Json(list),
        Err(e) => {
            tracing::error!(error = %e, "order listing failed");
            Json(Vec::new())
        }
    }
}

/// GET /api/orders/:id - order with items and customer
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetail>> {
    let detail = orders::load_detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;
    Ok(Json(detail))
}

#[derive(serde::Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// PUT /api/orders/:id/status - advance fulfillment
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<Order>> {
    let updated =
        orders::update_order_status(&state.pool, &state.notifier, id, payload.status).await?;
    Ok(Json(updated))
}

#[derive(serde::Deserialize)]
pub struct PaymentUpdate {
    pub payment_status: PaymentStatus,
}

/// PUT /api/orders/:id/payment - move between pending and paid
pub async fn update_payment(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<PaymentUpdate>,
) -> AppResult<Json<Order>> {
    let updated =
        payments::update_payment_status(&state.pool, &state.notifier, id, payload.payment_status)
            .await?;
    Ok(Json(updated))
}

/// POST /api/orders/:id/cancel
///
/// Cancelling an order that does not exist is a no-op and answers with
/// `null` instead of an error.
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Option<Order>>> {
    let cancelled = orders::cancel_order(&state.pool, &state.notifier, id).await?;
    Ok(Json(cancelled))
}

#[derive(serde::Serialize)]
pub struct PixChargeResponse {
    pub order_id: i64,
    pub amount: Money,
    pub txid: String,
    /// The full "copia e cola" payload, ready to render as a QR code
    pub payload: String,
}

/// POST /api/orders/:id/pix - build the payment QR payload
pub async fn pix_charge(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PixChargeResponse>> {
    let ord = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;
    match ord.payment_status {
        PaymentStatus::Paid => {
            return Err(AppError::business_rule("order is already paid"));
        }
        PaymentStatus::Cancelled => {
            return Err(AppError::business_rule(
                "cannot charge for a cancelled order",
            ));
        }
        PaymentStatus::Pending => {}
    }

    let settings = state.config.pix_settings()?;
    let txid = pix::generate_txid();
    let payload = pix::generate_payload(&pix::ChargeParams {
        pix_key: &settings.key,
        merchant_name: &settings.merchant_name,
        merchant_city: &settings.merchant_city,
        amount: Some(ord.total_amount),
        txid: Some(&txid),
    });

    Ok(Json(PixChargeResponse {
        order_id: id,
        amount: ord.total_amount,
        txid,
        payload,
    }))
}
