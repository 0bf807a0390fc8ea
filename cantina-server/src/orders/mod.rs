//! Order Lifecycle Engine
//!
//! Creates orders (with per-day sequential numbering and the associated
//! debt record for pay-later orders) and cancels them, reverting the
//! customer's live receivable. Every operation wraps its writes in a
//! single transaction so readers never observe partial state.

use crate::db::repository::{customer, debt, order};
use crate::services::Notifier;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_price, validate_quantity,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::EventType;
use shared::models::{
    Debt, Order, OrderCreate, OrderDetail, OrderItem, OrderStatus, PaymentStatus,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

/// Local calendar day key for the order-number counter
fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

fn validate_create(req: &OrderCreate) -> AppResult<()> {
    if req.items.is_empty() {
        return Err(AppError::validation("order must contain at least one item"));
    }
    for item in &req.items {
        validate_required_text(&item.product_name, "product_name", MAX_NAME_LEN)?;
        validate_quantity(item.quantity)?;
        validate_price(item.unit_price, "unit_price")?;
        validate_optional_text(&item.flavor, "flavor", MAX_NAME_LEN)?;
    }
    validate_optional_text(&req.notes, "notes", MAX_NOTE_LEN)?;
    Ok(())
}

/// Create an order with its item snapshots; pay-later orders also get
/// their debt record and an additive bump of the customer's total debt.
pub async fn create_order(
    pool: &SqlitePool,
    notifier: &Notifier,
    req: OrderCreate,
) -> AppResult<OrderDetail> {
    validate_create(&req)?;

    // The stored total is the server-side sum of item subtotals;
    // a differing client echo is ignored.
    let now = now_millis();
    let order_id = snowflake_id();
    let mut items = Vec::with_capacity(req.items.len());
    let mut total = shared::Money::ZERO;
    for (position, input) in req.items.iter().enumerate() {
        let subtotal = input
            .unit_price
            .checked_mul(input.quantity)
            .map_err(|e| AppError::validation(e.to_string()))?;
        total += subtotal;
        items.push(OrderItem {
            id: snowflake_id(),
            order_id,
            position: position as i64,
            product_id: input.product_id,
            product_name: input.product_name.clone(),
            unit_price: input.unit_price,
            quantity: input.quantity,
            flavor: input.flavor.clone(),
            subtotal,
        });
    }
    if let Some(echo) = req.total_amount
        && echo != total
    {
        tracing::warn!(
            claimed = %echo,
            computed = %total,
            "client-supplied order total ignored"
        );
    }

    let mut tx = pool.begin().await?;

    customer::find_by_id(&mut *tx, req.customer_id)
        .await?
        .ok_or_else(|| AppError::not_found("Customer not found"))?;

    let order_number = order::next_order_number(&mut *tx, &today()).await?;

    // New orders always start pending/awaiting_payment, whatever the
    // client claims.
    let new_order = Order {
        id: order_id,
        customer_id: req.customer_id,
        order_number,
        total_amount: total,
        payment_method: req.payment_method,
        payment_status: PaymentStatus::Pending,
        order_status: OrderStatus::AwaitingPayment,
        is_walk_in: req.is_walk_in,
        notes: req.notes.clone(),
        created_at: now,
        updated_at: now,
    };
    order::insert(&mut *tx, &new_order).await?;
    order::insert_items(&mut *tx, &items).await?;

    if req.payment_method.is_pay_later() {
        let new_debt = Debt {
            id: snowflake_id(),
            customer_id: req.customer_id,
            order_id,
            amount: total,
            is_paid: false,
            paid_at: None,
            created_at: now,
        };
        debt::insert(&mut *tx, &new_debt).await?;
        customer::add_debt(&mut *tx, req.customer_id, total).await?;
    }

    tx.commit().await?;

    tracing::info!(
        order_id,
        order_number,
        total = %total,
        method = ?req.payment_method,
        "order created"
    );

    let cust = customer::find_by_id(pool, req.customer_id)
        .await?
        .ok_or_else(|| AppError::not_found("Customer not found"))?;
    let detail = OrderDetail {
        order: new_order,
        items,
        customer: cust,
    };
    notifier.notify(EventType::OrderCreated, &detail);
    Ok(detail)
}

/// Cancel an order. A missing order is a no-op (`None`), not an error.
///
/// An unpaid debt is deleted and the customer's total debt reduced by
/// the order total (floored at zero). A paid debt is financial history
/// and stays untouched, so the order keeps `payment_status = paid`.
pub async fn cancel_order(
    pool: &SqlitePool,
    notifier: &Notifier,
    order_id: i64,
) -> AppResult<Option<Order>> {
    let mut tx = pool.begin().await?;

    let Some(existing) = order::find_by_id(&mut *tx, order_id).await? else {
        return Ok(None);
    };
    if existing.order_status == OrderStatus::Cancelled {
        // Already terminal; debt adjustments ran on the first cancel.
        return Ok(Some(existing));
    }

    order::set_order_status(&mut *tx, order_id, OrderStatus::Cancelled).await?;
    if existing.payment_status == PaymentStatus::Pending {
        order::set_payment_status(&mut *tx, order_id, PaymentStatus::Cancelled).await?;
    }

    if existing.payment_method.is_pay_later()
        && let Some(d) = debt::find_by_order(&mut *tx, order_id).await?
        && !d.is_paid
    {
        debt::delete(&mut *tx, d.id).await?;
        customer::subtract_debt_floor(&mut *tx, existing.customer_id, existing.total_amount)
            .await?;
    }

    tx.commit().await?;

    tracing::info!(order_id, "order cancelled");

    let updated = order::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;
    notifier.notify(EventType::OrderStatusChanged, &updated);
    notifier.notify(EventType::OrderUpdated, &updated);
    Ok(Some(updated))
}

/// Advance the fulfillment status. Backwards moves and any change on a
/// cancelled order are rejected; cancellation itself goes through
/// [`cancel_order`].
pub async fn update_order_status(
    pool: &SqlitePool,
    notifier: &Notifier,
    order_id: i64,
    new_status: OrderStatus,
) -> AppResult<Order> {
    if new_status == OrderStatus::Cancelled {
        return Err(AppError::business_rule(
            "cancellation must use the cancel operation",
        ));
    }

    let mut tx = pool.begin().await?;

    let existing = order::find_by_id(&mut *tx, order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    let Some(current_rank) = existing.order_status.rank() else {
        return Err(AppError::business_rule(
            "cancelled order cannot change status",
        ));
    };
    // rank() is Some for every non-cancelled status
    let new_rank = new_status.rank().unwrap_or(u8::MAX);
    if new_rank < current_rank {
        return Err(AppError::business_rule(format!(
            "order status cannot move backwards ({:?} -> {:?})",
            existing.order_status, new_status
        )));
    }
    if new_rank == current_rank {
        return Ok(existing);
    }

    order::set_order_status(&mut *tx, order_id, new_status).await?;
    tx.commit().await?;

    let updated = order::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;
    notifier.notify(EventType::OrderStatusChanged, &updated);
    Ok(updated)
}

/// Materialize an order with its items and customer
pub async fn load_detail(pool: &SqlitePool, order_id: i64) -> AppResult<Option<OrderDetail>> {
    let Some(ord) = order::find_by_id(pool, order_id).await? else {
        return Ok(None);
    };
    let items = order::find_items(pool, order_id).await?;
    let cust = customer::find_by_id(pool, ord.customer_id)
        .await?
        .ok_or_else(|| AppError::not_found("Customer not found"))?;
    Ok(Some(OrderDetail {
        order: ord,
        items,
        customer: cust,
    }))
}
