//! Payment Reconciliation Engine
//!
//! One state machine over `payment_status`, reachable from two entry
//! points: the generic order payment update and the debt-management
//! "mark paid" path. Both funnel through [`apply_payment_transition`]
//! so the side effects on debts and customer totals can never diverge.
//!
//! | transition | side effects |
//! |---|---|
//! | pending → paid | pay-later: debt paid, total_debt −= amount (floor 0), total_spent += amount; else total_spent += order total |
//! | paid → pending | mirror reverse |
//! | same → same | none |

use crate::db::repository::{customer, debt, order};
use crate::services::Notifier;
use crate::utils::{AppError, AppResult};
use shared::{EventType, Money};
use shared::models::{Debt, Order, PaymentStatus};
use shared::util::now_millis;
use sqlx::{SqliteConnection, SqlitePool};

/// Apply the customer/debt side effects of a payment status change.
///
/// Effects fire exactly once per directional transition: a call with
/// `previous == new` is a no-op, which is what guards double-crediting
/// when an admin submits the current status again.
async fn apply_payment_transition(
    conn: &mut SqliteConnection,
    ord: &Order,
    previous: PaymentStatus,
    new: PaymentStatus,
) -> AppResult<()> {
    match (previous, new) {
        (PaymentStatus::Pending, PaymentStatus::Paid) => {
            if ord.payment_method.is_pay_later() {
                let d = debt::find_by_order(&mut *conn, ord.id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Debt not found for pay-later order"))?;
                if !d.is_paid {
                    debt::mark_paid(&mut *conn, d.id, now_millis()).await?;
                    customer::subtract_debt_floor(&mut *conn, ord.customer_id, d.amount).await?;
                }
                customer::add_spent(&mut *conn, ord.customer_id, d.amount).await?;
            } else {
                customer::add_spent(&mut *conn, ord.customer_id, ord.total_amount).await?;
            }
        }
        (PaymentStatus::Paid, PaymentStatus::Pending) => {
            if ord.payment_method.is_pay_later() {
                let d = debt::find_by_order(&mut *conn, ord.id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Debt not found for pay-later order"))?;
                if d.is_paid {
                    debt::mark_unpaid(&mut *conn, d.id).await?;
                    customer::add_debt(&mut *conn, ord.customer_id, d.amount).await?;
                }
                customer::subtract_spent_floor(&mut *conn, ord.customer_id, d.amount).await?;
            } else {
                customer::subtract_spent_floor(&mut *conn, ord.customer_id, ord.total_amount)
                    .await?;
            }
        }
        // Same-status updates and anything involving `cancelled` carry
        // no totals effects here; cancellation is owned by the order
        // lifecycle engine.
        _ => {}
    }
    Ok(())
}

/// Admin entry point: move an order between `pending` and `paid`.
pub async fn update_payment_status(
    pool: &SqlitePool,
    notifier: &Notifier,
    order_id: i64,
    new_status: PaymentStatus,
) -> AppResult<Order> {
    if new_status == PaymentStatus::Cancelled {
        return Err(AppError::business_rule(
            "cancellation must use the cancel operation",
        ));
    }

    let mut tx = pool.begin().await?;

    let existing = order::find_by_id(&mut *tx, order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;
    if existing.payment_status == PaymentStatus::Cancelled {
        return Err(AppError::business_rule(
            "payment status of a cancelled order is terminal",
        ));
    }

    let previous = existing.payment_status;
    order::set_payment_status(&mut *tx, order_id, new_status).await?;
    apply_payment_transition(&mut *tx, &existing, previous, new_status).await?;

    tx.commit().await?;

    tracing::info!(order_id, ?previous, new = ?new_status, "payment status updated");

    let updated = order::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;
    notifier.notify(EventType::PaymentStatusChanged, &updated);
    notifier.notify(EventType::OrderUpdated, &updated);
    Ok(updated)
}

/// Debt-management entry point. Idempotent: a debt that is already
/// paid is returned unchanged and the customer totals move exactly
/// once across any number of calls.
pub async fn mark_debt_as_paid(
    pool: &SqlitePool,
    notifier: &Notifier,
    debt_id: i64,
) -> AppResult<Debt> {
    let mut tx = pool.begin().await?;

    let d = debt::find_by_id(&mut *tx, debt_id)
        .await?
        .ok_or_else(|| AppError::not_found("Debt not found"))?;
    if d.is_paid {
        return Ok(d);
    }

    let ord = order::find_by_id(&mut *tx, d.order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;
    if ord.payment_status == PaymentStatus::Cancelled {
        return Err(AppError::business_rule(
            "cannot settle a debt on a cancelled order",
        ));
    }

    let previous = ord.payment_status;
    order::set_payment_status(&mut *tx, ord.id, PaymentStatus::Paid).await?;
    if previous == PaymentStatus::Paid {
        // Order already read paid while the debt didn't: repair the
        // mirror flag without touching the totals again.
        debt::mark_paid(&mut *tx, d.id, now_millis()).await?;
    } else {
        apply_payment_transition(&mut *tx, &ord, previous, PaymentStatus::Paid).await?;
    }

    tx.commit().await?;

    tracing::info!(debt_id, order_id = d.order_id, amount = %d.amount, "debt settled");

    let updated = debt::find_by_id(pool, debt_id)
        .await?
        .ok_or_else(|| AppError::not_found("Debt not found"))?;
    if let Some(ord) = order::find_by_id(pool, d.order_id).await? {
        notifier.notify(EventType::PaymentStatusChanged, &ord);
        notifier.notify(EventType::OrderUpdated, &ord);
    }
    Ok(updated)
}

/// Repair operation: overwrite `total_debt` with the exact sum of the
/// customer's unpaid debts. Safe to run at any time.
pub async fn recalculate_customer_debt(pool: &SqlitePool, customer_id: i64) -> AppResult<Money> {
    let mut tx = pool.begin().await?;

    customer::find_by_id(&mut *tx, customer_id)
        .await?
        .ok_or_else(|| AppError::not_found("Customer not found"))?;
    let total = debt::sum_unpaid_for_customer(&mut *tx, customer_id).await?;
    customer::set_total_debt(&mut *tx, customer_id, total).await?;

    tx.commit().await?;

    tracing::info!(customer_id, total_debt = %total, "customer debt recalculated");
    Ok(total)
}
