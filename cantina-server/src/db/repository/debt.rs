//! Debt Repository

use super::RepoResult;
use shared::Money;
use shared::models::Debt;
use sqlx::SqliteExecutor;

const DEBT_SELECT: &str =
    "SELECT id, customer_id, order_id, amount, is_paid, paid_at, created_at FROM debt";

pub async fn insert<'e>(ex: impl SqliteExecutor<'e>, debt: &Debt) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO debt (id, customer_id, order_id, amount, is_paid, paid_at, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(debt.id)
    .bind(debt.customer_id)
    .bind(debt.order_id)
    .bind(debt.amount)
    .bind(debt.is_paid)
    .bind(debt.paid_at)
    .bind(debt.created_at)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn find_by_id<'e>(ex: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<Debt>> {
    let sql = format!("{DEBT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Debt>(&sql)
        .bind(id)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

/// The 1:1 debt of a pay-later order, if any
pub async fn find_by_order<'e>(
    ex: impl SqliteExecutor<'e>,
    order_id: i64,
) -> RepoResult<Option<Debt>> {
    let sql = format!("{DEBT_SELECT} WHERE order_id = ?");
    let row = sqlx::query_as::<_, Debt>(&sql)
        .bind(order_id)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

pub async fn find_by_customer<'e>(
    ex: impl SqliteExecutor<'e>,
    customer_id: i64,
) -> RepoResult<Vec<Debt>> {
    let sql = format!("{DEBT_SELECT} WHERE customer_id = ? ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Debt>(&sql)
        .bind(customer_id)
        .fetch_all(ex)
        .await?;
    Ok(rows)
}

pub async fn mark_paid<'e>(ex: impl SqliteExecutor<'e>, id: i64, paid_at: i64) -> RepoResult<()> {
    sqlx::query("UPDATE debt SET is_paid = 1, paid_at = ?1 WHERE id = ?2")
        .bind(paid_at)
        .bind(id)
        .execute(ex)
        .await?;
    Ok(())
}

pub async fn mark_unpaid<'e>(ex: impl SqliteExecutor<'e>, id: i64) -> RepoResult<()> {
    sqlx::query("UPDATE debt SET is_paid = 0, paid_at = NULL WHERE id = ?")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(())
}

/// Remove a live (unpaid) receivable — order cancellation path
pub async fn delete<'e>(ex: impl SqliteExecutor<'e>, id: i64) -> RepoResult<()> {
    sqlx::query("DELETE FROM debt WHERE id = ?")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(())
}

/// Exact sum (in cents) of a customer's unpaid debts
pub async fn sum_unpaid_for_customer<'e>(
    ex: impl SqliteExecutor<'e>,
    customer_id: i64,
) -> RepoResult<Money> {
    let cents: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(amount), 0) FROM debt WHERE customer_id = ? AND is_paid = 0",
    )
    .bind(customer_id)
    .fetch_one(ex)
    .await?;
    Ok(Money::from_cents(cents))
}
