//! Customer Repository

use super::RepoResult;
use shared::Money;
use shared::models::Customer;
use sqlx::SqliteExecutor;

const CUSTOMER_SELECT: &str =
    "SELECT id, name, phone, total_spent, total_debt, created_at, updated_at FROM customer";

pub async fn find_by_id<'e>(ex: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(id)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

/// Look up by normalized (digits-only) phone
pub async fn find_by_phone<'e>(
    ex: impl SqliteExecutor<'e>,
    phone: &str,
) -> RepoResult<Option<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} WHERE phone = ?");
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(phone)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

pub async fn insert<'e>(
    ex: impl SqliteExecutor<'e>,
    name: &str,
    phone: &str,
) -> RepoResult<Customer> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO customer (id, name, phone, total_spent, total_debt, created_at, updated_at) \
         VALUES (?1, ?2, ?3, 0, 0, ?4, ?4)",
    )
    .bind(id)
    .bind(name)
    .bind(phone)
    .bind(now)
    .execute(ex)
    .await?;
    Ok(Customer {
        id,
        name: name.to_string(),
        phone: phone.to_string(),
        total_spent: Money::ZERO,
        total_debt: Money::ZERO,
        created_at: now,
        updated_at: now,
    })
}

/// Additive debt update — tolerates concurrent orders for the same customer
pub async fn add_debt<'e>(
    ex: impl SqliteExecutor<'e>,
    customer_id: i64,
    amount: Money,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE customer SET total_debt = total_debt + ?1, updated_at = ?2 WHERE id = ?3")
        .bind(amount)
        .bind(now)
        .bind(customer_id)
        .execute(ex)
        .await?;
    Ok(())
}

/// Subtract from `total_debt`, flooring at zero
pub async fn subtract_debt_floor<'e>(
    ex: impl SqliteExecutor<'e>,
    customer_id: i64,
    amount: Money,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE customer SET total_debt = MAX(total_debt - ?1, 0), updated_at = ?2 WHERE id = ?3",
    )
    .bind(amount)
    .bind(now)
    .bind(customer_id)
    .execute(ex)
    .await?;
    Ok(())
}

/// Additive confirmed-revenue update
pub async fn add_spent<'e>(
    ex: impl SqliteExecutor<'e>,
    customer_id: i64,
    amount: Money,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE customer SET total_spent = total_spent + ?1, updated_at = ?2 WHERE id = ?3")
        .bind(amount)
        .bind(now)
        .bind(customer_id)
        .execute(ex)
        .await?;
    Ok(())
}

/// Subtract from `total_spent`, flooring at zero (payment reverts)
pub async fn subtract_spent_floor<'e>(
    ex: impl SqliteExecutor<'e>,
    customer_id: i64,
    amount: Money,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE customer SET total_spent = MAX(total_spent - ?1, 0), updated_at = ?2 WHERE id = ?3",
    )
    .bind(amount)
    .bind(now)
    .bind(customer_id)
    .execute(ex)
    .await?;
    Ok(())
}

/// Authoritative overwrite of `total_debt` (repair path)
pub async fn set_total_debt<'e>(
    ex: impl SqliteExecutor<'e>,
    customer_id: i64,
    total_debt: Money,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE customer SET total_debt = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(total_debt)
        .bind(now)
        .bind(customer_id)
        .execute(ex)
        .await?;
    Ok(())
}
