//! Order Repository

use super::RepoResult;
use shared::models::{Order, OrderItem, OrderStatus, PaymentStatus};
use sqlx::{SqliteConnection, SqliteExecutor};

const ORDER_SELECT: &str = "SELECT id, customer_id, order_number, total_amount, payment_method, \
     payment_status, order_status, is_walk_in, notes, created_at, updated_at FROM orders";

/// Allocate the next order number for the given local calendar day.
///
/// Upsert on the per-day counter row; `RETURNING` makes the increment
/// atomic, so concurrent creations can never share a number.
pub async fn next_order_number<'e>(ex: impl SqliteExecutor<'e>, day: &str) -> RepoResult<i64> {
    let number: i64 = sqlx::query_scalar(
        "INSERT INTO order_counter (day, last_number) VALUES (?1, 1) \
         ON CONFLICT(day) DO UPDATE SET last_number = last_number + 1 \
         RETURNING last_number",
    )
    .bind(day)
    .fetch_one(ex)
    .await?;
    Ok(number)
}

pub async fn insert<'e>(ex: impl SqliteExecutor<'e>, order: &Order) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO orders (id, customer_id, order_number, total_amount, payment_method, \
         payment_status, order_status, is_walk_in, notes, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )
    .bind(order.id)
    .bind(order.customer_id)
    .bind(order.order_number)
    .bind(order.total_amount)
    .bind(order.payment_method)
    .bind(order.payment_status)
    .bind(order.order_status)
    .bind(order.is_walk_in)
    .bind(&order.notes)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(ex)
    .await?;
    Ok(())
}

/// Bulk-insert the item snapshots for an order
pub async fn insert_items(conn: &mut SqliteConnection, items: &[OrderItem]) -> RepoResult<()> {
    for item in items {
        sqlx::query(
            "INSERT INTO order_item (id, order_id, position, product_id, product_name, \
             unit_price, quantity, flavor, subtotal) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(item.id)
        .bind(item.order_id)
        .bind(item.position)
        .bind(item.product_id)
        .bind(&item.product_name)
        .bind(item.unit_price)
        .bind(item.quantity)
        .bind(&item.flavor)
        .bind(item.subtotal)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn find_by_id<'e>(ex: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

pub async fn find_all<'e>(
    ex: impl SqliteExecutor<'e>,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<Order>> {
    let sql = format!("{ORDER_SELECT} ORDER BY created_at DESC LIMIT ? OFFSET ?");
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(ex)
        .await?;
    Ok(rows)
}

pub async fn find_by_customer<'e>(
    ex: impl SqliteExecutor<'e>,
    customer_id: i64,
) -> RepoResult<Vec<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE customer_id = ? ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(customer_id)
        .fetch_all(ex)
        .await?;
    Ok(rows)
}

pub async fn find_items<'e>(
    ex: impl SqliteExecutor<'e>,
    order_id: i64,
) -> RepoResult<Vec<OrderItem>> {
    let rows = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, position, product_id, product_name, unit_price, quantity, flavor, \
         subtotal FROM order_item WHERE order_id = ? ORDER BY position",
    )
    .bind(order_id)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn set_payment_status<'e>(
    ex: impl SqliteExecutor<'e>,
    id: i64,
    status: PaymentStatus,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE orders SET payment_status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(ex)
        .await?;
    Ok(())
}

pub async fn set_order_status<'e>(
    ex: impl SqliteExecutor<'e>,
    id: i64,
    status: OrderStatus,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE orders SET order_status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(ex)
        .await?;
    Ok(())
}
