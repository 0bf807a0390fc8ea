//! Debt Model

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Outstanding pay-later balance, tied 1:1 to a pay-later order
///
/// `is_paid` must mirror the owning order's `payment_status == paid`.
/// Cancelling an order with an unpaid debt deletes the record; a paid
/// debt survives cancellation as financial history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Debt {
    pub id: i64,
    pub customer_id: i64,
    pub order_id: i64,
    /// Copied from the order total at creation, immutable
    pub amount: Money,
    pub is_paid: bool,
    pub paid_at: Option<i64>,
    pub created_at: i64,
}
