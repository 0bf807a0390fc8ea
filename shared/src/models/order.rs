//! Order Model

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// How the customer pays
///
/// Immutable after order creation. `PayLater` orders carry exactly one
/// debt record created alongside the order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "kebab-case"))]
pub enum PaymentMethod {
    Pix,
    Cash,
    Card,
    PayLater,
}

impl PaymentMethod {
    pub fn is_pay_later(self) -> bool {
        matches!(self, PaymentMethod::PayLater)
    }
}

/// Payment state of an order
///
/// `Pending` ↔ `Paid` may flip any number of times (admin correction);
/// `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Cancelled,
}

/// Fulfillment state of an order
///
/// Advances monotonically forward; cancellation is the only exception
/// and is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderStatus {
    #[default]
    AwaitingPayment,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Position in the forward progression; `None` for `Cancelled`,
    /// which is reachable only through the explicit cancel operation.
    pub fn rank(self) -> Option<u8> {
        match self {
            OrderStatus::AwaitingPayment => Some(0),
            OrderStatus::Preparing => Some(1),
            OrderStatus::Ready => Some(2),
            OrderStatus::Delivered => Some(3),
            OrderStatus::Cancelled => None,
        }
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    /// Sequential per local calendar day, 1-based
    pub order_number: i64,
    /// Fixed at creation; sum of item subtotals
    pub total_amount: Money,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub is_walk_in: bool,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Immutable item snapshot captured at order creation
///
/// Later product edits or deletions never alter historical orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    /// Cart position, 0-based; listing preserves the order the
    /// customer built the cart in
    pub position: i64,
    pub product_id: i64,
    pub product_name: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub flavor: Option<String>,
    /// unit_price × quantity, computed server-side
    pub subtotal: Money,
}

/// One line of a create-order request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemInput {
    pub product_id: i64,
    pub product_name: String,
    pub unit_price: Money,
    pub quantity: i64,
    #[serde(default)]
    pub flavor: Option<String>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub customer_id: i64,
    pub items: Vec<CartItemInput>,
    /// Client echo of the total; the server recomputes and a mismatch
    /// is logged and ignored.
    #[serde(default)]
    pub total_amount: Option<Money>,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub is_walk_in: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Fully materialized order (order + items + customer), the payload of
/// `order-created` notifications and detail endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub customer: super::Customer,
}
