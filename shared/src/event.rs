//! Notification bus event types
//!
//! Shared between the server and any client consuming the broadcast
//! stream. Events are fire-and-forget: consumers use the per-resource
//! `version` counter to judge staleness, never to drive state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mutation events emitted by the order and payment engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    /// A new order was created (payload: full order detail)
    OrderCreated,
    /// Order fields changed (payload: order)
    OrderUpdated,
    /// `order_status` changed (payload: order)
    OrderStatusChanged,
    /// `payment_status` changed (payload: order)
    PaymentStatusChanged,
}

impl EventType {
    /// Stable wire name, also used as the version-counter key
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::OrderCreated => "order-created",
            EventType::OrderUpdated => "order-updated",
            EventType::OrderStatusChanged => "order-status-changed",
            EventType::PaymentStatusChanged => "payment-status-changed",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A broadcast message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusMessage {
    pub event: EventType,
    /// Per-event monotonically increasing version
    pub version: u64,
    /// Unix millis at emission time
    pub emitted_at: i64,
    /// Event payload (entity snapshot), if serializable
    pub data: Option<serde_json::Value>,
}
