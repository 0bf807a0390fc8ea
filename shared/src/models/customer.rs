//! Customer Model

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Customer entity
///
/// Identified by normalized phone number (digits only). `total_spent`
/// accumulates confirmed revenue; `total_debt` mirrors the sum of the
/// customer's unpaid debt records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub name: String,
    /// Digits-only phone, unique per customer
    pub phone: String,
    pub total_spent: Money,
    pub total_debt: Money,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Identify payload: find-or-create by phone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerIdentify {
    pub name: String,
    pub phone: String,
}
