//! HTTP API modules, one per resource

pub mod customers;
pub mod debts;
pub mod health;
pub mod orders;
