//! Data models shared across the platform

pub mod customer;
pub mod debt;
pub mod order;

pub use customer::{Customer, CustomerIdentify};
pub use debt::Debt;
pub use order::{
    CartItemInput, Order, OrderCreate, OrderDetail, OrderItem, OrderStatus, PaymentMethod,
    PaymentStatus,
};
