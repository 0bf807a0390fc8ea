//! Shared types for the cantina platform
//!
//! Everything the server and its clients agree on lives here:
//!
//! - **models** (`models`): customers, orders, order items, debts
//! - **money** (`money`): exact 2-decimal monetary values
//! - **events** (`event`): notification bus message types
//! - **util** (`util`): timestamps, snowflake IDs, phone normalization
//!
//! The `db` feature gates `sqlx` derives so client-side consumers don't
//! pull in the database stack.

pub mod event;
pub mod models;
pub mod money;
pub mod util;

// Re-export common types
pub use event::{BusMessage, EventType};
pub use money::Money;
