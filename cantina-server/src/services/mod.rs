//! Service layer: long-lived components owned by the server state

pub mod notifier;

pub use notifier::Notifier;
