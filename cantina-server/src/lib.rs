//! Cantina Server - canteen ordering and receivables backend
//!
//! # Architecture overview
//!
//! - **Orders** (`orders`): cart to order, per-day numbering, cancellation
//! - **Payments** (`payments`): payment state machine, debt settlement
//! - **PIX** (`pix`): EMVCo QR payload encoder and key validation
//! - **HTTP API** (`api`, `routes`): RESTful interface for the counter
//! - **Database** (`db`): embedded SQLite with migrations
//!
//! # Module structure
//!
//! ```text
//! cantina-server/src/
//! ├── core/          # config, state, server
//! ├── api/           # HTTP routes and handlers
//! ├── orders/        # order lifecycle engine
//! ├── payments/      # payment reconciliation engine
//! ├── pix/           # charge payload encoder
//! ├── services/      # notifier
//! ├── db/            # pool setup and repositories
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod orders;
pub mod payments;
pub mod pix;
pub mod routes;
pub mod services;
pub mod utils;

pub use crate::core::{Config, Server, ServerState};
pub use services::Notifier;
pub use utils::{AppError, AppResult};

pub use utils::logger::init_logger_with_file;

/// Load .env, then set up logging. Log files go under `WORK_DIR/logs`
/// when that directory already exists.
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let logs_dir = Config::from_env().logs_dir();
    init_logger_with_file(log_level.as_deref(), logs_dir.to_str());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______            __  _
  / ____/___ _____  / /_(_)___  ____ _
 / /   / __ `/ __ \/ __/ / __ \/ __ `/
/ /___/ /_/ / / / / /_/ / / / / /_/ /
\____/\__,_/_/ /_/\__/_/_/ /_/\__,_/
    "#
    );
}
