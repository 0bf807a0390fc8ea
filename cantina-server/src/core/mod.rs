pub mod config;
pub mod server;
pub mod state;

pub use config::{Config, PixSettings};
pub use server::Server;
pub use state::ServerState;
