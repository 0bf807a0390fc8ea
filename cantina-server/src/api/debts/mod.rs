//! Debt API module

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/debts", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/{id}/pay", post(handler::pay))
}
