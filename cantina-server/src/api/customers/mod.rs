//! Customer API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/customers", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/identify", post(handler::identify))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/debts", get(handler::list_debts))
        .route("/{id}/orders", get(handler::list_orders))
        .route("/{id}/recalculate-debt", post(handler::recalculate_debt))
}
