mod dto;
pub mod handlers;
pub mod model;
mod repo;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/order/new", post(handlers::new_order))
        .route("/order/:id", get(handlers::get_order))
        .route("/orders/me", get(handlers::my_orders))
        .route("/admin/orders", get(handlers::admin_list_orders))
        .route(
            "/admin/order/:id",
            axum::routing::put(handlers::update_order_status).delete(handlers::delete_order),
        )
}
