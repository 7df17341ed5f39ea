mod dto;
pub mod handlers;
pub mod model;
mod query;
mod repo;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/product/new", post(handlers::create_product))
        .route("/products", get(handlers::list_products))
        .route("/products/search", get(handlers::search_products))
        .route("/product/:id", get(handlers::get_product))
        .route(
            "/admin/product/:id",
            axum::routing::patch(handlers::update_product).delete(handlers::delete_product),
        )
        .route("/review", put(handlers::upsert_review))
        .route(
            "/reviews",
            get(handlers::list_reviews).delete(handlers::delete_review),
        )
}
