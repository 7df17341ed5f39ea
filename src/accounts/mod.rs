mod dto;
pub mod handlers;
pub mod model;
mod repo;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", get(handlers::logout))
        .route("/password/forgot", post(handlers::forgot_password))
        .route("/password/reset/:token", put(handlers::reset_password))
        .route("/user/me", get(handlers::me))
        .route("/password/update", put(handlers::update_password))
        .route("/profile/update", put(handlers::update_profile))
        .route("/admin/users", get(handlers::admin_list_users))
        .route(
            "/admin/user/:id",
            get(handlers::admin_get_user)
                .put(handlers::admin_update_role)
                .delete(handlers::admin_delete_user),
        )
}
