//! Role API Module

mod handler;

use crate::core::ServerState;
use axum::routing::{get, put};
use axum::Router;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/roles", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route(
            "/{id}/permissions",
            get(handler::get_permissions).put(handler::update_permissions),
        )
        .route("/{id}/summary", get(handler::summary))
        .route("/{id}/categories/{category}", put(handler::set_category))
}
