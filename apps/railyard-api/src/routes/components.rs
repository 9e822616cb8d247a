//! Component routes

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers::components, AppState};

/// Create component routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/components",
            get(components::list_components).post(components::create_component),
        )
        .route(
            "/components/:id",
            get(components::get_component)
                .put(components::update_component)
                .delete(components::delete_component),
        )
        .route("/components/bulk", post(components::bulk_insert_components))
        .route(
            "/components/bulk-delete",
            post(components::bulk_delete_components),
        )
}
