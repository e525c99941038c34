use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{handler::*, middleware::mw_require_auth, AppState};

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/todos", get(get_todos).post(create_todo))
        .route(
            "/todos/:id",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .route("/sessions/current", delete(logout))
        .route_layer(from_fn_with_state(app_state.clone(), mw_require_auth))
        .route("/users", get(get_user_by_credentials).post(create_user))
        .route("/users/:id", get(get_user))
        .route("/sessions", post(login))
        .route("/", get(health_checker_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
