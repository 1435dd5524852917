use axum::{
    Router,
    middleware,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{
    complete_round, get_advancement_summary, get_finals_bracket, list_advancing_students,
    preview_advancement,
};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/:round_id/complete", post(complete_round))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/:round_id/advancement", get(get_advancement_summary))
        .route("/:round_id/advancing", get(list_advancing_students))
        .route("/:round_id/preview", get(preview_advancement))
        .route("/:round_id/finals-bracket", get(get_finals_bracket))
        .merge(protected)
}
