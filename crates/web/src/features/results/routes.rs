use axum::{
    Router,
    middleware,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{list_results, record_result};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/:round_id/results", post(record_result))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/:round_id/results", get(list_results))
        .merge(protected)
}
