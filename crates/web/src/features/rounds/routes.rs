use axum::{
    Router,
    middleware,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{create_round, get_round, list_rounds};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/", post(create_round))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_rounds))
        .route("/:round_id", get(get_round))
        .merge(protected)
}
