use axum::{middleware::from_fn, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::graphql::{graphiql, graphql};
use super::handlers::patient::{find, find_by_id};
use super::handlers::patient_write::{create, update};
use super::state::AppState;
use crate::middleware::{request_id, response_time};

pub fn patient_routes(state: AppState) -> Router {
    Router::new()
        .route("/rest", get(find).post(create))
        .route("/rest/:id", get(find_by_id).put(update))
        .with_state(state)
}

pub fn graphql_routes(state: AppState) -> Router {
    Router::new()
        .route("/graphql", get(graphiql).post(graphql))
        .with_state(state)
}

/// The complete application: REST and GraphQL plus the request layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(patient_routes(state.clone()))
        .merge(graphql_routes(state))
        .layer(from_fn(response_time))
        .layer(from_fn(request_id))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
