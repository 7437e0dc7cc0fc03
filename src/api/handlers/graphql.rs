use async_graphql::http::GraphiQLSource;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};

use crate::api::state::AppState;
use crate::auth::MaybePrincipal;
use crate::graphql::PatientSchema;

/// POST /graphql
pub async fn graphql(
    State(schema): State<PatientSchema>,
    MaybePrincipal(principal): MaybePrincipal,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    let request = match principal {
        Some(principal) => request.data(principal),
        None => request,
    };
    Json(schema.execute(request).await)
}

/// GET /graphql: the GraphiQL IDE, unless disabled by configuration.
pub async fn graphiql(State(state): State<AppState>) -> Response {
    if !state.graphql_playground {
        return StatusCode::NOT_FOUND.into_response();
    }
    Html(GraphiQLSource::build().endpoint("/graphql").finish()).into_response()
}
