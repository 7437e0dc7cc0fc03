use axum::{
    extract::{Path, Query, State},
    http::{
        header::{ETAG, IF_NONE_MATCH},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use std::collections::HashMap;

use crate::api::content_negotiation::accepts_json_or_html;
use crate::api::hal::{base_uri, PatientModel, PatientenModel};
use crate::error::Result;
use crate::search::SearchCriteria;
use crate::services::{FindByIdParams, PatientReadService};
use crate::validation::parse_id;

/// GET /rest/:id
pub async fn find_by_id(
    State(service): State<PatientReadService>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    tracing::debug!(%id, "find_by_id");

    if !accepts_json_or_html(&headers) {
        return Ok(StatusCode::NOT_ACCEPTABLE.into_response());
    }

    let Some(id) = parse_id(&id) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let Some(patient) = service.find_by_id(FindByIdParams::new(id)).await? else {
        tracing::debug!(id, "find_by_id: NOT_FOUND");
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let etag = format!("\"{}\"", patient.version);
    let if_none_match = headers
        .get(IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok());
    if if_none_match == Some(etag.as_str()) {
        tracing::debug!(id, "find_by_id: NOT_MODIFIED");
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let model = PatientModel::detail(&patient, &base_uri(&headers));
    let mut response_headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&etag) {
        response_headers.insert(ETAG, value);
    }

    Ok((StatusCode::OK, response_headers, Json(model)).into_response())
}

/// GET /rest?criteria
pub async fn find(
    State(service): State<PatientReadService>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response> {
    tracing::debug!(?params, "find");

    if !accepts_json_or_html(&headers) {
        return Ok(StatusCode::NOT_ACCEPTABLE.into_response());
    }

    let criteria = SearchCriteria::from(params);
    let patienten = service.find(Some(&criteria)).await?;
    if patienten.is_empty() {
        tracing::debug!("find: NOT_FOUND");
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let model = PatientenModel::new(&patienten, &base_uri(&headers));
    Ok((StatusCode::OK, Json(model)).into_response())
}
