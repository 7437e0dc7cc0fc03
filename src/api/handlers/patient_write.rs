use axum::{
    extract::{Path, State},
    http::{
        header::{CONTENT_TYPE, ETAG, IF_MATCH, LOCATION},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::api::hal::base_uri;
use crate::auth::Writer;
use crate::dto::{PatientDto, PatientUpdateDto};
use crate::error::Result;
use crate::extractors::AppJson;
use crate::services::{
    validate_patient, validate_patient_update, CreateError, PatientWriteService, UpdateError,
    UpdateParams, ValidationErrors,
};
use crate::validation::parse_id;

/// POST /rest
pub async fn create(
    State(service): State<PatientWriteService>,
    Writer(principal): Writer,
    headers: HeaderMap,
    AppJson(dto): AppJson<PatientDto>,
) -> Result<Response> {
    tracing::debug!(user = %principal.username, ?dto, "create");

    let patient = match validate_patient(&dto) {
        Ok(patient) => patient,
        Err(errors) => return Ok(unprocessable(errors)),
    };

    match service.create(patient).await? {
        Ok(id) => {
            let location = format!("{}/{}", base_uri(&headers), id);
            let mut response_headers = HeaderMap::new();
            if let Ok(value) = HeaderValue::from_str(&location) {
                response_headers.insert(LOCATION, value);
            }
            Ok((StatusCode::CREATED, response_headers).into_response())
        }
        Err(CreateError::VersichertennummerExists { versichertennummer }) => Ok(text(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!(
                "Die Versichertennummer \"{}\" existiert bereits.",
                versichertennummer
            ),
        )),
    }
}

/// PUT /rest/:id, guarded by `If-Match: "<version>"`.
pub async fn update(
    State(service): State<PatientWriteService>,
    Writer(principal): Writer,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
    AppJson(dto): AppJson<PatientUpdateDto>,
) -> Result<Response> {
    tracing::debug!(user = %principal.username, id = %raw_id, ?dto, "update");

    let patient = match validate_patient_update(&dto) {
        Ok(patient) => patient,
        Err(errors) => return Ok(unprocessable(errors)),
    };

    let Some(version) = headers.get(IF_MATCH).and_then(|value| value.to_str().ok()) else {
        tracing::debug!("update: If-Match missing");
        return Ok(text(
            StatusCode::PRECONDITION_REQUIRED,
            "Header \"If-Match\" fehlt".to_string(),
        ));
    };

    let params = UpdateParams {
        id: parse_id(&raw_id),
        patient,
        version: version.to_string(),
    };

    let message = match service.update(params).await? {
        Ok(new_version) => {
            let mut response_headers = HeaderMap::new();
            if let Ok(value) = HeaderValue::from_str(&format!("\"{}\"", new_version)) {
                response_headers.insert(ETAG, value);
            }
            return Ok((StatusCode::NO_CONTENT, response_headers).into_response());
        }
        Err(UpdateError::VersichertennummerExists { versichertennummer }) => {
            return Ok(text(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!(
                    "Die Versichertennummer \"{}\" existiert bereits.",
                    versichertennummer
                ),
            ));
        }
        Err(UpdateError::PatientNotExists { id }) => {
            let id = id.map_or(raw_id, |id| id.to_string());
            format!("Es gibt kein Patient mit der ID \"{}\".", id)
        }
        Err(UpdateError::VersionInvalid { version }) => {
            format!("Die Versionsnummer \"{}\" ist ungueltig.", version)
        }
        Err(UpdateError::VersionOutdated { version, .. }) => {
            format!("Die Versionsnummer \"{}\" ist nicht aktuell.", version)
        }
    };

    tracing::debug!(%message, "update: PRECONDITION_FAILED");
    Ok(text(StatusCode::PRECONDITION_FAILED, message))
}

fn text(status: StatusCode, message: String) -> Response {
    (status, [(CONTENT_TYPE, "text/plain; charset=utf-8")], message).into_response()
}

fn unprocessable(errors: ValidationErrors) -> Response {
    tracing::debug!(%errors, "Validation failed");
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "statusCode": 422,
            "message": errors.messages(),
            "error": "Unprocessable Entity",
        })),
    )
        .into_response()
}
