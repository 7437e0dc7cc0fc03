use async_graphql::{Context, Object, Result, ID};

use super::error::{bad_user_input, bad_user_input_msg, forbidden, internal};
use super::types::{PatientInput, PatientUpdateInput};
use crate::auth::Principal;
use crate::dto::{PatientDto, PatientUpdateDto};
use crate::services::{
    validate_patient, validate_patient_update, CreateError, PatientWriteService, UpdateError,
    UpdateParams,
};
use crate::validation::parse_id;

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Creates a patient and returns its id.
    async fn create(&self, ctx: &Context<'_>, input: PatientInput) -> Result<Option<ID>> {
        let principal = require_writer(ctx)?;
        tracing::debug!(user = %principal.username, ?input, "create");

        let patient = validate_patient(&PatientDto::from(input))
            .map_err(|errors| bad_user_input(errors.to_string(), errors.0))?;

        let service = ctx.data::<PatientWriteService>()?;
        match service.create(patient).await.map_err(internal)? {
            Ok(id) => Ok(Some(ID::from(id.to_string()))),
            Err(CreateError::VersichertennummerExists { versichertennummer }) => Err(
                bad_user_input_msg(format!(
                    "Die Versichertennummer {} existiert bereits",
                    versichertennummer
                )),
            ),
        }
    }

    /// Updates a patient and returns the new version.
    async fn update(&self, ctx: &Context<'_>, input: PatientUpdateInput) -> Result<Option<i64>> {
        let principal = require_writer(ctx)?;
        tracing::debug!(user = %principal.username, ?input, "update");

        let patient = validate_patient_update(&PatientUpdateDto::from(&input))
            .map_err(|errors| bad_user_input(errors.to_string(), errors.0))?;

        let params = UpdateParams {
            id: parse_id(&input.id),
            patient,
            version: format!("\"{}\"", input.version),
        };

        let service = ctx.data::<PatientWriteService>()?;
        let message = match service.update(params).await.map_err(internal)? {
            Ok(version) => return Ok(Some(version)),
            Err(UpdateError::PatientNotExists { id }) => format!(
                "Es gibt keinen Patienten mit der ID {}",
                id.map_or_else(|| input.id.to_string(), |id| id.to_string())
            ),
            Err(UpdateError::VersionInvalid { .. }) => {
                format!("\"{}\" ist keine gueltige Versionsnummer", input.version)
            }
            Err(UpdateError::VersionOutdated { version, .. }) => {
                format!("Die Versionsnummer \"{}\" ist nicht mehr aktuell", version)
            }
            Err(UpdateError::VersichertennummerExists { versichertennummer }) => format!(
                "Die Versichertennummer {} existiert bereits",
                versichertennummer
            ),
        };
        Err(bad_user_input_msg(message))
    }
}

fn require_writer<'a>(ctx: &Context<'a>) -> Result<&'a Principal> {
    match ctx.data_opt::<Principal>() {
        Some(principal) if principal.is_writer() => Ok(principal),
        _ => Err(forbidden()),
    }
}
