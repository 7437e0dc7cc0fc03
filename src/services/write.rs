use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::errors::{CreateError, UpdateError};
use super::read::{FindByIdParams, PatientReadService};
use crate::error::Result;
use crate::models::{NewPatient, PatientUpdate};
use crate::repository::PatientRepository;
use crate::search::SearchCriteria;

/// A version travels as a quoted integer, e.g. `"3"`.
static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"(\d+)"$"#).expect("valid version regex"));

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateParams {
    /// `None` when the caller could not supply a usable id.
    pub id: Option<i64>,
    pub patient: PatientUpdate,
    pub version: String,
}

/// Creates and updates patients. Conflicts are returned as values in the
/// inner `Result`; only infrastructure failures use the outer one.
#[derive(Clone)]
pub struct PatientWriteService {
    repository: Arc<PatientRepository>,
    read_service: PatientReadService,
}

impl PatientWriteService {
    pub fn new(repository: Arc<PatientRepository>, read_service: PatientReadService) -> Self {
        Self {
            repository,
            read_service,
        }
    }

    /// Stores a new patient with name and operations; returns its id.
    pub async fn create(&self, patient: NewPatient) -> Result<std::result::Result<i64, CreateError>> {
        tracing::debug!(?patient, "create");

        let versichertennummer = patient.versichertennummer.clone();
        let criteria = SearchCriteria::new().with("versichertennummer", versichertennummer.clone());
        if !self.read_service.find(Some(&criteria)).await?.is_empty() {
            tracing::debug!(%versichertennummer, "create: versichertennummer exists");
            return Ok(Err(CreateError::VersichertennummerExists { versichertennummer }));
        }

        match self.repository.insert(&patient).await {
            Ok(id) => {
                tracing::debug!(id, "create");
                Ok(Ok(id))
            }
            Err(err) if err.is_unique_violation() => {
                tracing::debug!(%versichertennummer, "create: lost race on versichertennummer");
                Ok(Err(CreateError::VersichertennummerExists { versichertennummer }))
            }
            Err(err) => Err(err),
        }
    }

    /// Applies an update if `version` is not older than the stored one;
    /// returns the new version.
    pub async fn update(&self, params: UpdateParams) -> Result<std::result::Result<i64, UpdateError>> {
        let UpdateParams { id, patient, version } = params;
        tracing::debug!(?id, ?patient, %version, "update");

        let Some(id) = id else {
            tracing::debug!("update: no id");
            return Ok(Err(UpdateError::PatientNotExists { id: None }));
        };

        let Some(version) = parse_version(&version) else {
            tracing::debug!(%version, "update: version invalid");
            return Ok(Err(UpdateError::VersionInvalid { version }));
        };

        let Some(mut stored) = self.read_service.find_by_id(FindByIdParams::new(id)).await? else {
            tracing::debug!(id, "update: patient not found");
            return Ok(Err(UpdateError::PatientNotExists { id: Some(id) }));
        };

        // Only an older version is rejected; a newer one is accepted.
        if version < stored.version {
            tracing::debug!(id, version, stored = stored.version, "update: version outdated");
            return Ok(Err(UpdateError::VersionOutdated { id, version }));
        }

        let stored_version = stored.version;
        let versichertennummer = patient.versichertennummer.clone();
        stored.merge(patient);

        match self.repository.update(id, stored_version, &stored).await {
            Ok(Some(new_version)) => {
                tracing::debug!(id, new_version, "update");
                Ok(Ok(new_version))
            }
            // Someone else saved between our read and our write.
            Ok(None) => Ok(Err(UpdateError::VersionOutdated { id, version })),
            Err(err) if err.is_unique_violation() => {
                Ok(Err(UpdateError::VersichertennummerExists { versichertennummer }))
            }
            Err(err) => Err(err),
        }
    }
}

/// `"3"` becomes `3`; anything else is not a version.
pub fn parse_version(raw: &str) -> Option<i64> {
    VERSION_RE
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}
