use std::sync::Arc;

use crate::error::Result;
use crate::models::Patient;
use crate::repository::{BuildIdParams, PatientRepository, QueryBuilder};
use crate::search::SearchCriteria;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindByIdParams {
    pub id: i64,
    /// Load the operations as well.
    pub with_operations: bool,
}

impl FindByIdParams {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            with_operations: false,
        }
    }
}

/// Read access to patients. Never writes.
#[derive(Clone)]
pub struct PatientReadService {
    query_builder: QueryBuilder,
    repository: Arc<PatientRepository>,
}

impl PatientReadService {
    pub fn new(repository: Arc<PatientRepository>) -> Self {
        Self {
            query_builder: QueryBuilder::new(repository.dialect()),
            repository,
        }
    }

    /// `Ok(None)` when there is no patient with that id.
    pub async fn find_by_id(&self, params: FindByIdParams) -> Result<Option<Patient>> {
        tracing::debug!(id = params.id, with_operations = params.with_operations, "find_by_id");

        let query = self.query_builder.build_id(BuildIdParams {
            id: params.id,
            with_operations: params.with_operations,
        });
        let patient = self.repository.fetch_one(&query).await?;

        tracing::debug!(found = patient.is_some(), "find_by_id");
        Ok(patient)
    }

    /// All patients matching every criterion, or all patients when there are
    /// none. Unknown keys and unconvertible values yield an empty result.
    pub async fn find(&self, criteria: Option<&SearchCriteria>) -> Result<Vec<Patient>> {
        tracing::debug!(?criteria, "find");

        let criteria = match criteria {
            Some(criteria) if !criteria.is_empty() => criteria,
            _ => return self.find_all().await,
        };

        let typed = match criteria.to_criteria() {
            Ok(typed) => typed,
            Err(rejection) => {
                tracing::warn!(%rejection, "find: criteria rejected");
                return Ok(Vec::new());
            }
        };

        let query = self.query_builder.build(&typed);
        let patienten = self.repository.fetch_all(&query).await?;
        tracing::debug!(count = patienten.len(), "find");
        Ok(patienten)
    }

    async fn find_all(&self) -> Result<Vec<Patient>> {
        let query = self.query_builder.build(&[]);
        let patienten = self.repository.fetch_all(&query).await?;
        tracing::debug!(count = patienten.len(), "find: all patients");
        Ok(patienten)
    }
}
