use async_graphql::{Context, Object, Result, ID};

use super::error::{bad_user_input_msg, internal};
use super::types::PatientType;
use crate::search::SearchCriteria;
use crate::services::{FindByIdParams, PatientReadService};
use crate::validation::parse_id;

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Patient with the given id.
    async fn patient(&self, ctx: &Context<'_>, id: ID) -> Result<Option<PatientType>> {
        tracing::debug!(id = %id.as_str(), "patient");
        let not_found = || bad_user_input_msg(format!("Es wurde kein Patient mit der ID {} gefunden.", id.as_str()));

        let Some(patient_id) = parse_id(&id) else {
            return Err(not_found());
        };

        let service = ctx.data::<PatientReadService>()?;
        match service
            .find_by_id(FindByIdParams::new(patient_id))
            .await
            .map_err(internal)?
        {
            Some(patient) => Ok(Some(patient.into())),
            None => Err(not_found()),
        }
    }

    /// Patients whose nachname contains the given text, or all patients.
    async fn patienten(
        &self,
        ctx: &Context<'_>,
        nachname: Option<String>,
    ) -> Result<Option<Vec<PatientType>>> {
        tracing::debug!(?nachname, "patienten");

        let criteria = nachname.map(|nachname| SearchCriteria::new().with("nachname", nachname));
        let service = ctx.data::<PatientReadService>()?;
        let patienten = service.find(criteria.as_ref()).await.map_err(internal)?;

        if patienten.is_empty() {
            return Err(bad_user_input_msg("Es wurden keine Patienten gefunden."));
        }
        Ok(Some(patienten.into_iter().map(PatientType::from).collect()))
    }
}
