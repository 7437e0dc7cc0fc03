use async_graphql::{InputObject, SimpleObject, ID};

use crate::dto::{NameDto, OperationDto, PatientDto, PatientUpdateDto};
use crate::models::{Patient, Versicherungsart};

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Name")]
pub struct NameType {
    pub nachname: String,
    pub vorname: String,
}

/// Patient as seen by GraphQL clients. The id is not exposed.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Patient")]
pub struct PatientType {
    pub version: i64,
    pub versichertennummer: String,
    pub versicherungsart: Option<Versicherungsart>,
    /// ISO-8601 date.
    pub geburtsdatum: Option<String>,
    pub intensiv: bool,
    pub diagnose: Option<String>,
    pub name: NameType,
}

impl From<Patient> for PatientType {
    fn from(patient: Patient) -> Self {
        Self {
            version: patient.version,
            versichertennummer: patient.versichertennummer,
            versicherungsart: patient.versicherungsart,
            geburtsdatum: patient
                .geburtsdatum
                .map(|date| date.format("%Y-%m-%d").to_string()),
            intensiv: patient.intensiv,
            diagnose: patient.diagnose,
            name: NameType {
                nachname: patient.name.nachname,
                vorname: patient.name.vorname,
            },
        }
    }
}

#[derive(Debug, Clone, InputObject)]
pub struct NameInput {
    pub nachname: String,
    pub vorname: String,
}

#[derive(Debug, Clone, InputObject)]
pub struct OperationInput {
    pub eingriff: String,
    pub behandlungsraum: Option<i64>,
}

#[derive(Debug, Clone, InputObject)]
pub struct PatientInput {
    pub versichertennummer: String,
    pub versicherungsart: Option<Versicherungsart>,
    pub geburtsdatum: Option<String>,
    pub intensiv: Option<bool>,
    pub diagnose: Option<String>,
    pub name: NameInput,
    pub operationen: Option<Vec<OperationInput>>,
}

#[derive(Debug, Clone, InputObject)]
pub struct PatientUpdateInput {
    pub id: ID,
    pub version: i64,
    pub versichertennummer: String,
    pub versicherungsart: Option<Versicherungsart>,
    pub geburtsdatum: Option<String>,
    pub intensiv: Option<bool>,
    pub diagnose: Option<String>,
}

impl From<PatientInput> for PatientDto {
    fn from(input: PatientInput) -> Self {
        Self {
            versichertennummer: Some(input.versichertennummer),
            versicherungsart: input.versicherungsart.map(|art| art.as_str().to_string()),
            geburtsdatum: input.geburtsdatum,
            intensiv: input.intensiv,
            diagnose: input.diagnose,
            name: Some(NameDto {
                nachname: Some(input.name.nachname),
                vorname: Some(input.name.vorname),
            }),
            operationen: input.operationen.map(|operationen| {
                operationen
                    .into_iter()
                    .map(|operation| OperationDto {
                        eingriff: Some(operation.eingriff),
                        behandlungsraum: operation.behandlungsraum,
                    })
                    .collect()
            }),
        }
    }
}

impl From<&PatientUpdateInput> for PatientUpdateDto {
    fn from(input: &PatientUpdateInput) -> Self {
        Self {
            versichertennummer: Some(input.versichertennummer.clone()),
            versicherungsart: input.versicherungsart.map(|art| art.as_str().to_string()),
            geburtsdatum: input.geburtsdatum.clone(),
            intensiv: input.intensiv,
            diagnose: input.diagnose.clone(),
        }
    }
}
