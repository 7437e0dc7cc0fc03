//! Inbound shapes of a patient as they cross the transport boundary. Every
//! field is optional here; presence and format are checked by
//! [`crate::services::validation`] before anything reaches a service.

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NameDto {
    pub nachname: Option<String>,
    pub vorname: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OperationDto {
    pub eingriff: Option<String>,
    pub behandlungsraum: Option<i64>,
}

/// Payload of a create request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PatientDto {
    pub versichertennummer: Option<String>,
    pub versicherungsart: Option<String>,
    pub geburtsdatum: Option<String>,
    pub intensiv: Option<bool>,
    pub diagnose: Option<String>,
    pub name: Option<NameDto>,
    pub operationen: Option<Vec<OperationDto>>,
}

/// Payload of an update request. Name and operations cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PatientUpdateDto {
    pub versichertennummer: Option<String>,
    pub versicherungsart: Option<String>,
    pub geburtsdatum: Option<String>,
    pub intensiv: Option<bool>,
    pub diagnose: Option<String>,
}
