use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::name::Name;
use super::operation::Operation;
use super::traits::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, async_graphql::Enum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Versicherungsart {
    Gesetzlich,
    Privat,
}

impl Versicherungsart {
    pub fn as_str(&self) -> &'static str {
        match self {
            Versicherungsart::Gesetzlich => "GESETZLICH",
            Versicherungsart::Privat => "PRIVAT",
        }
    }
}

impl fmt::Display for Versicherungsart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Versicherungsart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GESETZLICH" => Ok(Versicherungsart::Gesetzlich),
            "PRIVAT" => Ok(Versicherungsart::Privat),
            other => Err(format!("Unknown Versicherungsart: {}", other)),
        }
    }
}

/// Aggregate root. Owns its [`Name`] and, when loaded, its operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub version: i64,
    pub versichertennummer: String,
    pub versicherungsart: Option<Versicherungsart>,
    pub geburtsdatum: Option<NaiveDate>,
    pub intensiv: bool,
    pub diagnose: Option<String>,
    pub name: Name,
    /// `None` when the operations were not requested from the store.
    pub operationen: Option<Vec<Operation>>,
    pub erzeugt: NaiveDateTime,
    pub aktualisiert: NaiveDateTime,
}

impl Patient {
    /// Copies the mutable fields of an update onto the loaded entity. Absent
    /// optional fields keep their stored value; name and operations are never
    /// touched.
    pub fn merge(&mut self, update: PatientUpdate) {
        self.versichertennummer = update.versichertennummer;
        if update.versicherungsart.is_some() {
            self.versicherungsart = update.versicherungsart;
        }
        if update.geburtsdatum.is_some() {
            self.geburtsdatum = update.geburtsdatum;
        }
        self.intensiv = update.intensiv;
        if update.diagnose.is_some() {
            self.diagnose = update.diagnose;
        }
    }
}

impl Entity for Patient {
    const TABLE_NAME: &'static str = "patient";
}

/// A patient that has not been persisted yet: no id, no version, no timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPatient {
    pub versichertennummer: String,
    pub versicherungsart: Option<Versicherungsart>,
    pub geburtsdatum: Option<NaiveDate>,
    pub intensiv: bool,
    pub diagnose: Option<String>,
    pub name: Name,
    pub operationen: Vec<Operation>,
}

/// The mutable part of a patient as accepted by an update.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientUpdate {
    pub versichertennummer: String,
    pub versicherungsart: Option<Versicherungsart>,
    pub geburtsdatum: Option<NaiveDate>,
    pub intensiv: bool,
    pub diagnose: Option<String>,
}
