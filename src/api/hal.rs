//! HAL representation of patients for the REST interface.

use axum::http::{header::HOST, HeaderMap};
use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Patient, Versicherungsart};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
}

impl Link {
    fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: Link,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameModel {
    pub nachname: String,
    pub vorname: String,
}

/// A patient without id, version and timestamps, plus its links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientModel {
    pub versichertennummer: String,
    pub versicherungsart: Option<Versicherungsart>,
    pub intensiv: bool,
    pub geburtsdatum: Option<NaiveDate>,
    pub diagnose: Option<String>,
    pub name: NameModel,
    #[serde(rename = "_links")]
    pub links: Links,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientenModel {
    #[serde(rename = "_embedded")]
    pub embedded: Embedded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embedded {
    pub patienten: Vec<PatientModel>,
}

/// `{scheme}://{host}/rest`, honouring `X-Forwarded-Proto`.
pub fn base_uri(headers: &HeaderMap) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    format!("{}://{}/rest", scheme, host)
}

impl PatientModel {
    /// Detail representation with all links.
    pub fn detail(patient: &Patient, base_uri: &str) -> Self {
        let item = format!("{}/{}", base_uri, patient.id);
        Self::with_links(
            patient,
            Links {
                self_link: Link::new(item.clone()),
                list: Some(Link::new(base_uri)),
                add: Some(Link::new(base_uri)),
                update: Some(Link::new(item.clone())),
                remove: Some(Link::new(item)),
            },
        )
    }

    /// Collection entry: only the `self` link.
    pub fn summary(patient: &Patient, base_uri: &str) -> Self {
        Self::with_links(
            patient,
            Links {
                self_link: Link::new(format!("{}/{}", base_uri, patient.id)),
                list: None,
                add: None,
                update: None,
                remove: None,
            },
        )
    }

    fn with_links(patient: &Patient, links: Links) -> Self {
        Self {
            versichertennummer: patient.versichertennummer.clone(),
            versicherungsart: patient.versicherungsart,
            intensiv: patient.intensiv,
            geburtsdatum: patient.geburtsdatum,
            diagnose: patient.diagnose.clone(),
            name: NameModel {
                nachname: patient.name.nachname.clone(),
                vorname: patient.name.vorname.clone(),
            },
            links,
        }
    }
}

impl PatientenModel {
    pub fn new(patienten: &[Patient], base_uri: &str) -> Self {
        Self {
            embedded: Embedded {
                patienten: patienten
                    .iter()
                    .map(|patient| PatientModel::summary(patient, base_uri))
                    .collect(),
            },
        }
    }
}
