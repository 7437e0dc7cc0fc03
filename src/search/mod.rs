use chrono::{NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, HashMap};

use crate::models::Versicherungsart;
use crate::repository::SqlArg;

/// Fields a patient search may filter on. This is the complete allow-list:
/// any other criteria key is rejected by the read service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    Id,
    Version,
    Versichertennummer,
    Versicherungsart,
    Geburtsdatum,
    Intensiv,
    Diagnose,
    Erzeugt,
    Aktualisiert,
    Nachname,
}

impl SearchField {
    pub const ALL: [SearchField; 10] = [
        SearchField::Id,
        SearchField::Version,
        SearchField::Versichertennummer,
        SearchField::Versicherungsart,
        SearchField::Geburtsdatum,
        SearchField::Intensiv,
        SearchField::Diagnose,
        SearchField::Erzeugt,
        SearchField::Aktualisiert,
        SearchField::Nachname,
    ];

    /// Case-sensitive lookup of a criteria key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    pub fn key(self) -> &'static str {
        match self {
            SearchField::Id => "id",
            SearchField::Version => "version",
            SearchField::Versichertennummer => "versichertennummer",
            SearchField::Versicherungsart => "versicherungsart",
            SearchField::Geburtsdatum => "geburtsdatum",
            SearchField::Intensiv => "intensiv",
            SearchField::Diagnose => "diagnose",
            SearchField::Erzeugt => "erzeugt",
            SearchField::Aktualisiert => "aktualisiert",
            SearchField::Nachname => "nachname",
        }
    }

    /// Converts the raw (query string) value into a typed bind argument.
    /// `None` means the value can never match a stored patient.
    pub fn parse_value(self, raw: &str) -> Option<SqlArg> {
        match self {
            SearchField::Id | SearchField::Version => raw.trim().parse().ok().map(SqlArg::Int),
            SearchField::Intensiv => match raw.trim() {
                "true" => Some(SqlArg::Bool(true)),
                "false" => Some(SqlArg::Bool(false)),
                _ => None,
            },
            SearchField::Geburtsdatum => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .ok()
                .map(SqlArg::Date),
            SearchField::Erzeugt | SearchField::Aktualisiert => {
                parse_timestamp(raw.trim()).map(SqlArg::Timestamp)
            }
            SearchField::Versicherungsart => raw
                .parse::<Versicherungsart>()
                .ok()
                .map(|art| SqlArg::Text(art.as_str().to_string())),
            SearchField::Versichertennummer | SearchField::Diagnose | SearchField::Nachname => {
                Some(SqlArg::Text(raw.to_string()))
            }
        }
    }
}

/// Accepts both `2024-03-01 08:15:00` and `2024-03-01T08:15:00`, with or
/// without fractional seconds.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .into_iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

/// One typed filter, ready for the query builder.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    pub field: SearchField,
    pub value: SqlArg,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CriteriaRejection {
    #[error("unknown search criterion \"{0}\"")]
    UnknownKey(String),

    #[error("value \"{value}\" is not valid for search criterion \"{key}\"")]
    InvalidValue { key: String, value: String },
}

/// Raw search criteria as they arrive from a transport: key/value strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    entries: BTreeMap<String, String>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Every key must be on the allow-list and every value must fit its
    /// field's type; the first offending entry is reported.
    pub fn to_criteria(&self) -> Result<Vec<Criterion>, CriteriaRejection> {
        self.entries
            .iter()
            .map(|(key, raw)| {
                let field = SearchField::from_key(key)
                    .ok_or_else(|| CriteriaRejection::UnknownKey(key.clone()))?;
                let value = field
                    .parse_value(raw)
                    .ok_or_else(|| CriteriaRejection::InvalidValue {
                        key: key.clone(),
                        value: raw.clone(),
                    })?;
                Ok(Criterion { field, value })
            })
            .collect()
    }
}

impl From<HashMap<String, String>> for SearchCriteria {
    fn from(params: HashMap<String, String>) -> Self {
        Self {
            entries: params.into_iter().collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SearchCriteria {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
