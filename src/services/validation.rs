use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::dto::{NameDto, OperationDto, PatientDto, PatientUpdateDto};
use crate::models::{Name, NewPatient, Operation, PatientUpdate, Versicherungsart};

static VERSICHERTENNUMMER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][0-9]{9}$").expect("valid versichertennummer regex"));
static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));
static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w.*").expect("valid name regex"));

const DIAGNOSE_MAX_LEN: usize = 40;
const NAME_MAX_LEN: usize = 32;
const EINGRIFF_MAX_LEN: usize = 64;

/// Field-level problems of an inbound DTO. Each message starts with the path
/// of the offending field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid input: {}", .0.join(", "))]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    pub fn messages(&self) -> &[String] {
        &self.0
    }
}

/// Validates a create payload and converts it into a [`NewPatient`].
pub fn validate_patient(dto: &PatientDto) -> Result<NewPatient, ValidationErrors> {
    let mut errors = Vec::new();

    let scalars = validate_scalars(
        Scalars {
            versichertennummer: dto.versichertennummer.as_deref(),
            versicherungsart: dto.versicherungsart.as_deref(),
            geburtsdatum: dto.geburtsdatum.as_deref(),
            intensiv: dto.intensiv,
            diagnose: dto.diagnose.as_deref(),
        },
        &mut errors,
    );

    let name = match &dto.name {
        Some(name) => validate_name(name, &mut errors),
        None => {
            errors.push("name should not be empty".to_string());
            None
        }
    };

    let operationen: Vec<Operation> = dto
        .operationen
        .iter()
        .flatten()
        .enumerate()
        .filter_map(|(index, operation)| validate_operation(index, operation, &mut errors))
        .collect();

    match (scalars, name) {
        (Some(update), Some(name)) if errors.is_empty() => Ok(NewPatient {
            versichertennummer: update.versichertennummer,
            versicherungsart: update.versicherungsart,
            geburtsdatum: update.geburtsdatum,
            intensiv: update.intensiv,
            diagnose: update.diagnose,
            name,
            operationen,
        }),
        _ => Err(ValidationErrors(errors)),
    }
}

/// Validates an update payload.
pub fn validate_patient_update(dto: &PatientUpdateDto) -> Result<PatientUpdate, ValidationErrors> {
    let mut errors = Vec::new();
    let scalars = validate_scalars(
        Scalars {
            versichertennummer: dto.versichertennummer.as_deref(),
            versicherungsart: dto.versicherungsart.as_deref(),
            geburtsdatum: dto.geburtsdatum.as_deref(),
            intensiv: dto.intensiv,
            diagnose: dto.diagnose.as_deref(),
        },
        &mut errors,
    );

    match scalars {
        Some(update) if errors.is_empty() => Ok(update),
        _ => Err(ValidationErrors(errors)),
    }
}

struct Scalars<'a> {
    versichertennummer: Option<&'a str>,
    versicherungsart: Option<&'a str>,
    geburtsdatum: Option<&'a str>,
    intensiv: Option<bool>,
    diagnose: Option<&'a str>,
}

fn validate_scalars(input: Scalars<'_>, errors: &mut Vec<String>) -> Option<PatientUpdate> {
    let versichertennummer = match input.versichertennummer {
        Some(value) if VERSICHERTENNUMMER_RE.is_match(value) => Some(value.to_string()),
        Some(_) => {
            errors.push(format!(
                "versichertennummer must match {} regular expression",
                VERSICHERTENNUMMER_RE.as_str()
            ));
            None
        }
        None => {
            errors.push("versichertennummer should not be empty".to_string());
            None
        }
    };

    let versicherungsart = match input.versicherungsart {
        None => None,
        Some(value) => match value.parse::<Versicherungsart>() {
            Ok(art) => Some(art),
            Err(_) => {
                errors.push(
                    "versicherungsart must match /^GESETZLICH$|^PRIVAT$/u regular expression"
                        .to_string(),
                );
                None
            }
        },
    };

    let geburtsdatum = match input.geburtsdatum {
        None => None,
        Some(value) => {
            let parsed = ISO_DATE_RE
                .is_match(value)
                .then(|| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok())
                .flatten();
            if parsed.is_none() {
                errors.push("geburtsdatum must be a valid ISO 8601 date string".to_string());
            }
            parsed
        }
    };

    if input.intensiv.is_none() {
        errors.push("intensiv must be a boolean value".to_string());
    }

    if let Some(diagnose) = input.diagnose {
        check_max_len("diagnose", diagnose, DIAGNOSE_MAX_LEN, errors);
    }

    Some(PatientUpdate {
        versichertennummer: versichertennummer?,
        versicherungsart,
        geburtsdatum,
        intensiv: input.intensiv?,
        diagnose: input.diagnose.map(str::to_string),
    })
}

fn validate_name(dto: &NameDto, errors: &mut Vec<String>) -> Option<Name> {
    let nachname = validate_name_part("name.nachname", dto.nachname.as_deref(), errors);
    let vorname = validate_name_part("name.vorname", dto.vorname.as_deref(), errors);
    Some(Name::new(nachname?, vorname?))
}

fn validate_name_part(path: &str, value: Option<&str>, errors: &mut Vec<String>) -> Option<String> {
    let Some(value) = value else {
        errors.push(format!("{} should not be empty", path));
        return None;
    };
    let before = errors.len();
    if !NAME_RE.is_match(value) {
        errors.push(format!("{} must match {} regular expression", path, NAME_RE.as_str()));
    }
    check_max_len(path, value, NAME_MAX_LEN, errors);
    (errors.len() == before).then(|| value.to_string())
}

fn validate_operation(
    index: usize,
    dto: &OperationDto,
    errors: &mut Vec<String>,
) -> Option<Operation> {
    let before = errors.len();

    let eingriff_path = format!("operationen[{}].eingriff", index);
    match dto.eingriff.as_deref() {
        Some(eingriff) if !eingriff.is_empty() => {
            check_max_len(&eingriff_path, eingriff, EINGRIFF_MAX_LEN, errors)
        }
        _ => errors.push(format!("{} should not be empty", eingriff_path)),
    }

    if let Some(raum) = dto.behandlungsraum {
        if raum < 0 {
            errors.push(format!(
                "operationen[{}].behandlungsraum must not be less than 0",
                index
            ));
        }
    }

    if errors.len() != before {
        return None;
    }
    let eingriff = dto.eingriff.clone()?;
    Some(Operation::new(eingriff, dto.behandlungsraum))
}

fn check_max_len(path: &str, value: &str, max: usize, errors: &mut Vec<String>) {
    if value.chars().count() > max {
        errors.push(format!(
            "{} must be shorter than or equal to {} characters",
            path, max
        ));
    }
}
