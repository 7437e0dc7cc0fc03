use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::any::{AnyArguments, AnyRow};
use sqlx::query::Query;
use sqlx::{Any, AnyPool, Row};

use super::dialect::Dialect;
use super::query_builder::{PatientQuery, SqlArg};
use crate::error::Result;
use crate::models::{Name, NewPatient, Operation, Patient, Versicherungsart};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Persistence of the patient aggregate (patient, name, operation tables).
pub struct PatientRepository {
    pool: AnyPool,
    dialect: Dialect,
}

impl PatientRepository {
    pub fn new(pool: AnyPool, dialect: Dialect) -> Self {
        Self { pool, dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Runs a query expected to match at most one patient.
    pub async fn fetch_one(&self, query: &PatientQuery) -> Result<Option<Patient>> {
        Ok(self.fetch_all(query).await?.into_iter().next())
    }

    /// Runs a query and folds the joined rows back into patients, keeping the
    /// row order of the query.
    pub async fn fetch_all(&self, query: &PatientQuery) -> Result<Vec<Patient>> {
        let rows = bind_all(sqlx::query(query.sql()), query.args())
            .fetch_all(&self.pool)
            .await?;

        let mut patients: Vec<Patient> = Vec::new();
        for row in &rows {
            let id: i64 = row.try_get("patient_id")?;
            let is_new = patients.last().map_or(true, |last| last.id != id);
            if is_new {
                let mut patient = patient_from_row(row)?;
                if query.with_operations() {
                    patient.operationen = Some(Vec::new());
                }
                patients.push(patient);
            }

            if query.with_operations() {
                if let Some(operation) = operation_from_row(row)? {
                    if let Some(operationen) = patients
                        .last_mut()
                        .and_then(|patient| patient.operationen.as_mut())
                    {
                        operationen.push(operation);
                    }
                }
            }
        }

        tracing::debug!(count = patients.len(), "Fetched patients");
        Ok(patients)
    }

    /// Stores a new patient with its name and operations in one transaction
    /// and returns the generated id. Version starts at 0.
    pub async fn insert(&self, patient: &NewPatient) -> Result<i64> {
        tracing::debug!(versichertennummer = %patient.versichertennummer, "Inserting patient");

        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO patient (version, versichertennummer, versicherungsart, geburtsdatum, intensiv, diagnose) \
             VALUES (0, $1, $2, {}, $4, $5) RETURNING id",
            self.dialect.date_placeholder(3)
        );
        let id: i64 = sqlx::query_scalar(&sql)
            .bind(patient.versichertennummer.clone())
            .bind(patient.versicherungsart.map(|art| art.as_str().to_string()))
            .bind(patient.geburtsdatum.map(format_date))
            .bind(patient.intensiv)
            .bind(patient.diagnose.clone())
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO name (nachname, vorname, patient_id) VALUES ($1, $2, $3)")
            .bind(patient.name.nachname.clone())
            .bind(patient.name.vorname.clone())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for operation in &patient.operationen {
            sqlx::query(
                "INSERT INTO operation (eingriff, behandlungsraum, patient_id) VALUES ($1, $2, $3)",
            )
            .bind(operation.eingriff.clone())
            .bind(operation.behandlungsraum)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(patient_id = id, operations = patient.operationen.len(), "Patient created");
        Ok(id)
    }

    /// Writes the scalar fields of `patient` if the stored version still
    /// equals `expected_version`. Returns the incremented version, or `None`
    /// when the row is gone or was changed in the meantime.
    pub async fn update(
        &self,
        id: i64,
        expected_version: i64,
        patient: &Patient,
    ) -> Result<Option<i64>> {
        let sql = format!(
            "UPDATE patient SET versichertennummer = $1, versicherungsart = $2, geburtsdatum = {}, \
             intensiv = $4, diagnose = $5, version = version + 1, aktualisiert = CURRENT_TIMESTAMP \
             WHERE id = $6 AND version = $7 RETURNING version",
            self.dialect.date_placeholder(3)
        );

        let new_version: Option<i64> = sqlx::query_scalar(&sql)
            .bind(patient.versichertennummer.clone())
            .bind(patient.versicherungsart.map(|art| art.as_str().to_string()))
            .bind(patient.geburtsdatum.map(format_date))
            .bind(patient.intensiv)
            .bind(patient.diagnose.clone())
            .bind(id)
            .bind(expected_version)
            .fetch_optional(&self.pool)
            .await?;

        match new_version {
            Some(version) => {
                tracing::info!(patient_id = id, old_version = expected_version, new_version = version, "Patient updated");
            }
            None => {
                tracing::warn!(patient_id = id, expected_version, "Patient row changed or vanished before update");
            }
        }
        Ok(new_version)
    }
}

fn bind_all<'q>(
    mut query: Query<'q, Any, AnyArguments<'q>>,
    args: &[SqlArg],
) -> Query<'q, Any, AnyArguments<'q>> {
    for arg in args {
        query = match arg {
            SqlArg::Int(value) => query.bind(*value),
            SqlArg::Text(value) => query.bind(value.clone()),
            SqlArg::Bool(value) => query.bind(*value),
            SqlArg::Date(value) => query.bind(format_date(*value)),
            SqlArg::Timestamp(value) => query.bind(format_timestamp(*value)),
        };
    }
    query
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// SQLite's `CURRENT_TIMESTAMP` has no fraction, so none is written for
/// whole seconds.
fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

fn patient_from_row(row: &AnyRow) -> Result<Patient> {
    let versicherungsart = row
        .try_get::<Option<String>, _>("versicherungsart")?
        .map(|art| art.parse::<Versicherungsart>())
        .transpose()
        .map_err(anyhow::Error::msg)?;

    let geburtsdatum = row
        .try_get::<Option<String>, _>("geburtsdatum")?
        .map(|raw| NaiveDate::parse_from_str(&raw, DATE_FORMAT))
        .transpose()
        .context("Stored geburtsdatum is not an ISO date")?;

    let intensiv: i64 = row.try_get("intensiv")?;

    Ok(Patient {
        id: row.try_get("patient_id")?,
        version: row.try_get("version")?,
        versichertennummer: row.try_get("versichertennummer")?,
        versicherungsart,
        geburtsdatum,
        intensiv: intensiv != 0,
        diagnose: row.try_get("diagnose")?,
        name: Name {
            nachname: row.try_get("nachname")?,
            vorname: row.try_get("vorname")?,
        },
        operationen: None,
        erzeugt: parse_timestamp(&row.try_get::<String, _>("erzeugt")?)?,
        aktualisiert: parse_timestamp(&row.try_get::<String, _>("aktualisiert")?)?,
    })
}

/// `None` for the all-NULL row a LEFT JOIN yields for a patient without
/// operations.
fn operation_from_row(row: &AnyRow) -> Result<Option<Operation>> {
    let Some(id) = row.try_get::<Option<i64>, _>("operation_id")? else {
        return Ok(None);
    };
    Ok(Some(Operation {
        id: Some(id),
        eingriff: row.try_get("eingriff")?,
        behandlungsraum: row.try_get("behandlungsraum")?,
    }))
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let parsed = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .with_context(|| format!("Stored timestamp \"{}\" has an unexpected format", raw))?;
    Ok(parsed)
}
