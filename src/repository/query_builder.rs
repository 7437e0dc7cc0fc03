use chrono::{NaiveDate, NaiveDateTime};

use super::dialect::Dialect;
use crate::models::{Entity, Name, Operation, Patient};
use crate::search::{Criterion, SearchField};

/// A value bound to a placeholder of a built query.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlArg {
    Int(i64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
}

/// A parameterized SELECT over patient and name (and optionally operation).
/// Building it has no side effects; the repository executes it.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientQuery {
    sql: String,
    args: Vec<SqlArg>,
    with_operations: bool,
}

impl PatientQuery {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[SqlArg] {
        &self.args
    }

    /// Whether the result rows carry operation columns (one row per operation).
    pub fn with_operations(&self) -> bool {
        self.with_operations
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildIdParams {
    pub id: i64,
    pub with_operations: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder {
    dialect: Dialect,
}

impl QueryBuilder {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Patient by id, always with its name, optionally with its operations.
    pub fn build_id(&self, params: BuildIdParams) -> PatientQuery {
        let mut writer = SqlWriter::select(self.dialect, params.with_operations);
        writer.filter(&column(Patient::TABLE_NAME, "id"), "=", SqlArg::Int(params.id));
        writer.finish()
    }

    /// Patients matching all criteria. `nachname` is a case-insensitive
    /// substring match, every other criterion an equality.
    pub fn build(&self, criteria: &[Criterion]) -> PatientQuery {
        tracing::debug!(?criteria, "build");

        let mut writer = SqlWriter::select(self.dialect, false);

        let (nachname, rest): (Vec<&Criterion>, Vec<&Criterion>) = criteria
            .iter()
            .partition(|criterion| criterion.field == SearchField::Nachname);

        if let Some(SqlArg::Text(value)) = nachname.first().map(|criterion| &criterion.value) {
            writer.filter(
                &column(Name::TABLE_NAME, "nachname"),
                self.dialect.like_operator(),
                SqlArg::Text(format!("%{}%", value)),
            );
        }

        for criterion in rest {
            writer.filter(&field_column(criterion.field), "=", criterion.value.clone());
        }

        let query = writer.finish();
        tracing::debug!(sql = %query.sql, "build");
        query
    }
}

fn column(table: &str, name: &str) -> String {
    format!("{}.{}", table, name)
}

fn field_column(field: SearchField) -> String {
    match field {
        SearchField::Nachname => column(Name::TABLE_NAME, "nachname"),
        other => column(Patient::TABLE_NAME, other.key()),
    }
}

struct SqlWriter {
    dialect: Dialect,
    sql: String,
    args: Vec<SqlArg>,
    has_where: bool,
    with_operations: bool,
}

impl SqlWriter {
    fn select(dialect: Dialect, with_operations: bool) -> Self {
        let p = Patient::TABLE_NAME;
        let n = Name::TABLE_NAME;
        let o = Operation::TABLE_NAME;

        let mut sql = format!(
            "SELECT {p}.id AS patient_id, {p}.version AS version, \
             {p}.versichertennummer AS versichertennummer, \
             {p}.versicherungsart AS versicherungsart, \
             CAST({p}.geburtsdatum AS TEXT) AS geburtsdatum, \
             CAST(CASE WHEN {p}.intensiv THEN 1 ELSE 0 END AS BIGINT) AS intensiv, \
             {p}.diagnose AS diagnose, \
             CAST({p}.erzeugt AS TEXT) AS erzeugt, \
             CAST({p}.aktualisiert AS TEXT) AS aktualisiert, \
             {n}.nachname AS nachname, {n}.vorname AS vorname"
        );
        if with_operations {
            sql.push_str(&format!(
                ", {o}.id AS operation_id, {o}.eingriff AS eingriff, \
                 {o}.behandlungsraum AS behandlungsraum"
            ));
        }
        sql.push_str(&format!(
            " FROM {p} INNER JOIN {n} ON {n}.patient_id = {p}.id"
        ));
        if with_operations {
            sql.push_str(&format!(
                " LEFT JOIN {o} ON {o}.patient_id = {p}.id"
            ));
        }

        Self {
            dialect,
            sql,
            args: Vec::new(),
            has_where: false,
            with_operations,
        }
    }

    /// First filter opens the WHERE clause, later ones are AND-ed.
    fn filter(&mut self, lhs: &str, operator: &str, arg: SqlArg) {
        self.sql.push_str(if self.has_where { " AND " } else { " WHERE " });
        self.has_where = true;

        let placeholder = self.push_bind(arg);
        self.sql
            .push_str(&format!("{} {} {}", lhs, operator, placeholder));
    }

    fn push_bind(&mut self, arg: SqlArg) -> String {
        let index = self.args.len() + 1;
        let placeholder = match &arg {
            SqlArg::Date(_) => self.dialect.date_placeholder(index),
            SqlArg::Timestamp(_) => self.dialect.timestamp_placeholder(index),
            _ => self.dialect.placeholder(index),
        };
        self.args.push(arg);
        placeholder
    }

    fn finish(mut self) -> PatientQuery {
        self.sql
            .push_str(&format!(" ORDER BY {}", column(Patient::TABLE_NAME, "id")));
        if self.with_operations {
            self.sql
                .push_str(&format!(", {}", column(Operation::TABLE_NAME, "id")));
        }
        PatientQuery {
            sql: self.sql,
            args: self.args,
            with_operations: self.with_operations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criterion(field: SearchField, value: SqlArg) -> Criterion {
        Criterion { field, value }
    }

    #[test]
    fn test_build_id_joins_name_only() {
        let query = QueryBuilder::new(Dialect::Postgres).build_id(BuildIdParams {
            id: 7,
            with_operations: false,
        });

        assert!(query.sql().contains("FROM patient INNER JOIN name ON name.patient_id = patient.id"));
        assert!(!query.sql().contains("LEFT JOIN"));
        assert!(!query.sql().contains("operation_id"));
        assert!(query.sql().ends_with(" WHERE patient.id = $1 ORDER BY patient.id"));
        assert_eq!(query.args(), &[SqlArg::Int(7)]);
        assert!(!query.with_operations());
    }

    #[test]
    fn test_build_id_with_operations_left_joins() {
        let query = QueryBuilder::new(Dialect::Sqlite).build_id(BuildIdParams {
            id: 1,
            with_operations: true,
        });

        assert!(query
            .sql()
            .contains(" LEFT JOIN operation ON operation.patient_id = patient.id WHERE patient.id = $1"));
        assert!(query.sql().contains("operation.id AS operation_id"));
        assert!(query.sql().ends_with("ORDER BY patient.id, operation.id"));
        assert!(query.with_operations());
    }

    #[test]
    fn test_build_without_criteria_has_no_where() {
        let query = QueryBuilder::new(Dialect::Postgres).build(&[]);

        assert!(!query.sql().contains("WHERE"));
        assert!(query.sql().contains("INNER JOIN name"));
        assert!(query.args().is_empty());
    }

    #[test]
    fn test_build_nachname_uses_ilike_on_postgres() {
        let query = QueryBuilder::new(Dialect::Postgres).build(&[criterion(
            SearchField::Nachname,
            SqlArg::Text("abc".to_string()),
        )]);

        assert!(query.sql().contains(" WHERE name.nachname ILIKE $1"));
        assert_eq!(query.args(), &[SqlArg::Text("%abc%".to_string())]);
    }

    #[test]
    fn test_build_nachname_falls_back_to_like() {
        let query = QueryBuilder::new(Dialect::Sqlite).build(&[criterion(
            SearchField::Nachname,
            SqlArg::Text("abc".to_string()),
        )]);

        assert!(query.sql().contains(" WHERE name.nachname LIKE $1"));
        assert!(!query.sql().contains("ILIKE"));
    }

    #[test]
    fn test_build_nachname_first_then_equalities() {
        let query = QueryBuilder::new(Dialect::Postgres).build(&[
            criterion(SearchField::Intensiv, SqlArg::Bool(true)),
            criterion(SearchField::Nachname, SqlArg::Text("Al".to_string())),
            criterion(
                SearchField::Versicherungsart,
                SqlArg::Text("PRIVAT".to_string()),
            ),
        ]);

        assert!(query.sql().contains(
            " WHERE name.nachname ILIKE $1 AND patient.intensiv = $2 AND patient.versicherungsart = $3"
        ));
        assert_eq!(
            query.args(),
            &[
                SqlArg::Text("%Al%".to_string()),
                SqlArg::Bool(true),
                SqlArg::Text("PRIVAT".to_string()),
            ]
        );
    }

    #[test]
    fn test_build_equality_only_starts_with_where() {
        let query = QueryBuilder::new(Dialect::Sqlite).build(&[criterion(
            SearchField::Versichertennummer,
            SqlArg::Text("A123456789".to_string()),
        )]);

        assert!(query.sql().contains(" WHERE patient.versichertennummer = $1 ORDER BY"));
        assert_eq!(query.sql().matches("WHERE").count(), 1);
    }

    #[test]
    fn test_build_date_is_cast_on_postgres() {
        let date = NaiveDate::from_ymd_opt(2022, 2, 28).unwrap();
        let postgres = QueryBuilder::new(Dialect::Postgres)
            .build(&[criterion(SearchField::Geburtsdatum, SqlArg::Date(date))]);
        let sqlite = QueryBuilder::new(Dialect::Sqlite)
            .build(&[criterion(SearchField::Geburtsdatum, SqlArg::Date(date))]);

        assert!(postgres
            .sql()
            .contains("WHERE patient.geburtsdatum = CAST($1 AS DATE)"));
        assert!(sqlite.sql().contains("WHERE patient.geburtsdatum = $1"));
    }

    #[test]
    fn test_build_timestamp_is_cast_on_postgres() {
        let erzeugt = NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|date| date.and_hms_opt(8, 15, 0))
            .unwrap();
        let query = QueryBuilder::new(Dialect::Postgres).build(&[
            criterion(SearchField::Version, SqlArg::Int(0)),
            criterion(SearchField::Erzeugt, SqlArg::Timestamp(erzeugt)),
        ]);

        assert!(query.sql().contains(
            "WHERE patient.version = $1 AND patient.erzeugt = CAST($2 AS TIMESTAMP)"
        ));
    }
}
