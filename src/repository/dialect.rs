use std::fmt;

/// SQL flavour of the configured store. Everything dialect-specific in the
/// generated statements goes through here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    /// Derives the dialect from a connection URL scheme.
    pub fn from_url(url: &str) -> Option<Self> {
        let scheme = url.split(':').next()?;
        match scheme {
            "postgres" | "postgresql" => Some(Dialect::Postgres),
            "sqlite" => Some(Dialect::Sqlite),
            _ => None,
        }
    }

    /// Operator for case-insensitive partial matches. SQLite has no ILIKE;
    /// its LIKE folds ASCII case only.
    pub fn like_operator(self) -> &'static str {
        match self {
            Dialect::Postgres => "ILIKE",
            Dialect::Sqlite => "LIKE",
        }
    }

    /// Numbered placeholder, understood by both Postgres and SQLite.
    pub fn placeholder(self, index: usize) -> String {
        format!("${}", index)
    }

    /// Placeholder for a date bound as ISO-8601 text. Postgres needs an explicit
    /// cast, SQLite stores dates as text anyway.
    pub fn date_placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("CAST(${} AS DATE)", index),
            Dialect::Sqlite => self.placeholder(index),
        }
    }

    /// Same as [`Dialect::date_placeholder`] for `erzeugt`/`aktualisiert`.
    pub fn timestamp_placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("CAST(${} AS TIMESTAMP)", index),
            Dialect::Sqlite => self.placeholder(index),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Postgres => f.write_str("postgres"),
            Dialect::Sqlite => f.write_str("sqlite"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_url() {
        assert_eq!(
            Dialect::from_url("postgres://patient:p@localhost/patient"),
            Some(Dialect::Postgres)
        );
        assert_eq!(
            Dialect::from_url("postgresql://localhost/patient"),
            Some(Dialect::Postgres)
        );
        assert_eq!(Dialect::from_url("sqlite::memory:"), Some(Dialect::Sqlite));
        assert_eq!(Dialect::from_url("sqlite://patient.db"), Some(Dialect::Sqlite));
        assert_eq!(Dialect::from_url("mysql://localhost/patient"), None);
        assert_eq!(Dialect::from_url(""), None);
    }

    #[test]
    fn test_like_operator() {
        assert_eq!(Dialect::Postgres.like_operator(), "ILIKE");
        assert_eq!(Dialect::Sqlite.like_operator(), "LIKE");
    }

    #[test]
    fn test_date_placeholder() {
        assert_eq!(Dialect::Postgres.date_placeholder(3), "CAST($3 AS DATE)");
        assert_eq!(Dialect::Sqlite.date_placeholder(3), "$3");
        assert_eq!(Dialect::Postgres.timestamp_placeholder(1), "CAST($1 AS TIMESTAMP)");
        assert_eq!(Dialect::Sqlite.timestamp_placeholder(1), "$1");
    }
}
