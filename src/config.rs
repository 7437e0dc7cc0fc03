use std::env;

use crate::repository::Dialect;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub dialect: Dialect,
    pub server_host: String,
    pub server_port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub graphql_playground: bool,
}

impl Config {
    /// Reads the configuration once at startup. A `.env` file in the working
    /// directory is honoured but real environment variables take precedence.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://patient:p@localhost/patient".to_string());

        let dialect = Dialect::from_url(&database_url)
            .ok_or_else(|| format!("Unsupported DATABASE_URL scheme: {}", database_url))?;

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| format!("Invalid SERVER_PORT: {}", e))?;

        let jwt_secret = env::var("JWT_SECRET")
            .unwrap_or_else(|_| "patient-service-development-secret".to_string());

        let jwt_issuer =
            env::var("JWT_ISSUER").unwrap_or_else(|_| "https://hka.de/Gruppe7".to_string());

        let graphql_playground = match env::var("GRAPHQL_PLAYGROUND") {
            Ok(value) => parse_flag(&value)
                .ok_or_else(|| format!("Invalid GRAPHQL_PLAYGROUND: {}", value))?,
            Err(_) => true,
        };

        Ok(Config {
            database_url,
            dialect,
            server_host,
            server_port,
            jwt_secret,
            jwt_issuer,
            graphql_playground,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" YES "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("vielleicht"), None);
    }

    #[test]
    fn test_server_addr() {
        let config = Config {
            database_url: "sqlite::memory:".to_string(),
            dialect: Dialect::Sqlite,
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            jwt_secret: "secret".to_string(),
            jwt_issuer: "issuer".to_string(),
            graphql_playground: false,
        };
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
    }
}
