#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use tower::ServiceExt;

use patient_service::api::{app, AppState};
use patient_service::auth::Claims;
use patient_service::config::Config;
use patient_service::db;
use patient_service::models::{Name, NewPatient, Operation, Versicherungsart};
use patient_service::repository::Dialect;

pub const JWT_SECRET: &str = "test-secret";
pub const JWT_ISSUER: &str = "https://hka.de/Gruppe7";
pub const HOST: &str = "localhost:3000";

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        dialect: Dialect::Sqlite,
        server_host: "127.0.0.1".to_string(),
        server_port: 3000,
        jwt_secret: JWT_SECRET.to_string(),
        jwt_issuer: JWT_ISSUER.to_string(),
        graphql_playground: true,
    }
}

/// Fresh in-memory database with the schema applied. Every call gets its own
/// database.
pub async fn setup_state() -> AppState {
    let config = test_config();
    let pool = db::connect(&config.database_url, config.dialect)
        .await
        .expect("Failed to open in-memory database");
    db::run_migrations(&pool, config.dialect)
        .await
        .expect("Failed to run migrations");
    AppState::new(pool, &config)
}

pub async fn setup_app() -> (AppState, Router) {
    let state = setup_state().await;
    let router = app(state.clone());
    (state, router)
}

/// Bearer token signed with the test secret.
pub fn token(roles: &[&str]) -> String {
    let claims = Claims {
        sub: "admin".to_string(),
        roles: roles.iter().map(|role| role.to_string()).collect(),
        iss: JWT_ISSUER.to_string(),
        exp: chrono::Utc::now().timestamp() + 3600,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("Failed to sign token")
}

pub fn bearer(roles: &[&str]) -> String {
    format!("Bearer {}", token(roles))
}

pub fn new_patient(versichertennummer: &str, nachname: &str) -> NewPatient {
    NewPatient {
        versichertennummer: versichertennummer.to_string(),
        versicherungsart: Some(Versicherungsart::Gesetzlich),
        geburtsdatum: chrono::NaiveDate::from_ymd_opt(1980, 5, 17),
        intensiv: false,
        diagnose: Some("Schnupfen".to_string()),
        name: Name::new(nachname, "Vorname"),
        operationen: vec![
            Operation::new("Blinddarm", Some(2)),
            Operation::new("Knie", None),
        ],
    }
}

/// Stores a patient through the write service and returns its id.
pub async fn seed(state: &AppState, patient: NewPatient) -> i64 {
    state
        .write_service
        .create(patient)
        .await
        .expect("Failed to create patient")
        .expect("Versichertennummer already exists")
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router
        .clone()
        .oneshot(request)
        .await
        .expect("Router failed")
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).expect("Body is not JSON")
}
