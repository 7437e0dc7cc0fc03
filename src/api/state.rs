use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::AnyPool;

use crate::auth::JwtVerifier;
use crate::config::Config;
use crate::graphql::{build_schema, PatientSchema};
use crate::repository::PatientRepository;
use crate::services::{PatientReadService, PatientWriteService};

/// Everything the handlers share. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub read_service: PatientReadService,
    pub write_service: PatientWriteService,
    pub verifier: Arc<JwtVerifier>,
    pub schema: PatientSchema,
    pub graphql_playground: bool,
}

impl AppState {
    pub fn new(pool: AnyPool, config: &Config) -> Self {
        let repository = Arc::new(PatientRepository::new(pool, config.dialect));
        let read_service = PatientReadService::new(repository.clone());
        let write_service = PatientWriteService::new(repository, read_service.clone());
        let schema = build_schema(read_service.clone(), write_service.clone());

        Self {
            read_service,
            write_service,
            verifier: Arc::new(JwtVerifier::new(&config.jwt_secret, &config.jwt_issuer)),
            schema,
            graphql_playground: config.graphql_playground,
        }
    }
}

impl FromRef<AppState> for PatientReadService {
    fn from_ref(state: &AppState) -> Self {
        state.read_service.clone()
    }
}

impl FromRef<AppState> for PatientWriteService {
    fn from_ref(state: &AppState) -> Self {
        state.write_service.clone()
    }
}

impl FromRef<AppState> for Arc<JwtVerifier> {
    fn from_ref(state: &AppState) -> Self {
        state.verifier.clone()
    }
}

impl FromRef<AppState> for PatientSchema {
    fn from_ref(state: &AppState) -> Self {
        state.schema.clone()
    }
}
