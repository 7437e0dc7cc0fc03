//! Bearer-token verification. Tokens are HS256 JWTs issued elsewhere; this
//! service only checks signature, issuer and expiry and reads the roles.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Roles allowed to create and update patients.
pub const WRITER_ROLES: [&str; 2] = ["arzt", "rezeptionist"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub iss: String,
    pub exp: i64,
}

/// The verified caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub roles: Vec<String>,
}

impl Principal {
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        self.roles.iter().any(|role| roles.contains(&role.as_str()))
    }

    pub fn is_writer(&self) -> bool {
        self.has_any_role(&WRITER_ROLES)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("user {0} lacks a required role")]
    MissingRole(String),
}

/// Every auth failure looks the same to the client.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, "Request forbidden");
        (
            StatusCode::FORBIDDEN,
            Json(json!({
                "statusCode": 403,
                "message": "Forbidden resource",
                "error": "Forbidden",
            })),
        )
            .into_response()
    }
}

pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str, issuer: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        Ok(Principal {
            username: data.claims.sub,
            roles: data.claims.roles,
        })
    }

    /// Verifies the `Authorization: Bearer` header, if any.
    pub fn principal_from_headers(&self, headers: &HeaderMap) -> Result<Principal, AuthError> {
        let token = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)?;
        self.verify(token)
    }
}

/// Extractor for handlers that change data: a valid token with role `arzt`
/// or `rezeptionist`.
pub struct Writer(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for Writer
where
    S: Send + Sync,
    Arc<JwtVerifier>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = Arc::<JwtVerifier>::from_ref(state);
        let principal = verifier.principal_from_headers(&parts.headers)?;
        if !principal.is_writer() {
            return Err(AuthError::MissingRole(principal.username));
        }
        tracing::debug!(user = %principal.username, "Writer authenticated");
        Ok(Writer(principal))
    }
}

/// The caller if a valid token was sent, `None` otherwise. Never rejects.
pub struct MaybePrincipal(pub Option<Principal>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybePrincipal
where
    S: Send + Sync,
    Arc<JwtVerifier>: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = Arc::<JwtVerifier>::from_ref(state);
        let principal = match verifier.principal_from_headers(&parts.headers) {
            Ok(principal) => Some(principal),
            Err(AuthError::MissingToken) => None,
            Err(err) => {
                tracing::debug!(error = %err, "Ignoring invalid token");
                None
            }
        };
        Ok(MaybePrincipal(principal))
    }
}
