use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest, HttpResponse, ResponseError};
use actix_web::http::StatusCode;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Errors raised while authenticating a request
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing Authorization header")]
    MissingToken,

    #[error("expected Bearer token")]
    MalformedHeader,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("session verifier not configured")]
    NotConfigured,
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: "unauthorized".to_string(),
            message: self.to_string(),
            status_code: self.status_code().as_u16(),
        })
    }
}

/// Session claims issued by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Validates identity-provider session tokens (HS256)
#[derive(Clone)]
pub struct SessionVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(secret: &str, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Decode and validate a raw token
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        if data.claims.sub.is_empty() {
            return Err(AuthError::InvalidToken("empty subject".to_string()));
        }

        Ok(data.claims)
    }

    /// Validate the `Authorization: Bearer` header of a request
    pub fn verify_header(&self, header: Option<&str>) -> Result<Claims, AuthError> {
        let header = header.ok_or(AuthError::MissingToken)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MalformedHeader)?;

        self.verify(token.trim())
    }
}

/// Extractor for the signed-in user
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AuthError> {
    let verifier = req
        .app_data::<web::Data<SessionVerifier>>()
        .ok_or(AuthError::NotConfigured)?;

    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let claims = verifier.verify_header(header).map_err(|e| {
        tracing::debug!("Rejected request to {}: {}", req.path(), e);
        e
    })?;

    Ok(AuthenticatedUser {
        user_id: claims.sub,
    })
}
