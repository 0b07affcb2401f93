use actix_web::dev::Payload;
use actix_web::http::{header, StatusCode};
use actix_web::{web, FromRequest, HttpRequest, HttpResponse, ResponseError};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use thiserror::Error;

use crate::models::{ErrorResponse, ProfileId};

/// Errors produced while issuing or checking bearer tokens
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingCredentials,

    #[error("Authorization header must be 'Bearer <token>'")]
    MalformedHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Expected a {expected:?} token")]
    WrongKind { expected: TokenKind },

    #[error("Token subject is not a profile id")]
    InvalidSubject,

    #[error("Failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),

    #[error("Token service is not configured")]
    NotConfigured,
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Signing(_) | AuthError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: "unauthorized".to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims carried by both token kinds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Issues and validates HS256 bearer tokens
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, access_ttl_secs: u64, refresh_ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl: Duration::seconds(access_ttl_secs as i64),
            refresh_ttl: Duration::seconds(refresh_ttl_secs as i64),
        }
    }

    pub fn issue(&self, id: ProfileId, kind: TokenKind) -> Result<String, AuthError> {
        let now = Utc::now();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };

        let claims = Claims {
            sub: id.to_string(),
            kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(AuthError::Signing)
    }

    /// Issue an (access, refresh) pair
    pub fn issue_pair(&self, id: ProfileId) -> Result<(String, String), AuthError> {
        Ok((self.issue(id, TokenKind::Access)?, self.issue(id, TokenKind::Refresh)?))
    }

    /// Check signature, expiry and kind, returning the token's profile id
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<ProfileId, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))?;

        if data.claims.kind != expected {
            return Err(AuthError::WrongKind { expected });
        }

        data.claims
            .sub
            .parse::<i64>()
            .map(ProfileId)
            .map_err(|_| AuthError::InvalidSubject)
    }

    /// Exchange a refresh token for a fresh access token
    pub fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let id = self.verify(refresh_token, TokenKind::Refresh)?;
        self.issue(id, TokenKind::Access)
    }
}

/// The acting profile, resolved from an `Authorization: Bearer` access token
///
/// Core operations trust this id without further checks.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedProfile(pub ProfileId);

impl AuthenticatedProfile {
    fn authenticate(req: &HttpRequest) -> Result<Self, AuthError> {
        let tokens = req
            .app_data::<web::Data<TokenService>>()
            .ok_or(AuthError::NotConfigured)?;

        let value = req
            .headers()
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingCredentials)?
            .to_str()
            .map_err(|_| AuthError::MalformedHeader)?;

        let token = value
            .strip_prefix("Bearer ")
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MalformedHeader)?;

        tokens.verify(token, TokenKind::Access).map(AuthenticatedProfile)
    }
}

impl FromRequest for AuthenticatedProfile {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = Self::authenticate(req);
        if let Err(e) = &result {
            tracing::debug!("Rejected request to {}: {}", req.path(), e);
        }
        ready(result)
    }
}
