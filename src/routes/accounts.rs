use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::core::CoreError;
use crate::models::{AccessTokenResponse, RefreshRequest, RegisterRequest, TokenPairResponse};
use crate::routes::AppState;
use crate::services::TokenService;

/// Configure registration and token routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/register", web::post().to(register))
        .route("/token-refresh", web::post().to(refresh_token));
}

/// Register an account with its profile and return a token pair
///
/// POST /api/v1/register
///
/// Request body:
/// ```json
/// {
///   "username": "string",
///   "name": "string",
///   "avatar": "https://...",
///   "contact": "string",
///   "about": "string",
///   "latitude": 40.0,
///   "longitude": -73.0
/// }
/// ```
async fn register(
    state: web::Data<AppState>,
    tokens: web::Data<TokenService>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    let (account, new_profile) = req.into_inner().into_parts();
    let profile = state.registrar.register(account, new_profile).await?;

    let (access, refresh) = tokens.issue_pair(profile.id)?;

    Ok(HttpResponse::Created().json(TokenPairResponse { access, refresh }))
}

/// Exchange a refresh token for a new access token
///
/// POST /api/v1/token-refresh
async fn refresh_token(
    tokens: web::Data<TokenService>,
    req: web::Json<RefreshRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    req.validate().map_err(CoreError::from)?;

    let access = tokens.refresh(&req.refresh)?;

    Ok(HttpResponse::Ok().json(AccessTokenResponse { access }))
}
