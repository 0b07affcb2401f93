use actix_web::{web, HttpResponse, Responder};

use crate::core::CoreError;
use crate::models::{HealthResponse, LikeResponse, LocationRequest, ProfileId, ProfileView, ThinProfileView};
use crate::routes::AppState;
use crate::services::AuthenticatedProfile;

/// Configure profile and matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/set-location", web::put().to(set_location))
        .route("/users", web::get().to(browse))
        .route("/users/matches", web::get().to(list_matches))
        .route("/users/{id}/like", web::put().to(like))
        .route("/users/{id}/dislike", web::put().to(dislike));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = match state.store.ping().await {
        Ok(()) => "healthy",
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            "degraded"
        }
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// All other profiles, nearest first
///
/// GET /api/v1/users
async fn browse(
    state: web::Data<AppState>,
    viewer: AuthenticatedProfile,
) -> Result<HttpResponse, CoreError> {
    let ranked = state.directory.browse(viewer.0).await?;
    let body: Vec<ThinProfileView> = ranked.into_iter().map(ThinProfileView::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Profiles matched with the caller in either direction
///
/// GET /api/v1/users/matches
async fn list_matches(
    state: web::Data<AppState>,
    viewer: AuthenticatedProfile,
) -> Result<HttpResponse, CoreError> {
    let ranked = state.directory.matches(viewer.0).await?;
    let body: Vec<ProfileView> = ranked.into_iter().map(ProfileView::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// PUT /api/v1/users/{id}/like
async fn like(
    state: web::Data<AppState>,
    actor: AuthenticatedProfile,
    path: web::Path<i64>,
) -> Result<HttpResponse, CoreError> {
    let outcome = state.engine.like(actor.0, ProfileId(path.into_inner())).await?;
    Ok(HttpResponse::Ok().json(LikeResponse {
        matched: outcome.matched,
    }))
}

/// PUT /api/v1/users/{id}/dislike
async fn dislike(
    state: web::Data<AppState>,
    actor: AuthenticatedProfile,
    path: web::Path<i64>,
) -> Result<HttpResponse, CoreError> {
    state.engine.dislike(actor.0, ProfileId(path.into_inner())).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({})))
}

/// Update the caller's location
///
/// PUT /api/v1/set-location
///
/// Request body:
/// ```json
/// { "latitude": 40.7128, "longitude": -74.0060 }
/// ```
///
/// Either field may be omitted.
async fn set_location(
    state: web::Data<AppState>,
    viewer: AuthenticatedProfile,
    req: web::Json<LocationRequest>,
) -> Result<HttpResponse, CoreError> {
    state
        .directory
        .patch_location(viewer.0, req.latitude, req.longitude)
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({})))
}
