use serde::{Deserialize, Serialize};
use crate::models::domain::{ProfileId, RankedProfile};

/// Full profile view, used for the match list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileView {
    pub id: ProfileId,
    pub name: String,
    pub avatar: String,
    pub contact: String,
    pub about: String,
    pub distance: f64,
}

impl From<RankedProfile> for ProfileView {
    fn from(ranked: RankedProfile) -> Self {
        Self {
            id: ranked.profile.id,
            name: ranked.profile.name,
            avatar: ranked.profile.avatar,
            contact: ranked.profile.contact,
            about: ranked.profile.about,
            distance: ranked.distance_km,
        }
    }
}

/// Thin profile view, used for browsing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThinProfileView {
    pub id: ProfileId,
    pub avatar: String,
    pub name: String,
    pub distance: f64,
}

impl From<RankedProfile> for ThinProfileView {
    fn from(ranked: RankedProfile) -> Self {
        Self {
            id: ranked.profile.id,
            avatar: ranked.profile.avatar,
            name: ranked.profile.name,
            distance: ranked.distance_km,
        }
    }
}

/// Token pair returned on registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

/// Fresh access token returned on refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    pub access: String,
}

/// Result of a like action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeResponse {
    pub matched: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
