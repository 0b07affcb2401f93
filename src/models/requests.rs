use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{NewAccount, NewProfile};

/// Registration request: account and profile fields in one body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    #[serde(alias = "full_name")]
    pub name: String,
    pub avatar: String,
    pub contact: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

impl RegisterRequest {
    pub fn into_parts(self) -> (NewAccount, NewProfile) {
        (
            NewAccount {
                username: self.username,
            },
            NewProfile {
                name: self.name,
                avatar: self.avatar,
                contact: self.contact,
                about: self.about,
                latitude: self.latitude,
                longitude: self.longitude,
            },
        )
    }
}

/// Request to update the caller's location
///
/// Either coordinate may be left out to keep its stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationRequest {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Request to exchange a refresh token for a new access token
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh: String,
}
