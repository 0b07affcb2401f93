use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::core::CoreError;

/// Number of fixed-point units per degree (7 fractional digits)
const COORDINATE_SCALE: f64 = 10_000_000.0;

/// Profile identifier, mirrors the owning account's id
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub i64);

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A coordinate in degrees, stored as ten-millionths of a degree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Coordinate(i32);

impl Coordinate {
    pub fn from_units(units: i32) -> Self {
        Self(units)
    }

    pub fn units(self) -> i32 {
        self.0
    }

    pub fn degrees(self) -> f64 {
        self.0 as f64 / COORDINATE_SCALE
    }

    fn from_degrees(value: f64, bound: f64, field: &str) -> Result<Self, CoreError> {
        if !value.is_finite() || value < -bound || value > bound {
            return Err(CoreError::Validation(format!(
                "{} must be within [-{}, {}], got {}",
                field, bound, bound, value
            )));
        }
        Ok(Self((value * COORDINATE_SCALE).round() as i32))
    }
}

/// Geographic location of a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub latitude: Coordinate,
    pub longitude: Coordinate,
}

impl Location {
    /// Build a location from degrees, rejecting out-of-range or non-finite input
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        Ok(Self {
            latitude: Coordinate::from_degrees(latitude, 90.0, "latitude")?,
            longitude: Coordinate::from_degrees(longitude, 180.0, "longitude")?,
        })
    }
}

/// A matchable profile
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    pub avatar: String,
    pub contact: String,
    pub about: String,
    pub location: Location,
}

/// Directed relationship sets owned by a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RelationSet {
    Liked,
    Disliked,
    Matched,
}

/// Which side of a directed relation to read
///
/// `Outgoing(Matched)` is "profiles I matched", `Incoming(Matched)` is
/// "profiles that matched me".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationView {
    Outgoing(RelationSet),
    Incoming(RelationSet),
}

/// Account data supplied at registration
#[derive(Debug, Clone, Validate)]
pub struct NewAccount {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
}

/// Profile data supplied at registration
#[derive(Debug, Clone, Validate)]
pub struct NewProfile {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(min = 1, max = 500))]
    pub avatar: String,
    #[validate(length(min = 1, max = 50))]
    pub contact: String,
    pub about: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl NewProfile {
    /// Validate and attach the owning account's id
    pub fn into_profile(self, id: ProfileId) -> Result<Profile, CoreError> {
        self.validate()?;
        let location = Location::new(self.latitude, self.longitude)?;
        Ok(Profile {
            id,
            name: self.name,
            avatar: self.avatar,
            contact: self.contact,
            about: self.about,
            location,
        })
    }
}

/// A profile paired with its distance from the viewer
#[derive(Debug, Clone)]
pub struct RankedProfile {
    pub profile: Profile,
    /// Kilometres, rounded to one decimal place
    pub distance_km: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_fixed_point() {
        let location = Location::new(40.7128, -74.006).unwrap();
        assert_eq!(location.latitude.units(), 407_128_000);
        assert_eq!(location.longitude.units(), -740_060_000);
        assert!((location.latitude.degrees() - 40.7128).abs() < 1e-9);
    }

    #[test]
    fn test_location_bounds() {
        assert!(Location::new(90.0, 180.0).is_ok());
        assert!(Location::new(-90.0, -180.0).is_ok());
        assert!(matches!(Location::new(90.1, 0.0), Err(CoreError::Validation(_))));
        assert!(matches!(Location::new(0.0, -180.5), Err(CoreError::Validation(_))));
        assert!(matches!(Location::new(f64::NAN, 0.0), Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_default_location_is_origin() {
        let location = Location::default();
        assert_eq!(location.latitude.degrees(), 0.0);
        assert_eq!(location.longitude.degrees(), 0.0);
    }

    #[test]
    fn test_new_profile_rejects_long_name() {
        let new_profile = NewProfile {
            name: "x".repeat(51),
            avatar: "https://img.example/a.png".to_string(),
            contact: "@a".to_string(),
            about: String::new(),
            latitude: 0.0,
            longitude: 0.0,
        };
        assert!(matches!(
            new_profile.into_profile(ProfileId(1)),
            Err(CoreError::Validation(_))
        ));
    }
}
