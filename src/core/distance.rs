use std::cmp::Ordering;

use crate::models::{Location, Profile, RankedProfile};

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers
///
/// Uses the spherical law of cosines. The cosine term is clamped to
/// [-1, 1] so rounding noise never pushes `acos` out of its domain.
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
#[inline]
pub fn great_circle_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    if lat1 == lat2 && lon1 == lon2 {
        return 0.0;
    }

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lon = lon2.to_radians() - lon1.to_radians();

    let cosine = lat1_rad.cos() * lat2_rad.cos() * delta_lon.cos()
        + lat1_rad.sin() * lat2_rad.sin();

    EARTH_RADIUS_KM * cosine.clamp(-1.0, 1.0).acos()
}

/// Distance between two stored locations in kilometers
#[inline]
pub fn distance_between(from: Location, to: Location) -> f64 {
    if from == to {
        return 0.0;
    }
    great_circle_distance(
        from.latitude.degrees(),
        from.longitude.degrees(),
        to.latitude.degrees(),
        to.longitude.degrees(),
    )
}

/// Round a distance to one decimal place
#[inline]
pub fn round_to_tenth(distance_km: f64) -> f64 {
    (distance_km * 10.0).round() / 10.0
}

/// Rank candidates by distance from `origin`
///
/// Ordering is ascending by exact distance, ties broken by ascending id.
/// The distance attached to each result is rounded to one decimal place.
pub fn rank_by_distance(origin: Location, candidates: Vec<Profile>) -> Vec<RankedProfile> {
    let mut measured: Vec<(f64, Profile)> = candidates
        .into_iter()
        .map(|profile| (distance_between(origin, profile.location), profile))
        .collect();

    measured.sort_by(|(da, a), (db, b)| {
        da.partial_cmp(db)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });

    measured
        .into_iter()
        .map(|(distance, profile)| RankedProfile {
            profile,
            distance_km: round_to_tenth(distance),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProfileId;

    fn profile_at(id: i64, lat: f64, lon: f64) -> Profile {
        Profile {
            id: ProfileId(id),
            name: format!("User {}", id),
            avatar: String::new(),
            contact: String::new(),
            about: String::new(),
            location: Location::new(lat, lon).unwrap(),
        }
    }

    #[test]
    fn test_great_circle_distance() {
        // Distance from London to Paris (approximately 344 km)
        let distance = great_circle_distance(51.5074, -0.1278, 48.8566, 2.3522);
        assert!((distance - 344.0).abs() < 10.0, "Distance should be ~344km, got {}", distance);
    }

    #[test]
    fn test_identical_points_are_exactly_zero() {
        for (lat, lon) in [(0.0, 0.0), (40.7128, -74.006), (-89.9999999, 179.9999999), (90.0, 0.0)] {
            assert_eq!(great_circle_distance(lat, lon, lat, lon), 0.0);
            let location = Location::new(lat, lon).unwrap();
            assert_eq!(distance_between(location, location), 0.0);
        }
    }

    #[test]
    fn test_antipodal_points_do_not_produce_nan() {
        let distance = great_circle_distance(0.0, 0.0, 0.0, 180.0);
        assert!(distance.is_finite());
        assert!((distance - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 0.01);
    }

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(0.0085), 0.0);
        assert_eq!(round_to_tenth(111.19), 111.2);
        assert_eq!(round_to_tenth(3.04), 3.0);
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank_by_distance(Location::default(), vec![]).is_empty());
    }

    #[test]
    fn test_rank_ties_broken_by_id() {
        let candidates = vec![
            profile_at(3, 0.0, 1.0),
            profile_at(2, 0.0, -1.0),
            profile_at(1, 0.0, 0.0),
        ];

        let ranked = rank_by_distance(Location::default(), candidates);
        let ids: Vec<i64> = ranked.iter().map(|r| r.profile.id.0).collect();

        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(ranked[0].distance_km, 0.0);
        assert_eq!(ranked[1].distance_km, ranked[2].distance_km);
        assert_eq!(ranked[1].distance_km, 111.2);
    }

    #[test]
    fn test_rank_ascending() {
        let origin = Location::new(40.7128, -74.006).unwrap();
        let candidates = vec![
            profile_at(1, 34.0522, -118.2437), // Los Angeles
            profile_at(2, 40.72, -74.01),      // ~1 km
            profile_at(3, 41.5, -74.0),        // ~90 km
        ];

        let ranked = rank_by_distance(origin, candidates);
        let ids: Vec<i64> = ranked.iter().map(|r| r.profile.id.0).collect();

        assert_eq!(ids, vec![2, 3, 1]);
    }
}
