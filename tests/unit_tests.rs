// Unit tests for Spark Match

use spark_match::core::distance::{distance_between, great_circle_distance, rank_by_distance, round_to_tenth};
use spark_match::models::{Location, Profile, ProfileId};

fn profile(id: i64, lat: f64, lon: f64) -> Profile {
    Profile {
        id: ProfileId(id),
        name: format!("User {}", id),
        avatar: "https://img.example/avatar.png".to_string(),
        contact: "@user".to_string(),
        about: String::new(),
        location: Location::new(lat, lon).unwrap(),
    }
}

#[test]
fn test_distance_zero_for_same_point() {
    let points = [(40.7128, -74.006), (-33.8688, 151.2093), (0.0, 0.0), (-90.0, 180.0)];
    for (lat, lon) in points {
        assert_eq!(great_circle_distance(lat, lon, lat, lon), 0.0);
    }
}

#[test]
fn test_distance_manhattan_to_brooklyn() {
    // Manhattan to Brooklyn is approximately 5-10 km
    let distance = great_circle_distance(40.7580, -73.9855, 40.6782, -73.9442);
    assert!(distance > 5.0 && distance < 15.0);
}

#[test]
fn test_distance_is_symmetric() {
    let a = Location::new(48.8566, 2.3522).unwrap();
    let b = Location::new(52.52, 13.405).unwrap();
    assert!((distance_between(a, b) - distance_between(b, a)).abs() < 1e-9);
}

#[test]
fn test_one_degree_along_equator() {
    let distance = great_circle_distance(0.0, 0.0, 0.0, 1.0);
    assert_eq!(round_to_tenth(distance), 111.2);
}

#[test]
fn test_tiny_offsets_round_to_zero() {
    let distance = great_circle_distance(40.0, -73.0, 40.0, -73.0001);
    assert!(distance > 0.0 && distance < 0.05, "got {}", distance);
    assert_eq!(round_to_tenth(distance), 0.0);
}

#[test]
fn test_ranking_tie_break_by_id() {
    let ranked = rank_by_distance(
        Location::default(),
        vec![profile(20, 0.0, -1.0), profile(10, 0.0, 1.0), profile(30, 0.0, 0.0)],
    );

    let ids: Vec<i64> = ranked.iter().map(|r| r.profile.id.0).collect();
    assert_eq!(ids, vec![30, 10, 20]);
}

#[test]
fn test_ranking_preserves_all_candidates() {
    let candidates: Vec<Profile> = (0..50)
        .map(|i| profile(i, (i as f64 * 0.37) % 80.0, (i as f64 * 1.3) % 170.0))
        .collect();

    let ranked = rank_by_distance(Location::new(10.0, 10.0).unwrap(), candidates);

    assert_eq!(ranked.len(), 50);
    for pair in ranked.windows(2) {
        assert!(pair[0].distance_km <= pair[1].distance_km);
    }
}
