// Criterion benchmarks for Spark Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spark_match::core::distance::{great_circle_distance, rank_by_distance};
use spark_match::models::{Location, Profile, ProfileId};

fn create_candidate(id: usize, lat: f64, lon: f64) -> Profile {
    Profile {
        id: ProfileId(id as i64),
        name: format!("User {}", id),
        avatar: format!("https://img.example/{}.png", id),
        contact: format!("@user{}", id),
        about: String::new(),
        location: Location::new(lat, lon).unwrap(),
    }
}

fn bench_great_circle_distance(c: &mut Criterion) {
    c.bench_function("great_circle_distance", |b| {
        b.iter(|| {
            great_circle_distance(
                black_box(40.7128),
                black_box(-74.0060),
                black_box(40.72),
                black_box(-74.01),
            )
        });
    });
}

fn bench_ranking(c: &mut Criterion) {
    let origin = Location::new(40.7128, -74.0060).unwrap();

    let mut group = c.benchmark_group("ranking");

    for candidate_count in [10, 100, 1000, 10000].iter() {
        let candidates: Vec<Profile> = (0..*candidate_count)
            .map(|i| {
                let lat_offset = (i as f64 * 0.001) % 0.5;
                let lon_offset = (i as f64 * 0.0007) % 0.5;
                create_candidate(i, 40.7128 + lat_offset, -74.0060 + lon_offset)
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::new("rank_by_distance", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| rank_by_distance(black_box(origin), black_box(candidates.clone())));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_great_circle_distance, bench_ranking);

criterion_main!(benches);
