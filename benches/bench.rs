// Criterion benchmarks for Founder Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use founder_match::core::{scoring::calculate_score, ProfileScorer};
use founder_match::models::{FounderProfile, YesNo};
use std::collections::HashSet;

const CITIES: &[&str] = &["Austin", "Berlin", "London", "Lagos", "Toronto"];
const AREAS: &[&str] = &["AI", "Climate", "Fintech", "Health", "Education", "Robotics", "Web3"];

fn create_candidate(id: usize) -> FounderProfile {
    let mut profile = FounderProfile::new(id.to_string());
    profile.is_technical = Some(if id % 2 == 0 { YesNo::Yes } else { YesNo::No });
    profile.city = Some(CITIES[id % CITIES.len()].to_string());
    profile.country = Some(if id % 3 == 0 { "USA" } else { "Germany" }.to_string());
    profile.priority_areas = (0..3)
        .map(|k| AREAS[(id + k * 2) % AREAS.len()].to_string())
        .collect();
    profile.has_startup = if id % 5 == 0 { None } else { Some(YesNo::Yes) };
    profile
}

fn create_viewer() -> FounderProfile {
    let mut viewer = FounderProfile::new("viewer");
    viewer.is_technical = Some(YesNo::Yes);
    viewer.city = Some("Austin".to_string());
    viewer.country = Some("USA".to_string());
    viewer.priority_areas = vec!["AI".to_string(), "Climate".to_string(), "Health".to_string()];
    viewer.has_startup = Some(YesNo::Yes);
    viewer
}

fn bench_score(c: &mut Criterion) {
    let viewer = create_viewer();
    let candidate = create_candidate(4);

    c.bench_function("calculate_score", |b| {
        b.iter(|| calculate_score(black_box(&candidate), black_box(&viewer)));
    });
}

fn bench_ranking(c: &mut Criterion) {
    let scorer = ProfileScorer::new();
    let viewer = create_viewer();
    let excluded: HashSet<String> = (0..50).map(|i| (i * 7).to_string()).collect();

    let mut group = c.benchmark_group("ranking");

    for candidate_count in [10, 50, 100, 500, 1000].iter() {
        let candidates: Vec<FounderProfile> = (0..*candidate_count).map(create_candidate).collect();

        group.bench_with_input(
            BenchmarkId::new("rank", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| scorer.rank(black_box(&viewer), black_box(candidates.clone())));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("find_matches", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| {
                    scorer.find_matches(
                        black_box(&viewer),
                        black_box(candidates.clone()),
                        black_box(&excluded),
                        black_box(20),
                    )
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_score, bench_ranking);

criterion_main!(benches);
