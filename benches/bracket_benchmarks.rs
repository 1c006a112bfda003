use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use guild_brackets::{Tournament, UserId};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Helper to create a started tournament with N participants
fn setup_started_tournament(size: usize, count: usize) -> Tournament {
    let mut t = Tournament::new(1, "Bench Cup", size, 1).unwrap();
    for i in 0..count {
        t.add_participant(1000 + i as UserId, format!("player{i}"), "")
            .unwrap();
    }
    t.start_with_rng(&mut StdRng::seed_from_u64(0)).unwrap();
    t
}

/// Play a tournament to completion, upper slot always winning
fn play_out(mut t: Tournament) -> Tournament {
    while !t.completed {
        let next = t.current_matches()[0];
        let (match_id, winner) = (next.match_id, next.participant1.unwrap());
        t.record_match_result(match_id, winner).unwrap();
    }
    t
}

/// Benchmark bracket skeleton construction across the size range
fn bench_bracket_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("bracket_construction");
    for size in [2usize, 8, 16, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| Tournament::new(1, "Bench", size, 1).unwrap());
        });
    }
    group.finish();
}

/// Benchmark seeding with bye resolution at the worst-case size
fn bench_seeding_with_byes(c: &mut Criterion) {
    // 33 participants in a 64-slot tree maximizes bye chains.
    c.bench_function("seed_33_of_64", |b| {
        b.iter(|| setup_started_tournament(64, 33));
    });
}

/// Benchmark a full 64-player tournament from creation to champion
fn bench_full_tournament(c: &mut Criterion) {
    c.bench_function("play_out_64", |b| {
        b.iter(|| play_out(setup_started_tournament(64, 64)));
    });
}

/// Benchmark snapshot serialization of a mid-play tournament
fn bench_snapshot_round_trip(c: &mut Criterion) {
    let t = setup_started_tournament(64, 48);
    c.bench_function("snapshot_round_trip_64", |b| {
        b.iter(|| {
            let json = serde_json::to_string(&t).unwrap();
            let restored: Tournament = serde_json::from_str(&json).unwrap();
            restored
        });
    });
}

criterion_group!(
    benches,
    bench_bracket_construction,
    bench_seeding_with_byes,
    bench_full_tournament,
    bench_snapshot_round_trip
);
criterion_main!(benches);
