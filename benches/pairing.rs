#[cfg(feature = "bench")]
use std::time::Duration;

#[cfg(feature = "bench")]
use criterion::{Criterion, criterion_group, criterion_main};

#[cfg(feature = "bench")]
use swiss_rounds::{engine::Engine, store::MemoryStore};

#[cfg(feature = "bench")]
fn pair_large_fixture(c: &mut Criterion) {
    let engine = Engine::new(MemoryStore::new());
    engine.create_fixture("bench").unwrap();

    let players: Vec<_> = (0..512)
        .map(|i| engine.register_player(&format!("player {i}"), "bench").unwrap().id)
        .collect();

    // Three completed rounds of history, higher seed always winning.
    for _ in 0..3 {
        let pairing = engine.generate_pairings("bench").unwrap();
        for pair in &pairing.pairs {
            engine.record_match(pair.first, pair.second, "bench").unwrap();
        }
    }
    assert_eq!(players.len(), 512);

    c.bench_function("pair_large_fixture", move |b| {
        b.iter(|| engine.generate_pairings("bench").unwrap());
    });
}

#[cfg(feature = "bench")]
criterion_group! {
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(10));
    targets = pair_large_fixture
}

#[cfg(feature = "bench")]
criterion_main!(benches);

#[cfg(not(feature = "bench"))]
fn main() {
    eprintln!("You must enable pass `--features=bench`");
}
