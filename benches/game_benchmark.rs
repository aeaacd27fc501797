//! Performance benchmarks for full simulated games
//!
//! Two iteration modes:
//!
//! 1. **Fresh** - build a new tabletop from the seats each iteration
//! 2. **Snapshot** - clone a prepared tabletop each iteration
//!
//! Both run RandomStrategy vs RandomStrategy on the built-in mono-red deck.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::{Duration, Instant};
use tabletop_sim::{
    config::SimulationConfig,
    core::{PlayerKind, Seat},
    game::{GameLogger, GameSimulator, Judge, RandomStrategy, Tabletop},
    loader::CardCatalog,
    Result,
};

#[derive(Debug, Clone)]
struct GameMetrics {
    turns: u32,
    duration: Duration,
}

impl GameMetrics {
    fn games_per_sec(&self) -> f64 {
        1.0 / self.duration.as_secs_f64()
    }

    fn turns_per_sec(&self) -> f64 {
        self.turns as f64 / self.duration.as_secs_f64()
    }
}

fn seats() -> Result<[Seat; 2]> {
    let catalog = CardCatalog::builtin();
    let deck = catalog.deck("mono-red")?;
    Ok([
        Seat::new("Player 1", PlayerKind::Ai, deck.clone()),
        Seat::new("Player 2", PlayerKind::Ai, deck),
    ])
}

fn play(mut tabletop: Tabletop, config: &SimulationConfig) -> Result<u32> {
    let ids = [tabletop.players()[0].id, tabletop.players()[1].id];
    let mut judge = Judge::new(
        &mut tabletop,
        Box::new(RandomStrategy::with_seed(ids[0], config.seed)),
        Box::new(RandomStrategy::with_seed(ids[1], config.seed + 1)),
    )
    .with_logger(GameLogger::silent());
    let result = GameSimulator::new(config.clone()).run(tabletop, &mut judge)?;
    Ok(result.turns_played)
}

fn run_game_with_metrics(seats: &[Seat; 2], seed: u64) -> Result<GameMetrics> {
    let start = Instant::now();
    let config = SimulationConfig::default().with_seed(seed);
    let tabletop = Tabletop::new(seats.clone(), config.table_rules(), seed);
    let turns = play(tabletop, &config)?;
    Ok(GameMetrics {
        turns,
        duration: start.elapsed(),
    })
}

fn bench_game_fresh(c: &mut Criterion) {
    let seats = match seats() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Skipping benchmark - failed to build decks: {e}");
            return;
        }
    };

    let mut group = c.benchmark_group("game_execution");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    let seed = 42u64;
    println!("\nWarmup game (seed {seed}):");
    if let Ok(metrics) = run_game_with_metrics(&seats, seed) {
        println!("  Turns: {}", metrics.turns);
        println!("  Duration: {:?}", metrics.duration);
        println!("  Games/sec: {:.2}", metrics.games_per_sec());
        println!("  Turns/sec: {:.2}", metrics.turns_per_sec());
    }

    group.bench_with_input(BenchmarkId::new("fresh", seed), &seed, |b, &seed| {
        b.iter(|| run_game_with_metrics(&seats, black_box(seed)).expect("game should complete"));
    });
    group.finish();
}

fn bench_game_snapshot(c: &mut Criterion) {
    let seats = match seats() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Skipping benchmark - failed to build decks: {e}");
            return;
        }
    };

    let mut group = c.benchmark_group("game_execution");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    let seed = 42u64;
    let config = SimulationConfig::default().with_seed(seed);
    let initial = Tabletop::new(seats, config.table_rules(), seed);

    group.bench_function(BenchmarkId::new("snapshot", seed), |b| {
        b.iter(|| play(initial.clone(), &config).expect("game should complete"));
    });
    group.finish();
}

criterion_group!(benches, bench_game_fresh, bench_game_snapshot);
criterion_main!(benches);
