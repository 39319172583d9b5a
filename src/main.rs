//! Replays a fixed line of positions through the refresh cache and checks
//! every accumulator against a from-scratch computation.

use anyhow::{Context, Result, ensure};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use finny_core::{Board, Color};
use finny_nnue::{
    DefaultAccumulator, DefaultFeatureTransformer, DefaultRefreshCache, INPUTS, L1, Occupancy,
    Orientation, PSQT_BUCKETS, king_bucket,
};

/// A short game, one position per ply, including both castlings and a king walk.
const LINE: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
    "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2",
    "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2",
    "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
    "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3",
    "r1bqkb1r/pppp1ppp/2n2n2/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
    "r1bqkb1r/pppp1ppp/2n2n2/1B2p3/4P3/5N2/PPPP1PPP/RNBQ1RK1 b kq - 5 4",
    "r1bqk2r/pppp1ppp/2n2n2/1Bb1p3/4P3/5N2/PPPP1PPP/RNBQ1RK1 w kq - 6 5",
    "r1bqk2r/pppp1ppp/2B2n2/2b1p3/4P3/5N2/PPPP1PPP/RNBQ1RK1 b kq - 0 5",
    "r1bqk2r/p1pp1ppp/2p2n2/2b1p3/4P3/5N2/PPPP1PPP/RNBQ1RK1 w kq - 0 6",
    "r1bqk2r/p1pp1ppp/2p2n2/2b1N3/4P3/8/PPPP1PPP/RNBQ1RK1 b kq - 0 6",
    "r1bq1rk1/p1pp1ppp/2p2n2/2b1N3/4P3/8/PPPP1PPP/RNBQ1RK1 w - - 1 7",
    "r1bq1rk1/p1pp1ppp/2p2n2/2b1N3/4P3/8/PPPP1PPP/RNBQR1K1 b - - 2 7",
    "r1bq1r1k/p1pp1ppp/2p2n2/2b1N3/4P3/8/PPPP1PPP/RNBQR1K1 w - - 3 8",
    "r1bq1r1k/p1pp1ppp/2p2n2/2b1N3/4P3/8/PPPP1PPP/RNBQR2K b - - 4 8",
    "r1bq1r1k/p1pp1ppp/2p5/2b1N3/4n3/8/PPPP1PPP/RNBQR2K w - - 0 9",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "8/2p5/3p4/1P5r/KR3p1k/8/4P1P1/8 b - - 1 1",
    "8/2p5/3p4/1P5r/KR3p2/6k1/4P1P1/8 w - - 2 2",
];

/// Knobs for a replay run.
struct ReplayConfig {
    /// Seed for the synthetic weights.
    seed: u64,
    /// Weights are drawn uniformly from `-weight_range..=weight_range`.
    weight_range: i16,
    /// Number of passes over [`LINE`]; later passes start from a warm cache.
    passes: usize,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EED_F1AA,
            weight_range: 64,
            passes: 2,
        }
    }
}

impl ReplayConfig {
    /// Defaults, with an optional seed as the first command-line argument.
    fn from_args() -> Result<Self> {
        let mut config = Self::default();
        if let Some(arg) = std::env::args().nth(1) {
            config.seed = arg
                .parse()
                .with_context(|| format!("seed must be an unsigned integer, got {arg:?}"))?;
        }
        Ok(config)
    }
}

/// A transformer with random weights; the replay checks consistency, not playing strength.
fn synthetic_transformer(config: &ReplayConfig) -> DefaultFeatureTransformer {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
    let range = config.weight_range;
    let biases: Vec<i16> = (0..L1).map(|_| rng.random_range(-range..=range)).collect();
    let weights: Vec<i16> = (0..INPUTS * L1).map(|_| rng.random_range(-range..=range)).collect();
    let psqt: Vec<i32> = (0..INPUTS * PSQT_BUCKETS)
        .map(|_| rng.random_range(-i32::from(range)..=i32::from(range)))
        .collect();

    DefaultFeatureTransformer::from_fn(
        |dim| biases[dim],
        |feature, dim| weights[feature * L1 + dim],
        |feature, bucket| psqt[feature * PSQT_BUCKETS + bucket],
    )
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ReplayConfig::from_args()?;
    info!(seed = config.seed, positions = LINE.len(), passes = config.passes, "finny replay starting");

    let boards = LINE
        .iter()
        .map(|fen| fen.parse::<Board>().with_context(|| format!("bad FEN in replay line: {fen}")))
        .collect::<Result<Vec<_>>>()?;

    let transformer = synthetic_transformer(&config);
    let mut cache = DefaultRefreshCache::new(transformer.biases());
    let mut accumulator = DefaultAccumulator::new();

    for pass in 0..config.passes {
        for board in &boards {
            accumulator.invalidate_all();
            for perspective in Color::ALL {
                let updates = cache.refresh(board, perspective, &transformer, &mut accumulator);

                let king = board.king_square(perspective);
                let occupancy = Occupancy::from_board(board, Orientation::new(perspective, king));
                let (expected, expected_psqt) =
                    transformer.compute(&occupancy, perspective, king_bucket(king));
                ensure!(
                    accumulator.accumulation(perspective) == Some(&expected)
                        && accumulator.psqt_accumulation(perspective) == Some(&expected_psqt),
                    "cached accumulator diverged for {perspective:?} on {board}"
                );
                debug!(pass, %board, %perspective, updates, "verified");
            }
        }

        let stats = cache.stats();
        info!(
            pass,
            refreshes = stats.refreshes,
            updates = stats.updates,
            full_updates = stats.full_updates,
            average = %format!("{:.2}", stats.average_updates()),
            savings = %format!("{:.1}%", stats.savings() * 100.0),
            "pass complete"
        );
    }

    info!("all accumulators match a full recompute");
    Ok(())
}
