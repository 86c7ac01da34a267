use anyhow::Result;
use cavern_core::{GenerationError, LevelConfig, LightingMode, Pos, TerrainKind, generate_level};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for the seed-scattering harness itself
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of generation runs
    #[arg(short, long, default_value_t = 1000)]
    count: u32,
    #[arg(long, default_value_t = 80)]
    width: usize,
    #[arg(long, default_value_t = 21)]
    height: usize,
    #[arg(long, default_value_t = 40)]
    fill: i32,
}

fn assert_invariants(level: &cavern_core::GeneratedLevel, seed: u64) {
    let (w, h) = (level.width as i32, level.height as i32);
    for y in 0..h {
        for x in 0..w {
            let cell = level.cell_at(Pos { y, x });
            if cell.kind.is_open() {
                assert!(
                    x > 0 && y > 0 && x < w - 1 && y < h - 1,
                    "Invariant failed: open border cell at ({x}, {y}) on seed {seed}"
                );
                assert!(
                    cell.room_id.is_some(),
                    "Invariant failed: unlabeled open cell at ({x}, {y}) on seed {seed}"
                );
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        assert!(
                            level.kind_at(Pos { y: y + dy, x: x + dx }) != TerrainKind::Stone,
                            "Invariant failed: bare rock beside ({x}, {y}) on seed {seed}"
                        );
                    }
                }
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Sweeping {} generations from harness seed {}...", args.count, args.seed);
    let config = LevelConfig {
        width: args.width,
        height: args.height,
        fill_percent: args.fill,
        min_regions: None,
        lighting: LightingMode::DepthBiased { depth: 1 },
        hazards_enabled: true,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let mut generated = 0u32;
    let mut exhausted = 0u32;
    let mut total_regions = 0usize;
    for _ in 0..args.count {
        let level_seed = rng.next_u64();
        match generate_level(level_seed, &config) {
            Ok(level) => {
                assert_invariants(&level, level_seed);
                generated += 1;
                total_regions += level.rooms.len();
            }
            Err(GenerationError::RetryExhausted { .. }) => exhausted += 1,
            Err(err) => anyhow::bail!("generation failed on seed {level_seed}: {err}"),
        }
    }

    println!("Generated {generated}, retry-exhausted {exhausted}.");
    if generated > 0 {
        println!("Mean regions per level: {:.2}", total_regions as f64 / f64::from(generated));
    }
    println!("Sweep completed successfully.");
    Ok(())
}
