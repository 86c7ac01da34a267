use cavern_core::{DungeonRng, LevelConfig, LightingMode, generate_level};

#[test]
fn identical_seeds_produce_identical_draw_streams() {
    let mut left = DungeonRng::new(987_654_321);
    let mut right = DungeonRng::new(987_654_321);
    for i in 0..10_000 {
        assert_eq!(
            left.uniform(1_000).unwrap(),
            right.uniform(1_000).unwrap(),
            "streams diverged at draw {i}"
        );
    }
}

// First five uniform(100) results for seed 42, captured from the reference
// engine. Pinned here as well as in the unit tests because this is the
// value most likely to be broken by a well-meaning arithmetic cleanup.
#[test]
fn seed_42_uniform_prefix_matches_reference() {
    let mut rng = DungeonRng::new(42);
    let prefix: Vec<i32> = (0..5).map(|_| rng.uniform(100).unwrap()).collect();
    assert_eq!(prefix, vec![98, 66, 48, 45, 84]);
}

#[test]
fn identical_seeds_produce_identical_levels() {
    let config = LevelConfig {
        lighting: LightingMode::DepthBiased { depth: 5 },
        hazards_enabled: true,
        ..LevelConfig::default()
    };
    for seed in [0u64, 1, 7, 42, 99, 1_000_003] {
        let a = generate_level(seed, &config).unwrap();
        let b = generate_level(seed, &config).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint(), "seed {seed}");
        assert_eq!(a.cells, b.cells, "seed {seed}");
        assert_eq!(a.rooms, b.rooms, "seed {seed}");
    }
}

#[test]
fn different_seeds_produce_different_levels() {
    let config = LevelConfig::default();
    let a = generate_level(42, &config).unwrap();
    let b = generate_level(43, &config).unwrap();
    assert_ne!(a.fingerprint(), b.fingerprint());
}

#[test]
fn uniform_draws_are_roughly_flat() {
    let mut rng = DungeonRng::new(2024);
    let mut buckets = [0u32; 10];
    let total = 1_000_000;
    for _ in 0..total {
        buckets[rng.uniform(10).unwrap() as usize] += 1;
    }
    let expected = total / 10;
    for (value, count) in buckets.iter().enumerate() {
        let deviation = (*count as i64 - expected as i64).abs();
        // 5 sigma for a binomial with p = 0.1 is about 1500 here.
        assert!(deviation < 2_000, "bucket {value} count {count} is far from {expected}");
    }
}

#[test]
fn dice_sums_stay_in_range_and_center_on_the_mean() {
    let mut rng = DungeonRng::new(77);
    let mut total: i64 = 0;
    let samples = 100_000;
    for _ in 0..samples {
        let roll = rng.dice(3, 6).unwrap();
        assert!((3..=18).contains(&roll));
        total += i64::from(roll);
    }
    let mean = total as f64 / samples as f64;
    assert!((mean - 10.5).abs() < 0.1, "mean {mean} drifted from 10.5");
}
