//! Retention curve tests.

use streamsynth_core::{error::SimError, retention_model::RetentionModel, rng::GeneratorRng};

#[test]
fn active_days_always_fall_inside_the_horizon() {
    let model = RetentionModel::new(30, 0.6).unwrap();
    let mut rng = GeneratorRng::new(51, 0);
    for _ in 0..10_000 {
        let k = model.active_days(&mut rng);
        assert!((1..=30).contains(&k), "active days {k} outside 1..=30");
    }
}

#[test]
fn one_day_horizon_always_gives_one_active_day() {
    let model = RetentionModel::new(1, 0.6).unwrap();
    let mut rng = GeneratorRng::new(1, 0);
    assert!((0..1_000).all(|_| model.active_days(&mut rng) == 1));
}

#[test]
fn geometric_shape_matches_the_decay() {
    let days = 30;
    let decay = 0.6;
    let model = RetentionModel::new(days, decay).unwrap();

    let expected_one = (1.0 - decay) / (1.0 - decay.powi(days as i32));
    assert!((model.probability_of(1) - expected_one).abs() < 1e-12);
    let total: f64 = (1..=days).map(|k| model.probability_of(k)).sum();
    assert!((total - 1.0).abs() < 1e-9);

    let draws = 20_000;
    let mut counts = vec![0u32; days as usize];
    let mut rng = GeneratorRng::new(99, 3);
    for _ in 0..draws {
        counts[(model.active_days(&mut rng) - 1) as usize] += 1;
    }

    let share_one = counts[0] as f64 / draws as f64;
    assert!(
        (share_one - expected_one).abs() < 0.02,
        "one-day share {share_one:.4}, expected {expected_one:.4}"
    );
    assert!(
        counts[0] > counts[1] && counts[1] > counts[2],
        "retention must decrease: {:?}",
        &counts[..3]
    );
}

#[test]
fn flat_decay_is_uniform() {
    let model = RetentionModel::new(4, 1.0).unwrap();
    for k in 1..=4 {
        assert!((model.probability_of(k) - 0.25).abs() < 1e-12);
    }
    assert_eq!(model.probability_of(0), 0.0);
    assert_eq!(model.probability_of(5), 0.0);
}

#[test]
fn zero_day_horizon_is_rejected() {
    let err = RetentionModel::new(0, 0.6).err().expect("zero days must fail");
    assert!(matches!(err, SimError::NonPositiveHorizon { days: 0 }));
}
