//! Ad-session sampling tests.

use chrono::{Duration, NaiveDate};
use std::collections::HashSet;
use streamsynth_core::{
    calendar::midnight,
    config::SimConfig,
    reference_data::ReferenceData,
    rng::GeneratorRng,
    session_sampler::SessionSampler,
};

#[test]
fn sessions_and_events_are_never_zero() {
    let reference = ReferenceData::standard().unwrap();
    // A mean of zero makes most raw draws round to zero or below.
    let config = SimConfig {
        avg_sessions_per_day: 0.0,
        sessions_std_dev: 0.5,
        avg_events_per_session: 0.0,
        events_std_dev: 1.0,
        ..SimConfig::default_test()
    };
    let sampler = SessionSampler::new(&config, &reference).unwrap();
    let mut rng = GeneratorRng::new(51, 0);

    for day in 0..config.days {
        assert!(sampler.session_count(&mut rng) >= 1);
        let session = sampler.sample_session(day, &mut rng);
        assert!(session.event_count >= 1);
    }
}

#[test]
fn zero_deviation_rounds_the_mean() {
    let reference = ReferenceData::standard().unwrap();
    let config = SimConfig {
        avg_sessions_per_day: 1.3,
        sessions_std_dev: 0.0,
        avg_events_per_session: 4.0,
        events_std_dev: 0.0,
        ..SimConfig::default_test()
    };
    let sampler = SessionSampler::new(&config, &reference).unwrap();
    let mut rng = GeneratorRng::new(2, 0);

    for _ in 0..100 {
        assert_eq!(sampler.session_count(&mut rng), 1);
        assert_eq!(sampler.sample_session(0, &mut rng).event_count, 4);
    }
}

#[test]
fn session_start_falls_on_its_day() {
    let reference = ReferenceData::standard().unwrap();
    let config = SimConfig::default_test();
    let sampler = SessionSampler::new(&config, &reference).unwrap();
    let mut rng = GeneratorRng::new(8, 0);
    let horizon_start = midnight(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());

    for day in 0..config.days {
        let session = sampler.sample_session(day, &mut rng);
        let day_start = horizon_start + Duration::days(day as i64);
        assert_eq!(session.day, day);
        assert!(session.start >= day_start);
        assert!(session.start < day_start + Duration::days(1));
        assert!(reference.placements.contains(&session.placement));
    }
}

#[test]
fn session_ids_are_unique_and_every_placement_appears() {
    let reference = ReferenceData::standard().unwrap();
    let config = SimConfig::default_test();
    let sampler = SessionSampler::new(&config, &reference).unwrap();
    let mut rng = GeneratorRng::new(12, 0);

    let sessions: Vec<_> = (0..2_000).map(|_| sampler.sample_session(0, &mut rng)).collect();
    let ids: HashSet<_> = sessions.iter().map(|s| s.session_id.as_str()).collect();
    assert_eq!(ids.len(), sessions.len());

    for placement in &reference.placements {
        assert!(
            sessions.iter().any(|s| s.placement.slot == placement.slot),
            "{:?} never sampled",
            placement.slot
        );
    }
}

#[test]
fn negative_deviation_is_a_config_error() {
    let reference = ReferenceData::standard().unwrap();
    let config = SimConfig {
        sessions_std_dev: -1.0,
        ..SimConfig::default_test()
    };
    let err = SessionSampler::new(&config, &reference).err().expect("must fail");
    assert!(err.is_configuration());
}
