//! Entity population tests: users, content catalog, campaigns and
//! playback sessions.

use std::collections::{HashMap, HashSet};
use streamsynth_core::{
    config::SimConfig,
    engine::{Dataset, SimEngine},
    reference_data::{ContentType, ReferenceData, UserSegment},
};

fn dataset(seed: u64) -> Dataset {
    SimEngine::build_test(seed).unwrap().run().unwrap()
}

#[test]
fn user_population_has_configured_count_and_ids() {
    let data = dataset(42);
    assert_eq!(
        data.users.len(),
        200,
        "Expected 200 test users, got {}",
        data.users.len()
    );
    assert_eq!(data.users[0].user_id, "user_0");
    assert_eq!(data.users[199].user_id, "user_199");
}

#[test]
fn user_device_os_and_geo_come_from_the_reference_tables() {
    let data = dataset(7);
    let reference = ReferenceData::standard().unwrap();

    for user in &data.users {
        let allowed = reference
            .os_for(user.primary_device_type)
            .expect("device in reference table");
        assert!(
            allowed.contains(&user.primary_os),
            "{} is not an OS for {:?}",
            user.primary_os,
            user.primary_device_type
        );

        let country = reference
            .geo
            .iter()
            .find(|c| c.code == user.country)
            .expect("country in hierarchy");
        let region = country
            .regions
            .iter()
            .find(|r| r.code == user.region)
            .expect("region belongs to country");
        assert!(region.cities.contains(&user.city));
    }
}

#[test]
fn user_dates_are_ordered_and_kids_flag_matches_segment() {
    let data = dataset(9);
    let config = SimConfig::default_test();

    for user in &data.users {
        assert!(user.signup_date >= config.users.signup_window_start);
        assert!(user.signup_date <= config.users.signup_window_end);
        assert_eq!(user.first_seen_date, user.signup_date);
        assert!(user.last_seen_date > user.signup_date);
        assert_eq!(user.is_kids_profile, user.user_segment == UserSegment::Kids);
    }
}

#[test]
fn content_catalog_lists_movies_then_episodes() {
    let data = dataset(42);
    let movies: Vec<_> = data
        .content
        .iter()
        .filter(|c| c.content_type == ContentType::Movie)
        .collect();
    assert_eq!(movies.len(), 20);
    assert!(movies
        .iter()
        .all(|m| m.series_id.is_none() && m.episode_number.is_none()));
    assert_eq!(data.content[0].content_id, "movie_1");

    let episodes: Vec<_> = data
        .content
        .iter()
        .filter(|c| c.content_type == ContentType::Episode)
        .collect();
    assert!(
        episodes.len() >= 5 * 4,
        "each series has at least one 4-episode season"
    );

    let series: HashSet<_> = episodes
        .iter()
        .map(|e| e.series_id.clone().expect("episode has series"))
        .collect();
    assert_eq!(series.len(), 5);

    let ids: HashSet<_> = data.content.iter().map(|c| c.content_id.as_str()).collect();
    assert_eq!(ids.len(), data.content.len(), "content ids must be unique");
}

#[test]
fn episodes_of_a_series_share_genre_and_rating() {
    let data = dataset(3);
    let mut by_series: HashMap<&str, (&str, &str)> = HashMap::new();
    for ep in data
        .content
        .iter()
        .filter(|c| c.content_type == ContentType::Episode)
    {
        let series = ep.series_id.as_deref().unwrap();
        let first = *by_series
            .entry(series)
            .or_insert((ep.genre, ep.maturity_rating));
        assert_eq!(first, (ep.genre, ep.maturity_rating), "series {series} drifted");
        assert!(ep.season_number.unwrap() >= 1);
    }
}

#[test]
fn campaigns_have_valid_flights_and_bid_strategies() {
    let data = dataset(5);
    let config = SimConfig::default_test();
    assert_eq!(data.campaigns.len(), 5);

    for (i, camp) in data.campaigns.iter().enumerate() {
        assert_eq!(camp.campaign_id, format!("camp_{}", i + 1));
        assert!(camp.start_date >= config.campaigns.flight_window_start);
        assert!(camp.end_date > camp.start_date);
        assert_eq!(camp.bid_strategy, camp.objective.bid_strategy());
        assert!(camp.daily_budget_usd >= config.campaigns.min_daily_budget_usd);
        assert!(camp.daily_budget_usd <= config.campaigns.max_daily_budget_usd);
        assert!(camp.total_budget_usd >= camp.daily_budget_usd);
    }
}

#[test]
fn playback_sessions_reference_real_content_and_users() {
    let data = dataset(21);
    assert!(!data.playback_sessions.is_empty());
    let config = SimConfig::default_test();

    let content: HashMap<&str, ContentType> = data
        .content
        .iter()
        .map(|c| (c.content_id.as_str(), c.content_type))
        .collect();
    let users: HashMap<&str, _> = data
        .users
        .iter()
        .map(|u| (u.user_id.as_str(), u))
        .collect();

    for session in &data.playback_sessions {
        assert_eq!(
            content.get(session.content_id.as_str()),
            Some(&session.content_type),
            "playback {} points at unknown content {}",
            session.playback_session_id,
            session.content_id
        );

        let user = users[session.user_id.as_str()];
        assert_eq!(session.device_type, user.primary_device_type);
        assert_eq!(session.os, user.primary_os);
        assert_eq!(session.city, user.city);

        assert!(session.session_duration_minutes >= config.playback.min_duration_min);
        assert_eq!(
            (session.session_end_ts - session.session_start_ts).num_minutes(),
            session.session_duration_minutes
        );
        assert_eq!(
            session.is_binge,
            session.session_duration_minutes > config.playback.binge_threshold_min
        );
    }
}

#[test]
fn summary_counts_match_the_tables() {
    let data = dataset(17);
    let summary = &data.summary;
    assert_eq!(summary.run_id, "run-17");
    assert_eq!(summary.users, data.users.len());
    assert_eq!(summary.content_rows, data.content.len());
    assert_eq!(summary.playback_sessions, data.playback_sessions.len());
    assert_eq!(
        (summary.impressions + summary.clicks + summary.conversions) as usize,
        data.ad_events.len()
    );
    assert_eq!(
        summary.conversions,
        summary.click_through_conversions + summary.view_through_conversions
    );
    assert_eq!(summary.active_days_histogram.len(), 14);
    assert_eq!(summary.active_days_histogram.iter().sum::<u64>(), 200);
}
