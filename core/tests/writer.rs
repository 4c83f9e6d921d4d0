//! Output tests: CSV tables and the run manifest on disk.

use serde::Serialize;
use std::{fs, path::PathBuf};
use streamsynth_core::{
    config::SimConfig,
    engine::SimEngine,
    writer::{self, CsvTable, TabularWriter},
};

const AD_EVENT_COLUMNS: &str = "event_id,session_id,user_id,ad_id,ad_format,creative_type,\
campaign_id,event_type,event_timestamp,device_type,os,country,region,city,surface,placement,\
position,revenue_usd,cost_usd,view_duration_ms,is_billable,impression_id,click_id,attribution_type";

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("streamsynth-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn write_dataset_produces_every_table_and_a_manifest() {
    let _ = env_logger::builder().is_test(true).try_init();
    let engine = SimEngine::build_test(51).unwrap();
    let dataset = engine.run().unwrap();
    let dir = scratch_dir("write-all");

    let files = TabularWriter::new(dir.clone())
        .write_dataset(&dataset, engine.config())
        .unwrap();
    assert_eq!(files.len(), 7);
    for name in [
        writer::USERS_FILE,
        writer::CONTENT_FILE,
        writer::CAMPAIGNS_FILE,
        writer::PLAYBACK_SESSIONS_FILE,
        writer::AD_EVENTS_FILE,
        writer::AD_CREATIVES_FILE,
        writer::MANIFEST_FILE,
    ] {
        assert!(dir.join(name).is_file(), "{name} missing");
    }

    let events = fs::read_to_string(dir.join(writer::AD_EVENTS_FILE)).unwrap();
    let mut lines = events.lines();
    assert_eq!(lines.next(), Some(AD_EVENT_COLUMNS));
    assert_eq!(lines.count(), dataset.ad_events.len());

    let manifest_text = fs::read_to_string(dir.join(writer::MANIFEST_FILE)).unwrap();
    let manifest: serde_json::Value = serde_json::from_str(&manifest_text).unwrap();
    assert_eq!(manifest["run_id"], "run-51");
    assert_eq!(manifest["seed"], 51);
    assert_eq!(manifest["config"]["n_users"], 200);
    assert_eq!(manifest["summary"]["impressions"], dataset.summary.impressions);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn disabled_playback_skips_its_table() {
    let mut config = SimConfig::default_test();
    config.playback.enabled = false;
    let engine = SimEngine::with_standard_reference(config).unwrap();
    let dataset = engine.run().unwrap();
    let dir = scratch_dir("no-playback");

    let files = TabularWriter::new(dir.clone())
        .write_dataset(&dataset, engine.config())
        .unwrap();
    assert_eq!(files.len(), 6);
    assert!(!dir.join(writer::PLAYBACK_SESSIONS_FILE).exists());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn optional_fields_serialize_as_empty_cells() {
    let dataset = SimEngine::build_test(3).unwrap().run().unwrap();
    let impression = dataset.ad_events.iter().take(1).cloned().collect::<Vec<_>>();
    let csv = String::from_utf8(writer::to_csv_bytes(&impression).unwrap()).unwrap();
    let row = csv.lines().nth(1).expect("one data row");

    // Impression rows end with impression_id, empty click_id, empty attribution.
    assert!(row.ends_with(&format!("{},,", impression[0].event_id)), "row: {row}");
    assert!(row.contains(",impression,"));
    assert!(row.contains(",true,"));
}

#[test]
fn empty_record_set_still_writes_its_header() {
    let empty: Vec<streamsynth_core::creative_sampler::AdCreative> = Vec::new();
    let csv = String::from_utf8(writer::to_csv_bytes(&empty).unwrap()).unwrap();
    assert_eq!(
        csv,
        "ad_id,ad_format,creative_type,duration_seconds,base_cpm_usd,click_boost,is_interactive\n"
    );
}

#[test]
fn playback_table_without_sessions_is_header_only() {
    let mut config = SimConfig::default_test();
    config.playback.avg_sessions_per_day = 0.0;
    config.playback.sessions_std_dev = 0.0;
    let engine = SimEngine::with_standard_reference(config).unwrap();
    let dataset = engine.run().unwrap();
    assert!(dataset.playback_sessions.is_empty());

    let dir = scratch_dir("empty-playback");
    TabularWriter::new(dir.clone())
        .write_dataset(&dataset, engine.config())
        .unwrap();
    let text = fs::read_to_string(dir.join(writer::PLAYBACK_SESSIONS_FILE)).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("playback_session_id,user_id,content_id"));

    fs::remove_dir_all(&dir).ok();
}

/// Header that serde would derive from the first record.
fn derived_header<T: Serialize>(record: &T) -> String {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.serialize(record).unwrap();
    let bytes = w.into_inner().unwrap();
    String::from_utf8(bytes).unwrap().lines().next().unwrap().to_string()
}

fn assert_columns_match<T: CsvTable>(records: &[T]) {
    let first = records.first().expect("non-empty table");
    assert_eq!(T::COLUMNS.join(","), derived_header(first));
}

#[test]
fn declared_columns_match_the_serialized_fields() {
    let dataset = SimEngine::build_test(29).unwrap().run().unwrap();
    assert_columns_match(&dataset.users);
    assert_columns_match(&dataset.content);
    assert_columns_match(&dataset.campaigns);
    assert_columns_match(&dataset.playback_sessions);
    assert_columns_match(&dataset.ad_events);
    assert_columns_match(&dataset.ad_creatives);
}
