//! Tabular output: one CSV per record set plus a JSON run manifest.
//!
//! RULE: Only the writer touches the filesystem, and only after a run
//! has completed. A failed run never leaves a partial dataset behind
//! from this module.

use crate::{
    config::SimConfig,
    engine::{Dataset, RunSummary},
    error::SimResult,
};
use serde::Serialize;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

pub const USERS_FILE: &str = "users.csv";
pub const CONTENT_FILE: &str = "content.csv";
pub const CAMPAIGNS_FILE: &str = "campaigns.csv";
pub const PLAYBACK_SESSIONS_FILE: &str = "playback_sessions.csv";
pub const AD_EVENTS_FILE: &str = "ad_events.csv";
pub const AD_CREATIVES_FILE: &str = "ad_creatives.csv";
pub const MANIFEST_FILE: &str = "run_manifest.json";

/// A record type with a fixed CSV column order.
///
/// RULE: `COLUMNS` lists the serialized field names in declaration
/// order. The header row comes from here, so an empty table still
/// carries its header.
pub trait CsvTable: Serialize {
    const COLUMNS: &'static [&'static str];
}

#[derive(Debug, Serialize)]
pub struct RunManifest<'a> {
    pub run_id: &'a str,
    pub seed: u64,
    pub generator_version: &'static str,
    pub files: Vec<String>,
    pub config: &'a SimConfig,
    pub summary: &'a RunSummary,
}

pub struct TabularWriter {
    out_dir: PathBuf,
}

impl TabularWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Write every table and the manifest. Returns the written paths.
    pub fn write_dataset(&self, dataset: &Dataset, config: &SimConfig) -> SimResult<Vec<PathBuf>> {
        fs::create_dir_all(&self.out_dir)?;

        let mut written = vec![
            self.write_table(USERS_FILE, &dataset.users)?,
            self.write_table(CONTENT_FILE, &dataset.content)?,
            self.write_table(CAMPAIGNS_FILE, &dataset.campaigns)?,
        ];
        if config.playback.enabled {
            written.push(self.write_table(PLAYBACK_SESSIONS_FILE, &dataset.playback_sessions)?);
        }
        written.push(self.write_table(AD_EVENTS_FILE, &dataset.ad_events)?);
        written.push(self.write_table(AD_CREATIVES_FILE, &dataset.ad_creatives)?);

        let manifest = RunManifest {
            run_id: &dataset.summary.run_id,
            seed: dataset.summary.seed,
            generator_version: env!("CARGO_PKG_VERSION"),
            files: written
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .collect(),
            config,
            summary: &dataset.summary,
        };
        let manifest_path = self.out_dir.join(MANIFEST_FILE);
        let mut file = fs::File::create(&manifest_path)?;
        serde_json::to_writer_pretty(&mut file, &manifest)?;
        file.write_all(b"\n")?;
        written.push(manifest_path);

        log::info!("writer: {} files written to {}", written.len(), self.out_dir.display());
        Ok(written)
    }

    /// One CSV with a header row, even when there are no records.
    pub fn write_table<T: CsvTable>(&self, file_name: &str, records: &[T]) -> SimResult<PathBuf> {
        let path = self.out_dir.join(file_name);
        if records.is_empty() {
            log::warn!("writer: {file_name} has no rows, header only");
        }
        write_records(fs::File::create(&path)?, records)?;
        log::debug!("writer: {} rows -> {}", records.len(), path.display());
        Ok(path)
    }
}

/// Serialize records as CSV (header row first) into any sink.
pub fn write_records<W: Write, T: CsvTable>(sink: W, records: &[T]) -> SimResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(sink);
    writer.write_record(T::COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// CSV bytes for an in-memory record set.
pub fn to_csv_bytes<T: CsvTable>(records: &[T]) -> SimResult<Vec<u8>> {
    let mut buffer = Vec::new();
    write_records(&mut buffer, records)?;
    Ok(buffer)
}
