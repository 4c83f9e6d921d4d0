use crate::error::{SimError, SimResult};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// How impressions are billed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BillingModel {
    /// Revenue and cost both equal base_cpm / 1000 per impression.
    Cpm,
    /// Zero revenue and a small flat random cost per impression.
    FlatCost,
}

// ── Leaf population parameters ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPopulationConfig {
    pub signup_window_start: NaiveDate,
    pub signup_window_end: NaiveDate,
    pub max_last_seen_days: u64,
}

impl Default for UserPopulationConfig {
    fn default() -> Self {
        Self {
            signup_window_start: date(2025, 1, 1),
            signup_window_end: date(2026, 1, 1),
            max_last_seen_days: 180,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentCatalogConfig {
    pub n_movies: usize,
    pub n_series: usize,
    pub max_seasons_per_series: u32,
    pub min_episodes_per_season: u32,
    pub max_episodes_per_season: u32,
    pub release_year_min: i32,
    pub release_year_max: i32,
}

impl Default for ContentCatalogConfig {
    fn default() -> Self {
        Self {
            n_movies: 300,
            n_series: 200,
            max_seasons_per_series: 6,
            min_episodes_per_season: 4,
            max_episodes_per_season: 12,
            release_year_min: 1995,
            release_year_max: 2025,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignConfig {
    pub n_campaigns: usize,
    pub n_advertisers: u64,
    pub flight_window_start: NaiveDate,
    pub flight_window_end: NaiveDate,
    pub min_flight_days: u64,
    pub max_flight_days: u64,
    pub min_daily_budget_usd: f64,
    pub max_daily_budget_usd: f64,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            n_campaigns: 20,
            n_advertisers: 10,
            flight_window_start: date(2024, 12, 1),
            flight_window_end: date(2025, 3, 31),
            min_flight_days: 14,
            max_flight_days: 60,
            min_daily_budget_usd: 500.0,
            max_daily_budget_usd: 25_000.0,
        }
    }
}

/// Latest campaign start is this many days before the window end.
pub const CAMPAIGN_START_MARGIN_DAYS: i64 = 30;

// ── Upper bounds enforced by validate() ───────────────────────────

/// Longest horizon, flight or last-seen offset, in days.
pub const MAX_SPAN_DAYS: u64 = 36_500;
pub const MAX_IMPRESSION_JITTER_SECS: u64 = 86_400;
/// Playback durations are clamped to this after the Normal draw.
pub const MAX_PLAYBACK_DURATION_MIN: i64 = 1_440;
/// Ceiling on mean + TAIL_SIGMAS × sd for Normal-driven counts.
pub const MAX_MEAN_COUNT: f64 = 1_000.0;
const TAIL_SIGMAS: f64 = 10.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub enabled: bool,
    pub avg_sessions_per_day: f64,
    pub sessions_std_dev: f64,
    pub avg_duration_min: f64,
    pub duration_std_dev: f64,
    pub min_duration_min: i64,
    pub binge_threshold_min: i64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            avg_sessions_per_day: 0.9,
            sessions_std_dev: 0.6,
            avg_duration_min: 42.0,
            duration_std_dev: 15.0,
            min_duration_min: 5,
            binge_threshold_min: 60,
        }
    }
}

// ── Top-level config ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub seed: u64,
    pub n_users: usize,
    pub days: u32,
    pub start_date: NaiveDate,

    pub base_impression_to_click: f64,
    pub base_click_to_conversion: f64,
    pub base_view_to_conversion: f64,

    pub avg_sessions_per_day: f64,
    pub sessions_std_dev: f64,
    pub avg_events_per_session: f64,
    pub events_std_dev: f64,

    pub retention_decay: f64,
    /// Impressions land this many seconds (at most) after session start.
    pub impression_jitter_secs: u64,
    pub billing_model: BillingModel,

    pub users: UserPopulationConfig,
    pub content: ContentCatalogConfig,
    pub campaigns: CampaignConfig,
    pub playback: PlaybackConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 51,
            n_users: 10_000,
            days: 30,
            start_date: date(2026, 1, 1),
            base_impression_to_click: 0.09,
            base_click_to_conversion: 0.01,
            base_view_to_conversion: 0.001,
            avg_sessions_per_day: 1.3,
            sessions_std_dev: 0.5,
            avg_events_per_session: 4.0,
            events_std_dev: 1.0,
            retention_decay: 0.6,
            impression_jitter_secs: 600,
            billing_model: BillingModel::Cpm,
            users: UserPopulationConfig::default(),
            content: ContentCatalogConfig::default(),
            campaigns: CampaignConfig::default(),
            playback: PlaybackConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load from a JSON file. Missing keys fall back to defaults.
    /// In tests, use SimConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SimConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        Ok(config)
    }

    /// Small population for unit and integration tests.
    pub fn default_test() -> Self {
        Self {
            n_users: 200,
            days: 14,
            content: ContentCatalogConfig {
                n_movies: 20,
                n_series: 5,
                ..ContentCatalogConfig::default()
            },
            campaigns: CampaignConfig {
                n_campaigns: 5,
                ..CampaignConfig::default()
            },
            ..Self::default()
        }
    }

    /// Reject anything that would fail mid-run. Called before any RNG
    /// stream is created.
    pub fn validate(&self) -> SimResult<()> {
        if self.days == 0 {
            return Err(SimError::NonPositiveHorizon { days: self.days });
        }
        if self.n_users == 0 {
            return Err(invalid("n_users", "at least one user is required"));
        }
        at_most("days", self.days as u64, MAX_SPAN_DAYS)?;
        if self.start_date.checked_add_days(Days::new(self.days as u64)).is_none() {
            return Err(invalid("days", "horizon runs past the last representable date"));
        }
        at_most(
            "impression_jitter_secs",
            self.impression_jitter_secs,
            MAX_IMPRESSION_JITTER_SECS,
        )?;

        probability("base_impression_to_click", self.base_impression_to_click)?;
        probability("base_click_to_conversion", self.base_click_to_conversion)?;
        probability("base_view_to_conversion", self.base_view_to_conversion)?;

        normal_params(
            "avg_sessions_per_day",
            self.avg_sessions_per_day,
            self.sessions_std_dev,
            MAX_MEAN_COUNT,
        )?;
        normal_params(
            "avg_events_per_session",
            self.avg_events_per_session,
            self.events_std_dev,
            MAX_MEAN_COUNT,
        )?;

        if !(self.retention_decay > 0.0 && self.retention_decay <= 1.0) {
            return Err(invalid(
                "retention_decay",
                &format!("{} must be in (0, 1]", self.retention_decay),
            ));
        }

        self.validate_users()?;
        self.validate_content()?;
        self.validate_campaigns()?;
        if self.playback.enabled {
            self.validate_playback()?;
        }
        Ok(())
    }

    fn validate_users(&self) -> SimResult<()> {
        let u = &self.users;
        if u.signup_window_start > u.signup_window_end {
            return Err(SimError::InvalidDateRange {
                field: "users.signup_window",
                start: u.signup_window_start,
                end: u.signup_window_end,
            });
        }
        if u.max_last_seen_days == 0 {
            return Err(invalid("users.max_last_seen_days", "must be at least 1"));
        }
        at_most("users.max_last_seen_days", u.max_last_seen_days, MAX_SPAN_DAYS)?;
        reachable("users.max_last_seen_days", u.signup_window_end, u.max_last_seen_days)
    }

    fn validate_content(&self) -> SimResult<()> {
        let c = &self.content;
        if c.n_movies == 0 && c.n_series == 0 {
            return Err(SimError::EmptyCatalog { catalog: "content" });
        }
        if c.max_seasons_per_series == 0 {
            return Err(invalid("content.max_seasons_per_series", "must be at least 1"));
        }
        if c.min_episodes_per_season == 0 || c.min_episodes_per_season > c.max_episodes_per_season {
            return Err(invalid(
                "content.episodes_per_season",
                &format!(
                    "need 1 <= min ({}) <= max ({})",
                    c.min_episodes_per_season, c.max_episodes_per_season
                ),
            ));
        }
        if c.release_year_min > c.release_year_max {
            return Err(invalid("content.release_year", "min year is after max year"));
        }
        if c.release_year_max.checked_sub(c.release_year_min).is_none() {
            return Err(invalid("content.release_year", "year span does not fit in an i32"));
        }
        Ok(())
    }

    fn validate_campaigns(&self) -> SimResult<()> {
        let c = &self.campaigns;
        if c.n_campaigns == 0 {
            return Err(SimError::EmptyCatalog { catalog: "campaigns" });
        }
        if c.n_advertisers == 0 {
            return Err(invalid("campaigns.n_advertisers", "must be at least 1"));
        }
        let latest_start = c
            .flight_window_end
            .checked_sub_days(Days::new(CAMPAIGN_START_MARGIN_DAYS as u64))
            .ok_or_else(|| {
                invalid("campaigns.flight_window_end", "too close to the earliest date")
            })?;
        if c.flight_window_start > latest_start {
            return Err(SimError::InvalidDateRange {
                field: "campaigns.flight_window",
                start: c.flight_window_start,
                end: latest_start,
            });
        }
        if c.min_flight_days == 0 || c.min_flight_days > c.max_flight_days {
            return Err(invalid("campaigns.flight_days", "need 1 <= min <= max"));
        }
        at_most("campaigns.max_flight_days", c.max_flight_days, MAX_SPAN_DAYS)?;
        reachable("campaigns.max_flight_days", latest_start, c.max_flight_days)?;
        if !(c.min_daily_budget_usd >= 0.0
            && c.min_daily_budget_usd <= c.max_daily_budget_usd
            && c.max_daily_budget_usd.is_finite())
        {
            return Err(invalid("campaigns.daily_budget", "need 0 <= min <= max, both finite"));
        }
        Ok(())
    }

    fn validate_playback(&self) -> SimResult<()> {
        let p = &self.playback;
        normal_params(
            "playback.avg_sessions_per_day",
            p.avg_sessions_per_day,
            p.sessions_std_dev,
            MAX_MEAN_COUNT,
        )?;
        normal_params(
            "playback.avg_duration_min",
            p.avg_duration_min,
            p.duration_std_dev,
            MAX_PLAYBACK_DURATION_MIN as f64,
        )?;
        if !(0..=MAX_PLAYBACK_DURATION_MIN).contains(&p.min_duration_min) {
            return Err(invalid(
                "playback.min_duration_min",
                &format!("{} must be in 0..={MAX_PLAYBACK_DURATION_MIN}", p.min_duration_min),
            ));
        }
        if self.content.n_movies == 0 || self.content.n_series == 0 {
            return Err(invalid(
                "playback.enabled",
                "playback sessions need both movies and series in the catalog",
            ));
        }
        Ok(())
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn invalid(field: &'static str, reason: &str) -> SimError {
    SimError::InvalidConfig {
        field,
        reason: reason.to_string(),
    }
}

fn probability(field: &'static str, p: f64) -> SimResult<()> {
    // Values above 1 are legal: they degrade to certainty.
    if !p.is_finite() || p < 0.0 {
        return Err(invalid(field, &format!("{p} must be finite and non-negative")));
    }
    if p > 1.0 {
        log::warn!("{field}={p} exceeds 1.0; every trial will fire");
    }
    Ok(())
}

fn normal_params(field: &'static str, mean: f64, std_dev: f64, ceiling: f64) -> SimResult<()> {
    if !mean.is_finite() || mean < 0.0 {
        return Err(invalid(field, &format!("mean {mean} must be finite and non-negative")));
    }
    if !std_dev.is_finite() || std_dev < 0.0 {
        return Err(invalid(
            field,
            &format!("std dev {std_dev} must be finite and non-negative"),
        ));
    }
    if mean + TAIL_SIGMAS * std_dev > ceiling {
        return Err(invalid(
            field,
            &format!("mean {mean} + {TAIL_SIGMAS} sd ({std_dev}) exceeds {ceiling}"),
        ));
    }
    Ok(())
}

fn at_most(field: &'static str, value: u64, max: u64) -> SimResult<()> {
    if value > max {
        return Err(invalid(field, &format!("{value} exceeds the limit of {max}")));
    }
    Ok(())
}

/// `from + days` must be a representable date.
fn reachable(field: &'static str, from: NaiveDate, days: u64) -> SimResult<()> {
    if from.checked_add_days(Days::new(days)).is_none() {
        return Err(invalid(field, "offset runs past the last representable date"));
    }
    Ok(())
}
