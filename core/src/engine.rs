//! The generation engine: wires every generator into one run.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Users              (slot: users)
//!   2. Content catalog    (slot: content)
//!   3. Campaigns          (slot: campaigns)
//!   4. Playback sessions  (slot: playback, one stream per user)
//!   5. Ad funnel          (slot: funnel, one stream per user)
//!
//! RULES:
//!   - Reference data and config are validated in build(), before any
//!     RNG stream exists. A run that starts never fails on config.
//!   - All randomness flows through the RngBank.
//!   - No I/O happens here; the caller hands the Dataset to the writer.

use crate::{
    calendar::SimCalendar,
    campaign_population::{CampaignPopulation, CampaignRecord},
    config::SimConfig,
    content_catalog::{ContentCatalog, ContentRecord},
    creative_sampler::AdCreative,
    error::SimResult,
    event::{AdEvent, AttributionType, EventType},
    funnel_engine::FunnelEngine,
    generator::run_generator,
    playback_sessions::{PlaybackSessionRecord, PlaybackSessions},
    reference_data::ReferenceData,
    rng::{GeneratorSlot, RngBank},
    types::{EntityId, RunId},
    user_population::{UserPopulation, UserRecord},
};
use serde::Serialize;

/// Every table produced by one run.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub users: Vec<UserRecord>,
    pub content: Vec<ContentRecord>,
    pub campaigns: Vec<CampaignRecord>,
    pub playback_sessions: Vec<PlaybackSessionRecord>,
    pub ad_events: Vec<AdEvent>,
    pub ad_creatives: Vec<AdCreative>,
    pub summary: RunSummary,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct RunSummary {
    pub run_id: RunId,
    pub seed: u64,
    pub users: usize,
    pub content_rows: usize,
    pub campaigns: usize,
    pub playback_sessions: usize,
    pub ad_sessions: u64,
    /// Entry k-1 counts users with exactly k active days.
    pub active_days_histogram: Vec<u64>,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub click_through_conversions: u64,
    pub view_through_conversions: u64,
    pub total_revenue_usd: f64,
    pub total_cost_usd: f64,
}

impl RunSummary {
    fn record_event(&mut self, event: &AdEvent) {
        match event.event_type {
            EventType::Impression => self.impressions += 1,
            EventType::Click => self.clicks += 1,
            EventType::Conversion => {
                self.conversions += 1;
                match event.attribution_type {
                    Some(AttributionType::ClickThrough) => self.click_through_conversions += 1,
                    Some(AttributionType::ViewThrough) => self.view_through_conversions += 1,
                    None => {}
                }
            }
        }
        self.total_revenue_usd += event.revenue_usd;
        self.total_cost_usd += event.cost_usd;
    }

    pub fn click_through_rate(&self) -> f64 {
        if self.impressions == 0 {
            0.0
        } else {
            self.clicks as f64 / self.impressions as f64
        }
    }
}

pub struct SimEngine {
    pub run_id: RunId,
    pub calendar: SimCalendar,
    pub rng_bank: RngBank,
    config: SimConfig,
    reference: ReferenceData,
}

impl SimEngine {
    /// Validate everything, then return an engine ready to run.
    /// Configuration errors surface here and nothing is generated.
    pub fn build(config: SimConfig, reference: ReferenceData) -> SimResult<Self> {
        reference.validate()?;
        config.validate()?;
        Ok(Self {
            run_id: format!("run-{}", config.seed),
            calendar: SimCalendar::new(config.start_date, config.days),
            rng_bank: RngBank::new(config.seed),
            config,
            reference,
        })
    }

    /// Engine over the standard reference tables.
    pub fn with_standard_reference(config: SimConfig) -> SimResult<Self> {
        Self::build(config, ReferenceData::standard()?)
    }

    /// Small engine for tests: SimConfig::default_test() with `seed`.
    pub fn build_test(seed: u64) -> SimResult<Self> {
        Self::with_standard_reference(SimConfig {
            seed,
            ..SimConfig::default_test()
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Generate the full dataset in one pass.
    pub fn run(&self) -> SimResult<Dataset> {
        let config = &self.config;
        let reference = &self.reference;
        log::info!(
            "{}: seed={} users={} days={} start={}",
            self.run_id,
            config.seed,
            config.n_users,
            config.days,
            config.start_date
        );

        let users = run_generator(&UserPopulation::new(config, reference), &self.rng_bank)?;
        let content = run_generator(&ContentCatalog::new(config, reference), &self.rng_bank)?;
        let campaigns = run_generator(&CampaignPopulation::new(config, reference), &self.rng_bank)?;

        let playback_sessions = if config.playback.enabled {
            let generator = PlaybackSessions::new(config, reference, &users, &content)?;
            run_generator(&generator, &self.rng_bank)?
        } else {
            log::info!("playback_sessions: disabled");
            Vec::new()
        };

        let campaign_ids: Vec<EntityId> = campaigns.iter().map(|c| c.campaign_id.clone()).collect();
        let funnel = FunnelEngine::new(config, reference, &campaign_ids)?;

        let mut summary = RunSummary {
            run_id: self.run_id.clone(),
            seed: config.seed,
            users: users.len(),
            content_rows: content.len(),
            campaigns: campaigns.len(),
            playback_sessions: playback_sessions.len(),
            active_days_histogram: vec![0; config.days as usize],
            ..RunSummary::default()
        };
        let mut ad_events = Vec::new();
        let mut ad_creatives = Vec::new();

        for (index, user) in users.iter().enumerate() {
            let mut rng = self.rng_bank.for_entity(GeneratorSlot::Funnel, index as u64);
            let result = funnel.run_user(user, &mut rng);

            summary.active_days_histogram[(result.active_days - 1) as usize] += 1;
            summary.ad_sessions += result.sessions as u64;
            for event in &result.events {
                summary.record_event(event);
            }
            ad_events.extend(result.events);
            ad_creatives.extend(result.creatives);
        }

        log::info!(
            "funnel: impressions={} clicks={} conversions={} \
             (click_through={} view_through={}) ctr={:.4}",
            summary.impressions,
            summary.clicks,
            summary.conversions,
            summary.click_through_conversions,
            summary.view_through_conversions,
            summary.click_through_rate()
        );
        log::debug!(
            "funnel: revenue=${:.2} cost=${:.2}",
            summary.total_revenue_usd,
            summary.total_cost_usd
        );

        Ok(Dataset {
            users,
            content,
            campaigns,
            playback_sessions,
            ad_events,
            ad_creatives,
            summary,
        })
    }
}
