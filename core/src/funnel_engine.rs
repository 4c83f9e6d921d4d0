//! The event funnel: impression → click → conversion per ad opportunity.
//!
//! Each opportunity is a three-stage Bernoulli chain:
//!   1. Impression, always emitted.
//!   2. Click, with p = base_ctr × placement.click_boost × creative.click_boost.
//!   3. Conversion, with p = click_to_conversion after a click, otherwise
//!      view_to_conversion (view-through).
//!
//! RULES:
//!   - Derived events are built from their impression via AdEvent::derive_from.
//!   - Timestamps only move forward along a chain.
//!   - Draw order is fixed. Moving any draw changes every later draw
//!     in that user's stream.

use crate::{
    config::{BillingModel, SimConfig},
    creative_sampler::{AdCreative, CreativeSampler},
    error::{SimError, SimResult},
    event::{AdEvent, AttributionType, DerivedFields, EventType},
    reference_data::{Placement, ReferenceData},
    retention_model::RetentionModel,
    rng::GeneratorRng,
    session_sampler::{AdSession, SessionSampler},
    types::{round_cents, round_to, EntityId},
    user_population::UserRecord,
};
use chrono::Duration;
use serde::Serialize;

pub const CLICK_DELAY_SECS: (u64, u64) = (1, 15);
pub const CONVERSION_DELAY_MINUTES: (u64, u64) = (1, 60);
pub const CLICK_COST_USD: (f64, f64) = (0.05, 0.50);
pub const CONVERSION_REVENUE_USD: (f64, f64) = (5.0, 150.0);
pub const FLAT_IMPRESSION_COST_USD: (f64, f64) = (0.001, 0.02);

/// Base view-duration range in ms, before the placement's view_boost.
pub fn view_duration_range(event_type: EventType) -> (u64, u64) {
    match event_type {
        EventType::Impression => (3_000, 10_000),
        EventType::Click => (2_000, 8_000),
        EventType::Conversion => (5_000, 20_000),
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct FunnelRates {
    pub impression_to_click: f64,
    pub click_to_conversion: f64,
    pub view_to_conversion: f64,
}

impl FunnelRates {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            impression_to_click: config.base_impression_to_click,
            click_to_conversion: config.base_click_to_conversion,
            view_to_conversion: config.base_view_to_conversion,
        }
    }

    /// Values above 1.0 are left as-is; a Bernoulli roll treats them as certain.
    pub fn click_probability(&self, placement: &Placement, creative: &AdCreative) -> f64 {
        self.impression_to_click * placement.click_boost * creative.click_boost
    }

    pub fn conversion_probability(&self, clicked: bool) -> f64 {
        if clicked {
            self.click_to_conversion
        } else {
            self.view_to_conversion
        }
    }
}

/// The 1–3 events produced by one funnel opportunity.
#[derive(Debug, Clone)]
pub struct FunnelOutcome {
    pub impression: AdEvent,
    pub click: Option<AdEvent>,
    pub conversion: Option<AdEvent>,
}

impl FunnelOutcome {
    /// Events in causal order.
    pub fn into_events(self) -> impl Iterator<Item = AdEvent> {
        std::iter::once(self.impression)
            .chain(self.click)
            .chain(self.conversion)
    }
}

/// Everything one user contributed to the ad dataset.
#[derive(Debug, Clone)]
pub struct UserFunnel {
    pub user_id: EntityId,
    pub active_days: u32,
    pub sessions: u32,
    pub events: Vec<AdEvent>,
    pub creatives: Vec<AdCreative>,
}

pub struct FunnelEngine<'a> {
    rates: FunnelRates,
    billing: BillingModel,
    impression_jitter_secs: u64,
    campaign_ids: &'a [EntityId],
    retention: RetentionModel,
    sessions: SessionSampler<'a>,
    creatives: CreativeSampler<'a>,
}

impl<'a> FunnelEngine<'a> {
    pub fn new(
        config: &SimConfig,
        reference: &'a ReferenceData,
        campaign_ids: &'a [EntityId],
    ) -> SimResult<Self> {
        if campaign_ids.is_empty() {
            return Err(SimError::EmptyCatalog { catalog: "campaigns" });
        }
        Ok(Self {
            rates: FunnelRates::from_config(config),
            billing: config.billing_model,
            impression_jitter_secs: config.impression_jitter_secs,
            campaign_ids,
            retention: RetentionModel::new(config.days, config.retention_decay)?,
            sessions: SessionSampler::new(config, reference)?,
            creatives: CreativeSampler::new(reference),
        })
    }

    pub fn rates(&self) -> FunnelRates {
        self.rates
    }

    pub fn creative_sampler(&self) -> &CreativeSampler<'a> {
        &self.creatives
    }

    /// Run every opportunity for one user. `rng` must be the user's own
    /// stream so the result does not depend on other users.
    pub fn run_user(&self, user: &UserRecord, rng: &mut GeneratorRng) -> UserFunnel {
        let active_days = self.retention.active_days(rng);
        let mut funnel = UserFunnel {
            user_id: user.user_id.clone(),
            active_days,
            sessions: 0,
            events: Vec::new(),
            creatives: Vec::new(),
        };

        for day in 0..active_days {
            let session_count = self.sessions.session_count(rng);
            for _ in 0..session_count {
                let session = self.sessions.sample_session(day, rng);
                funnel.sessions += 1;
                for _ in 0..session.event_count {
                    let creative = self.creatives.sample(rng);
                    let outcome = self.run_opportunity(user, &session, &creative, rng);
                    funnel.events.extend(outcome.into_events());
                    funnel.creatives.push(creative);
                }
            }
        }

        log::debug!(
            "funnel: user={} active_days={} sessions={} events={}",
            funnel.user_id,
            funnel.active_days,
            funnel.sessions,
            funnel.events.len()
        );
        funnel
    }

    /// One impression and whatever it leads to.
    pub fn run_opportunity(
        &self,
        user: &UserRecord,
        session: &AdSession,
        creative: &AdCreative,
        rng: &mut GeneratorRng,
    ) -> FunnelOutcome {
        let placement = &session.placement;

        // ── Impression ─────────────────────────────
        let offset = rng.range_inclusive(0, self.impression_jitter_secs);
        let impression_ts = session.start + Duration::seconds(offset as i64);
        let campaign_id = rng.pick(self.campaign_ids).clone();
        let impression_id = rng.uuid().to_string();
        let (revenue_usd, cost_usd) = match self.billing {
            BillingModel::Cpm => {
                let per_impression = creative.base_cpm_usd / 1000.0;
                (per_impression, per_impression)
            }
            BillingModel::FlatCost => {
                let (lo, hi) = FLAT_IMPRESSION_COST_USD;
                (0.0, round_to(rng.uniform(lo, hi), 4))
            }
        };

        let impression = AdEvent {
            event_id: impression_id.clone(),
            session_id: session.session_id.clone(),
            user_id: user.user_id.clone(),
            ad_id: creative.ad_id.clone(),
            ad_format: creative.ad_format,
            creative_type: creative.creative_type,
            campaign_id,
            event_type: EventType::Impression,
            event_timestamp: impression_ts,
            device_type: user.primary_device_type,
            os: user.primary_os,
            country: user.country,
            region: user.region,
            city: user.city,
            surface: placement.surface,
            placement: placement.slot,
            position: placement.position,
            revenue_usd,
            cost_usd,
            view_duration_ms: view_duration_ms(EventType::Impression, placement, rng),
            is_billable: true,
            impression_id,
            click_id: None,
            attribution_type: None,
        };

        // ── Click ──────────────────────────────────
        let click = if rng.chance(self.rates.click_probability(placement, creative)) {
            let event_id = rng.uuid().to_string();
            let delay = rng.range_inclusive(CLICK_DELAY_SECS.0, CLICK_DELAY_SECS.1);
            let (lo, hi) = CLICK_COST_USD;
            let cost_usd = round_cents(rng.uniform(lo, hi));
            Some(AdEvent::derive_from(
                &impression,
                DerivedFields {
                    event_id,
                    event_type: EventType::Click,
                    event_timestamp: impression.event_timestamp + Duration::seconds(delay as i64),
                    revenue_usd: 0.0,
                    cost_usd,
                    view_duration_ms: view_duration_ms(EventType::Click, placement, rng),
                    click_id: None,
                    attribution_type: AttributionType::ClickThrough,
                },
            ))
        } else {
            None
        };

        // ── Conversion ─────────────────────────────
        let conversion = if rng.chance(self.rates.conversion_probability(click.is_some())) {
            let event_id = rng.uuid().to_string();
            let delay = rng.range_inclusive(CONVERSION_DELAY_MINUTES.0, CONVERSION_DELAY_MINUTES.1);
            let (lo, hi) = CONVERSION_REVENUE_USD;
            let revenue_usd = round_cents(rng.uniform(lo, hi));
            let (anchor_ts, click_id, attribution_type) = match &click {
                Some(c) => (
                    c.event_timestamp,
                    Some(c.event_id.clone()),
                    AttributionType::ClickThrough,
                ),
                None => (impression.event_timestamp, None, AttributionType::ViewThrough),
            };
            Some(AdEvent::derive_from(
                &impression,
                DerivedFields {
                    event_id,
                    event_type: EventType::Conversion,
                    event_timestamp: anchor_ts + Duration::minutes(delay as i64),
                    revenue_usd,
                    cost_usd: 0.0,
                    view_duration_ms: view_duration_ms(EventType::Conversion, placement, rng),
                    click_id,
                    attribution_type,
                },
            ))
        } else {
            None
        };

        FunnelOutcome {
            impression,
            click,
            conversion,
        }
    }
}

/// Uniform draw from the event type's base range, scaled by view_boost
/// and truncated to whole milliseconds.
pub fn view_duration_ms(
    event_type: EventType,
    placement: &Placement,
    rng: &mut GeneratorRng,
) -> u64 {
    let (lo, hi) = view_duration_range(event_type);
    (rng.range_inclusive(lo, hi) as f64 * placement.view_boost) as u64
}
