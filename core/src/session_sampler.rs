//! Ad-session sampling for one active user-day.

use crate::{
    calendar::{SimCalendar, MINUTES_PER_DAY},
    config::SimConfig,
    error::SimResult,
    reference_data::{Placement, ReferenceData},
    rng::{normal, GeneratorRng},
    types::{DayIndex, EntityId},
};
use chrono::NaiveDateTime;
use rand_distr::Normal;

/// One ad session: every funnel opportunity inside it shares the
/// session id and the placement.
#[derive(Debug, Clone)]
pub struct AdSession {
    pub session_id: EntityId,
    pub day: DayIndex,
    pub start: NaiveDateTime,
    pub placement: Placement,
    pub event_count: u32,
}

pub struct SessionSampler<'a> {
    reference: &'a ReferenceData,
    calendar: SimCalendar,
    sessions_per_day: Normal<f64>,
    events_per_session: Normal<f64>,
}

impl<'a> SessionSampler<'a> {
    pub fn new(config: &SimConfig, reference: &'a ReferenceData) -> SimResult<Self> {
        Ok(Self {
            reference,
            calendar: SimCalendar::new(config.start_date, config.days),
            sessions_per_day: normal(
                "avg_sessions_per_day",
                config.avg_sessions_per_day,
                config.sessions_std_dev,
            )?,
            events_per_session: normal(
                "avg_events_per_session",
                config.avg_events_per_session,
                config.events_std_dev,
            )?,
        })
    }

    /// max(1, round(Normal(avg_sessions_per_day, sd))).
    pub fn session_count(&self, rng: &mut GeneratorRng) -> u32 {
        at_least_one(rng.sample(&self.sessions_per_day))
    }

    /// Draw order: session id, start minute, placement, event count.
    pub fn sample_session(&self, day: DayIndex, rng: &mut GeneratorRng) -> AdSession {
        let session_id = rng.uuid().to_string();
        let start = self
            .calendar
            .at_minute(day, rng.next_u64_below(MINUTES_PER_DAY));
        let placement = self.reference.sample_placement(rng);
        let event_count = at_least_one(rng.sample(&self.events_per_session));
        AdSession {
            session_id,
            day,
            start,
            placement,
            event_count,
        }
    }
}

fn at_least_one(draw: f64) -> u32 {
    draw.round().max(1.0) as u32
}
