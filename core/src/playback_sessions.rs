use crate::{
    calendar::{SimCalendar, MINUTES_PER_DAY},
    config::{SimConfig, MAX_PLAYBACK_DURATION_MIN},
    content_catalog::ContentRecord,
    error::{SimError, SimResult},
    generator::PopulationGenerator,
    reference_data::{ContentType, DeviceType, ReferenceData},
    rng::{normal, GeneratorRng, GeneratorSlot, RngBank},
    types::EntityId,
    user_population::UserRecord,
    writer::CsvTable,
};
use chrono::{Duration, NaiveDateTime};
use rand_distr::Normal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PlaybackSessionRecord {
    pub playback_session_id: EntityId,
    pub user_id: EntityId,
    pub content_id: EntityId,
    pub content_type: ContentType,
    pub session_start_ts: NaiveDateTime,
    pub session_end_ts: NaiveDateTime,
    pub session_duration_minutes: i64,
    pub device_type: DeviceType,
    pub os: &'static str,
    pub country: &'static str,
    pub region: &'static str,
    pub city: &'static str,
    pub is_binge: bool,
    pub created_at: NaiveDateTime,
}

impl CsvTable for PlaybackSessionRecord {
    const COLUMNS: &'static [&'static str] = &[
        "playback_session_id",
        "user_id",
        "content_id",
        "content_type",
        "session_start_ts",
        "session_end_ts",
        "session_duration_minutes",
        "device_type",
        "os",
        "country",
        "region",
        "city",
        "is_binge",
        "created_at",
    ];
}

/// Viewing sessions for every user on every day of the horizon.
/// Independent of the ad funnel; each user draws from its own stream.
pub struct PlaybackSessions<'a> {
    config: &'a SimConfig,
    reference: &'a ReferenceData,
    users: &'a [UserRecord],
    movies: Vec<&'a str>,
    episodes: Vec<&'a str>,
    sessions_per_day: Normal<f64>,
    duration_min: Normal<f64>,
}

impl<'a> PlaybackSessions<'a> {
    pub fn new(
        config: &'a SimConfig,
        reference: &'a ReferenceData,
        users: &'a [UserRecord],
        content: &'a [ContentRecord],
    ) -> SimResult<Self> {
        let p = &config.playback;
        let ids_of = |kind: ContentType| {
            content
                .iter()
                .filter(|c| c.content_type == kind)
                .map(|c| c.content_id.as_str())
                .collect::<Vec<_>>()
        };
        let movies = ids_of(ContentType::Movie);
        let episodes = ids_of(ContentType::Episode);
        if movies.is_empty() || episodes.is_empty() {
            return Err(SimError::EmptyCatalog { catalog: "content" });
        }
        Ok(Self {
            config,
            reference,
            users,
            movies,
            episodes,
            sessions_per_day: normal(
                "playback.avg_sessions_per_day",
                p.avg_sessions_per_day,
                p.sessions_std_dev,
            )?,
            duration_min: normal(
                "playback.avg_duration_min",
                p.avg_duration_min,
                p.duration_std_dev,
            )?,
        })
    }

    fn sessions_for_user(
        &self,
        user: &UserRecord,
        calendar: &SimCalendar,
        rng: &mut GeneratorRng,
        out: &mut Vec<PlaybackSessionRecord>,
    ) {
        let p = &self.config.playback;
        for day in calendar.day_indices() {
            let count = rng.sample(&self.sessions_per_day).round().max(0.0) as u32;
            for _ in 0..count {
                let playback_session_id = rng.uuid().to_string();
                let start = calendar.at_minute(day, rng.next_u64_below(MINUTES_PER_DAY));
                let duration = (rng.sample(&self.duration_min).round() as i64)
                    .clamp(p.min_duration_min, MAX_PLAYBACK_DURATION_MIN);
                let content_type = self.reference.content_types.sample(rng);
                let pool = match content_type {
                    ContentType::Movie => &self.movies,
                    ContentType::Episode => &self.episodes,
                };
                let content_id = (*rng.pick(pool)).to_string();

                out.push(PlaybackSessionRecord {
                    playback_session_id,
                    user_id: user.user_id.clone(),
                    content_id,
                    content_type,
                    session_start_ts: start,
                    session_end_ts: start + Duration::minutes(duration),
                    session_duration_minutes: duration,
                    device_type: user.primary_device_type,
                    os: user.primary_os,
                    country: user.country,
                    region: user.region,
                    city: user.city,
                    is_binge: duration > p.binge_threshold_min,
                    created_at: start,
                });
            }
        }
    }
}

impl PopulationGenerator for PlaybackSessions<'_> {
    type Record = PlaybackSessionRecord;

    fn name(&self) -> &'static str {
        "playback_sessions"
    }

    fn slot(&self) -> GeneratorSlot {
        GeneratorSlot::Playback
    }

    fn generate(&self, bank: &RngBank) -> SimResult<Vec<PlaybackSessionRecord>> {
        let calendar = SimCalendar::new(self.config.start_date, self.config.days);
        let mut sessions = Vec::new();
        for (index, user) in self.users.iter().enumerate() {
            let mut rng = bank.for_entity(self.slot(), index as u64);
            self.sessions_for_user(user, &calendar, &mut rng, &mut sessions);
        }
        Ok(sessions)
    }
}
