use crate::{
    calendar::midnight,
    config::SimConfig,
    error::SimResult,
    generator::PopulationGenerator,
    reference_data::{DeviceType, GeoLocation, ReferenceData, UserSegment},
    rng::{GeneratorRng, GeneratorSlot, RngBank},
    types::EntityId,
    writer::CsvTable,
};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct UserRecord {
    pub user_id: EntityId,
    pub signup_date: NaiveDate,
    pub first_seen_date: NaiveDate,
    pub last_seen_date: NaiveDate,
    pub user_segment: UserSegment,
    pub age_bucket: &'static str,
    pub primary_device_type: DeviceType,
    pub primary_os: &'static str,
    pub country: &'static str,
    pub region: &'static str,
    pub city: &'static str,
    pub is_kids_profile: bool,
    pub updated_at: NaiveDateTime,
}

impl CsvTable for UserRecord {
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "signup_date",
        "first_seen_date",
        "last_seen_date",
        "user_segment",
        "age_bucket",
        "primary_device_type",
        "primary_os",
        "country",
        "region",
        "city",
        "is_kids_profile",
        "updated_at",
    ];
}

impl UserRecord {
    pub fn geo(&self) -> GeoLocation {
        GeoLocation {
            country: self.country,
            region: self.region,
            city: self.city,
        }
    }
}

pub struct UserPopulation<'a> {
    config: &'a SimConfig,
    reference: &'a ReferenceData,
}

impl<'a> UserPopulation<'a> {
    pub fn new(config: &'a SimConfig, reference: &'a ReferenceData) -> Self {
        Self { config, reference }
    }

    fn generate_user(&self, i: usize, rng: &mut GeneratorRng) -> UserRecord {
        let window = &self.config.users;
        let signup_date = random_date(window.signup_window_start, window.signup_window_end, rng);
        let last_seen_date =
            signup_date + Duration::days(rng.range_inclusive(1, window.max_last_seen_days) as i64);

        let user_segment = self.reference.user_segments.sample(rng);
        let age_bucket = self.reference.age_buckets.sample(rng);
        let (device, os) = self.reference.sample_device_os(rng);
        let geo = self.reference.sample_geo(rng);

        UserRecord {
            user_id: format!("user_{i}"),
            signup_date,
            first_seen_date: signup_date,
            last_seen_date,
            user_segment,
            age_bucket,
            primary_device_type: device,
            primary_os: os,
            country: geo.country,
            region: geo.region,
            city: geo.city,
            is_kids_profile: user_segment == UserSegment::Kids,
            updated_at: midnight(last_seen_date),
        }
    }
}

impl PopulationGenerator for UserPopulation<'_> {
    type Record = UserRecord;

    fn name(&self) -> &'static str {
        "users"
    }

    fn slot(&self) -> GeneratorSlot {
        GeneratorSlot::Users
    }

    fn generate(&self, bank: &RngBank) -> SimResult<Vec<UserRecord>> {
        let mut rng = bank.for_generator(self.slot());
        let users = (0..self.config.n_users)
            .map(|i| self.generate_user(i, &mut rng))
            .collect();
        Ok(users)
    }
}

/// Uniform date in [start, end], both ends included.
pub fn random_date(start: NaiveDate, end: NaiveDate, rng: &mut GeneratorRng) -> NaiveDate {
    let span = (end - start).num_days().max(0) as u64;
    start + Duration::days(rng.range_inclusive(0, span) as i64)
}
