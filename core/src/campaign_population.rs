use crate::{
    calendar::midnight,
    config::{SimConfig, CAMPAIGN_START_MARGIN_DAYS},
    error::SimResult,
    generator::PopulationGenerator,
    name_generator::NameGenerator,
    reference_data::{BidStrategy, CampaignObjective, ReferenceData},
    rng::{GeneratorRng, GeneratorSlot, RngBank},
    types::{round_cents, EntityId},
    user_population::random_date,
    writer::CsvTable,
};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CampaignRecord {
    pub campaign_id: EntityId,
    pub advertiser_id: EntityId,
    pub campaign_name: String,
    pub objective: CampaignObjective,
    pub bid_strategy: BidStrategy,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub daily_budget_usd: f64,
    pub total_budget_usd: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl CsvTable for CampaignRecord {
    const COLUMNS: &'static [&'static str] = &[
        "campaign_id",
        "advertiser_id",
        "campaign_name",
        "objective",
        "bid_strategy",
        "start_date",
        "end_date",
        "daily_budget_usd",
        "total_budget_usd",
        "created_at",
        "updated_at",
    ];
}

pub struct CampaignPopulation<'a> {
    config: &'a SimConfig,
    reference: &'a ReferenceData,
}

impl<'a> CampaignPopulation<'a> {
    pub fn new(config: &'a SimConfig, reference: &'a ReferenceData) -> Self {
        Self { config, reference }
    }

    fn generate_campaign(&self, i: usize, rng: &mut GeneratorRng) -> CampaignRecord {
        let c = &self.config.campaigns;
        let advertiser_id = format!("adv_{}", rng.range_inclusive(1, c.n_advertisers));

        let objective = self.reference.campaign_objectives.sample(rng);

        let latest_start = c.flight_window_end - Duration::days(CAMPAIGN_START_MARGIN_DAYS);
        let start_date = random_date(c.flight_window_start, latest_start, rng);
        let flight_days = rng.range_inclusive(c.min_flight_days, c.max_flight_days) as i64;
        let end_date = start_date + Duration::days(flight_days);

        let daily_budget_usd =
            round_cents(rng.uniform(c.min_daily_budget_usd, c.max_daily_budget_usd));

        CampaignRecord {
            campaign_id: format!("camp_{}", i + 1),
            advertiser_id,
            campaign_name: NameGenerator::generate_catch_phrase(rng),
            objective,
            bid_strategy: objective.bid_strategy(),
            start_date,
            end_date,
            daily_budget_usd,
            total_budget_usd: round_cents(daily_budget_usd * flight_days as f64),
            created_at: midnight(start_date),
            updated_at: midnight(end_date),
        }
    }
}

impl PopulationGenerator for CampaignPopulation<'_> {
    type Record = CampaignRecord;

    fn name(&self) -> &'static str {
        "campaigns"
    }

    fn slot(&self) -> GeneratorSlot {
        GeneratorSlot::Campaigns
    }

    fn generate(&self, bank: &RngBank) -> SimResult<Vec<CampaignRecord>> {
        let mut rng = bank.for_generator(self.slot());
        Ok((0..self.config.campaigns.n_campaigns)
            .map(|i| self.generate_campaign(i, &mut rng))
            .collect())
    }
}
