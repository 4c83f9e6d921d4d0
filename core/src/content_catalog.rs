use crate::{
    calendar::midnight,
    config::SimConfig,
    error::SimResult,
    generator::PopulationGenerator,
    name_generator::NameGenerator,
    reference_data::{ContentType, ReferenceData},
    rng::{GeneratorRng, GeneratorSlot, RngBank},
    types::EntityId,
    writer::CsvTable,
};
use chrono::NaiveDateTime;
use serde::Serialize;

pub const MOVIE_MINUTES: (u64, u64) = (75, 160);
pub const EPISODE_MINUTES: (u64, u64) = (18, 65);
pub const MOVIE_ORIGINAL_PROBABILITY: f64 = 0.6;
pub const EPISODE_ORIGINAL_PROBABILITY: f64 = 0.7;

#[derive(Debug, Clone, Serialize)]
pub struct ContentRecord {
    pub content_id: EntityId,
    pub content_type: ContentType,
    pub title: String,
    pub series_id: Option<EntityId>,
    pub season_number: Option<u32>,
    pub episode_number: Option<u32>,
    pub genre: &'static str,
    pub maturity_rating: &'static str,
    pub duration_minutes: u32,
    pub release_year: i32,
    pub is_original: bool,
    pub created_at: NaiveDateTime,
}

impl CsvTable for ContentRecord {
    const COLUMNS: &'static [&'static str] = &[
        "content_id",
        "content_type",
        "title",
        "series_id",
        "season_number",
        "episode_number",
        "genre",
        "maturity_rating",
        "duration_minutes",
        "release_year",
        "is_original",
        "created_at",
    ];
}

/// Movies first, then every series expanded into its episodes.
pub struct ContentCatalog<'a> {
    config: &'a SimConfig,
    reference: &'a ReferenceData,
}

impl<'a> ContentCatalog<'a> {
    pub fn new(config: &'a SimConfig, reference: &'a ReferenceData) -> Self {
        Self { config, reference }
    }

    fn release_year(&self, rng: &mut GeneratorRng) -> i32 {
        let c = &self.config.content;
        let span = (c.release_year_max - c.release_year_min) as u64;
        c.release_year_min + rng.range_inclusive(0, span) as i32
    }

    fn movies(&self, rng: &mut GeneratorRng, created_at: NaiveDateTime) -> Vec<ContentRecord> {
        (1..=self.config.content.n_movies)
            .map(|i| {
                let genre = self.reference.genres.sample(rng);
                let maturity_rating = self.reference.maturity_ratings.sample(rng);
                let duration_minutes = rng.range_inclusive(MOVIE_MINUTES.0, MOVIE_MINUTES.1) as u32;
                let release_year = self.release_year(rng);
                ContentRecord {
                    content_id: format!("movie_{i}"),
                    content_type: ContentType::Movie,
                    title: NameGenerator::generate_title(rng),
                    series_id: None,
                    season_number: None,
                    episode_number: None,
                    genre,
                    maturity_rating,
                    duration_minutes,
                    release_year,
                    is_original: rng.chance(MOVIE_ORIGINAL_PROBABILITY),
                    created_at,
                }
            })
            .collect()
    }

    fn episodes(&self, rng: &mut GeneratorRng, created_at: NaiveDateTime) -> Vec<ContentRecord> {
        let c = &self.config.content;
        let mut episodes = Vec::new();
        let mut episode_counter = 1usize;

        for s in 1..=c.n_series {
            // Genre, rating, year and title are shared by every episode.
            let series_id = format!("series_{s}");
            let genre = self.reference.genres.sample(rng);
            let maturity_rating = self.reference.maturity_ratings.sample(rng);
            let release_year = self.release_year(rng);
            let series_title = NameGenerator::generate_title(rng);
            let seasons = rng.range_inclusive(1, c.max_seasons_per_series as u64) as u32;

            for season in 1..=seasons {
                let count = rng.range_inclusive(
                    c.min_episodes_per_season as u64,
                    c.max_episodes_per_season as u64,
                ) as u32;
                for ep in 1..=count {
                    let duration_minutes =
                        rng.range_inclusive(EPISODE_MINUTES.0, EPISODE_MINUTES.1) as u32;
                    episodes.push(ContentRecord {
                        content_id: format!("episode_{episode_counter}"),
                        content_type: ContentType::Episode,
                        title: NameGenerator::episode_title(&series_title, season, ep),
                        series_id: Some(series_id.clone()),
                        season_number: Some(season),
                        episode_number: Some(ep),
                        genre,
                        maturity_rating,
                        duration_minutes,
                        release_year,
                        is_original: rng.chance(EPISODE_ORIGINAL_PROBABILITY),
                        created_at,
                    });
                    episode_counter += 1;
                }
            }
        }
        episodes
    }
}

impl PopulationGenerator for ContentCatalog<'_> {
    type Record = ContentRecord;

    fn name(&self) -> &'static str {
        "content"
    }

    fn slot(&self) -> GeneratorSlot {
        GeneratorSlot::Content
    }

    fn generate(&self, bank: &RngBank) -> SimResult<Vec<ContentRecord>> {
        let mut rng = bank.for_generator(self.slot());
        // Catalog timestamps are pinned to the run start so reruns are byte-identical.
        let created_at = midnight(self.config.start_date);
        let mut content = self.movies(&mut rng, created_at);
        content.extend(self.episodes(&mut rng, created_at));
        Ok(content)
    }
}
