//! One ad creative per funnel opportunity.
//!
//! Format and creative type are drawn independently; odd pairings such
//! as a bumper with an interactive QR creative are valid.

use crate::{
    reference_data::{AdFormat, CreativeType, ReferenceData},
    rng::GeneratorRng,
    types::EntityId,
    writer::CsvTable,
};
use serde::Serialize;

/// Hex characters in an ad token after the `ad_` prefix.
pub const AD_TOKEN_LEN: usize = 10;

/// One row of `ad_creatives.csv`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AdCreative {
    pub ad_id: EntityId,
    pub ad_format: AdFormat,
    pub creative_type: CreativeType,
    pub duration_seconds: u32,
    pub base_cpm_usd: f64,
    pub click_boost: f64,
    pub is_interactive: bool,
}

impl CsvTable for AdCreative {
    const COLUMNS: &'static [&'static str] = &[
        "ad_id",
        "ad_format",
        "creative_type",
        "duration_seconds",
        "base_cpm_usd",
        "click_boost",
        "is_interactive",
    ];
}

pub struct CreativeSampler<'a> {
    reference: &'a ReferenceData,
}

impl<'a> CreativeSampler<'a> {
    pub fn new(reference: &'a ReferenceData) -> Self {
        Self { reference }
    }

    /// Draw order: format, creative type, duration, ad token.
    pub fn sample(&self, rng: &mut GeneratorRng) -> AdCreative {
        let format = rng.pick(&self.reference.ad_formats);
        let creative = rng.pick(&self.reference.creative_types);
        let duration_seconds = *rng.pick(&format.durations_sec);
        let ad_id = format!("ad_{}", rng.hex_token(AD_TOKEN_LEN));

        AdCreative {
            ad_id,
            ad_format: format.format,
            creative_type: creative.creative_type,
            duration_seconds,
            base_cpm_usd: format.base_cpm_usd,
            click_boost: creative.click_boost,
            is_interactive: creative.creative_type == CreativeType::InteractiveQr,
        }
    }
}
