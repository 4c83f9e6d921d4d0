//! Static vocabularies shared by every generator.
//!
//! RULE: Tables are built once, validated once, and never mutated
//! while a run is in progress. Validation happens before the first
//! random draw so a bad table can never produce a partial dataset.

use crate::{
    error::{SimError, SimResult},
    rng::GeneratorRng,
};
use rand::distributions::WeightedIndex;
use serde::Serialize;

// ── Devices ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Mobile,
    Desktop,
    Tablet,
    Tv,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Desktop => "desktop",
            Self::Tablet => "tablet",
            Self::Tv => "tv",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeviceProfile {
    pub device: DeviceType,
    pub operating_systems: Vec<&'static str>,
}

// ── Placements ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Player,
    Ui,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementSlot {
    PreRoll,
    MidRoll,
    PostRoll,
    PauseScreen,
    HomeSponsorship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementPosition {
    BeforeContent,
    DuringContent,
    AfterContent,
    Overlay,
    FeaturedRow,
}

/// Where an ad is shown. Boosts multiply the funnel's base rates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub surface: Surface,
    pub slot: PlacementSlot,
    pub position: PlacementPosition,
    pub click_boost: f64,
    pub view_boost: f64,
}

// ── Geography ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Region {
    pub code: &'static str,
    pub cities: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub struct Country {
    pub code: &'static str,
    pub regions: Vec<Region>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoLocation {
    pub country: &'static str,
    pub region: &'static str,
    pub city: &'static str,
}

// ── Ad catalogs ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdFormat {
    Video,
    Bumper,
    PauseDisplay,
    UiSponsorship,
}

#[derive(Debug, Clone)]
pub struct AdFormatSpec {
    pub format: AdFormat,
    pub durations_sec: Vec<u32>,
    pub base_cpm_usd: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreativeType {
    StandardVideo,
    InteractiveQr,
    BrandSlate,
    SponsoredTitleCard,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreativeTypeSpec {
    pub creative_type: CreativeType,
    pub click_boost: f64,
}

// ── Population vocabularies ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSegment {
    AdSupported,
    Premium,
    Kids,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Movie,
    Episode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignObjective {
    Awareness,
    Consideration,
    Conversion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BidStrategy {
    Cpm,
    Cpc,
    Cpa,
}

impl CampaignObjective {
    pub fn bid_strategy(&self) -> BidStrategy {
        match self {
            Self::Awareness => BidStrategy::Cpm,
            Self::Consideration => BidStrategy::Cpc,
            Self::Conversion => BidStrategy::Cpa,
        }
    }
}

/// A categorical table: values with relative weights.
#[derive(Debug, Clone)]
pub struct Weighted<T> {
    values: Vec<T>,
    index: WeightedIndex<f64>,
}

impl<T: Copy> Weighted<T> {
    pub fn new(catalog: &'static str, entries: &[(T, f64)]) -> SimResult<Self> {
        if entries.is_empty() {
            return Err(SimError::EmptyCatalog { catalog });
        }
        let index = WeightedIndex::new(entries.iter().map(|(_, w)| *w)).map_err(|e| {
            SimError::InvalidConfig {
                field: catalog,
                reason: format!("bad weights: {e}"),
            }
        })?;
        Ok(Self {
            values: entries.iter().map(|(v, _)| *v).collect(),
            index,
        })
    }

    pub fn sample(&self, rng: &mut GeneratorRng) -> T {
        self.values[rng.sample(&self.index)]
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }
}

/// Every static table the generators read from.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub devices: Vec<DeviceProfile>,
    pub geo: Vec<Country>,
    pub placements: Vec<Placement>,
    pub ad_formats: Vec<AdFormatSpec>,
    pub creative_types: Vec<CreativeTypeSpec>,
    pub genres: Weighted<&'static str>,
    pub maturity_ratings: Weighted<&'static str>,
    pub user_segments: Weighted<UserSegment>,
    pub age_buckets: Weighted<&'static str>,
    pub content_types: Weighted<ContentType>,
    pub campaign_objectives: Weighted<CampaignObjective>,
}

impl ReferenceData {
    /// The standard streaming-platform vocabularies.
    pub fn standard() -> SimResult<Self> {
        Ok(Self {
            devices: vec![
                DeviceProfile {
                    device: DeviceType::Mobile,
                    operating_systems: vec!["iOS", "Android"],
                },
                DeviceProfile {
                    device: DeviceType::Desktop,
                    operating_systems: vec!["macOS", "Windows", "Linux"],
                },
                DeviceProfile {
                    device: DeviceType::Tablet,
                    operating_systems: vec!["iOS", "Android"],
                },
                DeviceProfile {
                    device: DeviceType::Tv,
                    operating_systems: vec!["tvOS", "Android TV", "Roku"],
                },
            ],
            geo: vec![
                Country {
                    code: "US",
                    regions: vec![
                        Region { code: "CA", cities: vec!["San Francisco", "Los Angeles"] },
                        Region { code: "NY", cities: vec!["New York"] },
                        Region { code: "WA", cities: vec!["Seattle"] },
                    ],
                },
                Country {
                    code: "CA",
                    regions: vec![
                        Region { code: "ON", cities: vec!["Toronto"] },
                        Region { code: "BC", cities: vec!["Vancouver"] },
                    ],
                },
                Country {
                    code: "UK",
                    regions: vec![
                        Region { code: "ENG", cities: vec!["London"] },
                        Region { code: "SCT", cities: vec!["Edinburgh"] },
                    ],
                },
            ],
            placements: vec![
                Placement {
                    surface: Surface::Player,
                    slot: PlacementSlot::PreRoll,
                    position: PlacementPosition::BeforeContent,
                    click_boost: 0.8,
                    view_boost: 1.4,
                },
                Placement {
                    surface: Surface::Player,
                    slot: PlacementSlot::MidRoll,
                    position: PlacementPosition::DuringContent,
                    click_boost: 0.6,
                    view_boost: 1.6,
                },
                Placement {
                    surface: Surface::Player,
                    slot: PlacementSlot::PostRoll,
                    position: PlacementPosition::AfterContent,
                    click_boost: 0.3,
                    view_boost: 1.2,
                },
                Placement {
                    surface: Surface::Ui,
                    slot: PlacementSlot::PauseScreen,
                    position: PlacementPosition::Overlay,
                    click_boost: 1.2,
                    view_boost: 1.1,
                },
                Placement {
                    surface: Surface::Ui,
                    slot: PlacementSlot::HomeSponsorship,
                    position: PlacementPosition::FeaturedRow,
                    click_boost: 1.5,
                    view_boost: 1.0,
                },
            ],
            ad_formats: vec![
                AdFormatSpec {
                    format: AdFormat::Video,
                    durations_sec: vec![15, 30, 60],
                    base_cpm_usd: 32.0,
                },
                AdFormatSpec {
                    format: AdFormat::Bumper,
                    durations_sec: vec![6],
                    base_cpm_usd: 18.0,
                },
                AdFormatSpec {
                    format: AdFormat::PauseDisplay,
                    durations_sec: vec![10, 15],
                    base_cpm_usd: 12.0,
                },
                AdFormatSpec {
                    format: AdFormat::UiSponsorship,
                    durations_sec: vec![5, 10],
                    base_cpm_usd: 22.0,
                },
            ],
            creative_types: vec![
                CreativeTypeSpec { creative_type: CreativeType::StandardVideo, click_boost: 1.0 },
                CreativeTypeSpec { creative_type: CreativeType::InteractiveQr, click_boost: 1.6 },
                CreativeTypeSpec { creative_type: CreativeType::BrandSlate, click_boost: 0.7 },
                CreativeTypeSpec {
                    creative_type: CreativeType::SponsoredTitleCard,
                    click_boost: 1.2,
                },
            ],
            genres: Weighted::new(
                "genres",
                &[
                    ("Action", 0.12),
                    ("Comedy", 0.09),
                    ("Drama", 0.18),
                    ("Family", 0.09),
                    ("Horror", 0.04),
                    ("Kids", 0.10),
                    ("Sci-Fi", 0.05),
                    ("Romance", 0.09),
                    ("Documentary", 0.10),
                    ("Thriller", 0.07),
                    ("Animation", 0.05),
                    ("Fantasy", 0.02),
                ],
            )?,
            maturity_ratings: Weighted::new(
                "maturity_ratings",
                &[("G", 0.08), ("PG", 0.18), ("PG-13", 0.24), ("TV-14", 0.28), ("TV-MA", 0.22)],
            )?,
            user_segments: Weighted::new(
                "user_segments",
                &[
                    (UserSegment::AdSupported, 0.55),
                    (UserSegment::Premium, 0.35),
                    (UserSegment::Kids, 0.10),
                ],
            )?,
            age_buckets: Weighted::new(
                "age_buckets",
                &[
                    ("13-17", 0.08),
                    ("18-24", 0.22),
                    ("25-34", 0.28),
                    ("35-44", 0.20),
                    ("45-54", 0.14),
                    ("55+", 0.08),
                ],
            )?,
            content_types: Weighted::new(
                "content_types",
                &[(ContentType::Movie, 0.45), (ContentType::Episode, 0.55)],
            )?,
            campaign_objectives: Weighted::new(
                "campaign_objectives",
                &[
                    (CampaignObjective::Awareness, 0.40),
                    (CampaignObjective::Consideration, 0.35),
                    (CampaignObjective::Conversion, 0.25),
                ],
            )?,
        })
    }

    /// Completeness check: every device has an OS, every country a region,
    /// every region a city, every format a duration, every boost finite.
    pub fn validate(&self) -> SimResult<()> {
        if self.devices.is_empty() {
            return Err(SimError::EmptyCatalog { catalog: "device_types" });
        }
        for profile in &self.devices {
            if profile.operating_systems.is_empty() {
                return Err(SimError::IncompleteCatalog {
                    catalog: "os_by_device",
                    key: profile.device.as_str().to_string(),
                });
            }
        }

        if self.geo.is_empty() {
            return Err(SimError::EmptyCatalog { catalog: "geo_hierarchy" });
        }
        for country in &self.geo {
            if country.regions.is_empty() {
                return Err(SimError::IncompleteCatalog {
                    catalog: "geo_hierarchy",
                    key: country.code.to_string(),
                });
            }
            for region in &country.regions {
                if region.cities.is_empty() {
                    return Err(SimError::IncompleteCatalog {
                        catalog: "geo_hierarchy",
                        key: format!("{}/{}", country.code, region.code),
                    });
                }
            }
        }

        if self.placements.is_empty() {
            return Err(SimError::EmptyCatalog { catalog: "placements" });
        }
        for p in &self.placements {
            check_multiplier("placements.click_boost", p.click_boost)?;
            check_multiplier("placements.view_boost", p.view_boost)?;
        }

        if self.ad_formats.is_empty() {
            return Err(SimError::EmptyCatalog { catalog: "ad_formats" });
        }
        for spec in &self.ad_formats {
            if spec.durations_sec.is_empty() {
                return Err(SimError::IncompleteCatalog {
                    catalog: "ad_formats",
                    key: format!("{:?}", spec.format),
                });
            }
            check_multiplier("ad_formats.base_cpm_usd", spec.base_cpm_usd)?;
        }

        if self.creative_types.is_empty() {
            return Err(SimError::EmptyCatalog { catalog: "creative_types" });
        }
        for spec in &self.creative_types {
            check_multiplier("creative_types.click_boost", spec.click_boost)?;
        }
        Ok(())
    }

    pub fn os_for(&self, device: DeviceType) -> Option<&[&'static str]> {
        self.devices
            .iter()
            .find(|p| p.device == device)
            .map(|p| p.operating_systems.as_slice())
    }

    pub fn ad_format_spec(&self, format: AdFormat) -> Option<&AdFormatSpec> {
        self.ad_formats.iter().find(|s| s.format == format)
    }

    pub fn creative_type_spec(&self, creative_type: CreativeType) -> Option<&CreativeTypeSpec> {
        self.creative_types
            .iter()
            .find(|s| s.creative_type == creative_type)
    }

    pub fn placement(&self, slot: PlacementSlot) -> Option<&Placement> {
        self.placements.iter().find(|p| p.slot == slot)
    }

    /// Device first, then an OS valid for that device.
    pub fn sample_device_os(&self, rng: &mut GeneratorRng) -> (DeviceType, &'static str) {
        let profile = rng.pick(&self.devices);
        let os = *rng.pick(&profile.operating_systems);
        (profile.device, os)
    }

    /// Country, then region within it, then city within that.
    pub fn sample_geo(&self, rng: &mut GeneratorRng) -> GeoLocation {
        let country = rng.pick(&self.geo);
        let region = rng.pick(&country.regions);
        let city = *rng.pick(&region.cities);
        GeoLocation {
            country: country.code,
            region: region.code,
            city,
        }
    }

    pub fn sample_placement(&self, rng: &mut GeneratorRng) -> Placement {
        *rng.pick(&self.placements)
    }
}

fn check_multiplier(field: &'static str, value: f64) -> SimResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(SimError::InvalidConfig {
            field,
            reason: format!("{value} must be finite and non-negative"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_tables_are_complete() {
        let reference = ReferenceData::standard().unwrap();
        reference.validate().unwrap();
        assert_eq!(reference.placements.len(), 5);
        assert_eq!(reference.ad_formats.len(), 4);
        assert_eq!(reference.creative_types.len(), 4);
    }

    #[test]
    fn device_without_os_is_rejected() {
        let mut reference = ReferenceData::standard().unwrap();
        reference.devices[3].operating_systems.clear();
        let err = reference.validate().unwrap_err();
        let SimError::IncompleteCatalog { catalog, key } = &err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!((*catalog, key.as_str()), ("os_by_device", "tv"));
    }

    #[test]
    fn region_without_city_is_rejected() {
        let mut reference = ReferenceData::standard().unwrap();
        reference.geo[2].regions[1].cities.clear();
        let err = reference.validate().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("UK/SCT"));
    }

    #[test]
    fn empty_weighted_table_is_rejected() {
        let err = Weighted::<&str>::new("genres", &[]).unwrap_err();
        assert!(matches!(err, SimError::EmptyCatalog { catalog: "genres" }));
    }

    #[test]
    fn interactive_qr_has_the_strongest_click_boost() {
        let reference = ReferenceData::standard().unwrap();
        let qr = reference
            .creative_type_spec(CreativeType::InteractiveQr)
            .unwrap();
        assert!(reference
            .creative_types
            .iter()
            .all(|s| s.click_boost <= qr.click_boost));
    }
}
