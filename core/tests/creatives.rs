//! Creative sampling tests.

use std::collections::HashSet;
use streamsynth_core::{
    creative_sampler::{CreativeSampler, AD_TOKEN_LEN},
    reference_data::{CreativeType, ReferenceData},
    rng::GeneratorRng,
};

#[test]
fn creative_attributes_come_from_the_catalogs() {
    let reference = ReferenceData::standard().unwrap();
    let sampler = CreativeSampler::new(&reference);
    let mut rng = GeneratorRng::new(51, 0);

    for _ in 0..2_000 {
        let creative = sampler.sample(&mut rng);
        let format = reference.ad_format_spec(creative.ad_format).expect("known format");
        let kind = reference.creative_type_spec(creative.creative_type).expect("known type");

        assert!(
            format.durations_sec.contains(&creative.duration_seconds),
            "{}s is not a {:?} duration",
            creative.duration_seconds,
            creative.ad_format
        );
        assert_eq!(creative.base_cpm_usd, format.base_cpm_usd);
        assert_eq!(creative.click_boost, kind.click_boost);
        assert_eq!(
            creative.is_interactive,
            creative.creative_type == CreativeType::InteractiveQr
        );
    }
}

#[test]
fn ad_ids_are_prefixed_hex_tokens() {
    let reference = ReferenceData::standard().unwrap();
    let sampler = CreativeSampler::new(&reference);
    let mut rng = GeneratorRng::new(4, 0);

    let ids: Vec<String> = (0..5_000).map(|_| sampler.sample(&mut rng).ad_id).collect();
    for id in &ids {
        let token = id.strip_prefix("ad_").expect("ad_ prefix");
        assert_eq!(token.len(), AD_TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len(), "ad ids collided");
}

#[test]
fn format_and_creative_type_are_drawn_independently() {
    let reference = ReferenceData::standard().unwrap();
    let sampler = CreativeSampler::new(&reference);
    let mut rng = GeneratorRng::new(6, 0);

    let pairs: HashSet<_> = (0..4_000)
        .map(|_| {
            let c = sampler.sample(&mut rng);
            (c.ad_format, c.creative_type)
        })
        .collect();
    // Every format × type combination shows up, odd pairings included.
    assert_eq!(pairs.len(), reference.ad_formats.len() * reference.creative_types.len());
}
