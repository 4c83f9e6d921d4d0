//! Deterministic campaign names and content titles from curated word lists.
//!
//! All generation is deterministic (same RNG stream = same names).

use crate::rng::GeneratorRng;

/// Deterministic name generator using curated word lists
pub struct NameGenerator;

impl NameGenerator {
    /// Marketing-style catch phrase, e.g. "Seamless zero-defect paradigm".
    pub fn generate_catch_phrase(rng: &mut GeneratorRng) -> String {
        let lead = *rng.pick(Self::catch_leads());
        let descriptor = *rng.pick(Self::catch_descriptors());
        let noun = *rng.pick(Self::catch_nouns());
        format!("{lead} {descriptor} {noun}")
    }

    /// Screen title, e.g. "The Silent Harbor" or "Midnight Protocol".
    pub fn generate_title(rng: &mut GeneratorRng) -> String {
        let adjective = *rng.pick(Self::title_adjectives());
        let noun = *rng.pick(Self::title_nouns());
        if rng.chance(0.5) {
            format!("The {adjective} {noun}")
        } else {
            format!("{adjective} {noun}")
        }
    }

    /// Episode title: series title with season/episode suffix.
    pub fn episode_title(series_title: &str, season: u32, episode: u32) -> String {
        format!("{series_title} – S{season}E{episode}")
    }

    fn catch_leads() -> &'static [&'static str] {
        &[
            "Adaptive", "Balanced", "Centralized", "Cloned", "Customizable", "Digitized",
            "Distributed", "Enhanced", "Ergonomic", "Expanded", "Focused", "Fully-configurable",
            "Future-proofed", "Horizontal", "Innovative", "Integrated", "Intuitive",
            "Managed", "Multi-channeled", "Optimized", "Organic", "Persistent",
            "Proactive", "Reactive", "Robust", "Seamless", "Streamlined", "Synergistic",
            "Universal", "Upgradable", "User-centric", "Versatile", "Vision-oriented",
        ]
    }

    fn catch_descriptors() -> &'static [&'static str] {
        &[
            "24/7", "asymmetric", "bi-directional", "client-driven", "context-sensitive",
            "dynamic", "executive", "fresh-thinking", "global", "high-level", "holistic",
            "interactive", "local", "mission-critical", "motivating", "next-generation",
            "optimal", "real-time", "responsive", "scalable", "secondary", "static",
            "systematic", "tangible", "transitional", "value-added", "zero-defect",
        ]
    }

    fn catch_nouns() -> &'static [&'static str] {
        &[
            "ability", "approach", "architecture", "capability", "challenge", "concept",
            "core", "database", "emulation", "framework", "function", "hub", "initiative",
            "installation", "interface", "matrix", "methodology", "moratorium", "paradigm",
            "portal", "product", "projection", "solution", "strategy", "success",
            "superstructure", "synergy", "throughput", "toolset", "workforce",
        ]
    }

    fn title_adjectives() -> &'static [&'static str] {
        &[
            "Silent", "Broken", "Golden", "Hidden", "Last", "Lost", "Midnight", "Crimson",
            "Electric", "Frozen", "Distant", "Wild", "Hollow", "Burning", "Secret", "Quiet",
            "Endless", "Fallen", "Iron", "Northern", "Neon", "Savage", "Velvet", "Paper",
        ]
    }

    fn title_nouns() -> &'static [&'static str] {
        &[
            "Harbor", "Kingdom", "Signal", "Protocol", "Horizon", "Garden", "Empire",
            "Frontier", "Witness", "Orchard", "Circuit", "Tide", "Crown", "Letters",
            "Station", "Summer", "Island", "Machine", "Vow", "Shadows", "River", "Heist",
        ]
    }
}
