//! streamsynth: synthetic streaming-platform datasets for offline
//! analytics and ML pipelines.
//!
//! The core is the ad event funnel (`funnel_engine`), fed by the
//! retention model, session sampler and creative sampler. The leaf
//! populations and the CSV writer surround it.

pub mod calendar;
pub mod campaign_population;
pub mod config;
pub mod content_catalog;
pub mod creative_sampler;
pub mod engine;
pub mod error;
pub mod event;
pub mod funnel_engine;
pub mod generator;
pub mod name_generator;
pub mod playback_sessions;
pub mod reference_data;
pub mod retention_model;
pub mod rng;
pub mod session_sampler;
pub mod types;
pub mod user_population;
pub mod writer;
