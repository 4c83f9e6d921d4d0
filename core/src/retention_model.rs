//! Retention curve: how many days of the horizon a user stays active.
//!
//! Day index d gets weight decay^d, and the number of active days k is
//! drawn from {1..D} using the weight at index k-1. Most users churn
//! within the first days; a thin tail stays for the whole horizon.

use crate::{
    error::{SimError, SimResult},
    rng::GeneratorRng,
};
use rand::distributions::WeightedIndex;

pub struct RetentionModel {
    days: u32,
    weights: Vec<f64>,
    index: WeightedIndex<f64>,
}

impl RetentionModel {
    pub fn new(days: u32, decay: f64) -> SimResult<Self> {
        if days == 0 {
            return Err(SimError::NonPositiveHorizon { days });
        }
        let weights: Vec<f64> = (0..days).map(|d| decay.powi(d as i32)).collect();
        let index = WeightedIndex::new(&weights).map_err(|e| SimError::InvalidConfig {
            field: "retention_decay",
            reason: format!("decay {decay} gives unusable weights: {e}"),
        })?;
        Ok(Self { days, weights, index })
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    /// Number of active days, always in 1..=days.
    pub fn active_days(&self, rng: &mut GeneratorRng) -> u32 {
        rng.sample(&self.index) as u32 + 1
    }

    /// Probability of exactly `k` active days.
    pub fn probability_of(&self, k: u32) -> f64 {
        if k == 0 || k > self.days {
            return 0.0;
        }
        let total: f64 = self.weights.iter().sum();
        self.weights[(k - 1) as usize] / total
    }
}
