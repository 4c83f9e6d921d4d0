//! Population generator trait.
//!
//! RULE: Every leaf population implements PopulationGenerator.
//! Generators never read each other's output except through the
//! explicit inputs handed to their constructor, and never touch I/O.
//! Execution order is fixed and documented in engine.rs.

use crate::{
    error::SimResult,
    rng::{GeneratorSlot, RngBank},
};
use serde::Serialize;

/// The contract every leaf population must fulfill.
pub trait PopulationGenerator {
    /// One row of the generated table.
    type Record: Serialize;

    /// Unique stable name, used in logs and file names.
    fn name(&self) -> &'static str;

    /// The RNG slot this generator draws from.
    fn slot(&self) -> GeneratorSlot;

    /// Produce the full record set. Streams come from `bank`, either the
    /// generator's slot stream or per-entity streams within that slot.
    fn generate(&self, bank: &RngBank) -> SimResult<Vec<Self::Record>>;
}

/// Run one generator and log how many rows it produced.
pub fn run_generator<G: PopulationGenerator>(
    generator: &G,
    bank: &RngBank,
) -> SimResult<Vec<G::Record>> {
    let records = generator.generate(bank)?;
    log::info!(
        "{}: generated {} rows (slot={:?})",
        generator.name(),
        records.len(),
        generator.slot()
    );
    Ok(records)
}
