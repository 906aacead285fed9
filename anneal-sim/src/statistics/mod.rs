pub mod results;
mod stats;

pub use results::{AnnealOutcome, BatchSummary, EnergyRecord};
pub use stats::Statistics;
