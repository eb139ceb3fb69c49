//! Diagnostics data model returned alongside estimation results.
//!
//! [`EstimationReport`] records what each stage saw and produced: the point
//! count, fitted and aligned planes, bin statistics, the strategy that
//! produced each attribute together with the ones that failed, and stage
//! timings.

pub mod report;
pub mod timing;

pub use report::{AttributeOutcome, EstimationReport, InputDescriptor, LocationOutcome, PlaneStage};
pub use timing::{StageTiming, TimingBreakdown};
