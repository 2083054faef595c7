//! Job pipeline.
//!
//! Drives one job through its stages in a fixed order:
//! - **Init**: write the remote environment and prepare the scratch directory
//! - **TransferIn**: fetch every input listed in the input manifest
//! - **Execute**: run the work command over the staged inputs
//! - **TransferOut**: push the captured outputs to every output destination
//! - **Done**: report the final status
//!
//! Failures before the job runs are fatal. Failures after that are reported,
//! remembered, and decide the final status once every stage has run.

mod runner;
mod types;

pub use runner::Pipeline;
pub use types::{PipelineOutcome, Stage, StageError};
