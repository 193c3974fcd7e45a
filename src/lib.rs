pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::DrawSettings;

pub use core::{
    draw::DrawEngine, pipeline::DrawPipeline, rank::RankIndex, report::ReportAggregator,
    runner::DrawRunner, store::RecordStore,
};
pub use domain::model::{AllocationState, ApplicantId, Capacity, DrawOutcome, MatchEvent};
pub use utils::error::{DrawError, Result};
