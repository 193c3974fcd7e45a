pub mod draw;
pub mod loader;
pub mod pipeline;
pub mod rank;
pub mod report;
pub mod runner;
pub mod store;

pub use crate::domain::model::{DrawOutcome, DrawResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
