//! Pipeline module - sharded load, reduction, classification and scoring

pub mod accuracy;
pub mod classifier;
pub mod config;
pub mod error;
pub mod label;
pub mod loader;
pub mod moments;
pub mod orchestrator;
pub mod reducer;

pub use accuracy::*;
pub use classifier::*;
pub use config::*;
pub use error::{PipelineError, Result};
pub use label::*;
pub use loader::*;
pub use moments::*;
pub use orchestrator::*;
pub use reducer::*;
