//! Report module - summarizing and exporting run results

pub mod export;
pub mod summary;

pub use export::*;
pub use summary::*;
