//! Pipeline module - the analysis stages

pub mod attributes;
pub mod binning;
pub mod correlation;
pub mod error;
pub mod importance;
pub mod loader;
pub mod scaling;
pub mod significance;
pub mod stats;

pub use attributes::*;
pub use binning::*;
pub use correlation::*;
pub use error::*;
pub use importance::*;
pub use loader::*;
pub use scaling::*;
pub use significance::*;
pub use stats::*;
