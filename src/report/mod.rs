//! Report module - rendering and exporting computed dashboard data

pub mod dashboard;
pub mod export;

pub use dashboard::*;
pub use export::*;
