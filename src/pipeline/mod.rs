//! Analytics pipeline - load, filter, aggregate, cohort

pub mod aggregate;
pub mod cohort;
pub mod error;
pub mod filter;
pub mod loader;
pub mod schema;

pub use aggregate::*;
pub use cohort::*;
pub use error::AnalyticsError;
pub use filter::*;
pub use loader::*;
