//! Farmsight: Sales Analytics Dashboard
//!
//! A library for loading farm e-commerce order history, filtering it by
//! operator-chosen criteria, and computing sales, customer, and seller
//! analytics over the filtered view.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod secrets;
pub mod utils;
