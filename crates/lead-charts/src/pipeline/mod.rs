//! Pipeline module.
//!
//! [`BaseTable`] runs schema mapping, normalization and commission banding
//! once. [`charts`] runs filtering, aggregation, suppression and ranking per
//! chart. [`Dashboard`] caches the former and drives the latter.

mod base;
pub mod charts;
mod dashboard;

pub use base::BaseTable;
pub use charts::{compute, compute_with_config};
pub use dashboard::Dashboard;
