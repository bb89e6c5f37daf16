//! Output module for reporting index state
//!
//! This module handles collecting and printing index statistics.

pub mod stats;

pub use stats::{load_statistics, print_statistics, SiteStatistics, Statistics};
