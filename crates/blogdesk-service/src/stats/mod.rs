//! Site-wide statistics.

pub mod service;

pub use service::{LatestBlog, SiteStats, StatsService};
