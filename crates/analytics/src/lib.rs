//! # Shopfront Analytics
//!
//! Pure statistical derivations over the series the repository returns.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   the database or the presentation layer; it depends only on `core-types`.
//! - **Stateless Calculation:** Every function takes plain slices and returns
//!   a value. This makes the module trivially testable and reusable both by
//!   the repository (anomaly flagging) and by presentation code (trend
//!   overlays, correlation coefficients).
//!
//! ## Public API
//!
//! - `population_stats`: mean and population standard deviation of a series.
//! - `detect_anomalies`: 2-sigma outlier flagging over a daily series.
//! - `linear_trend`: ordinary least-squares line fit for trend overlays.
//! - `pearson_correlation`: correlation coefficient over two series.

pub mod anomaly;
pub mod error;
pub mod stats;

// Re-export the key components to create a clean, public-facing API.
pub use anomaly::{detect_anomalies, AnomalyPoint, MIN_ANOMALY_POINTS};
pub use error::AnalyticsError;
pub use stats::{linear_trend, pearson_correlation, population_stats, SeriesStats, TrendLine};
