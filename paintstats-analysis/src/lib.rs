//! Pure numeric building blocks of the paint-metric report: descriptive
//! statistics, outlier policies and delta series.

pub mod delta;
pub mod outliers;
pub mod stats;
