//! Anime genre report - CSV loading, genre statistics and static report generation
//!
//! The pipeline runs in four steps: [`data::DataLoader`] reads and cleans the
//! dataset, [`data::DataProcessor`] expands multi-genre records,
//! [`stats::StatsCalculator`] ranks the genres and [`report::ReportGenerator`]
//! writes charts, listings and the Markdown report.

pub mod charts;
pub mod config;
pub mod data;
pub mod report;
pub mod stats;
