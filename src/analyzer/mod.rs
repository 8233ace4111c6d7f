//! Analyzer module - SEO check catalog and audit engine

pub mod checks;
pub mod engine;
pub mod scoring;

pub use checks::{CheckContext, SeoCheck, CATALOG};
pub use engine::{AggregateStats, AuditEngine, PageFile};
pub use scoring::{ScoreCalculator, SeverityCounts};
