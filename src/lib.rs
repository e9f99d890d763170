pub mod audit_log;
pub mod config;
pub mod config_loader;
pub mod detection;
pub mod domain_utils;
pub mod engine;
pub mod statistics;

pub use audit_log::AnalysisLogger;
pub use config::Config;
pub use detection::indicators::IndicatorTables;
pub use detection::{AnalysisResult, EmailValidationResult, RiskLevel};
pub use engine::AnalysisEngine;
pub use statistics::{CheckKind, StatisticsStore};
