//! Risk Tracker — weighted per-user risk scoring over threat-category × event-severity counts.
//!
//! Modular structure:
//! - [`risk`] — Weight catalogs, count tables, score aggregation, engine
//! - [`history`] — Append-only score history per user
//! - [`session`] — Caller-side roster, counts, and recalculation
//! - [`config`] — JSON configuration
//! - [`logging`] — Structured JSON logging

pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod risk;
pub mod session;

pub use config::TrackerConfig;
pub use error::RiskError;
pub use history::{Direction, RiskHistory, ScoreChange};
pub use logging::StructuredLogger;
pub use risk::{add_user, calculate_risk_scores, CountTable, RiskEngine, RiskReport, RiskScores, Weights};
pub use session::Session;
