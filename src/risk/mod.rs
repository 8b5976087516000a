//! Risk scoring: weight catalogs, count tables, aggregation, engine.

mod aggregate;
mod counts;
mod engine;
mod weights;

pub use aggregate::{calculate_risk_scores, risk_score, RiskScores, BASELINE_RISK_SCORE};
pub use counts::{add_user, CategoryCounts, CountTable, SeverityCounts};
pub use engine::{RiskEngine, RiskReport, UserRisk};
pub use weights::{weight_map, WeightMap, Weights};
