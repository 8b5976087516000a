//! Applies a validated weight configuration to count tables; produces timestamped reports.

use super::aggregate::{calculate_risk_scores, RiskScores};
use super::counts::CountTable;
use super::weights::Weights;
use crate::error::RiskError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Risk view of a single user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRisk {
    pub user: String,
    pub risk_score: f64,
    pub total_percentage: f64,
    pub thread_percentage: BTreeMap<String, f64>,
}

/// Result of one scoring pass over a count table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub computed_at: DateTime<Utc>,
    pub scores: RiskScores,
}

impl RiskReport {
    pub fn user(&self, name: &str) -> Option<UserRisk> {
        Some(UserRisk {
            user: name.to_string(),
            risk_score: *self.scores.risk_score.get(name)?,
            total_percentage: *self.scores.total_percentage.get(name)?,
            thread_percentage: self.scores.thread_percentage.get(name)?.clone(),
        })
    }

    /// Per-user views in name order
    pub fn users(&self) -> Vec<UserRisk> {
        self.scores
            .risk_score
            .keys()
            .filter_map(|name| self.user(name))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.scores.risk_score.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.risk_score.is_empty()
    }
}

pub struct RiskEngine {
    weights: Weights,
}

impl RiskEngine {
    pub fn new(weights: Weights) -> Result<Self, RiskError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn score(&self, counts: &CountTable) -> Result<RiskReport, RiskError> {
        let scores =
            calculate_risk_scores(counts, &self.weights.categories, &self.weights.severities)?;
        debug!(users = scores.risk_score.len(), "risk scores computed");
        Ok(RiskReport {
            computed_at: Utc::now(),
            scores,
        })
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::weights::weight_map;

    #[test]
    fn engine_rejects_invalid_weights() {
        let w = Weights::new(weight_map(&[("IAM", -0.2)]), weight_map(&[("Low", 0.1)]));
        assert!(RiskEngine::new(w).is_err());
    }

    #[test]
    fn report_user_views() {
        let engine = RiskEngine::new(Weights::default()).unwrap();
        let w = engine.weights().clone();
        let mut counts = CountTable::new();
        counts.add_user("User2", &w.categories, &w.severities);
        counts.add_user("User1", &w.categories, &w.severities);
        counts.set("User1", "Phishing", "Critical", 1);

        let report = engine.score(&counts).unwrap();
        assert_eq!(report.len(), 2);
        let users = report.users();
        assert_eq!(users[0].user, "User1");
        assert_eq!(users[0].risk_score, 100.0);
        assert_eq!(users[0].thread_percentage["Phishing"], 100.0);
        assert_eq!(users[1].risk_score, 50.0);
        assert!(report.user("nobody").is_none());
    }
}
