//! Weighted aggregation of event counts into risk scores and percentage shares.
//!
//! Every call recomputes from scratch; nothing is cached between calls.

use super::counts::CountTable;
use super::weights::WeightMap;
use crate::error::RiskError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Score of a user that contributes nothing to organizational risk.
pub const BASELINE_RISK_SCORE: f64 = 50.0;

/// The three per-user mappings produced by [`calculate_risk_scores`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskScores {
    /// `50 × (1 + total_percentage / 100)`
    pub risk_score: BTreeMap<String, f64>,
    /// Share of the grand total, 0–100
    pub total_percentage: BTreeMap<String, f64>,
    /// Per-category share of the user's own total, 0–100
    pub thread_percentage: BTreeMap<String, BTreeMap<String, f64>>,
}

/// Score every user in `counts` against the given weight catalogs.
///
/// Fails on the first (user, category, severity) cell required by the catalogs
/// but absent from `counts`. Cells outside the catalogs are ignored.
pub fn calculate_risk_scores(
    counts: &CountTable,
    categories: &WeightMap,
    severities: &WeightMap,
) -> Result<RiskScores, RiskError> {
    let mut subtotals: BTreeMap<&str, BTreeMap<&str, f64>> = BTreeMap::new();
    for (user, by_category) in counts.iter() {
        let user_subtotals = subtotals.entry(user.as_str()).or_default();
        for (category, category_weight) in categories {
            let by_severity = by_category.get(category);
            let mut subtotal = 0.0;
            for (severity, severity_weight) in severities {
                let count = by_severity
                    .and_then(|cells| cells.get(severity))
                    .copied()
                    .ok_or_else(|| RiskError::MissingCell {
                        user: user.clone(),
                        category: category.clone(),
                        severity: severity.clone(),
                    })?;
                subtotal += category_weight * severity_weight * count as f64;
            }
            user_subtotals.insert(category.as_str(), subtotal);
        }
    }

    let user_totals: BTreeMap<&str, f64> = subtotals
        .iter()
        .map(|(user, by_category)| (*user, by_category.values().sum::<f64>()))
        .collect();
    let grand_total: f64 = user_totals.values().sum();

    let mut scores = RiskScores::default();
    for (user, by_category) in &subtotals {
        let user_total = user_totals[user];
        let total_percentage = if grand_total > 0.0 {
            user_total / grand_total * 100.0
        } else {
            0.0
        };
        let thread_percentage = by_category
            .iter()
            .map(|(category, subtotal)| {
                let share = if user_total > 0.0 {
                    subtotal / user_total * 100.0
                } else {
                    0.0
                };
                (category.to_string(), share)
            })
            .collect();

        scores
            .risk_score
            .insert(user.to_string(), risk_score(total_percentage));
        scores
            .total_percentage
            .insert(user.to_string(), total_percentage);
        scores
            .thread_percentage
            .insert(user.to_string(), thread_percentage);
    }
    Ok(scores)
}

/// Linear rescale of an organizational share: 0% → 50, 100% → 100.
pub fn risk_score(total_percentage: f64) -> f64 {
    BASELINE_RISK_SCORE * (1.0 + total_percentage / 100.0)
}
