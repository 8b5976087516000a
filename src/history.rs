//! Append-only per-user risk score history. Owned by the caller, never by the scoring core.

use crate::risk::RiskReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub score: f64,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Unchanged,
}

/// Movement between a user's last two recorded scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreChange {
    pub previous: f64,
    pub current: f64,
    pub delta: f64,
    pub direction: Direction,
}

impl ScoreChange {
    fn between(previous: f64, current: f64) -> Self {
        let delta = current - previous;
        let direction = if delta > 0.0 {
            Direction::Up
        } else if delta < 0.0 {
            Direction::Down
        } else {
            Direction::Unchanged
        };
        Self {
            previous,
            current,
            delta,
            direction,
        }
    }
}

/// One point of the score-over-time series; `time` starts at 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub user: String,
    pub time: usize,
    pub risk_score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskHistory {
    series: BTreeMap<String, Vec<HistoryEntry>>,
}

impl RiskHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an empty series for `user` if none exists.
    pub fn register(&mut self, user: &str) {
        self.series.entry(user.to_string()).or_default();
    }

    pub fn push(&mut self, user: &str, score: f64, recorded_at: DateTime<Utc>) {
        self.series
            .entry(user.to_string())
            .or_default()
            .push(HistoryEntry { score, recorded_at });
    }

    /// Append every user's score from `report`.
    pub fn record(&mut self, report: &RiskReport) {
        for (user, score) in &report.scores.risk_score {
            self.push(user, *score, report.computed_at);
        }
    }

    pub fn series(&self, user: &str) -> &[HistoryEntry] {
        self.series.get(user).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn latest(&self, user: &str) -> Option<f64> {
        self.series(user).last().map(|e| e.score)
    }

    pub fn change(&self, user: &str) -> Option<ScoreChange> {
        match self.series(user) {
            [.., previous, current] => Some(ScoreChange::between(previous.score, current.score)),
            _ => None,
        }
    }

    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    /// Flatten into chart points, users in name order.
    pub fn points(&self) -> Vec<HistoryPoint> {
        self.series
            .iter()
            .flat_map(|(user, entries)| {
                entries.iter().enumerate().map(move |(i, e)| HistoryPoint {
                    user: user.clone(),
                    time: i + 1,
                    risk_score: e.score,
                })
            })
            .collect()
    }

    /// Number of tracked users
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
