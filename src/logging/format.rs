//! Output streams: tracing diagnostics on stderr, ndjson score and history records on stdout.

use crate::history::{Direction, HistoryPoint, ScoreChange};
use crate::risk::UserRisk;
use serde::Serialize;
use std::io::Write;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Record type tag carried by every stdout line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Score,
    History,
}

/// One scored user of the latest round.
#[derive(Serialize)]
pub struct ScoreLine<'a> {
    pub kind: RecordKind,
    pub user: &'a str,
    pub risk_score: f64,
    pub total_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_category: Option<&'a str>,
}

impl<'a> ScoreLine<'a> {
    pub fn new(risk: &'a UserRisk, change: Option<ScoreChange>) -> Self {
        let top_category = risk
            .thread_percentage
            .iter()
            .filter(|(_, share)| **share > 0.0)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(category, _)| category.as_str());
        Self {
            kind: RecordKind::Score,
            user: &risk.user,
            risk_score: risk.risk_score,
            total_percentage: risk.total_percentage,
            change: change.map(|c| c.delta),
            direction: change.map(|c| c.direction),
            top_category,
        }
    }
}

/// A history point tagged for the shared stdout stream.
#[derive(Serialize)]
pub struct HistoryLine<'a> {
    pub kind: RecordKind,
    #[serde(flatten)]
    pub point: &'a HistoryPoint,
}

impl<'a> HistoryLine<'a> {
    pub fn new(point: &'a HistoryPoint) -> Self {
        Self {
            kind: RecordKind::History,
            point,
        }
    }
}

pub struct StructuredLogger;

impl StructuredLogger {
    /// Install the global subscriber on stderr so stdout carries only records.
    /// Level comes from RUST_LOG, else `default_level`.
    pub fn init(json: bool, default_level: &str) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        let registry = tracing_subscriber::registry().with(filter);
        if json {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_span_events(FmtSpan::NONE)
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    /// Write one [`ScoreLine`] or [`HistoryLine`] as a single JSON line.
    pub fn emit_json(record: &impl Serialize, w: &mut impl Write) {
        if let Ok(line) = serde_json::to_string(record) {
            let _ = writeln!(w, "{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::RiskHistory;
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn risk() -> UserRisk {
        let mut thread_percentage = BTreeMap::new();
        thread_percentage.insert("IAM".to_string(), 25.0);
        thread_percentage.insert("Phishing".to_string(), 75.0);
        UserRisk {
            user: "User1".to_string(),
            risk_score: 80.0,
            total_percentage: 60.0,
            thread_percentage,
        }
    }

    fn lines(buf: Vec<u8>) -> Vec<serde_json::Value> {
        String::from_utf8(buf)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn score_line_picks_top_category() {
        let r = risk();
        let line = ScoreLine::new(&r, None);
        assert_eq!(line.top_category, Some("Phishing"));
        assert!(line.change.is_none());
    }

    #[test]
    fn emit_json_writes_one_line() {
        let r = risk();
        let mut buf = Vec::new();
        StructuredLogger::emit_json(&ScoreLine::new(&r, None), &mut buf);
        assert!(buf.ends_with(b"\n"));
        let out = lines(buf);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["kind"], "score");
        assert_eq!(out[0]["user"], "User1");
        assert_eq!(out[0]["risk_score"], 80.0);
        assert!(out[0].get("change").is_none());
    }

    #[test]
    fn score_line_carries_change() {
        let mut h = RiskHistory::new();
        h.push("User1", 90.0, Utc::now());
        h.push("User1", 80.0, Utc::now());
        let r = risk();
        let mut buf = Vec::new();
        StructuredLogger::emit_json(&ScoreLine::new(&r, h.change("User1")), &mut buf);
        let out = lines(buf);
        assert_eq!(out[0]["change"], -10.0);
        assert_eq!(out[0]["direction"], "down");
        assert_eq!(out[0]["top_category"], "Phishing");
    }

    #[test]
    fn score_and_history_records_are_distinguishable() {
        let mut h = RiskHistory::new();
        h.push("User1", 75.0, Utc::now());
        let r = risk();
        let mut buf = Vec::new();
        StructuredLogger::emit_json(&ScoreLine::new(&r, None), &mut buf);
        for point in h.points() {
            StructuredLogger::emit_json(&HistoryLine::new(&point), &mut buf);
        }
        let out = lines(buf);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["kind"], "score");
        assert_eq!(out[1]["kind"], "history");
        assert_eq!(out[1]["user"], "User1");
        assert_eq!(out[1]["time"], 1);
        assert_eq!(out[1]["risk_score"], 75.0);
    }
}
