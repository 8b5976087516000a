//! Risk tracker entrypoint: runs a single scoring round or an interval loop; each
//! round optionally randomizes counts, recalculates, and writes every user's score
//! as an ndjson record on stdout. Diagnostics go to stderr.

use risk_tracker::{
    config::TrackerConfig,
    logging::{HistoryLine, ScoreLine, StructuredLogger},
    risk::{CountTable, RiskEngine},
    session::Session,
};
use std::time::Duration;
use tracing::info;

fn run_one_round(
    session: &mut Session,
    config: &TrackerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if config.randomize.enabled {
        session.randomize(&mut rand::thread_rng(), config.randomize.max_count);
    }
    let report = session.calculate()?.clone();
    let history = session.history();
    let mut out = std::io::stdout().lock();
    for risk in report.users() {
        StructuredLogger::emit_json(&ScoreLine::new(&risk, history.change(&risk.user)), &mut out);
    }
    info!(users = report.len(), "round scored");
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("RISK_TRACKER_CONFIG_PATH")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("config.json"));
    let config = TrackerConfig::load(&config_path);

    StructuredLogger::init(config.log.json, &config.log.level);

    info!(users = config.users.len(), "risk tracker starting");

    let engine = RiskEngine::new(config.weights.clone())?;
    let mut session = Session::with_users(engine, &config.users)?;
    if let Some(path) = &config.counts_path {
        let table = CountTable::load(path)?;
        session.load_counts(&table)?;
        info!(path = ?path, users = table.len(), "counts loaded");
    }

    let interval_secs = config.interval_secs;
    if interval_secs > 0 {
        info!(interval_secs, rounds = ?config.rounds, "loop mode (Ctrl+C to stop)");
        static STOP: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);
        let _ = ctrlc::set_handler(|| {
            STOP.store(true, std::sync::atomic::Ordering::Relaxed);
        });
        let mut round: u64 = 0;
        while !STOP.load(std::sync::atomic::Ordering::Relaxed) {
            round += 1;
            if let Err(e) = run_one_round(&mut session, &config) {
                tracing::warn!(round, error = %e, "round failed");
            }
            if config.rounds.is_some_and(|limit| round >= limit) {
                break;
            }
            for _ in 0..interval_secs {
                if STOP.load(std::sync::atomic::Ordering::Relaxed) {
                    break;
                }
                std::thread::sleep(Duration::from_secs(1));
            }
        }
        info!(rounds = round, "risk tracker stopping");
    } else {
        run_one_round(&mut session, &config)?;
        info!("risk tracker round complete");
    }

    let mut out = std::io::stdout().lock();
    for point in session.history().points() {
        StructuredLogger::emit_json(&HistoryLine::new(&point), &mut out);
    }

    Ok(())
}
