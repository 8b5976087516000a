//! Error taxonomy for scoring, session bookkeeping, and configuration loading.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RiskError {
    /// A (user, category, severity) cell the weight catalogs require is absent from the count table.
    #[error("missing count cell: user={user} category={category} severity={severity}")]
    MissingCell {
        user: String,
        category: String,
        severity: String,
    },
    #[error("unknown user: {0}")]
    UnknownUser(String),
    #[error("unknown threat category: {0}")]
    UnknownCategory(String),
    #[error("unknown event severity: {0}")]
    UnknownSeverity(String),
    /// Empty, or carries leading/trailing whitespace.
    #[error("invalid user name: {0:?}")]
    InvalidUserName(String),
    /// Weights must be finite and within (0, 1].
    #[error("invalid weight for {name}: {weight}")]
    InvalidWeight { name: String, weight: f64 },
    #[error("{0} catalog is empty")]
    EmptyCatalog(&'static str),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config decode failure: {0}")]
    Config(#[from] serde_json::Error),
}
