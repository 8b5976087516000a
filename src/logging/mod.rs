//! Structured JSON logging.

mod format;

pub use format::{HistoryLine, RecordKind, ScoreLine, StructuredLogger};
