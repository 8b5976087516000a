//! Caller-side state around the scoring core: user roster, editable counts,
//! recalculation, and the score history each recalculation appends to.

use crate::error::RiskError;
use crate::history::RiskHistory;
use crate::risk::{CountTable, RiskEngine, RiskReport};
use rand::Rng;
use tracing::{debug, info};

pub struct Session {
    engine: RiskEngine,
    counts: CountTable,
    history: RiskHistory,
    latest: Option<RiskReport>,
}

impl Session {
    pub fn new(engine: RiskEngine) -> Self {
        Self {
            engine,
            counts: CountTable::new(),
            history: RiskHistory::new(),
            latest: None,
        }
    }

    pub fn with_users<I, S>(engine: RiskEngine, users: I) -> Result<Self, RiskError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut session = Self::new(engine);
        for user in users {
            session.add_user(user.as_ref())?;
        }
        Ok(session)
    }

    /// Register a user with zeroed counts and an empty history. Returns `false`
    /// if the user already existed.
    pub fn add_user(&mut self, name: &str) -> Result<bool, RiskError> {
        check_user_name(name)?;
        let weights = self.engine.weights();
        let added = self
            .counts
            .add_user(name, &weights.categories, &weights.severities);
        self.history.register(name);
        if added {
            info!(user = name, "user added");
        }
        Ok(added)
    }

    pub fn set_count(
        &mut self,
        user: &str,
        category: &str,
        severity: &str,
        count: u64,
    ) -> Result<(), RiskError> {
        self.check_cell(category, severity)?;
        if !self.counts.contains_user(user) {
            return Err(RiskError::UnknownUser(user.to_string()));
        }
        self.counts.set(user, category, severity, count);
        Ok(())
    }

    pub fn count(&self, user: &str, category: &str, severity: &str) -> Option<u64> {
        self.counts.get(user, category, severity)
    }

    /// Zero all of a user's counts. History is kept.
    pub fn reset_user(&mut self, user: &str) -> Result<(), RiskError> {
        let by_category = self
            .counts
            .user_mut(user)
            .ok_or_else(|| RiskError::UnknownUser(user.to_string()))?;
        by_category
            .values_mut()
            .flat_map(|cells| cells.values_mut())
            .for_each(|count| *count = 0);
        debug!(user, "counts reset");
        Ok(())
    }

    /// Fill every cell with a uniform value in `0..=max_count`.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, max_count: u64) {
        for (_, by_category) in self.counts.iter_mut() {
            for count in by_category.values_mut().flat_map(|cells| cells.values_mut()) {
                *count = rng.gen_range(0..=max_count);
            }
        }
        debug!(max_count, users = self.counts.len(), "counts randomized");
    }

    /// Merge an external count table. Its users are registered; cells it omits stay
    /// zero. Categories or severities outside the weight catalogs are rejected.
    pub fn load_counts(&mut self, table: &CountTable) -> Result<(), RiskError> {
        for (user, by_category) in table.iter() {
            check_user_name(user)?;
            for (category, cells) in by_category {
                for severity in cells.keys() {
                    self.check_cell(category, severity)?;
                }
            }
        }
        for (user, by_category) in table.iter() {
            self.add_user(user)?;
            for (category, cells) in by_category {
                for (severity, count) in cells {
                    self.counts.set(user, category, severity, *count);
                }
            }
        }
        Ok(())
    }

    /// Score the current counts and append each user's score to the history.
    pub fn calculate(&mut self) -> Result<&RiskReport, RiskError> {
        let report = self.engine.score(&self.counts)?;
        self.history.record(&report);
        Ok(self.latest.insert(report))
    }

    pub fn latest(&self) -> Option<&RiskReport> {
        self.latest.as_ref()
    }

    pub fn history(&self) -> &RiskHistory {
        &self.history
    }

    pub fn counts(&self) -> &CountTable {
        &self.counts
    }

    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.counts.users()
    }

    pub fn engine(&self) -> &RiskEngine {
        &self.engine
    }

    fn check_cell(&self, category: &str, severity: &str) -> Result<(), RiskError> {
        let weights = self.engine.weights();
        if !weights.categories.contains_key(category) {
            return Err(RiskError::UnknownCategory(category.to_string()));
        }
        if !weights.severities.contains_key(severity) {
            return Err(RiskError::UnknownSeverity(severity.to_string()));
        }
        Ok(())
    }
}

/// Names are used verbatim as keys, so blank or padded names are refused
/// rather than normalized.
fn check_user_name(name: &str) -> Result<(), RiskError> {
    if name.is_empty() || name.trim() != name {
        return Err(RiskError::InvalidUserName(name.to_string()));
    }
    Ok(())
}
