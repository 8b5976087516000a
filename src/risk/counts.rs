//! Per-user event count table: user → threat category → event severity → count.

use super::weights::WeightMap;
use crate::error::RiskError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub type SeverityCounts = BTreeMap<String, u64>;
pub type CategoryCounts = BTreeMap<String, SeverityCounts>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountTable {
    users: BTreeMap<String, CategoryCounts>,
}

impl CountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a JSON object shaped `{"user": {"category": {"severity": n}}}`.
    pub fn load(path: &Path) -> Result<Self, RiskError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Insert `name` with every category × severity cell set to zero. No-op if
    /// the user exists; returns whether the user was inserted.
    pub fn add_user(&mut self, name: &str, categories: &WeightMap, severities: &WeightMap) -> bool {
        if self.users.contains_key(name) {
            return false;
        }
        self.users.insert(name.to_string(), zeroed(categories, severities));
        true
    }

    pub fn get(&self, user: &str, category: &str, severity: &str) -> Option<u64> {
        self.users.get(user)?.get(category)?.get(severity).copied()
    }

    /// Write a cell, creating intermediate levels as needed.
    pub fn set(&mut self, user: &str, category: &str, severity: &str, count: u64) {
        self.users
            .entry(user.to_string())
            .or_default()
            .entry(category.to_string())
            .or_default()
            .insert(severity.to_string(), count);
    }

    pub fn user(&self, name: &str) -> Option<&CategoryCounts> {
        self.users.get(name)
    }

    pub fn user_mut(&mut self, name: &str) -> Option<&mut CategoryCounts> {
        self.users.get_mut(name)
    }

    pub fn contains_user(&self, name: &str) -> bool {
        self.users.contains_key(name)
    }

    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CategoryCounts)> {
        self.users.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut CategoryCounts)> {
        self.users.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl From<BTreeMap<String, CategoryCounts>> for CountTable {
    fn from(users: BTreeMap<String, CategoryCounts>) -> Self {
        Self { users }
    }
}

/// Idempotent user registration on a caller-owned table. Returns the table for chaining.
pub fn add_user<'a>(
    users: &'a mut CountTable,
    name: &str,
    categories: &WeightMap,
    severities: &WeightMap,
) -> &'a mut CountTable {
    users.add_user(name, categories, severities);
    users
}

fn zeroed(categories: &WeightMap, severities: &WeightMap) -> CategoryCounts {
    categories
        .keys()
        .map(|category| {
            let cells = severities.keys().map(|severity| (severity.clone(), 0)).collect();
            (category.clone(), cells)
        })
        .collect()
}
