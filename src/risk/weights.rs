//! Threat-category and event-severity weight catalogs.

use crate::error::RiskError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Name → weight. Ordered so every derived mapping iterates deterministically.
pub type WeightMap = BTreeMap<String, f64>;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    /// Threat category weights (e.g. IAM, DLP, EDR, Phishing)
    pub categories: WeightMap,
    /// Event severity weights (e.g. Critical, High, Medium, Low)
    pub severities: WeightMap,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            categories: weight_map(&[("IAM", 0.2), ("DLP", 0.2), ("EDR", 0.2), ("Phishing", 0.4)]),
            severities: weight_map(&[
                ("Critical", 0.5),
                ("High", 0.25),
                ("Medium", 0.15),
                ("Low", 0.1),
            ]),
        }
    }
}

impl Weights {
    pub fn new(categories: WeightMap, severities: WeightMap) -> Self {
        Self {
            categories,
            severities,
        }
    }

    /// Reject empty catalogs and weights outside (0, 1]. A catalog that does not
    /// sum to 1 is only warned about.
    pub fn validate(&self) -> Result<(), RiskError> {
        validate_catalog("category", &self.categories)?;
        validate_catalog("severity", &self.severities)
    }
}

/// Build a [`WeightMap`] from `(name, weight)` pairs.
pub fn weight_map(pairs: &[(&str, f64)]) -> WeightMap {
    pairs
        .iter()
        .map(|(name, weight)| (name.to_string(), *weight))
        .collect()
}

fn validate_catalog(kind: &'static str, weights: &WeightMap) -> Result<(), RiskError> {
    if weights.is_empty() {
        return Err(RiskError::EmptyCatalog(kind));
    }
    for (name, &weight) in weights {
        if !weight.is_finite() || weight <= 0.0 || weight > 1.0 {
            return Err(RiskError::InvalidWeight {
                name: name.clone(),
                weight,
            });
        }
    }
    let sum: f64 = weights.values().sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        warn!(kind, sum, "weights do not sum to 1");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_are_valid() {
        let w = Weights::default();
        assert!(w.validate().is_ok());
        assert_eq!(w.categories["Phishing"], 0.4);
        assert_eq!(w.severities["Critical"], 0.5);
    }

    #[test]
    fn rejects_out_of_range_weight() {
        let w = Weights::new(weight_map(&[("IAM", 1.5)]), weight_map(&[("Low", 0.1)]));
        match w.validate() {
            Err(RiskError::InvalidWeight { name, weight }) => {
                assert_eq!(name, "IAM");
                assert_eq!(weight, 1.5);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn rejects_zero_and_nan() {
        let zero = Weights::new(weight_map(&[("IAM", 0.0)]), weight_map(&[("Low", 1.0)]));
        assert!(matches!(zero.validate(), Err(RiskError::InvalidWeight { .. })));
        let nan = Weights::new(weight_map(&[("IAM", 1.0)]), weight_map(&[("Low", f64::NAN)]));
        assert!(matches!(nan.validate(), Err(RiskError::InvalidWeight { .. })));
    }

    #[test]
    fn rejects_empty_catalog() {
        let w = Weights::new(WeightMap::new(), weight_map(&[("Low", 1.0)]));
        assert!(matches!(w.validate(), Err(RiskError::EmptyCatalog("category"))));
    }

    #[test]
    fn unnormalized_weights_are_accepted() {
        let w = Weights::new(
            weight_map(&[("A", 0.5), ("B", 0.9)]),
            weight_map(&[("X", 0.3)]),
        );
        assert!(w.validate().is_ok());
    }
}
