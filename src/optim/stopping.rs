//! Stopping rules
//!
//! Exactly one rule is active per run. Rules are consulted after every trial
//! the loop adds; the iteration cap is enforced by the loop itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{StoppingConfig, StoppingKind};
use crate::design::DesignHistory;

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// K consecutive trials without meaningful improvement
    ValueStagnation,
    /// K trials clustered around the best observation
    SpatialConvergence,
    /// Neither rule fired before the iteration cap
    IterationCap,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::ValueStagnation => "no improvement over the best value",
            StopReason::SpatialConvergence => "trials converged around the best point",
            StopReason::IterationCap => "iteration cap reached",
        };
        f.write_str(text)
    }
}

/// Stopping predicate evaluated after each new trial
pub trait StoppingRule {
    /// Update internal state with the newest trial and decide whether to stop
    fn should_stop(&mut self, history: &DesignHistory) -> bool;

    /// Reason reported when this rule fires
    fn reason(&self) -> StopReason;
}

/// Build the configured rule, seeded from the initial design
///
/// Value stopping starts from the initial design's best value rather than
/// −∞, so the first loop trial only resets the counter if it truly improves.
pub fn build_stopping(config: &StoppingConfig, history: &DesignHistory) -> Box<dyn StoppingRule> {
    match config.kind {
        StoppingKind::ValueBased => Box::new(ValueStopping::new(
            config.improvement_threshold,
            config.consecutive_trials,
            history.best_value().unwrap_or(f64::NEG_INFINITY),
        )),
        StoppingKind::SpatialDensity => Box::new(SpatialStopping::new(
            config.x_range,
            config.consecutive_trials,
        )),
    }
}

/// Stop after `patience` consecutive trials that fail to beat the best value
/// by more than `threshold`
#[derive(Debug, Clone, PartialEq)]
pub struct ValueStopping {
    threshold: f64,
    patience: usize,
    best_value: f64,
    counter: usize,
}

impl ValueStopping {
    /// `initial_best` is the best value of the initial design
    pub fn new(threshold: f64, patience: usize, initial_best: f64) -> Self {
        Self {
            threshold,
            patience,
            best_value: initial_best,
            counter: 0,
        }
    }

    /// Record one observation, returning whether the rule fires
    ///
    /// A gain of exactly `threshold` is not an improvement. Improvements
    /// smaller than the threshold leave `best_value` untouched.
    pub fn observe(&mut self, y: f64) -> bool {
        if y > self.best_value + self.threshold {
            self.best_value = y;
            self.counter = 0;
        } else {
            self.counter += 1;
        }
        self.counter >= self.patience
    }

    pub fn best_value(&self) -> f64 {
        self.best_value
    }

    /// Consecutive non-improving trials so far
    pub fn counter(&self) -> usize {
        self.counter
    }
}

impl StoppingRule for ValueStopping {
    fn should_stop(&mut self, history: &DesignHistory) -> bool {
        match history.last() {
            Some(trial) => self.observe(trial.y),
            None => false,
        }
    }

    fn reason(&self) -> StopReason {
        StopReason::ValueStagnation
    }
}

/// Stop once some trial has at least `min_neighbors` trials (itself
/// included) strictly closer than `x_range`, the best trial among them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialStopping {
    x_range: f64,
    min_neighbors: usize,
}

impl SpatialStopping {
    pub fn new(x_range: f64, min_neighbors: usize) -> Self {
        Self {
            x_range,
            min_neighbors,
        }
    }

    /// Whether the history has converged around its best trial
    ///
    /// Distances are measured on the normalized input. The best trial is the
    /// first one attaining the maximum observed value.
    pub fn converged(&self, history: &DesignHistory) -> bool {
        let Some(best) = history.best_index() else {
            return false;
        };
        let xs = history.xs();
        xs.iter().any(|&center| {
            let neighbors: Vec<usize> = (0..xs.len())
                .filter(|&j| (center - xs[j]).abs() < self.x_range)
                .collect();
            neighbors.len() >= self.min_neighbors && neighbors.contains(&best)
        })
    }
}

impl StoppingRule for SpatialStopping {
    fn should_stop(&mut self, history: &DesignHistory) -> bool {
        self.converged(history)
    }

    fn reason(&self) -> StopReason {
        StopReason::SpatialConvergence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibrate::DomainBounds;
    use crate::design::Trial;

    fn history(points: &[(f64, f64)]) -> DesignHistory {
        let bounds = DomainBounds::new(0.0, 1.0);
        let mut h = DesignHistory::new();
        for &(x, y) in points {
            h.push(Trial::new(x, &bounds, y));
        }
        h
    }

    #[test]
    fn test_value_stops_at_kth_plateau_trial() {
        let mut rule = ValueStopping::new(1e-4, 3, 1.0);
        assert!(!rule.observe(1.00005));
        assert!(!rule.observe(0.9));
        assert_eq!(rule.counter(), 2);
        assert!(rule.observe(1.0));
        assert_eq!(rule.best_value(), 1.0);
    }

    #[test]
    fn test_value_improvement_resets_counter() {
        let mut rule = ValueStopping::new(1e-4, 3, 1.0);
        assert!(!rule.observe(0.5));
        assert!(!rule.observe(0.5));
        assert!(!rule.observe(1.5));
        assert_eq!(rule.counter(), 0);
        assert_eq!(rule.best_value(), 1.5);
        assert!(!rule.observe(1.5));
        assert!(!rule.observe(1.5));
        assert!(rule.observe(1.5));
    }

    #[test]
    fn test_value_gain_equal_to_threshold_is_not_improvement() {
        let mut rule = ValueStopping::new(0.5, 1, 1.0);
        assert!(rule.observe(1.5));
    }

    #[test]
    fn test_value_rule_reads_last_trial() {
        let mut h = history(&[(0.0, 0.0), (1.0, 2.0)]);
        let config = StoppingConfig {
            consecutive_trials: 2,
            ..StoppingConfig::default()
        };
        let mut rule = build_stopping(&config, &h);
        h.push(Trial::new(0.5, &DomainBounds::new(0.0, 1.0), 1.9));
        assert!(!rule.should_stop(&h));
        h.push(Trial::new(0.6, &DomainBounds::new(0.0, 1.0), 2.0));
        assert!(rule.should_stop(&h));
        assert_eq!(rule.reason(), StopReason::ValueStagnation);
    }

    #[test]
    fn test_spatial_fires_on_cluster_containing_best() {
        let h = history(&[
            (0.0, 0.1),
            (1.0, 0.2),
            (0.50, 0.8),
            (0.51, 0.9),
            (0.52, 1.0),
            (0.53, 0.95),
        ]);
        assert!(SpatialStopping::new(0.05, 3).converged(&h));
    }

    #[test]
    fn test_spatial_ignores_cluster_without_best() {
        let h = history(&[
            (0.0, 0.1),
            (1.0, 5.0),
            (0.50, 0.8),
            (0.51, 0.9),
            (0.52, 1.0),
            (0.53, 0.95),
        ]);
        assert!(!SpatialStopping::new(0.05, 3).converged(&h));
    }

    #[test]
    fn test_spatial_distance_is_strict() {
        let h = history(&[(0.25, 1.0), (0.5, 0.0), (0.75, 0.0)]);
        assert!(!SpatialStopping::new(0.25, 2).converged(&h));
        assert!(SpatialStopping::new(0.2500001, 2).converged(&h));
    }

    #[test]
    fn test_spatial_needs_enough_neighbors() {
        let h = history(&[(0.0, 0.0), (0.5, 1.0), (0.51, 0.5)]);
        assert!(!SpatialStopping::new(0.05, 3).converged(&h));
        assert!(SpatialStopping::new(0.05, 2).converged(&h));
    }

    #[test]
    fn test_spatial_empty_history() {
        assert!(!SpatialStopping::new(0.05, 1).converged(&DesignHistory::new()));
    }

    #[test]
    fn test_build_spatial_rule() {
        let config = StoppingConfig {
            kind: StoppingKind::SpatialDensity,
            ..StoppingConfig::default()
        };
        let rule = build_stopping(&config, &DesignHistory::new());
        assert_eq!(rule.reason(), StopReason::SpatialConvergence);
    }
}
