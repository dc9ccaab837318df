//! Trials and the append-only design history

use serde::{Deserialize, Serialize};

use crate::calibrate::DomainBounds;

/// One completed oracle evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    /// Input in [0, 1]
    pub x_normalized: f64,
    /// Input in physical units
    pub x_physical: f64,
    /// Observed outcome
    pub y: f64,
}

impl Trial {
    /// Record an outcome observed at a normalized input
    pub fn new(x_normalized: f64, bounds: &DomainBounds, y: f64) -> Self {
        Self {
            x_normalized,
            x_physical: bounds.to_physical(x_normalized),
            y,
        }
    }
}

/// Ordered sequence of trials in evaluation order
///
/// Trials are only ever appended; nothing is sorted, replaced or removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignHistory {
    trials: Vec<Trial>,
}

impl DesignHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a trial
    pub fn push(&mut self, trial: Trial) {
        self.trials.push(trial);
    }

    /// Number of trials
    pub fn len(&self) -> usize {
        self.trials.len()
    }

    /// True when no trial has been recorded
    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    /// All trials in evaluation order
    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    /// Most recent trial
    pub fn last(&self) -> Option<&Trial> {
        self.trials.last()
    }

    /// Normalized inputs in evaluation order
    pub fn xs(&self) -> Vec<f64> {
        self.trials.iter().map(|t| t.x_normalized).collect()
    }

    /// Outcomes in evaluation order
    pub fn ys(&self) -> Vec<f64> {
        self.trials.iter().map(|t| t.y).collect()
    }

    /// Index of the best trial; ties resolve to the earliest
    pub fn best_index(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, t) in self.trials.iter().enumerate() {
            match best {
                Some((_, y)) if t.y <= y => {}
                _ => best = Some((i, t.y)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Best trial; ties resolve to the earliest
    pub fn best(&self) -> Option<&Trial> {
        self.best_index().map(|i| &self.trials[i])
    }

    /// Largest observed outcome
    pub fn best_value(&self) -> Option<f64> {
        self.best().map(|t| t.y)
    }
}
