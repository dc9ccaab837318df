//! Closed-form improvement acquisitions and the posterior mean

use super::normal;
use super::AcquisitionFunction;
use crate::surrogate::SurrogateModel;

/// Standard deviation below which the posterior is treated as a point mass
const MIN_STDDEV: f64 = 1e-12;

/// Expected gain over the best observed value
pub struct ExpectedImprovement<'a> {
    model: &'a dyn SurrogateModel,
    best_f: f64,
}

impl<'a> ExpectedImprovement<'a> {
    pub fn new(model: &'a dyn SurrogateModel, best_f: f64) -> Self {
        Self { model, best_f }
    }
}

impl AcquisitionFunction for ExpectedImprovement<'_> {
    fn evaluate(&self, x: f64) -> f64 {
        let (mean, stddev) = self.model.predict(x);
        expected_improvement(mean, stddev, self.best_f)
    }
}

/// `E[max(Y − best_f, 0)]` for `Y ~ N(mean, stddev²)`
pub fn expected_improvement(mean: f64, stddev: f64, best_f: f64) -> f64 {
    let gain = mean - best_f;
    if stddev < MIN_STDDEV {
        return gain.max(0.0);
    }
    let z = gain / stddev;
    (gain * normal::cdf(z) + stddev * normal::pdf(z)).max(0.0)
}

/// Probability of exceeding the best observed value
pub struct ProbabilityOfImprovement<'a> {
    model: &'a dyn SurrogateModel,
    best_f: f64,
}

impl<'a> ProbabilityOfImprovement<'a> {
    pub fn new(model: &'a dyn SurrogateModel, best_f: f64) -> Self {
        Self { model, best_f }
    }
}

impl AcquisitionFunction for ProbabilityOfImprovement<'_> {
    fn evaluate(&self, x: f64) -> f64 {
        let (mean, stddev) = self.model.predict(x);
        probability_of_improvement(mean, stddev, self.best_f)
    }
}

/// `P(Y > best_f)` for `Y ~ N(mean, stddev²)`
pub fn probability_of_improvement(mean: f64, stddev: f64, best_f: f64) -> f64 {
    let gain = mean - best_f;
    if stddev < MIN_STDDEV {
        return if gain > 0.0 { 1.0 } else { 0.0 };
    }
    normal::cdf(gain / stddev)
}

/// Posterior mean, maximized to find the best value the model currently believes in
pub struct PosteriorMean<'a> {
    model: &'a dyn SurrogateModel,
}

impl<'a> PosteriorMean<'a> {
    pub fn new(model: &'a dyn SurrogateModel) -> Self {
        Self { model }
    }
}

impl AcquisitionFunction for PosteriorMean<'_> {
    fn evaluate(&self, x: f64) -> f64 {
        self.model.predict(x).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_expected_improvement_at_best() {
        // z = 0: EI = σ φ(0)
        assert_abs_diff_eq!(
            expected_improvement(1.0, 2.0, 1.0),
            2.0 * normal::pdf(0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_expected_improvement_degenerate() {
        assert_abs_diff_eq!(expected_improvement(3.0, 0.0, 1.0), 2.0);
        assert_abs_diff_eq!(expected_improvement(0.0, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_expected_improvement_monotone() {
        let low = expected_improvement(0.0, 1.0, 0.5);
        let high = expected_improvement(1.0, 1.0, 0.5);
        let wide = expected_improvement(0.0, 3.0, 0.5);
        assert!(high > low);
        assert!(wide > low);
        assert!(expected_improvement(-50.0, 1.0, 0.0) >= 0.0);
    }

    #[test]
    fn test_probability_of_improvement() {
        assert_abs_diff_eq!(probability_of_improvement(1.0, 1.0, 1.0), 0.5, epsilon = 1e-12);
        assert!(probability_of_improvement(2.0, 1.0, 1.0) > 0.8);
        assert_eq!(probability_of_improvement(2.0, 0.0, 1.0), 1.0);
        assert_eq!(probability_of_improvement(0.5, 0.0, 1.0), 0.0);
    }
}
