//! Acquisition policies
//!
//! A policy turns the fitted surrogate into the next normalized query point.
//! Exactly one policy is active per run; [`build_policy`] picks it from the
//! resolved configuration. Every policy maximizes its acquisition function
//! with the same restart-based [`optimize`] primitive.

mod analytic;
mod entropy;
mod knowledge_gradient;
mod normal;
mod optimize;
mod policy;


pub use analytic::{
    expected_improvement, probability_of_improvement, ExpectedImprovement, PosteriorMean,
    ProbabilityOfImprovement,
};
pub use entropy::{MaxValueEntropy, MAX_VALUE_SAMPLES};
pub use knowledge_gradient::{FantasySampler, KnowledgeGradient};
pub use optimize::optimize;
pub use policy::{build_policy, EntropySearchPolicy, ImprovementPolicy, KnowledgeGradientPolicy};

use rand::rngs::StdRng;

use crate::config::AcquisitionKind;
use crate::design::DesignHistory;
use crate::surrogate::SurrogateModel;
use crate::Result;

/// The normalized input domain
pub const UNIT_INTERVAL: (f64, f64) = (0.0, 1.0);

/// Scalar score of a normalized input; larger is more informative
pub trait AcquisitionFunction {
    fn evaluate(&self, x: f64) -> f64;
}

impl<F> AcquisitionFunction for F
where
    F: Fn(f64) -> f64,
{
    fn evaluate(&self, x: f64) -> f64 {
        self(x)
    }
}

/// Next query point chosen by a policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Normalized input
    pub x: f64,
    /// Acquisition value at `x`
    pub value: f64,
}

/// Strategy choosing the next query point from the fitted surrogate
pub trait AcquisitionPolicy {
    fn kind(&self) -> AcquisitionKind;

    /// Maximize this policy's acquisition over [0, 1]
    fn propose(
        &self,
        model: &dyn SurrogateModel,
        history: &DesignHistory,
        rng: &mut StdRng,
    ) -> Result<Candidate>;
}
