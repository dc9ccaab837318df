//! The four acquisition policies behind one interface

use rand::rngs::StdRng;
use rand::Rng;

use super::analytic::{ExpectedImprovement, PosteriorMean, ProbabilityOfImprovement};
use super::entropy::MaxValueEntropy;
use super::knowledge_gradient::{FantasySampler, KnowledgeGradient};
use super::optimize::optimize;
use super::{AcquisitionPolicy, Candidate, UNIT_INTERVAL};
use crate::config::{AcquisitionConfig, AcquisitionKind, KnowledgeGradientEffort, OptimizerEffort};
use crate::design::DesignHistory;
use crate::surrogate::SurrogateModel;
use crate::{Error, Result};

/// Build the policy selected in the configuration
pub fn build_policy(config: &AcquisitionConfig) -> Box<dyn AcquisitionPolicy> {
    match config.kind {
        AcquisitionKind::ExpectedImprovement | AcquisitionKind::ProbabilityOfImprovement => {
            Box::new(ImprovementPolicy {
                kind: config.kind,
                effort: config.optimizer,
            })
        }
        AcquisitionKind::KnowledgeGradient => Box::new(KnowledgeGradientPolicy {
            effort: config.knowledge_gradient,
        }),
        AcquisitionKind::MaxValueEntropy => Box::new(EntropySearchPolicy {
            candidates: config.es_candidates,
            effort: config.optimizer,
        }),
    }
}

/// Expected improvement or probability of improvement over the best observation
#[derive(Debug, Clone, Copy)]
pub struct ImprovementPolicy {
    kind: AcquisitionKind,
    effort: OptimizerEffort,
}

impl AcquisitionPolicy for ImprovementPolicy {
    fn kind(&self) -> AcquisitionKind {
        self.kind
    }

    fn propose(
        &self,
        model: &dyn SurrogateModel,
        history: &DesignHistory,
        rng: &mut StdRng,
    ) -> Result<Candidate> {
        let best_f = history.best_value().ok_or(Error::EmptyHistory)?;
        let (x, value) = if self.kind == AcquisitionKind::ProbabilityOfImprovement {
            let acq = ProbabilityOfImprovement::new(model, best_f);
            optimize(&acq, UNIT_INTERVAL, self.effort.num_restarts, self.effort.raw_samples, rng)
        } else {
            let acq = ExpectedImprovement::new(model, best_f);
            optimize(&acq, UNIT_INTERVAL, self.effort.num_restarts, self.effort.raw_samples, rng)
        };
        Ok(Candidate { x, value })
    }
}

/// Knowledge gradient, re-optimized against the best current posterior mean
#[derive(Debug, Clone, Copy)]
pub struct KnowledgeGradientPolicy {
    effort: KnowledgeGradientEffort,
}

impl AcquisitionPolicy for KnowledgeGradientPolicy {
    fn kind(&self) -> AcquisitionKind {
        AcquisitionKind::KnowledgeGradient
    }

    fn propose(
        &self,
        model: &dyn SurrogateModel,
        history: &DesignHistory,
        rng: &mut StdRng,
    ) -> Result<Candidate> {
        if history.is_empty() {
            return Err(Error::EmptyHistory);
        }
        let OptimizerEffort {
            num_restarts,
            raw_samples,
        } = self.effort.optimizer;
        let sampler = FantasySampler::new(self.effort.fantasies, rng);

        let initial = KnowledgeGradient::new(model, &sampler);
        let (initial_x, initial_value) =
            optimize(&initial, UNIT_INTERVAL, num_restarts, raw_samples, rng);

        let (argmax_mean, max_mean) = optimize(
            &PosteriorMean::new(model),
            UNIT_INTERVAL,
            num_restarts,
            raw_samples,
            rng,
        );
        tracing::debug!(
            initial_x,
            initial_value,
            argmax_mean,
            max_mean,
            "knowledge gradient baseline"
        );

        let proper = KnowledgeGradient::new(model, &sampler).with_current_value(max_mean);
        let (x, value) = optimize(&proper, UNIT_INTERVAL, num_restarts, raw_samples, rng);
        Ok(Candidate { x, value })
    }
}

/// Max-value entropy search over a fresh random candidate set
#[derive(Debug, Clone, Copy)]
pub struct EntropySearchPolicy {
    candidates: usize,
    effort: OptimizerEffort,
}

impl AcquisitionPolicy for EntropySearchPolicy {
    fn kind(&self) -> AcquisitionKind {
        AcquisitionKind::MaxValueEntropy
    }

    fn propose(
        &self,
        model: &dyn SurrogateModel,
        history: &DesignHistory,
        rng: &mut StdRng,
    ) -> Result<Candidate> {
        if history.is_empty() {
            return Err(Error::EmptyHistory);
        }
        let (lo, hi) = UNIT_INTERVAL;
        let mut candidate_set: Vec<f64> = (0..self.candidates)
            .map(|_| rng.random_range(lo..=hi))
            .collect();
        // Observed inputs always take part in the max-value estimate
        candidate_set.extend(history.xs());

        let acq = MaxValueEntropy::new(model, &candidate_set, rng);
        let (x, value) = optimize(
            &acq,
            UNIT_INTERVAL,
            self.effort.num_restarts,
            self.effort.raw_samples,
            rng,
        );
        Ok(Candidate { x, value })
    }
}
