//! Closed-loop optimization: the iteration state machine, its stopping
//! rules and operator augmentation

mod augment;
mod runner;
mod stopping;

pub use augment::InteractiveAugmenter;
pub use runner::{log_path, run, LoopState, OptimizationLoop, RunReport};
pub use stopping::{
    build_stopping, SpatialStopping, StopReason, StoppingRule, ValueStopping,
};
