//! Run configuration
//!
//! A YAML [`RunSpec`] is loaded and validated once, then resolved into an
//! immutable [`RunConfig`] shared with every component. Invalid policy
//! choices resolve to documented defaults with a warning; invalid numeric
//! values are rejected by [`validate_spec`].

mod cli;
mod identity;
mod loader;
mod policy;
mod resolved;
mod schema;
mod validate;

pub use cli::{
    apply_overrides, parse_args, Cli, Command, ConfigArgs, OutputFormat, RunArgs, SummaryArgs,
    ValidateArgs,
};
pub use identity::RunIdentity;
pub use loader::{load_config, load_spec, parse_spec};
pub use policy::{
    AcquisitionKind, DesignStrategy, KernelKind, MeanKind, NoiseKind, StoppingKind,
    SUPPORTED_NU,
};
pub use resolved::{
    AcquisitionConfig, CalibrationConfig, DesignConfig, KnowledgeGradientEffort, OptimizerEffort,
    RunConfig, StoppingConfig, SurrogateConfig,
};
pub use schema::{
    AcquisitionSpec, DesignSpec, DomainSpec, ModelSpec, OracleSpec, OutputSpec, ProcessSpec,
    RunSpec, StoppingSpec,
};
pub use validate::{validate_spec, ValidationError};
