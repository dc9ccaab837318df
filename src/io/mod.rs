//! Result persistence
//!
//! The [`TrialLog`] is the only file a run writes to while it is in
//! progress; every append is flushed immediately so that a crash loses at
//! most the evaluation in flight.

mod registry;
mod trial_log;

pub use registry::{append_identity, read_identities};
pub use trial_log::{LoggedRun, RunSummary, TrialLog};
