//! Observer hook for newly created transcripts.
//!
//! The registry calls [`TargetObserver::on_target_created`] exactly once per
//! target name, after the log has been opened and registered. Whatever
//! exposes transcripts to remote readers hangs off this hook.

use super::TargetLog;
use tracing::info;

/// Trait for observing transcript creation.
pub trait TargetObserver: Send + Sync {
    /// Called once when a target log becomes available.
    fn on_target_created(&self, log: &TargetLog);
}

/// Announces new transcripts on the operator log.
pub struct TracingObserver;

impl TargetObserver for TracingObserver {
    fn on_target_created(&self, log: &TargetLog) {
        info!(target_name = %log.name(), path = %log.path().display(), "Transcript available");
    }
}
