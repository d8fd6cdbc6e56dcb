//! Target registry: lazily materialized map from target name to transcript.
//!
//! Both the inbound event sink and the command dispatcher resolve targets
//! concurrently. Creation happens while holding the map's entry lock, so racing
//! first-time lookups of one name converge on a single `TargetLog` and a
//! waiter never observes a half-opened one.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{TargetLog, TargetObserver, TracingObserver};
use crate::error::RegistryError;

/// Every inbound protocol line, verbatim.
pub const RAW_TARGET: &str = "raw";

/// Operator-facing trace of the session.
pub const SESSION_LOG_TARGET: &str = "log";

/// Whether a target name denotes a channel.
pub fn is_channel(name: &str) -> bool {
    name.starts_with('#')
}

pub struct TargetRegistry {
    dir: PathBuf,
    logs: DashMap<String, Arc<TargetLog>>,
    observer: Arc<dyn TargetObserver>,
}

impl TargetRegistry {
    /// Create an empty registry rooted at `dir`. Nothing is opened yet.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_observer(dir, Arc::new(TracingObserver))
    }

    pub fn with_observer(dir: impl Into<PathBuf>, observer: Arc<dyn TargetObserver>) -> Self {
        Self {
            dir: dir.into(),
            logs: DashMap::new(),
            observer,
        }
    }

    /// Return the transcript for `name`, creating it on first reference.
    pub fn resolve(&self, name: &str) -> Result<Arc<TargetLog>, RegistryError> {
        // Fast path: read lock on one shard only.
        if let Some(log) = self.logs.get(name) {
            return Ok(Arc::clone(log.value()));
        }

        validate_name(name)?;

        let log = match self.logs.entry(name.to_string()) {
            Entry::Occupied(entry) => return Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                // Blocking open while this shard is write-locked: other names
                // on the shard wait for it. Happens once per name.
                let log =
                    TargetLog::open(&self.dir, name).map_err(|source| RegistryError::Io {
                        name: name.to_string(),
                        source,
                    })?;
                let log = Arc::new(log);
                entry.insert(Arc::clone(&log));
                log
            }
        };

        // Only the caller that took the vacant branch gets here.
        debug!(target_name = %name, "Created transcript");
        self.observer.on_target_created(&log);
        Ok(log)
    }

    /// Resolve every regular file already present in the base directory.
    ///
    /// Returns the number of transcripts registered. Sockets and directories
    /// (e.g. the control socket) are skipped.
    pub fn load_existing(&self) -> Result<usize, RegistryError> {
        let mut loaded = 0;
        for entry in std::fs::read_dir(&self.dir).map_err(RegistryError::Scan)? {
            let entry = entry.map_err(RegistryError::Scan)?;
            let file_type = entry.file_type().map_err(RegistryError::Scan)?;
            if !file_type.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                warn!(path = %entry.path().display(), "Skipping non UTF-8 transcript name");
                continue;
            };
            self.resolve(&name)?;
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Snapshot of every known channel-shaped target name.
    pub fn channels(&self) -> Vec<String> {
        let mut channels: Vec<String> = self
            .logs
            .iter()
            .filter(|e| is_channel(e.key()))
            .map(|e| e.key().clone())
            .collect();
        channels.sort();
        channels
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }
}

/// Reject names that would escape the base directory or cannot be file names.
fn validate_name(name: &str) -> Result<(), RegistryError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\0']) {
        return Err(RegistryError::InvalidName(name.to_string()));
    }
    Ok(())
}
