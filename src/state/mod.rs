//! State management module.
//!
//! Contains the target registry (one transcript per channel or nick) and the
//! observer hook used to expose newly created transcripts.

mod observer;
mod registry;
mod target;

pub use observer::{TargetObserver, TracingObserver};
pub use registry::{RAW_TARGET, SESSION_LOG_TARGET, TargetRegistry, is_channel};
pub use target::{TargetLog, format_join, format_message, timestamp};
