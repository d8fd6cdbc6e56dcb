//! slirc-bridge - Straylight IRC Bridge
//!
//! Bridges one live IRC session with a directory of per-target transcripts
//! and a line-oriented control endpoint. Control lines are parsed, admitted
//! to a small bounded queue and applied to the session by a single
//! dispatcher task; inbound traffic is appended to the same transcripts.

pub mod config;
pub mod control;
pub mod error;
pub mod events;
pub mod line;
pub mod session;
pub mod state;
pub mod telemetry;

pub use control::{Command, CommandQueue, Dispatcher};
pub use events::EventSink;
pub use session::ChatSession;
pub use state::{TargetLog, TargetRegistry};
