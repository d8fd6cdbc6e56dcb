//! Control-command ingestion and serialized dispatch.
//!
//! ```text
//! listener ─► parse_command ─► CommandQueue ─► Dispatcher ─► session + transcripts
//! ```

mod command;
mod dispatch;
pub mod listener;
mod queue;

pub use command::{Command, parse_command};
pub use dispatch::Dispatcher;
pub use listener::{ControlListener, HandleListener, SocketListener, serve_lines};
pub use queue::{Admission, CommandQueue, DEFAULT_QUEUE_CAPACITY, command_queue};
