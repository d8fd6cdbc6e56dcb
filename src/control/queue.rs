//! Bounded command queue with drop-newest admission.
//!
//! `submit` never waits: when the dispatcher falls behind and the queue is
//! full, the new command is discarded and the submitting connection is not
//! told. Listener read loops therefore never stall on a slow session.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;

use super::Command;

/// Default number of commands held for the dispatcher.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// Outcome of [`CommandQueue::submit`]. Listeners ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    Dropped,
}

/// Producer side of the command queue. Clone one per connection.
#[derive(Debug, Clone)]
pub struct CommandQueue {
    tx: mpsc::Sender<Command>,
}

/// Create a queue holding at most `capacity` commands.
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn command_queue(capacity: usize) -> (CommandQueue, mpsc::Receiver<Command>) {
    let (tx, rx) = mpsc::channel(capacity);
    (CommandQueue { tx }, rx)
}

impl CommandQueue {
    /// Try to enqueue `cmd` without waiting.
    pub fn submit(&self, cmd: Command) -> Admission {
        match self.tx.try_send(cmd) {
            Ok(()) => Admission::Admitted,
            Err(TrySendError::Full(cmd)) => {
                debug!(verb = cmd.verb(), "Command queue full, dropping command");
                Admission::Dropped
            }
            Err(TrySendError::Closed(cmd)) => {
                debug!(verb = cmd.verb(), "Dispatcher gone, dropping command");
                Admission::Dropped
            }
        }
    }
}
