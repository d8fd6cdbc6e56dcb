//! Control transport front-ends.
//!
//! Every backend runs the same per-line exchange ([`serve_lines`]):
//!
//! ```text
//! > join #rust
//! < Got: [join #rust]
//! < Join { target: "#rust" }
//! > join
//! < Got: [join]
//! < Usage: join [target]
//! ```
//!
//! Admission to the queue is fire-and-forget; a dropped command still gets
//! its debug dump.

mod handle;
mod socket;

pub use handle::HandleListener;
pub use socket::SocketListener;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::FramedRead;
use tracing::{debug, warn};

use super::{CommandQueue, parse_command};
use crate::error::{CommandError, ListenerError};
use crate::line::{Line, LineCodec};

/// Longest accepted control line; longer lines are discarded unread.
pub const MAX_CONTROL_LINE_LEN: usize = 4096;

/// A transport that feeds control lines into the command queue.
#[async_trait]
pub trait ControlListener: Send {
    /// Serve until the transport is exhausted.
    ///
    /// An `Err` means the listener as a whole failed.
    async fn run(self: Box<Self>, queue: CommandQueue) -> Result<(), ListenerError>;
}

/// Read newline-delimited commands from `reader` until end-of-input, writing
/// the response framing for each line to `writer`.
///
/// Bad bytes are replaced and over-long lines are answered with an error
/// line; only a failing transport ends the loop early.
pub async fn serve_lines<R, W>(
    reader: R,
    mut writer: W,
    queue: &CommandQueue,
) -> Result<(), ListenerError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = FramedRead::new(reader, LineCodec::new(MAX_CONTROL_LINE_LEN));
    while let Some(frame) = lines.next().await {
        let line = match frame.map_err(ListenerError::Read)? {
            Line::Text(line) => line,
            Line::Overlong(len) => {
                warn!(len, "Discarding over-long control line");
                let e = CommandError::TooLong {
                    len,
                    max: MAX_CONTROL_LINE_LEN,
                };
                respond(&mut writer, &format!("{e}\n")).await?;
                continue;
            }
        };

        debug!(line = %line, "Control line");
        respond(&mut writer, &format!("Got: [{line}]\n")).await?;

        let cmd = match parse_command(&line) {
            Ok(cmd) => cmd,
            Err(e) => {
                debug!(code = e.error_code(), "Rejected control line");
                respond(&mut writer, &format!("{e}\n")).await?;
                continue;
            }
        };

        let dump = format!("{cmd:?}\n");
        queue.submit(cmd);
        respond(&mut writer, &dump).await?;
    }
    Ok(())
}

async fn respond<W: AsyncWrite + Unpin>(writer: &mut W, text: &str) -> Result<(), ListenerError> {
    writer
        .write_all(text.as_bytes())
        .await
        .map_err(ListenerError::Write)?;
    writer.flush().await.map_err(ListenerError::Write)
}
