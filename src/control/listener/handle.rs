//! Single duplex-handle control listener.

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite, Join, Stdin, Stdout};
use tracing::info;

use super::{ControlListener, serve_lines};
use crate::control::CommandQueue;
use crate::error::ListenerError;

/// Serves exactly one read loop over one bidirectional handle. End of input
/// ends the listener; a read error is returned to the caller.
pub struct HandleListener<S> {
    handle: S,
}

impl<S> HandleListener<S>
where
    S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    pub fn new(handle: S) -> Self {
        Self { handle }
    }
}

impl HandleListener<Join<Stdin, Stdout>> {
    /// Commands on stdin, responses on stdout.
    pub fn stdio() -> Self {
        Self::new(tokio::io::join(tokio::io::stdin(), tokio::io::stdout()))
    }
}

#[async_trait]
impl<S> ControlListener for HandleListener<S>
where
    S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    async fn run(self: Box<Self>, queue: CommandQueue) -> Result<(), ListenerError> {
        info!("Control handle ready");
        let (read, write) = tokio::io::split(self.handle);
        serve_lines(read, write, &queue).await?;
        info!("Control handle reached end of input");
        Ok(())
    }
}
