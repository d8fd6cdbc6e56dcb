//! Unix socket control listener: one task per connection.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::net::UnixListener;
use tracing::{info, warn};

use super::{ControlListener, serve_lines};
use crate::control::CommandQueue;
use crate::error::ListenerError;

pub struct SocketListener {
    path: PathBuf,
    listener: UnixListener,
}

impl SocketListener {
    /// Bind the control socket, replacing a stale one left by a previous run.
    ///
    /// Must be called from within a tokio runtime.
    pub fn bind(path: impl Into<PathBuf>) -> Result<Self, ListenerError> {
        let path = path.into();
        let bind_error = |source: io::Error| ListenerError::Bind {
            path: path.display().to_string(),
            source,
        };

        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(bind_error(e)),
        }
        let listener = UnixListener::bind(&path).map_err(bind_error)?;
        info!(path = %path.display(), "Control socket bound");
        Ok(Self { path, listener })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ControlListener for SocketListener {
    /// Accept connections forever. A failing connection only ends itself; a
    /// failing accept ends the listener.
    async fn run(self: Box<Self>, queue: CommandQueue) -> Result<(), ListenerError> {
        loop {
            let (stream, _addr) = self.listener.accept().await.map_err(ListenerError::Accept)?;
            let queue = queue.clone();
            let path = self.path.display().to_string();
            tokio::spawn(async move {
                info!(path = %path, "Control connection accepted");
                let (read, write) = stream.into_split();
                match serve_lines(read, write, &queue).await {
                    Ok(()) => info!(path = %path, "Control connection closed"),
                    Err(e) => warn!(path = %path, error = %e, "Control connection failed"),
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{Command, command_queue};
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::UnixStream;

    #[tokio::test]
    async fn replaces_stale_socket_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ctl");
        std::fs::write(&path, "stale").unwrap();

        let listener = SocketListener::bind(&path).unwrap();
        assert_eq!(listener.path(), path);
        assert!(UnixStream::connect(&path).await.is_ok());
    }

    #[tokio::test]
    async fn serves_concurrent_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ctl");
        let listener = Box::new(SocketListener::bind(&path).unwrap());
        let (queue, mut rx) = command_queue(10);
        tokio::spawn(listener.run(queue));

        let mut idle = UnixStream::connect(&path).await.unwrap();
        idle.write_all(b"join #idle").await.unwrap(); // no newline: still pending

        let stream = UnixStream::connect(&path).await.unwrap();
        let (read, mut write) = stream.into_split();
        let mut read = BufReader::new(read);
        write.write_all(b"join #rust\n").await.unwrap();

        let mut line = String::new();
        read.read_line(&mut line).await.unwrap();
        assert_eq!(line, "Got: [join #rust]\n");
        line.clear();
        read.read_line(&mut line).await.unwrap();
        assert_eq!(line, "Join { target: \"#rust\" }\n");

        assert_eq!(
            rx.recv().await,
            Some(Command::Join {
                target: "#rust".to_string()
            })
        );
    }
}
