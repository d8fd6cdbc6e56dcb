//! Shared harness for integration tests.
//!
//! `FakeServer` plays the IRC server side of an in-memory link; `Recorder`
//! stands in for the session when only the dispatcher is under test.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use slirc_bridge::config::SessionConfig;
use slirc_bridge::error::SessionResult;
use slirc_bridge::session::{ChatSession, IrcSession, SessionReader};
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, ReadHalf, WriteHalf};
use tokio::time::timeout;

pub const TIMEOUT: Duration = Duration::from_secs(5);

pub fn session_config(nick: &str) -> SessionConfig {
    SessionConfig {
        nick: nick.to_string(),
        user: "bridge".to_string(),
        realname: None,
        server: "irc.example.net:6667".to_string(),
        tls: false,
        verify_cert: false,
        password: None,
    }
}

/// Server end of an in-memory IRC link.
pub struct FakeServer {
    reader: BufReader<ReadHalf<DuplexStream>>,
    writer: WriteHalf<DuplexStream>,
}

impl FakeServer {
    /// Start a session against a fresh link and swallow its registration.
    pub async fn start(nick: &str) -> (Self, IrcSession, SessionReader) {
        let (client, server) = tokio::io::duplex(64 * 1024);
        let (session, reader) = IrcSession::start(Box::new(client), &session_config(nick))
            .await
            .unwrap();
        let (read, writer) = tokio::io::split(server);
        let mut server = Self {
            reader: BufReader::new(read),
            writer,
        };
        assert_eq!(server.recv().await, format!("NICK {nick}"));
        assert!(server.recv().await.starts_with("USER bridge 0 * "));
        (server, session, reader)
    }

    /// Next line the client sent, without CRLF.
    pub async fn recv(&mut self) -> String {
        let mut line = String::new();
        timeout(TIMEOUT, self.reader.read_line(&mut line))
            .await
            .expect("timed out waiting for client line")
            .unwrap();
        line.trim_end_matches(['\r', '\n']).to_string()
    }

    pub async fn send(&mut self, line: &str) {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\r\n").await.unwrap();
        self.writer.flush().await.unwrap();
    }

    pub async fn close(&mut self) {
        self.writer.shutdown().await.unwrap();
    }
}

/// Records every session call as a protocol-shaped string.
#[derive(Default)]
pub struct Recorder {
    calls: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ChatSession for Recorder {
    async fn join(&self, channel: &str) -> SessionResult {
        self.calls.lock().push(format!("JOIN {channel}"));
        Ok(())
    }

    async fn part(&self, channel: &str) -> SessionResult {
        self.calls.lock().push(format!("PART {channel}"));
        Ok(())
    }

    async fn privmsg(&self, target: &str, text: &str) -> SessionResult {
        self.calls.lock().push(format!("PRIVMSG {target} {text}"));
        Ok(())
    }

    async fn set_nick(&self, nick: &str) -> SessionResult {
        self.calls.lock().push(format!("NICK {nick}"));
        Ok(())
    }

    fn current_nick(&self) -> String {
        "bridge".to_string()
    }
}

/// Poll a transcript until `pred` holds for its content.
pub async fn wait_for_file(path: &Path, pred: impl Fn(&str) -> bool) -> String {
    let poll = async {
        loop {
            if let Ok(content) = std::fs::read_to_string(path)
                && pred(&content)
            {
                return content;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    };
    timeout(TIMEOUT, poll)
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {}", path.display()))
}
