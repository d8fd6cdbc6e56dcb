//! IRC client session: connection, registration, reader and writer tasks.

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::Framed;
use tracing::{debug, error, info, warn};

use super::{ChatSession, IrcCodec, Message, irc_eq, tls};
use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::events::EventSink;
use crate::line::Line;
use crate::telemetry::SESSION_TRACE;
use async_trait::async_trait;

/// Bidirectional byte stream carrying the IRC link (plain TCP, TLS, or an
/// in-memory duplex in tests).
pub trait IrcStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> IrcStream for T {}

type IrcFramed = Framed<Box<dyn IrcStream>, IrcCodec>;

/// Queue depth between session handles and the writer task.
const OUTGOING_CHANNEL_SIZE: usize = 64;

/// Handle to the live session. Cheap to clone; every clone feeds the same
/// writer task.
#[derive(Clone)]
pub struct IrcSession {
    outgoing: mpsc::Sender<Message>,
    nick: Arc<RwLock<String>>,
}

impl IrcSession {
    /// Connect to `config.server` (optionally over TLS) and send registration.
    pub async fn connect(config: &SessionConfig) -> SessionResult<(Self, SessionReader)> {
        info!(server = %config.server, tls = config.tls, "Connecting to IRC server");
        let tcp = TcpStream::connect(&config.server).await?;
        let stream: Box<dyn IrcStream> = if config.tls {
            Box::new(tls::upgrade_to_tls(tcp, config.host(), config.verify_cert).await?)
        } else {
            Box::new(tcp)
        };
        Self::start(stream, config).await
    }

    /// Register over an already established stream and spawn the writer task.
    pub async fn start(
        stream: Box<dyn IrcStream>,
        config: &SessionConfig,
    ) -> SessionResult<(Self, SessionReader)> {
        let (mut sink, lines) = Framed::new(stream, IrcCodec::new()).split();

        if let Some(password) = &config.password {
            sink.send(Message::pass(password)).await?;
        }
        sink.send(Message::nick(&config.nick)).await?;
        let realname = config.realname.as_deref().unwrap_or(&config.nick);
        sink.send(Message::user(&config.user, realname)).await?;

        let (tx, rx) = mpsc::channel(OUTGOING_CHANNEL_SIZE);
        tokio::spawn(write_loop(sink, rx));

        let session = Self {
            outgoing: tx,
            nick: Arc::new(RwLock::new(config.nick.clone())),
        };
        let reader = SessionReader {
            lines,
            session: session.clone(),
            registered: false,
        };
        Ok((session, reader))
    }

    async fn send(&self, msg: Message) -> SessionResult {
        debug!(target: SESSION_TRACE, "-> {msg}");
        self.outgoing
            .send(msg)
            .await
            .map_err(|_| SessionError::Closed)
    }

    fn set_current_nick(&self, nick: &str) {
        *self.nick.write() = nick.to_string();
    }
}

#[async_trait]
impl ChatSession for IrcSession {
    async fn join(&self, channel: &str) -> SessionResult {
        self.send(Message::join(channel)).await
    }

    async fn part(&self, channel: &str) -> SessionResult {
        self.send(Message::part(channel)).await
    }

    async fn privmsg(&self, target: &str, text: &str) -> SessionResult {
        self.send(Message::privmsg(target, text)).await
    }

    async fn set_nick(&self, nick: &str) -> SessionResult {
        self.send(Message::nick(nick)).await
    }

    fn current_nick(&self) -> String {
        self.nick.read().clone()
    }
}

async fn write_loop(mut sink: SplitSink<IrcFramed, Message>, mut rx: mpsc::Receiver<Message>) {
    while let Some(msg) = rx.recv().await {
        if let Err(e) = sink.send(msg).await {
            error!(error = %e, "Failed to write to IRC server");
            break;
        }
    }
}

/// Drives the inbound side of the session, feeding the [`EventSink`].
pub struct SessionReader {
    lines: SplitStream<IrcFramed>,
    session: IrcSession,
    registered: bool,
}

impl SessionReader {
    /// Read until the server closes the link. Never returns `Ok`.
    pub async fn run(mut self, sink: &EventSink) -> SessionResult {
        while let Some(line) = self.lines.next().await {
            match line? {
                Line::Text(line) => self.handle_line(&line, sink).await?,
                Line::Overlong(len) => {
                    warn!(target: SESSION_TRACE, len, "Skipping over-long line from server");
                }
            }
        }
        Err(SessionError::Closed)
    }

    async fn handle_line(&mut self, line: &str, sink: &EventSink) -> SessionResult {
        debug!(target: SESSION_TRACE, "<- {line}");
        sink.on_raw(line)?;

        let msg = match line.parse::<Message>() {
            Ok(msg) => msg,
            Err(e) => {
                warn!(error = %e, line = %line, "Unparseable line from server");
                return Ok(());
            }
        };

        match msg.command.as_str() {
            "PING" => {
                let token = msg.params.first().map(String::as_str).unwrap_or("");
                self.session.send(Message::pong(token)).await?;
            }
            "001" => {
                self.registered = true;
                if let Some(nick) = msg.params.first() {
                    self.session.set_current_nick(nick);
                }
                info!(target: SESSION_TRACE, nick = %self.session.current_nick(), "Registered with server");
                sink.on_welcome(&self.session).await;
            }
            "433" if !self.registered => {
                let next = format!("{}_", self.session.current_nick());
                warn!(target: SESSION_TRACE, nick = %next, "Nickname in use, retrying");
                self.session.set_current_nick(&next);
                self.session.send(Message::nick(&next)).await?;
            }
            "NICK" => {
                if let (Some(old), Some(new)) = (msg.source_nick(), msg.params.first())
                    && irc_eq(old, &self.session.current_nick())
                {
                    info!(target: SESSION_TRACE, old = %old, new = %new, "Nick changed");
                    self.session.set_current_nick(new);
                }
            }
            "PRIVMSG" => {
                if let (Some(sender), [target, text, ..]) = (msg.source_nick(), msg.params.as_slice())
                {
                    sink.on_message(sender, target, text, &self.session.current_nick())?;
                }
            }
            "JOIN" => {
                if let (Some(who), Some(channel)) = (msg.source_nick(), msg.params.first()) {
                    sink.on_join(who, channel)?;
                }
            }
            "ERROR" => {
                warn!(target: SESSION_TRACE, reason = ?msg.params.last(), "Server sent ERROR");
            }
            _ => {}
        }
        Ok(())
    }
}
