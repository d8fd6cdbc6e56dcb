//! The live IRC session.
//!
//! [`ChatSession`] is the mutation surface the dispatcher drives. The IRC
//! implementation funnels every write through one writer task, so protocol
//! lines from the dispatcher, the welcome-time rejoin and PING replies never
//! interleave.

mod casemap;
mod client;
mod codec;
mod message;
mod tls;

pub use casemap::irc_eq;
pub use client::{IrcSession, SessionReader};
pub use codec::IrcCodec;
pub use message::Message;

use crate::error::SessionResult;
use async_trait::async_trait;

/// Operations that mutate the chat session.
#[async_trait]
pub trait ChatSession: Send + Sync {
    async fn join(&self, channel: &str) -> SessionResult;

    async fn part(&self, channel: &str) -> SessionResult;

    async fn privmsg(&self, target: &str, text: &str) -> SessionResult;

    async fn set_nick(&self, nick: &str) -> SessionResult;

    /// The nick the server currently knows us by.
    fn current_nick(&self) -> String;
}
