//! IRC line codec for tokio.
//!
//! Decodes raw lines (the reader needs them verbatim for the `raw`
//! transcript) and encodes [`Message`]s with a CRLF terminator.

use bytes::{BufMut, BytesMut};
use std::io;
use tokio_util::codec::{Decoder, Encoder};

use super::Message;
use crate::line::{Line, LineCodec};

/// Maximum inbound line length (8191 bytes as per modern IRC conventions).
pub const MAX_IRC_LINE_LEN: usize = 8191;

/// Wraps [`LineCodec`]: inbound lines are decoded lossily, so one badly
/// encoded message from the network never ends the session.
pub struct IrcCodec {
    inner: LineCodec,
}

impl IrcCodec {
    pub fn new() -> Self {
        Self {
            inner: LineCodec::new(MAX_IRC_LINE_LEN),
        }
    }

    /// Truncate outgoing data at the first line break so a single message
    /// can never smuggle a second protocol line.
    pub fn sanitize(mut data: String) -> String {
        if let Some(pos) = data.find(['\r', '\n']) {
            data.truncate(pos);
        }
        data
    }
}

impl Default for IrcCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for IrcCodec {
    type Item = Line;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> io::Result<Option<Line>> {
        self.inner.decode(src)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> io::Result<Option<Line>> {
        self.inner.decode_eof(src)
    }
}

impl Encoder<Message> for IrcCodec {
    type Error = io::Error;

    fn encode(&mut self, msg: Message, dst: &mut BytesMut) -> io::Result<()> {
        let line = Self::sanitize(msg.to_string());
        dst.reserve(line.len() + 2);
        dst.put(line.as_bytes());
        dst.put(&b"\r\n"[..]);
        Ok(())
    }
}
