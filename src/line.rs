//! Newline-delimited framing shared by the IRC link and the control endpoint.
//!
//! Bytes are never rejected: invalid UTF-8 is replaced with U+FFFD, and a
//! line longer than the limit is skipped and reported as [`Line::Overlong`]
//! so the caller can log it and carry on.

use bytes::{Buf, BytesMut};
use std::io;
use tokio_util::codec::Decoder;

/// One decoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A complete line without its CR/LF terminator.
    Text(String),
    /// A line over the limit was discarded; holds its length in bytes.
    Overlong(usize),
}

/// Lossy line decoder with a length limit.
#[derive(Debug)]
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    max_len: usize,
    /// Bytes dropped so far from the over-long line being skipped.
    discarding: Option<usize>,
}

impl LineCodec {
    pub fn new(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: None,
        }
    }

    fn text(bytes: &[u8]) -> Line {
        let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
        Line::Text(String::from_utf8_lossy(bytes).into_owned())
    }
}

impl Decoder for LineCodec {
    type Item = Line;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> io::Result<Option<Line>> {
        if let Some(dropped) = self.discarding {
            return Ok(match src.iter().position(|b| *b == b'\n') {
                Some(pos) => {
                    src.advance(pos + 1);
                    self.discarding = None;
                    Some(Line::Overlong(dropped + pos))
                }
                None => {
                    self.discarding = Some(dropped + src.len());
                    src.clear();
                    None
                }
            });
        }

        match src[self.next_index..].iter().position(|b| *b == b'\n') {
            Some(offset) => {
                let end = self.next_index + offset;
                self.next_index = 0;
                let line = src.split_to(end + 1);
                if end > self.max_len {
                    return Ok(Some(Line::Overlong(end)));
                }
                Ok(Some(Self::text(&line[..end])))
            }
            None if src.len() > self.max_len => {
                // No terminator yet and already over the limit: stop buffering.
                self.discarding = Some(src.len());
                self.next_index = 0;
                src.clear();
                Ok(None)
            }
            None => {
                self.next_index = src.len();
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> io::Result<Option<Line>> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        if let Some(dropped) = self.discarding.take() {
            return Ok(Some(Line::Overlong(dropped)));
        }
        self.next_index = 0;
        if src.is_empty() {
            return Ok(None);
        }
        let line = src.split_to(src.len());
        Ok(Some(Self::text(&line)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Option<Line> {
        Some(Line::Text(s.to_string()))
    }

    #[test]
    fn strips_terminators() {
        let mut codec = LineCodec::new(64);
        let mut buf = BytesMut::from(&b"PING :a\r\nPING :b\n"[..]);
        assert_eq!(codec.decode(&mut buf).unwrap(), text("PING :a"));
        assert_eq!(codec.decode(&mut buf).unwrap(), text("PING :b"));
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
    }

    #[test]
    fn replaces_invalid_utf8() {
        let mut codec = LineCodec::new(64);
        let mut buf = BytesMut::from(&b"caf\xe9\r\nnext\n"[..]);
        assert_eq!(codec.decode(&mut buf).unwrap(), text("caf\u{FFFD}"));
        assert_eq!(codec.decode(&mut buf).unwrap(), text("next"));
    }

    #[test]
    fn partial_line_waits_for_terminator() {
        let mut codec = LineCodec::new(64);
        let mut buf = BytesMut::from(&b"PING :"[..]);
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        buf.extend_from_slice(b"later\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), text("PING :later"));
    }

    #[test]
    fn skips_overlong_line_in_one_chunk() {
        let mut codec = LineCodec::new(4);
        let mut buf = BytesMut::from(&b"toolong\nok\n"[..]);
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(Line::Overlong(7)));
        assert_eq!(codec.decode(&mut buf).unwrap(), text("ok"));
    }

    #[test]
    fn skips_overlong_line_across_chunks_without_buffering() {
        let mut codec = LineCodec::new(4);
        let mut buf = BytesMut::from(&b"abcdef"[..]);
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        assert!(buf.is_empty());

        buf.extend_from_slice(b"ghij");
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        assert!(buf.is_empty());

        buf.extend_from_slice(b"k\nok\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(Line::Overlong(11)));
        assert_eq!(codec.decode(&mut buf).unwrap(), text("ok"));
    }

    #[test]
    fn eof_flushes_unterminated_line() {
        let mut codec = LineCodec::new(64);
        let mut buf = BytesMut::from(&b"join #a"[..]);
        assert_eq!(codec.decode_eof(&mut buf).unwrap(), text("join #a"));
        assert_eq!(codec.decode_eof(&mut buf).unwrap(), None);
    }
}
