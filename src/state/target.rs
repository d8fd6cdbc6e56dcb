//! A single append-only transcript.

use chrono::{DateTime, Local, TimeZone};
use parking_lot::Mutex;
use std::fmt::Display;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

/// Durable transcript for one target (a channel, a nick, `raw` or `log`).
///
/// Only [`TargetRegistry`](super::TargetRegistry) creates these, so there is
/// at most one open handle per name.
#[derive(Debug)]
pub struct TargetLog {
    name: String,
    path: PathBuf,
    file: Mutex<File>,
}

impl TargetLog {
    /// Open (creating if absent) `<dir>/<name>` for appending.
    pub(super) fn open(dir: &Path, name: &str) -> io::Result<Self> {
        let path = dir.join(name);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .mode(0o664)
            .open(&path)?;
        Ok(Self {
            name: name.to_string(),
            path,
            file: Mutex::new(file),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record. Records are written whole; concurrent appends never
    /// interleave within a record.
    pub fn append(&self, record: &str) -> io::Result<()> {
        self.append_bytes(record.as_bytes())
    }

    pub(crate) fn append_bytes(&self, bytes: &[u8]) -> io::Result<()> {
        let mut file = self.file.lock();
        file.write_all(bytes)
    }
}

/// `MM/DD hh:mmAM` in local time.
pub fn timestamp() -> String {
    format_timestamp(&Local::now())
}

fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format("%m/%d %I:%M%p").to_string()
}

/// `[<ts>] <nick>: <text>\n`
pub fn format_message(ts: &str, nick: &str, text: &str) -> String {
    format!("[{ts}] {nick}: {text}\n")
}

/// `[<ts>] <nick> Joined <channel>\n`
pub fn format_join(ts: &str, nick: &str, channel: &str) -> String {
    format!("[{ts}] {nick} Joined {channel}\n")
}
