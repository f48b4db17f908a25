//! Stdio transport.
//!
//! Pumps `name: text` lines from a reader into the engine and renders
//! notices to a writer. Generic over the async I/O types so the CLI can use
//! stdin/stdout and tests can use in-memory buffers.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::engine::{GameEngine, Notice};

use super::{
    DEFAULT_MAX_LINE_SIZE, DEFAULT_STDIO_BUFFER_SIZE, Roster, env_or, format_notice, parse_line,
    sanitize_for_log,
};

/// Configuration for the stdio transport.
#[derive(Debug, Clone, Copy)]
pub struct StdioConfig {
    /// Longest accepted inbound line in bytes; longer lines are skipped.
    pub max_line_size: usize,
    /// Read buffer size in bytes.
    pub buffer_size: usize,
}

impl StdioConfig {
    /// Loads configuration from environment variables with defaults.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `KILLWORD_MAX_LINE_SIZE` | 4 KB |
    /// | `KILLWORD_STDIO_BUFFER_SIZE` | 8 KB |
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            max_line_size: env_or("KILLWORD_MAX_LINE_SIZE", DEFAULT_MAX_LINE_SIZE),
            buffer_size: env_or("KILLWORD_STDIO_BUFFER_SIZE", DEFAULT_STDIO_BUFFER_SIZE),
        }
    }
}

impl Default for StdioConfig {
    fn default() -> Self {
        Self {
            max_line_size: DEFAULT_MAX_LINE_SIZE,
            buffer_size: DEFAULT_STDIO_BUFFER_SIZE,
        }
    }
}

/// Bounded line reader.
///
/// A line without `\n` is never buffered past `max_line_size + 1` bytes;
/// the remainder is drained and the line skipped. Blank lines and invalid
/// UTF-8 are skipped too.
pub struct LineReader<R> {
    reader: R,
    max_line_size: usize,
}

impl<R: AsyncRead + Unpin> LineReader<BufReader<R>> {
    /// Wraps `reader` in a buffer sized by `config`.
    pub fn new(reader: R, config: StdioConfig) -> Self {
        Self {
            reader: BufReader::with_capacity(config.buffer_size, reader),
            max_line_size: config.max_line_size,
        }
    }
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    /// Returns the next non-blank line, trimmed, or `None` at EOF.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the underlying reader.
    pub async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        let read_limit = self.max_line_size + 1;
        let mut buf: Vec<u8> = Vec::new();

        loop {
            buf.clear();
            let mut overflowed = false;
            let mut eof = false;

            loop {
                let available = self.reader.fill_buf().await?;
                if available.is_empty() {
                    eof = true;
                    break;
                }
                let (chunk, consumed, done) =
                    match available.iter().position(|&b| b == b'\n') {
                        Some(pos) => (&available[..pos], pos + 1, true),
                        None => (available, available.len(), false),
                    };
                if !overflowed {
                    let room = read_limit.saturating_sub(buf.len());
                    buf.extend_from_slice(&chunk[..chunk.len().min(room)]);
                    overflowed = chunk.len() > room;
                }
                self.reader.consume(consumed);
                if done {
                    break;
                }
            }

            if eof && buf.is_empty() {
                return Ok(None);
            }
            if overflowed || buf.len() > self.max_line_size {
                tracing::warn!(limit = self.max_line_size, "line exceeds size limit, skipping");
                continue;
            }
            let Ok(line) = std::str::from_utf8(&buf) else {
                tracing::warn!("invalid UTF-8 in line, skipping");
                continue;
            };
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_owned()));
            }
        }
    }
}

impl<R> std::fmt::Debug for LineReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineReader")
            .field("max_line_size", &self.max_line_size)
            .finish_non_exhaustive()
    }
}

/// Feeds every well-formed line from `reader` to `engine` until EOF.
///
/// Lines that do not parse or name nobody on the roster are logged and
/// skipped. Each utterance is handed over before the next line is read.
///
/// # Errors
///
/// Returns any I/O error from `reader`.
pub async fn feed_utterances<R: AsyncRead + Unpin>(
    reader: R,
    config: StdioConfig,
    engine: &GameEngine,
    roster: &Roster,
) -> std::io::Result<()> {
    let mut lines = LineReader::new(reader, config);
    while let Some(line) = lines.next_line().await? {
        let Some((name, text)) = parse_line(&line) else {
            tracing::warn!(line = %sanitize_for_log(&line, 200), "expected 'name: text', skipping");
            continue;
        };
        let Some(id) = roster.lookup(name) else {
            tracing::warn!(name = %sanitize_for_log(name, 64), "unknown player, skipping");
            continue;
        };
        engine.submit(id, text).await;
    }
    tracing::debug!("input closed");
    Ok(())
}

/// Writes each notice as one line until every sender is gone.
///
/// # Errors
///
/// Returns any I/O error from `writer`.
pub async fn write_notices<W: AsyncWrite + Unpin>(
    mut notices: mpsc::UnboundedReceiver<Notice>,
    mut writer: W,
) -> std::io::Result<()> {
    while let Some(notice) = notices.recv().await {
        let line = format_notice(&notice);
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}
