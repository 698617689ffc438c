//! JSON Lines message writer

use crate::engine::Message;
use crate::error::{Error, Result};
use std::io::Write;

/// Receives messages in emission order
pub trait MessageSink {
    /// Accept one message
    fn emit(&mut self, message: Message) -> Result<()>;

    /// Flush anything buffered
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl MessageSink for Vec<Message> {
    fn emit(&mut self, message: Message) -> Result<()> {
        self.push(message);
        Ok(())
    }
}

/// Writes each message as one JSON line
#[derive(Debug)]
pub struct JsonLinesWriter<W: Write> {
    out: W,
    pretty: bool,
    written: usize,
}

impl<W: Write> JsonLinesWriter<W> {
    /// Create a writer over `out`
    pub fn new(out: W) -> Self {
        Self {
            out,
            pretty: false,
            written: 0,
        }
    }

    /// Pretty-print each message
    ///
    /// The output is then no longer one message per line.
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Messages written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Unwrap the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> MessageSink for JsonLinesWriter<W> {
    fn emit(&mut self, message: Message) -> Result<()> {
        let line = if self.pretty {
            serde_json::to_string_pretty(&message)
        } else {
            serde_json::to_string(&message)
        }
        .map_err(|e| Error::Other(format!("Failed to serialize message: {e}")))?;

        writeln!(self.out, "{line}")?;
        self.written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
