//! The human-readable report sink.
//!
//! Report lines go to the log and, when a report file is configured, to
//! the file as well. The two sinks receive identical text; for a given
//! input the emitted byte stream is deterministic.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;

pub(crate) struct ReportSink {
    file: Option<BufWriter<File>>,
}

impl ReportSink {
    /// Opens a sink that writes to `path` (truncating it) in addition to
    /// the log.
    pub(crate) fn open(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => Some(BufWriter::new(File::create(path)?)),
            None => None,
        };
        Ok(Self { file })
    }

    /// A sink that only echoes to the log.
    pub(crate) fn log_only() -> Self {
        Self { file: None }
    }

    /// Emits one report line.
    pub(crate) fn line(&mut self, text: &str) -> Result<()> {
        tracing::info!("{text}");
        if let Some(file) = &mut self.file {
            writeln!(file, "{text}")?;
        }
        Ok(())
    }

    /// Flushes the report file, if any.
    pub(crate) fn finish(&mut self) -> Result<()> {
        if let Some(file) = &mut self.file {
            file.flush()?;
        }
        Ok(())
    }
}
