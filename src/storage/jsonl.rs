//! JSON-lines output sink
//!
//! Each record is serialized to a single line and flushed as soon as it is
//! written, so everything written before a crash survives in the file.

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Writer for newline-delimited JSON records
pub struct JsonlWriter {
    /// Buffered handle, flushed after every record
    writer: BufWriter<File>,

    /// Output path
    path: PathBuf,

    /// Records written so far
    written: usize,
}

impl JsonlWriter {
    /// Create the output file, truncating anything already there
    ///
    /// Missing parent directories are created.
    ///
    /// # Example
    /// ```no_run
    /// use toiscrape::storage::JsonlWriter;
    /// use std::path::Path;
    ///
    /// let writer = JsonlWriter::create(Path::new("output.jsonl")).unwrap();
    /// ```
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::with_source(format!("Failed to create {}", parent.display()), e)
            })?;
        }

        let file = File::create(path)
            .map_err(|e| Error::with_source(format!("Failed to create {}", path.display()), e))?;

        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
            written: 0,
        })
    }

    /// Append one record as a single line and flush it
    pub fn write_record<T: Serialize>(&mut self, record: &T) -> Result<()> {
        let line = serde_json::to_string(record)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.written += 1;

        tracing::trace!(path = %self.path.display(), written = self.written, "Wrote record");
        Ok(())
    }

    /// Number of records written
    pub fn written(&self) -> usize {
        self.written
    }

    /// Output path
    pub fn path(&self) -> &Path {
        &self.path
    }
}
