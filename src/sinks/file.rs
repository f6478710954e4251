//! File sink implementation
//!
//! The store decides which path is written and whether this write
//! truncates or appends; the sink opens the file per write, so a path
//! change between two messages needs no extra bookkeeping here.

use crate::core::{FileWriteMode, LoggerError, Result, RoutingDecision, Sink};
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::Write;

/// Writes one rendered line per file-eligible decision
#[derive(Debug)]
pub struct FileSink {
    create_directories: bool,
}

impl FileSink {
    pub fn new() -> Self {
        Self {
            create_directories: true,
        }
    }

    /// Whether missing parent directories are created before writing
    #[must_use]
    pub fn with_create_directories(mut self, create: bool) -> Self {
        self.create_directories = create;
        self
    }
}

impl Default for FileSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for FileSink {
    fn write(&mut self, decision: &RoutingDecision) -> Result<()> {
        let Some(ref target) = decision.file else {
            return Ok(());
        };
        let path = &target.path;

        if self.create_directories {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| {
                    LoggerError::io_operation(
                        "create log directory",
                        format!("Failed to create directory '{}'", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let mut options = OpenOptions::new();
        options.create(true);
        match target.mode {
            FileWriteMode::Overwrite => options.write(true).truncate(true),
            FileWriteMode::Append => options.append(true),
        };
        let mut file = options.open(path).map_err(|e| {
            LoggerError::io_operation(
                "opening log file",
                format!("Failed to open '{}'", path.display()),
                e,
            )
        })?;

        FileExt::lock_exclusive(&file).map_err(|e| {
            LoggerError::io_operation(
                "locking log file",
                format!("Failed to lock '{}'", path.display()),
                e,
            )
        })?;

        let mut line = String::with_capacity(decision.rendered_text.len() + 1);
        line.push_str(&decision.rendered_text);
        line.push('\n');
        let written = file.write_all(line.as_bytes());
        let _ = FileExt::unlock(&file);

        written.map_err(|e| {
            LoggerError::io_operation(
                "writing log file",
                format!("Failed to write '{}'", path.display()),
                e,
            )
        })
    }

    fn flush(&mut self) -> Result<()> {
        // Every write closes its file handle
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}
