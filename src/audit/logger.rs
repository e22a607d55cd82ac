//! Audit logger for the append-only audit log
//!
//! Each entry is written as a single JSON line and flushed immediately.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{LivrariaError, LivrariaResult};

use super::entry::AuditEntry;

/// Handles writing audit entries to the audit log file (JSON lines)
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    /// Create a new AuditLogger that writes to the specified path
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append an entry to the log
    pub fn log(&self, entry: &AuditEntry) -> LivrariaResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| LivrariaError::Io(format!("Failed to open audit log: {}", e)))?;

        let json = serde_json::to_string(entry)
            .map_err(|e| LivrariaError::Json(format!("Failed to serialize audit entry: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| LivrariaError::Io(format!("Failed to write audit entry: {}", e)))?;

        file.flush()
            .map_err(|e| LivrariaError::Io(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }

    /// Read all entries, oldest first
    ///
    /// Blank lines are skipped; a torn final line (e.g. after a crash in the
    /// middle of a write) is ignored rather than failing the whole read.
    pub fn read_all(&self) -> LivrariaResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| LivrariaError::Io(format!("Failed to open audit log: {}", e)))?;

        let lines: Vec<String> = BufReader::new(file)
            .lines()
            .collect::<Result<_, _>>()
            .map_err(|e| LivrariaError::Io(format!("Failed to read audit log: {}", e)))?;

        let last = lines.len().saturating_sub(1);
        let mut entries = Vec::with_capacity(lines.len());

        for (line_num, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<AuditEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(_) if line_num == last => break,
                Err(e) => {
                    return Err(LivrariaError::Json(format!(
                        "Failed to parse audit entry at line {}: {}",
                        line_num + 1,
                        e
                    )))
                }
            }
        }

        Ok(entries)
    }

    /// Read the most recent `count` entries
    pub fn read_recent(&self, count: usize) -> LivrariaResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.log_path
    }
}
