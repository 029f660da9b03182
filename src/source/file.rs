//! A line-buffer abstraction over assembly source text.
//!
//! Grounded on `fuel-vm`'s general pattern of wrapping a `Vec` with a
//! narrow, purpose-built API rather than exposing it directly: callers
//! mutate lines through `insert`/`remove`/`replace`, never the backing
//! `Vec` itself.

use std::fs;
use std::path::Path;

use crate::error::FileAccessError;

/// An assembly source file held as a mutable sequence of lines.
#[derive(Debug, Clone, Default)]
pub struct SourceFile {
    /// Path the file was loaded from, if any (used in diagnostics).
    pub path: Option<String>,
    lines: Vec<String>,
}

impl SourceFile {
    /// An empty, unnamed source file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a source file in memory from its lines, without touching
    /// disk.
    pub fn from_lines(path: Option<String>, lines: Vec<String>) -> Self {
        Self { path, lines }
    }

    /// Loads a source file from disk, splitting on `\n` (a trailing `\r`
    /// is trimmed).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FileAccessError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| FileAccessError {
            path: path.display().to_string(),
            source,
        })?;
        let lines = contents.lines().map(|l| l.trim_end_matches('\r').to_string()).collect();
        Ok(Self {
            path: Some(path.display().to_string()),
            lines,
        })
    }

    /// Writes the current lines back to `path`, one per line.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FileAccessError> {
        let path = path.as_ref();
        fs::write(path, self.lines.join("\n")).map_err(|source| FileAccessError {
            path: path.display().to_string(),
            source,
        })
    }

    /// All lines, in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The line at `index`.
    pub fn line(&self, index: usize) -> &str {
        &self.lines[index]
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether there are no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Inserts `line` so that it becomes line `index`, shifting everything
    /// after it down by one.
    pub fn insert(&mut self, index: usize, line: impl Into<String>) {
        self.lines.insert(index, line.into());
    }

    /// Removes and returns the line at `index`, shifting everything after
    /// it up by one.
    pub fn remove(&mut self, index: usize) -> String {
        self.lines.remove(index)
    }

    /// Replaces the line at `index` in place.
    pub fn replace(&mut self, index: usize, line: impl Into<String>) {
        self.lines[index] = line.into();
    }

    /// Appends a line to the end.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}
