//! File-based feed source.
//!
//! Reads newline-delimited feed events from a file, picking up lines
//! appended since the last read.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::{FeedEvent, FeedSource};

/// A feed source that replays feed events from an NDJSON file.
///
/// The source tracks the file's modification time and length, and how many
/// lines it has consumed; when either changes, only the new lines are parsed. Events are
/// handed out one per poll in file order.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_seen: Option<(SystemTime, u64)>,
    lines_consumed: usize,
    pending: VecDeque<FeedEvent>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_seen: None,
            lines_consumed: 0,
            pending: VecDeque::new(),
        }
    }

    /// Returns the path being replayed.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Modification time and length, so appends within one mtime tick
    /// still register.
    fn get_file_stamp(&self) -> Option<(SystemTime, u64)> {
        let metadata = fs::metadata(&self.path).ok()?;
        Some((metadata.modified().ok()?, metadata.len()))
    }

    /// Read the file and queue every line past the consumed offset.
    ///
    /// Returns false if the file could not be read at all.
    fn read_new_lines(&mut self) -> bool {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                self.last_error = Some(format!("Read error: {}", e));
                return false;
            }
        };

        // Only complete lines count; a half-written trailing line is retried.
        let complete = match content.rfind('\n') {
            Some(end) => &content[..=end],
            None => "",
        };

        let mut parse_error = None;
        for line in complete.lines().skip(self.lines_consumed) {
            self.lines_consumed += 1;

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match serde_json::from_str::<FeedEvent>(line) {
                Ok(event) => self.pending.push_back(event),
                Err(e) => {
                    parse_error = Some(format!("Parse error on line {}: {}", self.lines_consumed, e))
                }
            }
        }

        self.last_error = parse_error;
        true
    }
}

impl FeedSource for FileSource {
    fn poll(&mut self) -> Option<FeedEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }

        let current = self.get_file_stamp();
        let file_changed = match (&self.last_seen, &current) {
            (None, _) => true,        // First poll, always read
            (Some(_), None) => false, // File disappeared, keep what we had
            (Some(last), Some(current)) => current != last,
        };

        if file_changed && self.read_new_lines() {
            self.last_seen = current;
        }

        self.pending.pop_front()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.clone()
    }
}
