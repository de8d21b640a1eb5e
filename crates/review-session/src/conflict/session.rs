//! Sequential resolution session state.

use std::collections::HashMap;

use super::ConflictFile;

/// Tracks progress through the files of one resolution workflow.
///
/// The file list and its order are fixed when the session is created.
/// Exactly one file is active at a time; resolving it records the final
/// text and advances to the next. The session holds no remote state and
/// can be dropped at any time without side effects.
#[derive(Debug, Clone)]
pub struct ResolutionSession {
    files: Vec<ConflictFile>,
    current: usize,
    resolved: HashMap<String, String>,
}

impl ResolutionSession {
    /// Create a session over a fixed, ordered set of files.
    pub fn new(files: Vec<ConflictFile>) -> Self {
        Self {
            files,
            current: 0,
            resolved: HashMap::new(),
        }
    }

    /// Number of files in the session.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the session has no files at all.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Index of the active file.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The active file, or None once every file has been resolved.
    pub fn current_file(&self) -> Option<&ConflictFile> {
        self.files.get(self.current)
    }

    /// All files of the session, in resolution order.
    pub fn files(&self) -> &[ConflictFile] {
        &self.files
    }

    /// Whether every file has been resolved.
    pub fn is_complete(&self) -> bool {
        self.current >= self.files.len()
    }

    /// Record the final text for the active file and advance.
    ///
    /// Returns false (and records nothing) when the session is already
    /// complete.
    pub fn resolve_current(&mut self, text: impl Into<String>) -> bool {
        let Some(file) = self.files.get(self.current) else {
            return false;
        };
        self.resolved.insert(file.path.clone(), text.into());
        self.current += 1;
        true
    }

    /// Resolved (path, text) pairs in the session's file order.
    pub fn resolved_in_order(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().filter_map(|file| {
            self.resolved
                .get(&file.path)
                .map(|text| (file.path.as_str(), text.as_str()))
        })
    }
}
