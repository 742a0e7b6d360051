//! Directory → media file mapping with pending renames.
//!
//! A directory key exists only while it holds at least one file. Forgetting
//! discards pending renames without touching the filesystem and cannot be
//! undone.

use std::collections::BTreeMap;
use std::path::Path;

/// A discovered media file and its pending rename, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// File name without extension.
    pub name: String,
    /// Extension including the leading dot, e.g. `.mkv`.
    pub extension: String,
    proposed_name: Option<String>,
}

impl MediaFile {
    pub fn new(name: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extension: extension.into(),
            proposed_name: None,
        }
    }

    /// Current `{name}{extension}`.
    pub fn file_name(&self) -> String {
        format!("{}{}", self.name, self.extension)
    }

    pub fn proposed_name(&self) -> Option<&str> {
        self.proposed_name.as_deref()
    }

    /// Target `{proposed_name}{extension}` when a rename is pending.
    pub fn proposed_file_name(&self) -> Option<String> {
        self.proposed_name
            .as_ref()
            .map(|n| format!("{n}{}", self.extension))
    }

    pub fn is_pending(&self) -> bool {
        self.proposed_name.is_some()
    }

    /// Set the pending rename.
    ///
    /// Path separators become `-` so the result stays a single path
    /// component. A blank proposal, or one equal to the current name,
    /// clears the pending rename.
    pub fn propose(&mut self, proposed: &str) {
        let sanitized = proposed.replace(['/', '\\'], "-");
        let sanitized = sanitized.trim();

        self.proposed_name = if sanitized.is_empty() || sanitized == self.name {
            None
        } else {
            Some(sanitized.to_string())
        };
    }

    pub fn clear_proposal(&mut self) {
        self.proposed_name = None;
    }
}

/// Whether `dir` is `ancestor` itself or lies beneath it.
///
/// Compares whole path components, so `abcd` is not within `abc`.
pub fn is_within(dir: &str, ancestor: &str) -> bool {
    Path::new(dir).starts_with(ancestor)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    dirs: BTreeMap<String, Vec<MediaFile>>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to a directory. Returns `false` and leaves the set
    /// untouched if the directory already holds a file with that name.
    pub fn insert(&mut self, dir: impl Into<String>, file: MediaFile) -> bool {
        let files = self.dirs.entry(dir.into()).or_default();
        if files.iter().any(|f| f.name == file.name) {
            return false;
        }
        files.push(file);
        true
    }

    /// Directory keys in ascending lexicographic order.
    pub fn directories(&self) -> impl Iterator<Item = &str> {
        self.dirs.keys().map(String::as_str)
    }

    pub fn contains_directory(&self, dir: &str) -> bool {
        self.dirs.contains_key(dir)
    }

    /// Files of a directory in insertion order.
    pub fn files(&self, dir: &str) -> Option<&[MediaFile]> {
        self.dirs.get(dir).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MediaFile])> {
        self.dirs.iter().map(|(d, f)| (d.as_str(), f.as_slice()))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut MediaFile)> {
        self.dirs
            .iter_mut()
            .flat_map(|(d, files)| files.iter_mut().map(move |f| (d.as_str(), f)))
    }

    /// Every file with a pending rename, directory by directory.
    pub fn pending(&self) -> impl Iterator<Item = (&str, &MediaFile)> {
        self.iter()
            .flat_map(|(d, files)| files.iter().map(move |f| (d, f)))
            .filter(|(_, f)| f.is_pending())
    }

    pub fn pending_count(&self) -> usize {
        self.pending().count()
    }

    pub fn file_count(&self) -> usize {
        self.dirs.values().map(Vec::len).sum()
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Discard `path` and every directory beneath it. Returns the number
    /// of directories removed.
    pub fn forget_directory(&mut self, path: &str) -> usize {
        let before = self.dirs.len();
        self.dirs.retain(|dir, _| !is_within(dir, path));
        before - self.dirs.len()
    }

    /// Discard one file. The directory goes with its last file.
    pub fn forget_file(&mut self, dir: &str, name: &str) -> bool {
        let Some(files) = self.dirs.get_mut(dir) else {
            return false;
        };
        let before = files.len();
        files.retain(|f| f.name != name);
        let removed = files.len() != before;

        if files.is_empty() {
            self.dirs.remove(dir);
        }
        removed
    }

    /// Drop every file without a pending rename.
    pub fn retain_pending(&mut self) {
        for files in self.dirs.values_mut() {
            files.retain(MediaFile::is_pending);
        }
        self.dirs.retain(|_, files| !files.is_empty());
    }
}
