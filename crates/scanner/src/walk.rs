use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::changeset::{ChangeSet, MediaFile};
use crate::parser;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("root does not exist: {0}")]
    RootMissing(PathBuf),
    #[error("no supported media files located under: {0}")]
    NoMediaFiles(PathBuf),
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// Known junk directories
static SKIP_DIRS: &[&str] = &["@eaDir", "#recycle", ".Trash"];

/// Walk `root` recursively and collect video files into a change set.
///
/// Entries in each directory are visited in name order. Any unreadable
/// directory aborts discovery.
pub fn discover(root: &Path) -> Result<ChangeSet, DiscoveryError> {
    if !root.exists() {
        return Err(DiscoveryError::RootMissing(root.to_path_buf()));
    }

    let mut changes = ChangeSet::new();
    walk_recursive(root, &mut changes)?;

    if changes.is_empty() {
        return Err(DiscoveryError::NoMediaFiles(root.to_path_buf()));
    }

    info!(
        root = %root.display(),
        directories = changes.len(),
        files = changes.file_count(),
        "discovered media files"
    );
    Ok(changes)
}

fn walk_recursive(dir: &Path, changes: &mut ChangeSet) -> Result<(), DiscoveryError> {
    let io_err = |source| DiscoveryError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = std::fs::read_dir(dir)
        .map_err(io_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_err)?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();

        // Skip hidden files/dirs
        if name.starts_with('.') {
            debug!(path = %path.display(), "skipping hidden entry");
            continue;
        }

        if path.is_dir() {
            if SKIP_DIRS.contains(&&*name) {
                continue;
            }
            walk_recursive(&path, changes)?;
        } else if parser::is_video_file(&name) {
            add_file(dir, &path, changes);
        }
    }

    Ok(())
}

fn add_file(dir: &Path, path: &Path, changes: &mut ChangeSet) {
    let (Some(stem), Some(ext)) = (path.file_stem(), path.extension()) else {
        return;
    };
    let file = MediaFile::new(
        stem.to_string_lossy(),
        format!(".{}", ext.to_string_lossy()),
    );

    if !changes.insert(dir.to_string_lossy(), file) {
        warn!(
            path = %path.display(),
            "another media file in this directory has the same name, skipping"
        );
    }
}
