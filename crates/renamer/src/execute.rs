use std::path::{Path, PathBuf};

use mediamap_core::ItemError;
use mediamap_scanner::ChangeSet;
use tracing::{info, warn};

/// What a batch rename did.
#[derive(Debug, Default)]
pub struct RenameReport {
    pub renamed: Vec<(PathBuf, PathBuf)>,
    pub failures: Vec<ItemError>,
}

/// Rename every pending file in the change set.
///
/// Renamed files are removed from the change set, so a directory whose
/// files were all renamed disappears. A failure is recorded and the batch
/// carries on. An existing target is never overwritten.
pub fn execute(changes: &mut ChangeSet) -> RenameReport {
    let batch: Vec<(String, String, String, String)> = changes
        .pending()
        .filter_map(|(dir, file)| {
            let target = file.proposed_file_name()?;
            Some((dir.to_string(), file.name.clone(), file.file_name(), target))
        })
        .collect();

    let mut report = RenameReport::default();

    for (dir, name, current, target) in batch {
        let from = Path::new(&dir).join(&current);
        let to = Path::new(&dir).join(&target);

        let result = if to.exists() {
            Err("target already exists".to_string())
        } else {
            std::fs::rename(&from, &to).map_err(|e| e.to_string())
        };

        match result {
            Ok(()) => {
                info!(from = %from.display(), to = %to.display(), "renamed");
                changes.forget_file(&dir, &name);
                report.renamed.push((from, to));
            }
            Err(reason) => {
                warn!(from = %from.display(), to = %to.display(), error = %reason, "rename failed");
                report.failures.push(ItemError::RenameFailed {
                    file: current,
                    target,
                    reason,
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediamap_scanner::MediaFile;
    use std::fs;

    fn pending(name: &str, proposed: &str) -> MediaFile {
        let mut file = MediaFile::new(name, ".mkv");
        file.propose(proposed);
        file
    }

    #[test]
    fn renames_pending_files_and_drops_them() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().to_string_lossy().to_string();
        fs::write(root.path().join("Taboo.S01E02.mkv"), b"x").unwrap();
        fs::write(root.path().join("keep.mkv"), b"x").unwrap();

        let mut changes = ChangeSet::new();
        changes.insert(&*dir, pending("Taboo.S01E02", "Taboo - 1x2 - Episode 2"));
        changes.insert(&*dir, MediaFile::new("keep", ".mkv"));

        let report = execute(&mut changes);

        assert_eq!(report.renamed.len(), 1);
        assert!(report.failures.is_empty());
        assert!(root.path().join("Taboo - 1x2 - Episode 2.mkv").exists());
        assert!(!root.path().join("Taboo.S01E02.mkv").exists());
        assert!(root.path().join("keep.mkv").exists());

        let left: Vec<&str> = changes.files(&dir).unwrap().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(left, vec!["keep"]);
    }

    #[test]
    fn failures_are_recorded_and_do_not_stop_the_batch() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().to_string_lossy().to_string();
        fs::write(root.path().join("a.mkv"), b"x").unwrap();
        fs::write(root.path().join("taken.mkv"), b"original").unwrap();
        fs::write(root.path().join("c.mkv"), b"x").unwrap();

        let mut changes = ChangeSet::new();
        changes.insert(&*dir, pending("a", "taken"));
        changes.insert(&*dir, pending("missing", "gone"));
        changes.insert(&*dir, pending("c", "C (2001)"));

        let report = execute(&mut changes);

        let failed: Vec<&str> = report.failures.iter().map(|e| e.file()).collect();
        assert_eq!(failed, vec!["a.mkv", "missing.mkv"]);
        assert!(report.failures.iter().all(|e| e.code() == "rename_failed"));
        assert_eq!(report.renamed.len(), 1);
        assert_eq!(fs::read(root.path().join("taken.mkv")).unwrap(), b"original");
        assert!(root.path().join("C (2001).mkv").exists());
        assert_eq!(changes.file_count(), 2);
    }

    #[test]
    fn fully_renamed_directory_disappears() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().to_string_lossy().to_string();
        fs::write(root.path().join("a.mkv"), b"x").unwrap();

        let mut changes = ChangeSet::new();
        changes.insert(&*dir, pending("a", "Alpha"));

        execute(&mut changes);
        assert!(changes.is_empty());
    }
}
