//! Old/new name listings shown to the operator.

use std::io::{self, Write};

use crossterm::style::Stylize;
use mediamap_core::ItemError;
use mediamap_scanner::{ChangeSet, MediaFile};

/// Write `- old` / `+ new` for one file. Files without a pending rename
/// write nothing.
pub fn write_file_diff<W: Write>(out: &mut W, file: &MediaFile, colour: bool) -> io::Result<()> {
    let Some(new) = file.proposed_file_name() else {
        return Ok(());
    };
    let old = format!("- {}", file.file_name());
    let new = format!("+ {new}");

    if colour {
        writeln!(out, "{}", old.red())?;
        writeln!(out, "{}", new.green())
    } else {
        writeln!(out, "{old}")?;
        writeln!(out, "{new}")
    }
}

/// Write every pending rename, grouped under one header per directory.
pub fn write_batch_diff<W: Write>(out: &mut W, changes: &ChangeSet, colour: bool) -> io::Result<()> {
    for (dir, files) in changes.iter() {
        let mut header_written = false;

        for file in files.iter().filter(|f| f.is_pending()) {
            if !header_written {
                writeln!(out, "\ndiff {dir}:")?;
                header_written = true;
            }
            write_file_diff(out, file, colour)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Trailing warning section; nothing is written when there are no errors.
pub fn write_warnings<W: Write>(out: &mut W, errors: &[ItemError], colour: bool) -> io::Result<()> {
    if errors.is_empty() {
        return Ok(());
    }

    writeln!(out, "\nMatch errors:")?;
    for err in errors {
        let line = format!("! {err}");
        if colour {
            writeln!(out, "{}", line.yellow())?;
        } else {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(name: &str, proposed: &str) -> MediaFile {
        let mut file = MediaFile::new(name, ".mkv");
        file.propose(proposed);
        file
    }

    #[test]
    fn header_is_written_once_per_directory() {
        let mut changes = ChangeSet::new();
        changes.insert("tv/Taboo", pending("Taboo.S01E01", "Taboo - 1x1 - Episode 1"));
        changes.insert("tv/Taboo", MediaFile::new("Taboo - 1x3 - Episode 3", ".mkv"));
        changes.insert("tv/Taboo", pending("Taboo.S01E02", "Taboo - 1x2 - Episode 2"));
        changes.insert("tv/Other", MediaFile::new("untouched", ".mkv"));

        let mut out = Vec::new();
        write_batch_diff(&mut out, &changes, false).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "\ndiff tv/Taboo:\n\
             - Taboo.S01E01.mkv\n+ Taboo - 1x1 - Episode 1.mkv\n\n\
             - Taboo.S01E02.mkv\n+ Taboo - 1x2 - Episode 2.mkv\n\n"
        );
    }

    #[test]
    fn file_without_proposal_writes_nothing() {
        let mut out = Vec::new();
        write_file_diff(&mut out, &MediaFile::new("a", ".mkv"), false).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn warnings_section_lists_each_error() {
        let errors = vec![ItemError::Unparseable {
            file: "S01E01.mkv".into(),
            reason: "no title found in \"S01E01\"".into(),
        }];

        let mut out = Vec::new();
        write_warnings(&mut out, &errors, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\nMatch errors:\n! S01E01.mkv: failed to parse"));

        let mut out = Vec::new();
        write_warnings(&mut out, &[], false).unwrap();
        assert!(out.is_empty());
    }
}
