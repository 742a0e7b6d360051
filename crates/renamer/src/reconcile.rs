//! Operator review of a resolved change set.
//!
//! The outer prompt either accepts everything, quits, or starts an
//! interactive pass over directories. An interactive pass visits the
//! directories not yet actioned in ascending order, recomputing that order
//! after every answer, and returns to the outer prompt once every
//! directory has been handled.

use std::collections::HashSet;
use std::io::{self, BufRead, Write};

use mediamap_scanner::changeset::is_within;
use mediamap_scanner::{ChangeSet, MediaFile};
use tracing::{debug, info};

use crate::diff;

const YES: &str = "y";
const NO: &str = "n";
const ALL: &str = "a";
const QUIT: &str = "q";
const INTERACTIVE: &str = "i";
const FORGET: &str = "f";
const OPTIONS: &str = "?";

const OUTER_PROMPT: &str = "How would you like to proceed [a/q/i/?]? ";
const DIRECTORY_PROMPT: &str = "Step into directory [y/n/f/?]? ";
const FILE_PROMPT: &str = "\nKeep change [y/n]? ";

const OUTER_HELP: &str = "a - continue with ALL changes listed\n\
                          q - exit without making changes\n\
                          i - interactive, choose which changes to keep";
const DIRECTORY_HELP: &str = "y - yes (step into directory to review contained changes)\n\
                              n - no (skip directory, all changes contained will be made)\n\
                              f - forget (discard all changes contained within directory)";
const HINT: &str = "type '?' for options";

/// Outcome of a review session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Rename everything still pending in the change set.
    Commit,
    /// Leave the filesystem untouched.
    Discard,
}

enum Pass {
    Finished,
    InputClosed,
}

/// Directories still awaiting an answer, in ascending order.
pub fn unactioned<'c>(changes: &'c ChangeSet, actioned: &HashSet<String>) -> Vec<&'c str> {
    changes
        .directories()
        .filter(|dir| !actioned.contains(*dir))
        .collect()
}

pub struct Reconciler<'a, R, W> {
    changes: &'a mut ChangeSet,
    input: R,
    output: W,
    colour: bool,
}

impl<'a, R: BufRead, W: Write> Reconciler<'a, R, W> {
    pub fn new(changes: &'a mut ChangeSet, input: R, output: W) -> Self {
        Self {
            changes,
            input,
            output,
            colour: false,
        }
    }

    pub fn with_colour(mut self, colour: bool) -> Self {
        self.colour = colour;
        self
    }

    /// Drive the outer prompt until the operator commits or quits.
    ///
    /// Closed input at any prompt is treated as quitting.
    pub fn run(&mut self) -> io::Result<Decision> {
        loop {
            let Some(answer) = self.prompt(OUTER_PROMPT)? else {
                info!("input closed, discarding changes");
                return Ok(Decision::Discard);
            };

            match answer.as_str() {
                ALL => {
                    writeln!(self.output, "Proceeding with all changes...")?;
                    return Ok(Decision::Commit);
                }
                QUIT => {
                    writeln!(self.output, "Exiting without making changes...")?;
                    return Ok(Decision::Discard);
                }
                INTERACTIVE => {
                    if let Pass::InputClosed = self.review_directories()? {
                        info!("input closed, discarding changes");
                        return Ok(Decision::Discard);
                    }
                    if self.changes.is_empty() {
                        writeln!(self.output, "No changes remaining.")?;
                        return Ok(Decision::Discard);
                    }
                    diff::write_batch_diff(&mut self.output, &*self.changes, self.colour)?;
                }
                OPTIONS => writeln!(self.output, "{OUTER_HELP}")?,
                _ => writeln!(self.output, "{HINT}")?,
            }
        }
    }

    fn review_directories(&mut self) -> io::Result<Pass> {
        let mut actioned = HashSet::new();

        loop {
            let Some(dir) = unactioned(&*self.changes, &actioned)
                .first()
                .map(|d| d.to_string())
            else {
                return Ok(Pass::Finished);
            };

            let Some(answer) = self.prompt(&format!("\n{dir}\n{DIRECTORY_PROMPT}"))? else {
                return Ok(Pass::InputClosed);
            };

            match answer.as_str() {
                YES => {
                    if let Pass::InputClosed = self.review_files(&dir)? {
                        return Ok(Pass::InputClosed);
                    }
                    actioned.insert(dir);
                }
                NO => {
                    debug!(dir = %dir, "skipping directory");
                    actioned.extend(self.subtree(&dir));
                }
                FORGET => {
                    actioned.extend(self.subtree(&dir));
                    let removed = self.changes.forget_directory(&dir);
                    debug!(dir = %dir, removed, "forgot directory");
                }
                OPTIONS => writeln!(self.output, "{DIRECTORY_HELP}")?,
                _ => writeln!(self.output, "{HINT}")?,
            }
        }
    }

    fn review_files(&mut self, dir: &str) -> io::Result<Pass> {
        let files: Vec<MediaFile> = self.changes.files(dir).map(<[_]>::to_vec).unwrap_or_default();

        for file in files.iter().filter(|f| f.is_pending()) {
            writeln!(self.output)?;
            diff::write_file_diff(&mut self.output, file, self.colour)?;

            let Some(answer) = self.prompt(FILE_PROMPT)? else {
                return Ok(Pass::InputClosed);
            };
            if answer != YES {
                debug!(dir, file = %file.file_name(), "forgot file");
                self.changes.forget_file(dir, &file.name);
            }
        }

        Ok(Pass::Finished)
    }

    fn subtree(&self, dir: &str) -> Vec<String> {
        self.changes
            .directories()
            .filter(|d| is_within(d, dir))
            .map(str::to_string)
            .collect()
    }

    /// Write `text`, then read one answer. `None` once input is exhausted.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn pending(name: &str) -> MediaFile {
        let mut file = MediaFile::new(name, ".mkv");
        file.propose(&format!("{name} renamed"));
        file
    }

    fn tree() -> ChangeSet {
        let mut changes = ChangeSet::new();
        changes.insert("abc", pending("one"));
        changes.insert("abc/123", pending("two"));
        changes.insert("abcd", pending("three"));
        changes.insert("xyz", pending("four"));
        changes.insert("xyz", pending("five"));
        changes
    }

    fn run(changes: &mut ChangeSet, input: &str) -> (Decision, String) {
        let mut out = Vec::new();
        let decision = Reconciler::new(changes, Cursor::new(input), &mut out)
            .run()
            .unwrap();
        (decision, String::from_utf8(out).unwrap())
    }

    #[test]
    fn all_commits_untouched() {
        let mut changes = tree();
        let (decision, out) = run(&mut changes, "A\n");

        assert_eq!(decision, Decision::Commit);
        assert_eq!(changes, tree());
        assert!(out.ends_with("Proceeding with all changes...\n"));
    }

    #[test]
    fn help_and_hint_reprompt_until_quit() {
        let mut changes = tree();
        let (decision, out) = run(&mut changes, "?\nnope\nq\r\n");

        assert_eq!(decision, Decision::Discard);
        assert!(out.contains(OUTER_HELP));
        assert!(out.contains(HINT));
        assert_eq!(out.matches(OUTER_PROMPT).count(), 3);
        assert!(out.ends_with("Exiting without making changes...\n"));
    }

    #[test]
    fn closed_input_discards() {
        let mut changes = tree();
        assert_eq!(run(&mut changes, "").0, Decision::Discard);
        assert_eq!(run(&mut changes, "i\ny\n").0, Decision::Discard);
    }

    #[test]
    fn skip_forget_and_step_in() {
        let mut changes = tree();
        // abc: skip (covers abc/123), abcd: forget, xyz: keep four, drop five
        let (decision, out) = run(&mut changes, "i\nn\nf\ny\ny\nn\na\n");

        assert_eq!(decision, Decision::Commit);
        let dirs: Vec<&str> = changes.directories().collect();
        assert_eq!(dirs, vec!["abc", "abc/123", "xyz"]);
        assert_eq!(changes.files("abc/123").unwrap().len(), 1);

        let xyz: Vec<&str> = changes
            .files("xyz")
            .unwrap()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(xyz, vec!["four"]);

        assert!(!out.contains("\nabc/123\n"));
        assert!(out.contains("- four.mkv\n+ four renamed.mkv\n"));
        assert!(out.contains("\ndiff xyz:\n- four.mkv\n+ four renamed.mkv\n"));
    }

    #[test]
    fn help_at_directory_prompt_reprompts_same_directory() {
        let mut changes = tree();
        let (_, out) = run(&mut changes, "i\n?\nbad\nn\nn\nn\nq\n");

        assert!(out.contains(DIRECTORY_HELP));
        assert_eq!(out.matches("\nabc\nStep into directory").count(), 3);
        assert_eq!(out.matches("\nabcd\nStep into directory").count(), 1);
        assert_eq!(changes, tree());
    }

    #[test]
    fn rejecting_every_file_removes_the_directory() {
        let mut changes = tree();
        // abc: step in, reject the only file; abc/123 is then visited next
        let (_, out) = run(&mut changes, "i\ny\nwhatever\nn\nn\nn\nq\n");

        assert!(!changes.contains_directory("abc"));
        assert!(out.contains("\nabc/123\nStep into directory"));
    }

    #[test]
    fn forgetting_everything_ends_the_session() {
        let mut changes = tree();
        let (decision, out) = run(&mut changes, "i\nf\nf\nf\n");

        assert_eq!(decision, Decision::Discard);
        assert!(changes.is_empty());
        assert!(out.ends_with("No changes remaining.\n"));
    }

    #[test]
    fn unactioned_is_sorted_and_excludes_actioned() {
        let changes = tree();
        let actioned: HashSet<String> = ["abc/123".to_string(), "xyz".to_string()].into();

        assert_eq!(unactioned(&changes, &actioned), vec!["abc", "abcd"]);
    }
}
