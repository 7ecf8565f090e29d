//! Per-file install with interactive conflict resolution.
//!
//! ```text
//! CheckExists ─┬─ missing ─────────────► Copied
//!              ├─ same content ────────► Unchanged
//!              └─ different ──► Prompt ─┬─ skip ──────► Skipped
//!                                ▲      ├─ overwrite ─► Overwritten
//!                                │      ├─ merge ─────► Merged
//!                                │      ├─ merge error ┐
//!                                ├──────┼─ diff        │
//!                                └──────┴─ invalid ◄───┘
//! ```

use std::io::{BufRead, Write};
use std::path::Path;

use owo_colors::OwoColorize;

use crate::console::Console;
use crate::digest;
use crate::error::Result;
use crate::io;
use crate::store::ContentStore;
use crate::tools::{DiffOutcome, ExternalTools};

const RULE_LINE: &str = "═══════════════════════════════════════════════════════════════";
const THIN_LINE: &str = "───────────────────────────────────────────────────────────────";

/// How a single file ended up at its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Destination did not exist; source copied.
    Copied,
    /// Destination already had identical content.
    Unchanged,
    /// User kept the existing file.
    Skipped,
    /// User replaced the existing file with the source.
    Overwritten,
    /// User opened the existing file in an editor to merge by hand.
    Merged,
}

impl Outcome {
    /// Whether this outcome counts toward the installed total.
    pub fn is_installed(self) -> bool {
        matches!(
            self,
            Outcome::Copied | Outcome::Overwritten | Outcome::Merged
        )
    }
}

/// An answer to the conflict prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Skip,
    Overwrite,
    Diff,
    Merge,
}

impl Choice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "s" | "skip" => Some(Choice::Skip),
            "o" | "overwrite" => Some(Choice::Overwrite),
            "d" | "diff" => Some(Choice::Diff),
            "m" | "merge" => Some(Choice::Merge),
            _ => None,
        }
    }
}

pub struct Resolver<'a, S: ?Sized, T: ?Sized> {
    store: &'a S,
    tools: &'a T,
}

impl<'a, S, T> Resolver<'a, S, T>
where
    S: ContentStore + ?Sized,
    T: ExternalTools + ?Sized,
{
    pub fn new(store: &'a S, tools: &'a T) -> Self {
        Self { store, tools }
    }

    /// Install the store document `source` at `dest`, prompting on conflict.
    ///
    /// Errors returned here are fatal for the run. Diff and editor failures are
    /// reported on the console and the user is asked again instead.
    pub fn install<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        source: &str,
        dest: &Path,
    ) -> Result<Outcome> {
        if !dest.exists() {
            self.copy(source, dest)?;
            return Ok(Outcome::Copied);
        }

        if !digest::differs(self.store, source, dest) {
            console.line(format!("  = unchanged: {}", dest.display()))?;
            return Ok(Outcome::Unchanged);
        }

        self.resolve_conflict(console, source, dest)
    }

    fn resolve_conflict<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        source: &str,
        dest: &Path,
    ) -> Result<Outcome> {
        tracing::info!(source, dest = %dest.display(), "conflict");
        console.blank()?;
        console.line(format!("⚠️  File conflict detected: {}", dest.display()))?;
        console.line(format!("  Source: {source}"))?;
        console.line(format!("  Target: {}", dest.display()))?;

        loop {
            console.blank()?;
            console.line("Choose an action:")?;
            console.line("  [s]kip - Skip this file (keep existing)")?;
            console.line("  [o]verwrite - Overwrite with source file")?;
            console.line("  [d]iff - View differences")?;
            console.line("  [m]erge - Merge files (manual edit required)")?;
            let answer = console.ask("Your choice (s/o/d/m): ")?;

            match Choice::parse(&answer) {
                Some(Choice::Skip) => {
                    console.line(format!("  → Skipped: {}", dest.display()))?;
                    return Ok(Outcome::Skipped);
                }
                Some(Choice::Overwrite) => {
                    self.copy(source, dest)?;
                    console.line(format!("  → Overwritten: {}", dest.display()))?;
                    return Ok(Outcome::Overwritten);
                }
                Some(Choice::Diff) => {
                    if let Err(e) = self.show_diff(console, source, dest) {
                        tracing::warn!(error = %e, "diff failed");
                        console.line(format!("  ⚠️  Error showing diff: {}", e.describe()))?;
                    }
                }
                Some(Choice::Merge) => match self.open_for_merge(console, source, dest) {
                    Ok(()) => {
                        console.line(format!("  → Opened for manual merge: {}", dest.display()))?;
                        return Ok(Outcome::Merged);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "merge failed");
                        console.line(format!("  ⚠️  Error opening for merge: {}", e.describe()))?;
                    }
                },
                None => {
                    console.line("  ⚠️  Invalid choice, please try again")?;
                }
            }
        }
    }

    fn copy(&self, source: &str, dest: &Path) -> Result<()> {
        let data = self.store.open(source)?;
        io::install_file(dest, &data)
    }

    /// Diff the destination against a scratch copy of the source document.
    /// The scratch file is removed when this returns, on every path.
    fn show_diff<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        source: &str,
        dest: &Path,
    ) -> Result<()> {
        let data = self.store.open(source)?;

        let mut scratch = tempfile::Builder::new()
            .prefix("mozi-embed-")
            .suffix(".tmp")
            .tempfile()?;
        scratch.write_all(&data)?;
        scratch.flush()?;
        tracing::debug!(scratch = %scratch.path().display(), "materialized source for diff");

        match self.tools.diff(dest, scratch.path())? {
            DiffOutcome::Identical => {
                console.line("Files are identical".green().bold())?;
            }
            DiffOutcome::Differs { output, colored } => {
                console.blank()?;
                console.line(RULE_LINE.cyan().bold())?;
                console.line("  File Differences".cyan().bold())?;
                console.line(RULE_LINE.cyan().bold())?;
                console.line(format!("{} {}", "Existing file:".yellow(), dest.display()))?;
                console.line(format!("{} {}", "New file:     ".green(), source))?;
                console.line(THIN_LINE.bright_black())?;
                console.blank()?;
                if colored {
                    console.write_raw(&output)?;
                } else {
                    console.write_raw(&colorize_diff(&output))?;
                }
                console.line(THIN_LINE.bright_black())?;
                console.blank()?;
            }
        }
        Ok(())
    }

    fn open_for_merge<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        source: &str,
        dest: &Path,
    ) -> Result<()> {
        console.line(format!(
            "  Opening files for merge with {}...",
            self.tools.editor_name()
        ))?;
        console.line(format!("  Source: {source}"))?;
        console.line(format!("  Target: {}", dest.display()))?;
        self.tools.edit(dest)
    }
}

/// Color a plain unified diff line by line.
pub fn colorize_diff(diff: &str) -> String {
    let mut out = String::with_capacity(diff.len() * 2);
    for line in diff.lines() {
        let painted = if line.starts_with("---") {
            line.red().to_string()
        } else if line.starts_with("+++") {
            line.green().to_string()
        } else if line.starts_with("@@") {
            line.cyan().to_string()
        } else if line.starts_with('-') {
            line.red().to_string()
        } else if line.starts_with('+') {
            line.green().to_string()
        } else {
            line.to_string()
        };
        out.push_str(&painted);
        out.push('\n');
    }
    out
}
