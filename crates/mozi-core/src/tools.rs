//! External programs used while resolving conflicts: a diff tool and an editor.
//!
//! # Diff tool priority
//! 1. `git diff --no-index --color=always` — colored output out of the box
//! 2. `diff -u` — plain unified diff, colored by us
//!
//! Both follow the `diff(1)` exit convention: 0 identical, 1 differences,
//! anything else is trouble.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{MoziError, Result};

pub const DEFAULT_EDITOR: &str = "vim";

/// Result of comparing two files with an external diff tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOutcome {
    Identical,
    Differs {
        /// Unified diff text as produced by the tool.
        output: String,
        /// Whether `output` already carries terminal colors.
        colored: bool,
    },
}

/// Narrow seam over the programs the conflict resolver shells out to.
pub trait ExternalTools {
    /// Compare `existing` (destination) against `incoming` (new content).
    fn diff(&self, existing: &Path, incoming: &Path) -> Result<DiffOutcome>;

    /// Open `path` in an interactive editor and wait for it to exit.
    fn edit(&self, path: &Path) -> Result<()>;

    /// Program name shown before the editor takes over the terminal.
    fn editor_name(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffTool {
    Git,
    Unified,
}

impl DiffTool {
    pub fn name(&self) -> &'static str {
        match self {
            DiffTool::Git => "git diff",
            DiffTool::Unified => "diff",
        }
    }

    fn colored(&self) -> bool {
        matches!(self, DiffTool::Git)
    }

    fn command(&self, existing: &Path, incoming: &Path) -> Command {
        match self {
            DiffTool::Git => {
                let mut cmd = Command::new("git");
                cmd.args(["diff", "--no-index", "--color=always"])
                    .arg(existing)
                    .arg(incoming);
                cmd
            }
            DiffTool::Unified => {
                let mut cmd = Command::new("diff");
                cmd.arg("-u").arg(existing).arg(incoming);
                cmd
            }
        }
    }
}

/// Detect the best available diff tool.
/// Returns None if neither git nor diff is on PATH.
pub fn detect_diff_tool() -> Option<DiffTool> {
    if which::which("git").is_ok() {
        return Some(DiffTool::Git);
    }
    if which::which("diff").is_ok() {
        return Some(DiffTool::Unified);
    }
    None
}

/// Run `tool` on two files and classify the exit status.
pub fn run_diff(tool: DiffTool, existing: &Path, incoming: &Path) -> Result<DiffOutcome> {
    tracing::debug!(tool = tool.name(), existing = %existing.display(), incoming = %incoming.display(), "running diff");

    let output = tool
        .command(existing, incoming)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| MoziError::ToolSpawn {
            tool: tool.name().to_string(),
            source,
        })?;

    match output.status.code() {
        Some(0) => Ok(DiffOutcome::Identical),
        Some(1) => Ok(DiffOutcome::Differs {
            output: String::from_utf8_lossy(&output.stdout).into_owned(),
            colored: tool.colored(),
        }),
        _ => Err(MoziError::ToolFailed {
            tool: tool.name().to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }),
    }
}

/// The host's real diff tool and editor.
#[derive(Debug, Clone)]
pub struct SystemTools {
    editor: String,
}

impl SystemTools {
    /// `editor` may carry arguments, e.g. `"code --wait"`.
    pub fn new(editor: impl Into<String>) -> Self {
        let editor = editor.into();
        let editor = if editor.trim().is_empty() {
            DEFAULT_EDITOR.to_string()
        } else {
            editor
        };
        Self { editor }
    }

    pub fn editor(&self) -> &str {
        &self.editor
    }
}

impl Default for SystemTools {
    fn default() -> Self {
        Self::new(DEFAULT_EDITOR)
    }
}

impl ExternalTools for SystemTools {
    fn diff(&self, existing: &Path, incoming: &Path) -> Result<DiffOutcome> {
        let tool = detect_diff_tool().ok_or(MoziError::NoDiffTool)?;
        run_diff(tool, existing, incoming)
    }

    fn editor_name(&self) -> String {
        self.editor
            .split_whitespace()
            .next()
            .unwrap_or(DEFAULT_EDITOR)
            .to_string()
    }

    fn edit(&self, path: &Path) -> Result<()> {
        let mut words = self.editor.split_whitespace();
        let program = words.next().unwrap_or(DEFAULT_EDITOR);

        let status = Command::new(program)
            .args(words)
            .arg(path)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| MoziError::ToolSpawn {
                tool: program.to_string(),
                source,
            })?;

        if !status.success() {
            return Err(MoziError::ToolFailed {
                tool: program.to_string(),
                status: status.to_string(),
                stderr: String::new(),
            });
        }
        Ok(())
    }
}
