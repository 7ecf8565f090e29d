//! Test doubles shared by the resolver and installer tests.

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use crate::error::{MoziError, Result};
use crate::tools::{DiffOutcome, ExternalTools};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeDiff {
    Identical,
    Differs { colored: bool },
    Fails,
}

pub struct FakeTools {
    pub diff_mode: FakeDiff,
    pub editor_fails: bool,
    pub diff_calls: Cell<usize>,
    /// Contents of the scratch copy handed to the diff tool, per call.
    pub diffed_content: RefCell<Vec<String>>,
    pub scratch_paths: RefCell<Vec<PathBuf>>,
    pub edited: RefCell<Vec<PathBuf>>,
}

impl FakeTools {
    pub fn new(diff_mode: FakeDiff) -> Self {
        Self {
            diff_mode,
            editor_fails: false,
            diff_calls: Cell::new(0),
            diffed_content: RefCell::new(Vec::new()),
            scratch_paths: RefCell::new(Vec::new()),
            edited: RefCell::new(Vec::new()),
        }
    }

    pub fn failing_editor(mut self) -> Self {
        self.editor_fails = true;
        self
    }
}

impl Default for FakeTools {
    fn default() -> Self {
        Self::new(FakeDiff::Differs { colored: false })
    }
}

impl ExternalTools for FakeTools {
    fn diff(&self, _existing: &Path, incoming: &Path) -> Result<DiffOutcome> {
        self.diff_calls.set(self.diff_calls.get() + 1);
        self.scratch_paths.borrow_mut().push(incoming.to_path_buf());
        self.diffed_content
            .borrow_mut()
            .push(std::fs::read_to_string(incoming)?);

        match self.diff_mode {
            FakeDiff::Identical => Ok(DiffOutcome::Identical),
            FakeDiff::Differs { colored } => Ok(DiffOutcome::Differs {
                output: "--- existing\n+++ incoming\n@@ -1 +1 @@\n-old\n+new\n".to_string(),
                colored,
            }),
            FakeDiff::Fails => Err(MoziError::ToolFailed {
                tool: "fake-diff".to_string(),
                status: "exit status: 2".to_string(),
                stderr: "boom".to_string(),
            }),
        }
    }

    fn editor_name(&self) -> String {
        "fake-editor".to_string()
    }

    fn edit(&self, path: &Path) -> Result<()> {
        self.edited.borrow_mut().push(path.to_path_buf());
        if self.editor_fails {
            return Err(MoziError::ToolSpawn {
                tool: "fake-editor".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            });
        }
        Ok(())
    }
}
