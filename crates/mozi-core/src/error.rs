use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MoziError {
    #[error("document not found in content store: {0}")]
    DocumentNotFound(String),

    #[error("failed to create directory {}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error("invalid directory path '{}'", .path.display())]
    InvalidDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("input closed while waiting for a choice")]
    InputClosed,

    #[error("no diff tool found on PATH (tried git, diff)")]
    NoDiffTool,

    #[error("failed to launch {tool}")]
    ToolSpawn {
        tool: String,
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}{}", stderr_suffix(.stderr))]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("failed to install {path}")]
    Install {
        path: String,
        #[source]
        source: Box<MoziError>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MoziError {
    /// Wrap a per-file failure with the store path that caused it.
    pub fn installing(path: impl Into<String>, source: MoziError) -> Self {
        MoziError::Install {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Render the error and its source chain on one line.
    pub fn describe(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            out.push_str(": ");
            out.push_str(&err.to_string());
            source = err.source();
        }
        out
    }
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

pub type Result<T> = std::result::Result<T, MoziError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_walks_source_chain() {
        let err = MoziError::installing(
            "commands/planner.md",
            MoziError::Write {
                path: PathBuf::from("/tmp/x/planner.md"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            },
        );
        assert_eq!(
            err.describe(),
            "failed to install commands/planner.md: failed to write /tmp/x/planner.md: denied"
        );
    }

    #[test]
    fn tool_failed_omits_empty_stderr() {
        let err = MoziError::ToolFailed {
            tool: "diff".into(),
            status: "exit status: 2".into(),
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "diff exited with exit status: 2");
    }
}
