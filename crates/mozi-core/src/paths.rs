use crate::error::{MoziError, Result};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Store groups
// ---------------------------------------------------------------------------

pub const COMMANDS_GROUP: &str = "commands";
pub const RULES_GROUP: &str = "rules";

pub const COMMAND_EXT: &str = "md";
pub const RULE_EXT: &str = "mdc";

// ---------------------------------------------------------------------------
// Destination layout (relative to the base directory)
// ---------------------------------------------------------------------------

pub const CURSOR_DIR: &str = ".cursor";
pub const COMMANDS_DIR: &str = ".cursor/commands";
pub const RULES_DIR: &str = ".cursor/rules/mozi";

pub fn cursor_dir(base: &Path) -> PathBuf {
    base.join(CURSOR_DIR)
}

pub fn commands_dir(base: &Path) -> PathBuf {
    base.join(COMMANDS_DIR)
}

/// `<base>/.cursor/commands/<relative command path>`
pub fn command_target(base: &Path, relative: &str) -> PathBuf {
    commands_dir(base).join(relative)
}

pub fn role_rules_dir(base: &Path, role: &str) -> PathBuf {
    base.join(RULES_DIR).join(role)
}

/// `<base>/.cursor/rules/mozi/<role>/<rule-id>.mdc`
pub fn rule_target(base: &Path, role: &str, rule_id: &str) -> PathBuf {
    role_rules_dir(base, role).join(format!("{rule_id}.{RULE_EXT}"))
}

// ---------------------------------------------------------------------------
// Store path helpers
// ---------------------------------------------------------------------------

/// File name without extension, e.g. `commands/team/planner.md` -> `planner`.
pub fn document_stem(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(i) => &name[..i],
    }
}

/// True when the document name ends with `.<ext>`.
pub fn has_extension(path: &str, ext: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.strip_suffix(ext)
        .and_then(|rest| rest.strip_suffix('.'))
        .is_some_and(|stem| !stem.is_empty())
}

/// Path of a store document relative to its group root.
pub fn relative_to_group<'a>(group: &str, path: &'a str) -> &'a str {
    path.strip_prefix(group)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(path)
}

// ---------------------------------------------------------------------------
// Base directory resolution
// ---------------------------------------------------------------------------

/// Resolve the install base directory.
///
/// Priority:
/// 1. `dir` (made absolute against the current directory)
/// 2. `home` flag: the invoking user's home directory
/// 3. The current working directory
pub fn resolve_base(dir: Option<&Path>, home: bool) -> Result<PathBuf> {
    if let Some(dir) = dir {
        return std::path::absolute(dir).map_err(|source| MoziError::InvalidDir {
            path: dir.to_path_buf(),
            source,
        });
    }

    if home {
        return home::home_dir().ok_or(MoziError::HomeNotFound);
    }

    Ok(std::env::current_dir()?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_layout() {
        let base = Path::new("/tmp/proj");
        assert_eq!(
            command_target(base, "team/planner.md"),
            PathBuf::from("/tmp/proj/.cursor/commands/team/planner.md")
        );
        assert_eq!(
            rule_target(base, "planner", "style-guide"),
            PathBuf::from("/tmp/proj/.cursor/rules/mozi/planner/style-guide.mdc")
        );
    }

    #[test]
    fn stems_and_extensions() {
        assert_eq!(document_stem("commands/team/planner.md"), "planner");
        assert_eq!(document_stem("rules/testing.mdc"), "testing");
        assert_eq!(document_stem("rules/README"), "README");
        assert!(has_extension("commands/planner.md", COMMAND_EXT));
        assert!(!has_extension("rules/testing.mdc", COMMAND_EXT));
        assert!(!has_extension("rules/.mdc", RULE_EXT));
        assert!(!has_extension("rules/notes.txt", RULE_EXT));
    }

    #[test]
    fn relative_paths_drop_group_prefix() {
        assert_eq!(
            relative_to_group(COMMANDS_GROUP, "commands/team/planner.md"),
            "team/planner.md"
        );
    }

    #[test]
    fn explicit_dir_wins_over_home() {
        let dir = tempfile::TempDir::new().unwrap();
        let base = resolve_base(Some(dir.path()), true).unwrap();
        assert_eq!(base, dir.path());
    }

    #[test]
    fn relative_dir_is_made_absolute() {
        let base = resolve_base(Some(Path::new("my-config")), false).unwrap();
        assert!(base.is_absolute());
        assert!(base.ends_with("my-config"));
    }

    #[test]
    fn default_is_current_dir() {
        let base = resolve_base(None, false).unwrap();
        assert_eq!(base, std::env::current_dir().unwrap());
    }
}
