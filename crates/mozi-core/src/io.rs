use crate::error::{MoziError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Permission bits for installed regular files.
#[cfg(unix)]
pub const FILE_MODE: u32 = 0o644;

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| MoziError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Atomically write `data` to `path` using a tempfile in the same directory,
/// then set standard non-executable permissions.
///
/// An existing file at `path` is replaced in one step, so a failed write never
/// leaves a half-written template behind. A symlink at `path` is kept and the
/// file it points to is replaced instead.
pub fn install_file(path: &Path, data: &[u8]) -> Result<()> {
    let write_err = |source: std::io::Error| MoziError::Write {
        path: path.to_path_buf(),
        source,
    };

    let target = match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => link_target(path).map_err(write_err)?,
        _ => path.to_path_buf(),
    };

    let dir = target.parent().unwrap_or(Path::new("."));
    ensure_dir(dir)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(data).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    tmp.persist(&target).map_err(|e| write_err(e.error))?;

    set_file_mode(&target)
}

/// Final file a symlink points to. A dangling link resolves to its own target
/// path so the write creates that file.
fn link_target(link: &Path) -> std::io::Result<PathBuf> {
    match std::fs::canonicalize(link) {
        Ok(resolved) => Ok(resolved),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let dest = std::fs::read_link(link)?;
            Ok(link.parent().unwrap_or(Path::new(".")).join(dest))
        }
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn set_file_mode(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(FILE_MODE)).map_err(
        |source| MoziError::Write {
            path: path.to_path_buf(),
            source,
        },
    )
}

#[cfg(not(unix))]
fn set_file_mode(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn install_file_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/c/planner.md");
        install_file(&path, b"# Planner").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Planner");
    }

    #[test]
    fn install_file_replaces_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rule.mdc");
        std::fs::write(&path, b"old").unwrap();
        install_file(&path, b"new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[cfg(unix)]
    #[test]
    fn install_file_sets_non_executable_mode() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rule.mdc");
        install_file(&path, b"data").unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn install_file_writes_through_symlink() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("dotfiles/planner.md");
        std::fs::create_dir_all(real.parent().unwrap()).unwrap();
        std::fs::write(&real, b"old\n").unwrap();
        let link = dir.path().join("planner.md");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        install_file(&link, b"new\n").unwrap();

        assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(std::fs::read_to_string(&real).unwrap(), "new\n");
    }

    #[cfg(unix)]
    #[test]
    fn install_file_creates_dangling_symlink_target() {
        let dir = TempDir::new().unwrap();
        let link = dir.path().join("planner.md");
        std::os::unix::fs::symlink("gone.md", &link).unwrap();

        install_file(&link, b"new\n").unwrap();

        assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(std::fs::read_to_string(dir.path().join("gone.md")).unwrap(), "new\n");
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("x/y");
        ensure_dir(&nested).unwrap();
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn ensure_dir_reports_path_on_failure() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("occupied");
        std::fs::write(&file, b"").unwrap();
        let err = ensure_dir(&file.join("sub")).unwrap_err();
        assert!(matches!(err, MoziError::CreateDir { .. }));
        assert!(err.to_string().contains("occupied"));
    }
}
