//! Post-archive cleanup of packaged executables.

use std::fs;
use std::io;
use std::path::Path;

/// Whether `path` exists (file, directory or anything else).
pub fn file_exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Whether `path` is a directory with no entries.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn is_dir_empty(path: &Path) -> io::Result<bool> {
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Delete a packaged executable, then its parent directory if that is now
/// empty.
///
/// A missing executable is not an error. Returns `true` if a file was
/// removed.
///
/// # Errors
///
/// Returns the first removal error; the caller decides whether it matters.
pub fn remove_executable(path: &Path) -> io::Result<bool> {
    if !file_exists(path) {
        return Ok(false);
    }
    fs::remove_file(path)?;
    tracing::debug!("removed {}", path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if is_dir_empty(parent)? {
            fs::remove_dir(parent)?;
            tracing::debug!("removed empty directory {}", parent.display());
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_exists() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("exe");
        assert!(!file_exists(&file));
        fs::write(&file, b"x").unwrap();
        assert!(file_exists(&file));
        assert!(file_exists(tmp.path()));
    }

    #[test]
    fn test_is_dir_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(is_dir_empty(tmp.path()).unwrap());
        fs::write(tmp.path().join("a"), b"").unwrap();
        assert!(!is_dir_empty(tmp.path()).unwrap());
        assert!(is_dir_empty(&tmp.path().join("missing")).is_err());
    }

    #[test]
    fn test_remove_executable_prunes_empty_parent() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("build");
        fs::create_dir(&dir).unwrap();
        let exe = dir.join("tool_linux_amd64");
        fs::write(&exe, b"bin").unwrap();

        assert!(remove_executable(&exe).unwrap());
        assert!(!exe.exists());
        assert!(!dir.exists());
    }

    #[test]
    fn test_remove_executable_keeps_busy_parent() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        fs::write(&a, b"").unwrap();
        fs::write(&b, b"").unwrap();

        assert!(remove_executable(&a).unwrap());
        assert!(tmp.path().exists());
        assert!(b.exists());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let tmp = TempDir::new().unwrap();
        assert!(!remove_executable(&tmp.path().join("nope")).unwrap());
    }
}
