//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use kiln_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{KilnError, KilnResult},
};
use tracing::debug;
use walkdir::WalkDir;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> KilnResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn read_file(&self, path: &Path) -> KilnResult<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(map_io_error(path, e, "read file")),
        }
    }

    fn write_file(&self, path: &Path, content: &str) -> KilnResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_dir(&self, path: &Path) -> KilnResult<Vec<String>> {
        let entries =
            std::fs::read_dir(path).map_err(|e| map_io_error(path, e, "list directory"))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| map_io_error(path, e, "list directory"))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    fn rename(&self, from: &Path, to: &Path) -> KilnResult<()> {
        match std::fs::rename(from, to) {
            Ok(()) => Ok(()),
            // Cross-device moves (EXDEV) cannot be renamed; copy then remove.
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                debug!(from = %from.display(), to = %to.display(), "Rename across devices, copying");
                if from.is_dir() {
                    self.copy_dir_all(from, to)?;
                    std::fs::remove_dir_all(from)
                        .map_err(|e| map_io_error(from, e, "remove directory"))
                } else {
                    std::fs::copy(from, to).map_err(|e| map_io_error(to, e, "copy file"))?;
                    std::fs::remove_file(from).map_err(|e| map_io_error(from, e, "remove file"))
                }
            }
            Err(e) => Err(map_io_error(from, e, "rename")),
        }
    }

    fn copy_dir_all(&self, from: &Path, to: &Path) -> KilnResult<()> {
        self.create_dir_all(to)?;

        for entry in WalkDir::new(from).min_depth(1) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(from).to_path_buf();
                KilnError::from(ApplicationError::FilesystemError {
                    path,
                    reason: format!("Failed to walk directory: {e}"),
                })
            })?;

            let relative = entry
                .path()
                .strip_prefix(from)
                .map_err(|e| KilnError::Internal {
                    message: format!("walked outside {}: {e}", from.display()),
                })?;
            let target = to.join(relative);

            if entry.file_type().is_dir() {
                self.create_dir_all(&target)?;
            } else if entry.file_type().is_symlink() {
                copy_symlink(entry.path(), &target)?;
            } else {
                std::fs::copy(entry.path(), &target)
                    .map_err(|e| map_io_error(&target, e, "copy file"))?;
            }
        }

        Ok(())
    }
}

/// Recreate the link at `target` pointing where `link` points; the
/// target of the link is not followed.
#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> KilnResult<()> {
    let points_to = std::fs::read_link(link).map_err(|e| map_io_error(link, e, "read link"))?;
    if std::fs::symlink_metadata(target).is_ok_and(|meta| !meta.is_dir()) {
        std::fs::remove_file(target).map_err(|e| map_io_error(target, e, "replace link"))?;
    }
    std::os::unix::fs::symlink(&points_to, target)
        .map_err(|e| map_io_error(target, e, "create link"))
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, target: &Path) -> KilnResult<()> {
    std::fs::copy(link, target)
        .map(|_| ())
        .map_err(|e| map_io_error(target, e, "copy file"))
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> KilnError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        assert_eq!(fs.read_file(&dir.path().join("absent.json")).unwrap(), None);
    }

    #[test]
    fn list_dir_is_sorted() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        fs.write_file(&dir.path().join("b"), "").unwrap();
        fs.create_dir_all(&dir.path().join("a")).unwrap();

        assert_eq!(fs.list_dir(dir.path()).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn copy_dir_all_copies_nested_tree_and_overwrites() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();

        fs.create_dir_all(&src.path().join("src/bin")).unwrap();
        fs.write_file(&src.path().join("README.md"), "# svc").unwrap();
        fs.write_file(&src.path().join("src/bin/main.rs"), "fn main() {}").unwrap();
        fs.write_file(&dst.path().join("README.md"), "old").unwrap();

        let target = dst.path().join("out");
        fs.copy_dir_all(src.path(), dst.path()).unwrap();
        fs.copy_dir_all(src.path(), &target).unwrap();

        assert_eq!(fs.read_file(&dst.path().join("README.md")).unwrap().as_deref(), Some("# svc"));
        assert_eq!(
            fs.read_file(&target.join("src/bin/main.rs")).unwrap().as_deref(),
            Some("fn main() {}")
        );
    }

    #[cfg(unix)]
    #[test]
    fn copy_dir_all_keeps_symlinks_as_links() {
        use std::os::unix::fs::symlink;

        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();

        fs.create_dir_all(&src.path().join("real")).unwrap();
        fs.write_file(&src.path().join("real/inner.txt"), "inner").unwrap();
        symlink("real", src.path().join("link")).unwrap();
        symlink("real/inner.txt", src.path().join("file_link")).unwrap();

        let target = dst.path().join("out");
        fs.copy_dir_all(src.path(), &target).unwrap();
        // A second copy over the same tree replaces the links in place.
        fs.copy_dir_all(src.path(), &target).unwrap();

        assert_eq!(
            fs.read_file(&target.join("real/inner.txt")).unwrap().as_deref(),
            Some("inner")
        );
        assert_eq!(std::fs::read_link(target.join("link")).unwrap(), Path::new("real"));
        assert_eq!(
            std::fs::read_link(target.join("file_link")).unwrap(),
            Path::new("real/inner.txt")
        );
        assert_eq!(
            fs.read_file(&target.join("link/inner.txt")).unwrap().as_deref(),
            Some("inner")
        );
    }

    #[test]
    fn rename_moves_directory() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let from = dir.path().join("intermediate/copier");
        fs.create_dir_all(&from).unwrap();
        fs.write_file(&from.join("file.txt"), "x").unwrap();

        let to = dir.path().join("result");
        fs.rename(&from, &to).unwrap();

        assert!(!fs.exists(&from));
        assert_eq!(fs.read_file(&to.join("file.txt")).unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn io_errors_carry_the_path() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let missing = dir.path().join("nope");

        let err = fs.list_dir(&missing).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
