//! Working-namespace lifecycle
//!
//! Each invocation owns a unique basename reserved in its working directory;
//! the driver source, build outputs and run log all derive from it. Cleanup
//! must fire on every exit path: normal return and `?`-propagated errors go
//! through `Drop`, and an interrupt goes through a process-global registry
//! drained by the `ctrlc` handler. Concurrent invocations in the same
//! directory never collide because the basename comes from the secure
//! unique-temp-name primitive.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use tempfile::Builder;

/// Prefix shared by every generated artifact.
const BASENAME_PREFIX: &str = "frut_";
/// Random characters appended to the prefix.
const BASENAME_RAND: usize = 10;
/// Extension of the synthesized driver source.
const SOURCE_SUFFIX: &str = ".f90";

/// Exit status after an interrupt, 128 + SIGINT.
const INTERRUPT_EXIT: i32 = 130;

static CLEANUP_REGISTRY: OnceLock<Mutex<Vec<PathBuf>>> = OnceLock::new();

fn registry() -> &'static Mutex<Vec<PathBuf>> {
    CLEANUP_REGISTRY.get_or_init(|| Mutex::new(Vec::new()))
}

/// Install the interrupt handler once per process. The handler removes every
/// registered path and exits; it must run even while an external build or
/// test program is being waited on.
fn install_interrupt_cleanup() {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    INSTALLED.get_or_init(|| {
        let _ = ctrlc::set_handler(|| {
            if let Ok(paths) = registry().lock() {
                for path in paths.iter() {
                    let _ = fs::remove_file(path);
                }
            }
            std::process::exit(INTERRUPT_EXIT);
        });
    });
}

/// The temporary namespace of one invocation.
#[derive(Debug)]
pub struct Workspace {
    dir: PathBuf,
    basename: String,
    keep: bool,
}

impl Workspace {
    /// Reserve a unique basename in `dir`. The driver source file is created
    /// immediately, so a concurrent invocation can never pick the same name.
    pub fn acquire(dir: &Path, keep: bool) -> io::Result<Workspace> {
        let source = Builder::new()
            .prefix(BASENAME_PREFIX)
            .rand_bytes(BASENAME_RAND)
            .suffix(SOURCE_SUFFIX)
            .tempfile_in(dir)?;

        // Deletion is owned by this Workspace and the interrupt handler, not
        // by tempfile's drop guard.
        let (_, path) = source.keep().map_err(|e| e.error)?;
        let basename = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| io::Error::other("reserved basename is not valid UTF-8"))?
            .to_string();

        let workspace = Workspace {
            dir: dir.to_path_buf(),
            basename,
            keep,
        };

        install_interrupt_cleanup();
        if let Ok(mut paths) = registry().lock() {
            paths.extend(workspace.cleanup_paths());
        }

        Ok(workspace)
    }

    /// The unique basename; also the build target and the program name of
    /// the synthesized driver.
    pub fn basename(&self) -> &str {
        &self.basename
    }

    /// Path of the synthesized driver source.
    pub fn source_path(&self) -> PathBuf {
        self.dir.join(format!("{}{}", self.basename, SOURCE_SUFFIX))
    }

    /// Path of the built executable.
    pub fn executable_path(&self) -> PathBuf {
        self.dir.join(&self.basename)
    }

    /// Path of the object file the build leaves behind.
    pub fn object_path(&self) -> PathBuf {
        self.dir.join(format!("{}.o", self.basename))
    }

    /// Path of the captured run log.
    pub fn log_path(&self) -> PathBuf {
        self.dir.join(format!("{}.log", self.basename))
    }

    /// Paths the interrupt handler removes. With `keep`, the driver source
    /// and executable are the user's to keep even across an interrupt.
    fn cleanup_paths(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.object_path(), self.log_path()];
        if !self.keep {
            paths.push(self.source_path());
            paths.push(self.executable_path());
        }
        paths
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let paths = self.cleanup_paths();
        for path in &paths {
            let _ = fs::remove_file(path);
        }

        if self.keep {
            eprintln!(
                "Keeping generated driver {} and executable {}",
                self.source_path().display(),
                self.executable_path().display()
            );
        }

        if let Ok(mut registered) = registry().lock() {
            registered.retain(|registered_path| !paths.contains(registered_path));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_reserves_source_file() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::acquire(dir.path(), false).unwrap();
        assert!(workspace.source_path().is_file());
        assert!(workspace.basename().starts_with(BASENAME_PREFIX));
    }

    #[test]
    fn test_basenames_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let first = Workspace::acquire(dir.path(), false).unwrap();
        let second = Workspace::acquire(dir.path(), false).unwrap();
        assert_ne!(first.basename(), second.basename());
    }

    #[test]
    fn test_drop_removes_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let source;
        let log;
        {
            let workspace = Workspace::acquire(dir.path(), false).unwrap();
            source = workspace.source_path();
            log = workspace.log_path();
            fs::write(&log, "1 test run\n").unwrap();
        }
        assert!(!source.exists());
        assert!(!log.exists());
    }

    #[test]
    fn test_keep_preserves_driver_but_not_log() {
        let dir = tempfile::tempdir().unwrap();
        let source;
        let log;
        {
            let workspace = Workspace::acquire(dir.path(), true).unwrap();
            source = workspace.source_path();
            log = workspace.log_path();
            fs::write(&log, "1 test run\n").unwrap();
        }
        assert!(source.exists());
        assert!(!log.exists());
    }

    #[test]
    fn test_drop_leaves_foreign_files_alone() {
        let dir = tempfile::tempdir().unwrap();
        let foreign = dir.path().join("checks.f90");
        fs::write(&foreign, "subroutine test_one\n").unwrap();
        {
            let _workspace = Workspace::acquire(dir.path(), false).unwrap();
        }
        assert!(foreign.exists());
    }
}
