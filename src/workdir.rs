use crate::error::Result;
use std::env;
use std::path::{Path, PathBuf};

/// Scoped working-directory change.
///
/// Several path computations are relative to the project base directory, so
/// the reconciliation-and-conversion sequence runs bracketed by this guard.
/// The previous directory is restored on drop, on every exit path.
pub struct WorkdirGuard {
    saved: PathBuf,
}

impl WorkdirGuard {
    pub fn change(to: &Path) -> Result<Self> {
        let saved = env::current_dir()?;
        env::set_current_dir(to)?;
        Ok(WorkdirGuard { saved })
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        // Nothing sensible to do if the original directory is gone
        let _ = env::set_current_dir(&self.saved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_restores_on_drop() {
        let before = env::current_dir().unwrap();
        let td = tempfile::TempDir::new().unwrap();
        {
            let _guard = WorkdirGuard::change(td.path()).unwrap();
            assert_eq!(
                env::current_dir().unwrap().canonicalize().unwrap(),
                td.path().canonicalize().unwrap()
            );
        }
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    #[serial]
    fn test_restores_on_early_return() {
        let before = env::current_dir().unwrap();
        let td = tempfile::TempDir::new().unwrap();
        let inner = |dir: &Path| -> Result<()> {
            let _guard = WorkdirGuard::change(dir)?;
            Err(crate::error::PublishError::config("bail out"))
        };
        assert!(inner(td.path()).is_err());
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    #[serial]
    fn test_missing_directory_fails_without_moving() {
        let before = env::current_dir().unwrap();
        assert!(WorkdirGuard::change(Path::new("/definitely/not/here")).is_err());
        assert_eq!(env::current_dir().unwrap(), before);
    }
}
