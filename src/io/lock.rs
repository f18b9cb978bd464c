use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Lock file name inside market/
pub const LOCK_FILE: &str = ".lock";

const RETRY_INTERVAL: Duration = Duration::from_millis(10);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Advisory lock held while the catalog is rewritten, so two `mkt`
/// processes never interleave a read-modify-write.
pub struct CatalogLock {
    _file: File,
    path: PathBuf,
}

/// Error type for lock operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not lock {path}: another mkt process may be writing")]
    Timeout { path: PathBuf },
}

impl CatalogLock {
    /// Lock the market directory, waiting up to `timeout`
    pub fn acquire(market_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = market_dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| LockError::CreateError {
                path: path.clone(),
                source: e,
            })?;

        let start = Instant::now();
        let mut contended = false;
        loop {
            if try_lock(&file).is_ok() {
                return Ok(CatalogLock { _file: file, path });
            }
            if start.elapsed() >= timeout {
                return Err(LockError::Timeout { path });
            }
            if !contended {
                tracing::debug!(path = %path.display(), "waiting for catalog lock");
                contended = true;
            }
            std::thread::sleep(RETRY_INTERVAL);
        }
    }

    pub fn acquire_default(market_dir: &Path) -> Result<Self, LockError> {
        Self::acquire(market_dir, DEFAULT_TIMEOUT)
    }
}

impl Drop for CatalogLock {
    fn drop(&mut self) {
        // flock is released when the file closes
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(unix)]
fn try_lock(file: &File) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;
    let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> Result<(), std::io::Error> {
    Ok(())
}
