//! # File Medium
//!
//! Stores each key as `<key>.json` inside a data directory.
//!
//! - **Atomic writes**: write to `.json.tmp`, fsync, rename over the target
//! - **Write locking**: an OS-level `fs2` lock plus a `.json.lock` file
//!   naming the holder, held for the duration of one write
//!
//! Locks left behind by a crashed process are taken over when the pid is
//! gone (same machine) or the lock is older than 24 hours.
//!
//! ## Example
//!
//! ```rust,no_run
//! use quote_core::store::{FileMedium, KeyValueMedium};
//!
//! let mut medium = FileMedium::open("/var/lib/pleat", "operator")?;
//! medium.write("interior_projects", "[]")?;
//! assert_eq!(medium.read("interior_projects")?.as_deref(), Some("[]"));
//! # Ok::<(), quote_core::errors::QuoteError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use super::medium::KeyValueMedium;
use crate::errors::{QuoteError, QuoteResult};

/// Holder details written into `.lock` files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// Operator name
    pub user_id: String,
    /// Machine name where the lock was taken
    pub machine: String,
    /// Process holding the lock
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: machine_name(),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// True when the holder is gone or the lock has been held too long.
    fn is_stale(&self) -> bool {
        self.is_stale_on(&machine_name())
    }

    /// Staleness as judged from `local_machine`. A holder recorded under the
    /// same name is checked by pid, including the `unknown` fallback name.
    fn is_stale_on(&self, local_machine: &str) -> bool {
        if self.machine == local_machine && !process_alive(self.pid) {
            return true;
        }
        (Utc::now() - self.locked_at).num_hours() > 24
    }
}

/// Name recorded in lock files; `unknown` when the host has none.
fn machine_name() -> String {
    hostname().unwrap_or_else(|| UNKNOWN_MACHINE.to_string())
}

const UNKNOWN_MACHINE: &str = "unknown";

fn hostname() -> Option<String> {
    #[cfg(windows)]
    let from_env = std::env::var("COMPUTERNAME").ok();
    #[cfg(not(windows))]
    let from_env = std::env::var("HOSTNAME").ok().or_else(|| std::env::var("HOST").ok());

    // HOSTNAME is usually not exported; read the kernel name instead
    #[cfg(unix)]
    let from_env = from_env.or_else(|| {
        fs::read_to_string("/proc/sys/kernel/hostname")
            .or_else(|_| fs::read_to_string("/etc/hostname"))
            .ok()
    });

    from_env
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}

fn process_alive(pid: u32) -> bool {
    #[cfg(unix)]
    {
        Path::new(&format!("/proc/{}", pid)).exists() || !Path::new("/proc").exists()
    }
    #[cfg(not(unix))]
    {
        let _ = pid;
        true
    }
}

/// Write lock on one key file. Released on drop.
struct WriteLock {
    lock_path: PathBuf,
    _lock_file: File,
}

impl WriteLock {
    fn acquire(target: &Path, user_id: &str) -> QuoteResult<Self> {
        let lock_path = suffixed(target, "lock");

        if let Some(existing) = read_lock_info(&lock_path) {
            if !existing.is_stale() {
                return Err(QuoteError::store_locked(
                    target.display().to_string(),
                    format!("{} ({})", existing.user_id, existing.machine),
                    existing.locked_at.to_rfc3339(),
                ));
            }
            tracing::warn!(
                path = %lock_path.display(),
                holder = %existing.user_id,
                "taking over stale store lock"
            );
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| QuoteError::persistence("create lock", lock_path.display().to_string(), e.to_string()))?;

        lock_file.try_lock_exclusive().map_err(|_| {
            QuoteError::store_locked(target.display().to_string(), "another process", "unknown")
        })?;

        let info = LockInfo::new(user_id);
        let lock_json = serde_json::to_string_pretty(&info)?;
        lock_file
            .write_all(lock_json.as_bytes())
            .and_then(|_| lock_file.sync_all())
            .map_err(|e| QuoteError::persistence("write lock", lock_path.display().to_string(), e.to_string()))?;

        Ok(WriteLock {
            lock_path,
            _lock_file: lock_file,
        })
    }
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

fn read_lock_info(lock_path: &Path) -> Option<LockInfo> {
    let contents = fs::read_to_string(lock_path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// `path` with `.suffix` appended after its extension.
fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// Directory-backed medium, one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileMedium {
    root: PathBuf,
    user_id: String,
}

impl FileMedium {
    /// Open (creating if needed) a data directory.
    ///
    /// `user_id` is recorded in lock files so a blocked operator can see who
    /// holds the store.
    pub fn open(root: impl Into<PathBuf>, user_id: impl Into<String>) -> QuoteResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| QuoteError::persistence("create data directory", root.display().to_string(), e.to_string()))?;
        tracing::debug!(root = %root.display(), "opened file medium");
        Ok(FileMedium {
            root,
            user_id: user_id.into(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding the blob for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    /// Holder of the write lock on `key`, if one is live.
    pub fn lock_holder(&self, key: &str) -> Option<LockInfo> {
        read_lock_info(&suffixed(&self.path_for(key), "lock")).filter(|info| !info.is_stale())
    }
}

impl KeyValueMedium for FileMedium {
    fn read(&self, key: &str) -> QuoteResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(QuoteError::persistence("read", path.display().to_string(), e.to_string())),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> QuoteResult<()> {
        let path = self.path_for(key);
        let _lock = WriteLock::acquire(&path, &self.user_id)?;
        let tmp_path = suffixed(&path, "tmp");

        let mut tmp_file = File::create(&tmp_path)
            .map_err(|e| QuoteError::persistence("create temp file", tmp_path.display().to_string(), e.to_string()))?;

        tmp_file
            .write_all(value.as_bytes())
            .and_then(|_| tmp_file.sync_all())
            .map_err(|e| {
                let _ = fs::remove_file(&tmp_path);
                QuoteError::persistence("write temp file", tmp_path.display().to_string(), e.to_string())
            })?;

        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            QuoteError::persistence("rename to final", path.display().to_string(), e.to_string())
        })?;

        tracing::debug!(path = %path.display(), bytes = value.len(), "wrote key");
        Ok(())
    }
}
