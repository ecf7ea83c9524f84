//! Cooperative, cross-process locking of configuration files.
//!
//! A lock is a `<file>.lock` marker created exclusively next to the locked file.
//! Locks are advisory: only processes following this protocol are excluded.
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context as _;
use anyhow::Result;
use slog::debug;
use slog::warn;
use slog::Logger;

use super::paths::normalise;

/// Unable to lock a configuration file because another process holds the lock.
#[derive(Debug, thiserror::Error)]
#[error("unable to lock configuration file '{path}': lock file already exists")]
pub struct LockError {
    pub path: String,
}

/// Exclusive lock over a configuration file, released on drop.
#[derive(Debug)]
pub struct FileLock {
    logger: Logger,
    marker: PathBuf,
}

impl FileLock {
    /// Lock the given configuration file.
    ///
    /// The directory holding the file is created if needed.
    pub async fn acquire(logger: &Logger, path: &Path) -> Result<FileLock> {
        crate::config::codec::ensure_parent_dir(path).await?;
        let marker = lock_name(path);
        let result = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&marker)
            .await;
        match result {
            Ok(_) => (),
            Err(error) if error.kind() == ErrorKind::AlreadyExists => {
                let error = LockError {
                    path: path.display().to_string(),
                };
                return Err(anyhow::anyhow!(error));
            }
            Err(error) => {
                return Err(error).with_context(|| {
                    format!("unable to create lock file '{}'", marker.display())
                })
            }
        }

        debug!(logger, "Locked configuration file"; "path" => %path.display());
        let logger = logger.clone();
        Ok(FileLock { logger, marker })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(error) = std::fs::remove_file(&self.marker) {
            warn!(
                self.logger, "Unable to remove configuration lock file";
                "path" => %self.marker.display(), "error" => %error
            );
        }
    }
}

/// Locks over a set of configuration files, all released together on drop.
#[derive(Debug, Default)]
pub struct LockSet {
    locks: Vec<FileLock>,
}

impl LockSet {
    /// Lock every distinct file in the given list.
    ///
    /// Files are locked in sorted order so concurrent processes never wait on each other
    /// in a cycle. If any lock fails the locks acquired so far are released.
    pub async fn acquire<I, P>(logger: &Logger, paths: I) -> Result<LockSet>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut set = LockSet::default();
        for path in lock_order(paths) {
            let lock = FileLock::acquire(logger, &path).await?;
            set.locks.push(lock);
        }
        Ok(set)
    }

    /// Number of files locked by this set.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Check if the set holds no locks.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Order in which a set of files is locked: sorted, without duplicates or empty paths.
///
/// Paths are made absolute against the working directory and lexically normalised
/// so different spellings of the same file are locked once.
pub fn lock_order<I, P>(paths: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let cwd = std::env::current_dir().unwrap_or_default();
    let mut paths: Vec<PathBuf> = paths
        .into_iter()
        .filter(|path| !path.as_ref().as_os_str().is_empty())
        .map(|path| normalise(&cwd.join(path.as_ref())))
        .collect();
    paths.sort();
    paths.dedup();
    paths
}

/// Path of the marker file used to lock `path`.
pub fn lock_name(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use slog::o;
    use slog::Discard;
    use slog::Logger;

    use super::lock_name;
    use super::lock_order;
    use super::FileLock;
    use super::LockError;
    use super::LockSet;

    fn logger() -> Logger {
        Logger::root(Discard, o!())
    }

    #[test]
    fn order_is_sorted_and_unique() {
        let order = lock_order(["/b", "/a", "", "/b"]);
        assert_eq!(order, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
    }

    #[test]
    fn order_merges_spellings_of_the_same_file() {
        let cwd = std::env::current_dir().expect("working directory to be known");
        let order = lock_order([
            cwd.join("config"),
            PathBuf::from("config"),
            PathBuf::from("./nested/../config"),
        ]);
        assert_eq!(order, vec![cwd.join("config")]);
    }

    #[tokio::test]
    async fn set_locks_aliased_paths_once() {
        let tmp = tempfile::tempdir().expect("temp dir to be created");
        let direct = tmp.path().join("config");
        let aliased = tmp.path().join("nested").join("..").join("config");
        let set = LockSet::acquire(&logger(), [&direct, &aliased])
            .await
            .expect("locks to be acquired");
        assert_eq!(set.len(), 1);
        assert!(lock_name(&direct).exists());
        drop(set);
        assert!(!lock_name(&direct).exists());
    }

    #[test]
    fn marker_name() {
        let marker = lock_name(&PathBuf::from("/home/user/.config/pulsar/config"));
        assert_eq!(marker, PathBuf::from("/home/user/.config/pulsar/config.lock"));
    }

    #[tokio::test]
    async fn lock_released_on_drop() {
        let tmp = tempfile::tempdir().expect("temp dir to be created");
        let path = tmp.path().join("nested").join("config");
        let lock = FileLock::acquire(&logger(), &path)
            .await
            .expect("lock to be acquired");
        assert!(lock_name(&path).exists());
        drop(lock);
        assert!(!lock_name(&path).exists());
    }

    #[tokio::test]
    async fn lock_held_elsewhere_fails() {
        let tmp = tempfile::tempdir().expect("temp dir to be created");
        let path = tmp.path().join("config");
        let _held = FileLock::acquire(&logger(), &path)
            .await
            .expect("lock to be acquired");
        let error = FileLock::acquire(&logger(), &path)
            .await
            .expect_err("second lock to fail")
            .downcast::<LockError>()
            .expect("unexpected error type");
        assert_eq!(error.path, path.display().to_string());
    }

    #[tokio::test]
    async fn set_locks_in_sorted_order() {
        let tmp = tempfile::tempdir().expect("temp dir to be created");
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        std::fs::write(lock_name(&a), b"").expect("lock marker to be created");

        // Locking a fails first so b is never attempted.
        let error = LockSet::acquire(&logger(), [&b, &a])
            .await
            .expect_err("lock set to fail")
            .downcast::<LockError>()
            .expect("unexpected error type");
        assert_eq!(error.path, a.display().to_string());
        assert!(!lock_name(&b).exists());
    }

    #[tokio::test]
    async fn set_releases_everything() {
        let tmp = tempfile::tempdir().expect("temp dir to be created");
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        let set = LockSet::acquire(&logger(), [&b, &a, &b])
            .await
            .expect("locks to be acquired");
        assert_eq!(set.len(), 2);
        drop(set);
        assert!(!lock_name(&a).exists());
        assert!(!lock_name(&b).exists());
    }
}
