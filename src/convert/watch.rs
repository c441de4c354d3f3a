//! File watching for automatic reconversion.
//!
//! Uses `notify-debouncer-full` to watch the input note, every note it
//! transcludes, and the config and template files for changes.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use notify::event::ModifyKind;
use notify::{
    Config as NotifyConfig, EventKind, PollWatcher, RecommendedWatcher, RecursiveMode, Watcher,
};
use notify_debouncer_full::{
    DebounceEventResult, Debouncer, RecommendedCache, new_debouncer, new_debouncer_opt,
};

use crate::config::WatchConfig;

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum WatchError {
    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),
}

// =============================================================================
// Watch events
// =============================================================================

/// Events sent from the file watcher.
#[derive(Debug)]
pub enum WatchEvent {
    /// Watched files changed, reconversion needed.
    FilesChanged(Vec<PathBuf>),
    /// Watcher error occurred.
    Error(String),
}

// =============================================================================
// Path classification
// =============================================================================

/// The files a page was built from.
///
/// Editors often replace files instead of writing them in place, so the
/// watcher observes each file's directory and filters events by path.
#[derive(Debug, Clone)]
pub struct WatchPaths {
    files: HashSet<PathBuf>,
}

impl WatchPaths {
    pub fn new<I>(files: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let files = files
            .into_iter()
            .flat_map(|path| {
                let absolute = std::path::absolute(&path).unwrap_or_else(|_| path.clone());
                let canonical = std::fs::canonicalize(&path).ok();
                std::iter::once(absolute).chain(canonical)
            })
            .collect();
        Self { files }
    }

    /// Number of distinct watched files.
    pub fn file_count(&self) -> usize {
        self.files
            .iter()
            .filter_map(|p| std::fs::canonicalize(p).ok())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Whether `path` is one of the watched files.
    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains(path)
            || std::fs::canonicalize(path).is_ok_and(|p| self.files.contains(&p))
    }

    /// Directories to register with the watcher.
    fn directories(&self) -> BTreeSet<PathBuf> {
        self.files
            .iter()
            .filter_map(|p| p.parent())
            .filter(|dir| dir.is_dir())
            .map(Path::to_path_buf)
            .collect()
    }
}

// =============================================================================
// File watcher
// =============================================================================

/// A file watcher that can use either native or polling backend.
pub enum FileWatcher {
    /// Native file system watcher (recommended for local editing).
    Native {
        _debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
        rx: Receiver<WatchEvent>,
    },
    /// Polling-based watcher (for network filesystems, Docker, etc.).
    Polling {
        _debouncer: Debouncer<PollWatcher, RecommendedCache>,
        rx: Receiver<WatchEvent>,
    },
}

impl FileWatcher {
    /// Create a new file watcher.
    pub fn new(config: &WatchConfig, paths: &WatchPaths) -> Result<Self, WatchError> {
        let debounce_timeout = Duration::from_millis(config.debounce_ms);

        let (tx, rx) = mpsc::channel();

        // Callback to convert notify events to our WatchEvent type
        let filter = paths.clone();
        let callback = move |result: DebounceEventResult| match result {
            Ok(events) => {
                let mut changed: Vec<PathBuf> = events
                    .iter()
                    .filter(|event| is_relevant_event(&event.kind))
                    .flat_map(|event| event.paths.iter())
                    .filter(|path| filter.contains(path))
                    .cloned()
                    .collect();
                changed.sort();
                changed.dedup();

                if !changed.is_empty() {
                    let _ = tx.send(WatchEvent::FilesChanged(changed));
                }
            }
            Err(errors) => {
                for e in errors {
                    let _ = tx.send(WatchEvent::Error(e.to_string()));
                }
            }
        };

        if config.poll {
            let poll_interval = Duration::from_millis(config.poll_interval_ms);
            let notify_config = NotifyConfig::default().with_poll_interval(poll_interval);

            let mut debouncer = new_debouncer_opt::<_, PollWatcher, RecommendedCache>(
                debounce_timeout,
                None,
                callback,
                RecommendedCache::default(),
                notify_config,
            )?;

            add_watch_paths_to_debouncer(&mut debouncer, paths)?;

            Ok(FileWatcher::Polling {
                _debouncer: debouncer,
                rx,
            })
        } else {
            let mut debouncer = new_debouncer(debounce_timeout, None, callback)?;

            add_watch_paths_to_debouncer(&mut debouncer, paths)?;

            Ok(FileWatcher::Native {
                _debouncer: debouncer,
                rx,
            })
        }
    }

    /// Receive the next watch event (blocking).
    pub fn recv(&self) -> Option<WatchEvent> {
        match self {
            FileWatcher::Native { rx, .. } => rx.recv().ok(),
            FileWatcher::Polling { rx, .. } => rx.recv().ok(),
        }
    }
}

/// Add watch paths to a debouncer.
fn add_watch_paths_to_debouncer<W: Watcher, C: notify_debouncer_full::FileIdCache>(
    debouncer: &mut Debouncer<W, C>,
    paths: &WatchPaths,
) -> Result<(), WatchError> {
    for dir in paths.directories() {
        debouncer.watch(&dir, RecursiveMode::NonRecursive)?;
    }
    Ok(())
}

/// Check if an event kind is relevant for reconversion.
fn is_relevant_event(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_)
            | EventKind::Remove(_)
            | EventKind::Modify(ModifyKind::Data(_))
            | EventKind::Modify(ModifyKind::Name(_))
            | EventKind::Modify(ModifyKind::Any)
    )
}

#[cfg(test)]
mod tests {
    use notify::event::{AccessKind, CreateKind, DataChange};

    use super::*;

    #[test]
    fn test_watch_paths_match_files_only() {
        let dir = tempfile::tempdir().unwrap();
        let note = dir.path().join("note.md");
        let other = dir.path().join("other.md");
        std::fs::write(&note, "a").unwrap();
        std::fs::write(&other, "b").unwrap();

        let paths = WatchPaths::new([note.clone()]);

        assert!(paths.contains(&note));
        assert!(paths.contains(&std::fs::canonicalize(&note).unwrap()));
        assert!(!paths.contains(&other));
        assert_eq!(paths.file_count(), 1);
    }

    #[test]
    fn test_watch_paths_directories_are_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.md");
        let b = dir.path().join("b.md");
        std::fs::write(&a, "a").unwrap();
        std::fs::write(&b, "b").unwrap();

        let paths = WatchPaths::new([a, b]);
        let dirs = paths.directories();

        assert!(!dirs.is_empty());
        assert!(dirs.len() <= 2);
        assert!(dirs.iter().all(|d| d.is_dir()));
    }

    #[test]
    fn test_relevant_events() {
        assert!(is_relevant_event(&EventKind::Create(CreateKind::File)));
        assert!(is_relevant_event(&EventKind::Modify(ModifyKind::Data(
            DataChange::Content
        ))));
        assert!(!is_relevant_event(&EventKind::Access(AccessKind::Read)));
    }
}
