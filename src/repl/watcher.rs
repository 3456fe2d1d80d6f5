use crossbeam_channel::Sender;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};

/// Watches progression files on notify's background threads and forwards
/// raw events to a channel. The REPL decides which events matter through
/// [`FileWatcher::changed_files`].
pub struct FileWatcher {
    watcher: RecommendedWatcher,
    /// Watched files, canonicalized when possible
    files: Vec<PathBuf>,
}

impl FileWatcher {
    /// Create a new file watcher that sends events to the provided channel
    pub fn new(tx: Sender<notify::Result<Event>>) -> notify::Result<Self> {
        let watcher = notify::recommended_watcher(move |res| {
            // The receiver is gone once the REPL exits
            let _ = tx.send(res);
        })?;

        Ok(Self {
            watcher,
            files: Vec::new(),
        })
    }

    /// Start watching a file; returns the path events will be reported for
    pub fn watch<P: AsRef<Path>>(&mut self, path: P) -> notify::Result<PathBuf> {
        let path = canonical(path.as_ref());
        self.watcher.watch(&path, RecursiveMode::NonRecursive)?;
        if !self.files.contains(&path) {
            self.files.push(path.clone());
        }
        Ok(path)
    }

    /// Watched files whose contents may have changed in this event
    pub fn changed_files(&self, event: &Event) -> Vec<PathBuf> {
        changed_files(&self.files, event)
    }
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Editors save by writing in place or by replacing the file, so both
/// modifications and creations count
fn changed_files(watched: &[PathBuf], event: &Event) -> Vec<PathBuf> {
    if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
        return Vec::new();
    }
    let mut changed: Vec<PathBuf> = event
        .paths
        .iter()
        .map(|p| canonical(p))
        .filter(|p| watched.contains(p))
        .collect();
    changed.dedup();
    changed
}
