//! Graph store facade.
//!
//! `GraphStore` holds no graph in memory between calls. Every operation
//! loads the file, works on the loaded `KnowledgeGraph`, and (for mutations
//! that changed something) validates and saves it before returning.
//!
//! Mutations are serialized twice over: an in-process mutex shared by every
//! store pointing at the same file, and an exclusive advisory lock on the
//! sidecar lock file for other processes. Queries take a shared lock and
//! never write.
//!
//! The operations themselves live in submodules as pure functions over
//! `&mut KnowledgeGraph`, each wrapped by a `GraphStore` method:
//! - `nodes`: node creation, deletion, property and label updates
//! - `edges`: edge creation, deletion, property updates
//! - `query`: lookups, search, listing, statistics
//! - `traversal`: related-node lookup

pub mod edges;
pub mod entity;
pub mod nodes;
pub mod query;
pub mod traversal;
pub mod types;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, trace};

use kgraph_core::{KgResult, KnowledgeGraph};
use kgraph_storage::{load_with, resolve_path, save_with, FileLock, LoadReport, LockMode};

use crate::config::StoreConfig;
use types::Mutation;

/// One writer gate per memory file, shared by every store in the process.
///
/// Entries are removed when the last store holding one is dropped.
static WRITERS: Lazy<DashMap<PathBuf, Arc<Mutex<()>>>> = Lazy::new(DashMap::new);

fn writer_for(key: &Path) -> Arc<Mutex<()>> {
    WRITERS
        .entry(key.to_path_buf())
        .or_insert_with(|| Arc::new(Mutex::new(())))
        .clone()
}

fn absolute(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path,
    }
}

/// Key for the writer gate: `.` and `..` folded lexically, then the deepest
/// existing ancestor canonicalized. Aliases such as `root/./memory.jsonl` or
/// a symlinked directory map to the same key.
fn gate_key(path: &Path) -> PathBuf {
    let mut lexical = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                lexical.pop();
            }
            other => lexical.push(other.as_os_str()),
        }
    }

    let mut tail = Vec::new();
    let mut base = lexical.as_path();
    loop {
        if let Ok(mut canonical) = fs::canonicalize(base) {
            canonical.extend(tail.iter().rev());
            return canonical;
        }
        match (base.parent(), base.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name);
                base = parent;
            }
            _ => break,
        }
    }
    lexical
}

struct StoreInner {
    path: PathBuf,
    config: StoreConfig,
    gate_key: PathBuf,
    writer: Arc<Mutex<()>>,
}

impl Drop for StoreInner {
    fn drop(&mut self) {
        // the map and this store are the only holders
        WRITERS.remove_if(&self.gate_key, |_, writer| Arc::strong_count(writer) <= 2);
    }
}

/// Property-graph store backed by a JSON Lines file.
///
/// Cheap to clone; clones share configuration and the writer gate.
#[derive(Clone)]
pub struct GraphStore {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphStore")
            .field("path", &self.inner.path)
            .field("config", &self.inner.config)
            .finish()
    }
}

impl GraphStore {
    /// Open the store for a workspace root.
    ///
    /// The memory file is `config.memory_file` resolved against `root`, or
    /// `<root>/memory.jsonl`. Nothing is read or created until the first call.
    pub fn open(root: impl AsRef<Path>, config: StoreConfig) -> Self {
        let path = resolve_path(root.as_ref(), config.memory_file.as_deref());
        Self::at_path(path, config)
    }

    /// Open the store for a workspace root using `<root>/kgraph.toml`.
    pub fn open_default(root: impl AsRef<Path>) -> KgResult<Self> {
        let config = StoreConfig::load(root.as_ref())?;
        Ok(Self::open(root, config))
    }

    /// Open the store on an explicit memory file.
    pub fn at_path(path: impl Into<PathBuf>, config: StoreConfig) -> Self {
        let path = absolute(path.into());
        let gate_key = gate_key(&path);
        let writer = writer_for(&gate_key);
        info!(
            path = %path.display(),
            locking = config.locking,
            fsync = config.fsync,
            "Graph store opened"
        );
        Self {
            inner: Arc::new(StoreInner {
                path,
                config,
                gate_key,
                writer,
            }),
        }
    }

    /// The memory file.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Active configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    // =========================================================================
    // Whole-graph access
    // =========================================================================

    /// Load and return the whole graph.
    pub fn read_graph(&self) -> KgResult<KnowledgeGraph> {
        self.read(KnowledgeGraph::clone)
    }

    /// Load the file and report skipped lines and dropped duplicates.
    pub fn inspect(&self) -> KgResult<LoadReport> {
        let _lock = self.lock(LockMode::Shared)?;
        let (_, report) = load_with(self.path(), &self.inner.config.load_options())?;
        Ok(report)
    }

    // =========================================================================
    // Load/save plumbing
    // =========================================================================

    fn lock(&self, mode: LockMode) -> KgResult<Option<FileLock>> {
        if !self.inner.config.locking {
            return Ok(None);
        }
        FileLock::acquire(self.path(), mode)
    }

    /// Run a query against a freshly loaded graph.
    fn read<T>(&self, f: impl FnOnce(&KnowledgeGraph) -> T) -> KgResult<T> {
        let _lock = self.lock(LockMode::Shared)?;
        let (graph, _) = load_with(self.path(), &self.inner.config.load_options())?;
        Ok(f(&graph))
    }

    /// Load, apply `f`, and save when `f` reports a change.
    ///
    /// An error from `f` or from validation leaves the file untouched.
    fn mutate<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut KnowledgeGraph) -> KgResult<Mutation<T>>,
    ) -> KgResult<T> {
        let _writer = self.inner.writer.lock();
        let _lock = self.lock(LockMode::Exclusive)?;

        let (mut graph, _) = load_with(self.path(), &self.inner.config.load_options())?;
        let Mutation { value, changed } = f(&mut graph)?;

        if changed {
            save_with(self.path(), &graph, &self.inner.config.save_options())?;
            debug!(operation, path = %self.path().display(), "Graph mutation persisted");
        } else {
            trace!(operation, "Graph unchanged, skipping save");
        }
        Ok(value)
    }
}
