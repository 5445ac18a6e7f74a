//! Whole-graph persistence to a JSON Lines file.
//!
//! # Load
//!
//! A missing, empty, or whitespace-only file is an empty graph. Each line is
//! decoded independently; lines that fail (including invalid UTF-8) are
//! skipped with a warning and collected in the `LoadReport`. Edges left
//! without an endpoint by a skipped node line are dropped so the next save
//! can succeed. Any I/O error other than "not found" propagates.
//!
//! # Save
//!
//! Every invariant is validated against the complete candidate graph before
//! any byte is written. The graph is then written to a sibling temporary
//! file and renamed over the target, so the target is always either the
//! complete old graph or the complete new one.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use kgraph_core::{KgError, KgResult, KnowledgeGraph, Violation};

use crate::codec::{decode_line, encode_graph, Record, RecordError};

/// File name used when no override is configured.
pub const DEFAULT_FILE_NAME: &str = "memory.jsonl";

/// Resolve the memory file location.
///
/// Relative overrides are joined to `root`, absolute overrides pass through,
/// and no override means `<root>/memory.jsonl`. Pure; never touches the
/// filesystem.
pub fn resolve_path(root: &Path, override_path: Option<&Path>) -> PathBuf {
    match override_path {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => root.join(path),
        None => root.join(DEFAULT_FILE_NAME),
    }
}

/// What to do when a hand-edited file repeats a node or edge id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the first occurrence, drop later ones with a warning.
    #[default]
    KeepFirst,
    /// Fail the load with an invariant error.
    Reject,
}

/// Options for loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Duplicate-id handling
    pub duplicates: DuplicatePolicy,
}

/// Options for saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// Flush the temporary file to disk before renaming it into place.
    pub fsync: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self { fsync: true }
    }
}

/// Diagnostics gathered while loading.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Non-blank lines examined
    pub lines_read: usize,
    /// Nodes accepted
    pub nodes: usize,
    /// Edges accepted
    pub edges: usize,
    /// Lines skipped, with reasons
    pub skipped: Vec<RecordError>,
    /// Records dropped because their id was already seen
    pub duplicates_dropped: usize,
    /// Edges dropped because an endpoint node was not loaded
    pub dangling_dropped: usize,
}

impl LoadReport {
    /// Whether every line was accepted.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.duplicates_dropped == 0 && self.dangling_dropped == 0
    }
}

/// Build a graph from file content.
///
/// Lines are split on `\n` with an optional trailing `\r` and decoded
/// independently, so one line of invalid UTF-8 costs only that line. Edges
/// whose endpoint was not loaded are dropped after the last line.
pub fn parse_graph(
    content: impl AsRef<[u8]>,
    options: &LoadOptions,
) -> KgResult<(KnowledgeGraph, LoadReport)> {
    let content = content.as_ref();
    let mut graph = KnowledgeGraph::new();
    let mut report = LoadReport::default();
    if content.iter().all(u8::is_ascii_whitespace) {
        return Ok((graph, report));
    }

    let mut node_ids = HashSet::new();
    let mut edge_ids = HashSet::new();

    for (idx, raw) in content.split(|b| *b == b'\n').enumerate() {
        let line = idx + 1;
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let text = match std::str::from_utf8(raw) {
            Ok(text) => text,
            Err(source) => {
                let err = RecordError::Encoding { line, source };
                warn!(line, error = %err, "Skipping unreadable graph record");
                report.lines_read += 1;
                report.skipped.push(err);
                continue;
            }
        };
        if text.trim().is_empty() {
            continue;
        }
        report.lines_read += 1;

        match decode_line(text, line) {
            Ok(Record::Node(node)) => {
                if !node_ids.insert(node.id) {
                    match options.duplicates {
                        DuplicatePolicy::Reject => {
                            return Err(KgError::invariant(vec![Violation::DuplicateNodeId {
                                id: node.id,
                            }]))
                        }
                        DuplicatePolicy::KeepFirst => {
                            warn!(line, id = %node.id, "Dropping node with duplicate id");
                            report.duplicates_dropped += 1;
                            continue;
                        }
                    }
                }
                graph.nodes.push(node);
            }
            Ok(Record::Edge(edge)) => {
                if !edge_ids.insert(edge.id) {
                    match options.duplicates {
                        DuplicatePolicy::Reject => {
                            return Err(KgError::invariant(vec![Violation::DuplicateEdgeId {
                                id: edge.id,
                            }]))
                        }
                        DuplicatePolicy::KeepFirst => {
                            warn!(line, id = %edge.id, "Dropping edge with duplicate id");
                            report.duplicates_dropped += 1;
                            continue;
                        }
                    }
                }
                graph.edges.push(edge);
            }
            Err(err) => {
                warn!(line = err.line(), error = %err, "Skipping unreadable graph record");
                report.skipped.push(err);
            }
        }
    }

    graph.edges.retain(|edge| {
        let attached = node_ids.contains(&edge.from) && node_ids.contains(&edge.to);
        if !attached {
            warn!(
                id = %edge.id,
                from = %edge.from,
                to = %edge.to,
                "Dropping edge with missing endpoint"
            );
            report.dangling_dropped += 1;
        }
        attached
    });

    report.nodes = graph.nodes.len();
    report.edges = graph.edges.len();
    Ok((graph, report))
}

/// Load the graph at `path` with default options.
pub fn load(path: &Path) -> KgResult<KnowledgeGraph> {
    load_with(path, &LoadOptions::default()).map(|(graph, _)| graph)
}

/// Load the graph at `path`, returning diagnostics alongside it.
pub fn load_with(path: &Path, options: &LoadOptions) -> KgResult<(KnowledgeGraph, LoadReport)> {
    let content = match fs::read(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Memory file missing, starting empty");
            return Ok((KnowledgeGraph::new(), LoadReport::default()));
        }
        Err(e) => {
            return Err(KgError::storage(
                format!("failed to read {}", path.display()),
                e,
            ))
        }
    };

    let (graph, report) = parse_graph(&content, options)?;
    debug!(
        path = %path.display(),
        nodes = report.nodes,
        edges = report.edges,
        skipped = report.skipped.len(),
        dangling = report.dangling_dropped,
        "Graph loaded"
    );
    Ok((graph, report))
}

/// Validate and save `graph` to `path` with default options.
pub fn save(path: &Path, graph: &KnowledgeGraph) -> KgResult<()> {
    save_with(path, graph, &SaveOptions::default())
}

/// Validate and save `graph` to `path`.
///
/// On an invariant violation nothing is written and the existing file is
/// left untouched.
pub fn save_with(path: &Path, graph: &KnowledgeGraph, options: &SaveOptions) -> KgResult<()> {
    graph.check()?;
    let content = encode_graph(graph)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            KgError::storage(format!("failed to create directory {}", parent.display()), e)
        })?;
    }

    let tmp = temp_path_for(path);
    let written = write_file(&tmp, content.as_bytes(), options.fsync)
        .map_err(|e| KgError::storage(format!("failed to write {}", tmp.display()), e))
        .and_then(|()| {
            fs::rename(&tmp, path).map_err(|e| {
                KgError::storage(
                    format!("failed to move {} into place at {}", tmp.display(), path.display()),
                    e,
                )
            })
        });
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written?;

    debug!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        bytes = content.len(),
        "Graph saved"
    );
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());
    path.with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4().simple()))
}

fn write_file(path: &Path, bytes: &[u8], fsync: bool) -> io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    file.write_all(bytes)?;
    if fsync {
        file.sync_all()?;
    }
    Ok(())
}
