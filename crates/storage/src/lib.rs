//! Storage layer for kgraph
//!
//! The graph lives in a single JSON Lines file:
//! - `codec`: one record (node or edge) per line, tagged with `kind`
//! - `file`: whole-graph load and validated, atomic save
//! - `lock`: advisory sidecar lock shared across processes

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod file;
pub mod lock;

pub use codec::{decode_line, encode_graph, encode_record, Record, RecordError, RecordKind};
pub use file::{
    load, load_with, parse_graph, resolve_path, save, save_with, DuplicatePolicy, LoadOptions,
    LoadReport, SaveOptions, DEFAULT_FILE_NAME,
};
pub use lock::{FileLock, LockMode};
