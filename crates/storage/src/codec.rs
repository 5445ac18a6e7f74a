//! Record codec: one node or edge per JSON line.
//!
//! # Encoding
//!
//! Every record carries an explicit `kind` tag as its first field, followed
//! by the model fields in declaration order:
//!
//! ```text
//! {"kind":"node","id":"…","labels":["Person"],"properties":{"name":"Alice"}}
//! {"kind":"edge","id":"…","type":"KNOWS","from":"…","to":"…","properties":{}}
//! ```
//!
//! # Decoding
//!
//! Tagged lines are matched exhaustively on `kind`. Lines without a tag are
//! older files written before the tag existed: they are classified by shape
//! (`id` + `labels` + `properties` is a node, `type` + `from` + `to` is an
//! edge). Either way the decoded entity is then checked for local validity
//! (non-empty labels, non-empty type, non-empty property keys).

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

use kgraph_core::validation::{validate_edge, validate_node, ValidationResult};
use kgraph_core::{Edge, KgError, KgResult, KnowledgeGraph, Node};

/// Name of the discriminant field.
pub const KIND_FIELD: &str = "kind";

/// Discriminant of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// A node record
    Node,
    /// An edge record
    Edge,
}

impl RecordKind {
    /// Wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Node => "node",
            RecordKind::Edge => "edge",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "node" => Some(RecordKind::Node),
            "edge" => Some(RecordKind::Edge),
            _ => None,
        }
    }

    // Shape-based classification for untagged lines.
    fn sniff(map: &Map<String, Value>) -> Option<Self> {
        let has = |field: &str| map.contains_key(field);
        if has("id") && has("labels") && has("properties") {
            Some(RecordKind::Node)
        } else if has("type") && has("from") && has("to") {
            Some(RecordKind::Edge)
        } else {
            None
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded line.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// A node
    Node(Node),
    /// An edge
    Edge(Edge),
}

impl Record {
    /// The record's discriminant.
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Node(_) => RecordKind::Node,
            Record::Edge(_) => RecordKind::Edge,
        }
    }

    fn as_ref(&self) -> RecordRef<'_> {
        match self {
            Record::Node(node) => RecordRef::Node(node),
            Record::Edge(edge) => RecordRef::Edge(edge),
        }
    }
}

/// Borrowed, tagged view used for encoding without cloning.
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum RecordRef<'a> {
    Node(&'a Node),
    Edge(&'a Edge),
}

/// Why a line was skipped during load. Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The line is not valid UTF-8.
    #[error("line {line}: not valid UTF-8: {source}")]
    Encoding {
        /// Line number
        line: usize,
        /// Decoder error
        #[source]
        source: std::str::Utf8Error,
    },

    /// The line is not JSON.
    #[error("line {line}: malformed JSON: {source}")]
    Parse {
        /// Line number
        line: usize,
        /// Parser error
        #[source]
        source: serde_json::Error,
    },

    /// The line is JSON but not a recognizable record.
    #[error("line {line}: unrecognized record: {reason}")]
    Shape {
        /// Line number
        line: usize,
        /// What was wrong
        reason: String,
    },

    /// The record's fields failed validation.
    #[error("line {line}: invalid {kind} record: {reason}")]
    Invalid {
        /// Line number
        line: usize,
        /// Record kind being decoded
        kind: RecordKind,
        /// What was wrong
        reason: String,
    },
}

impl RecordError {
    /// 1-based line number of the failing record.
    pub fn line(&self) -> usize {
        match self {
            RecordError::Encoding { line, .. }
            | RecordError::Parse { line, .. }
            | RecordError::Shape { line, .. }
            | RecordError::Invalid { line, .. } => *line,
        }
    }
}

fn describe(result: ValidationResult) -> Option<String> {
    if result.is_valid() {
        return None;
    }
    Some(
        result
            .violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; "),
    )
}

/// Decode one line into a record.
pub fn decode_line(text: &str, line: usize) -> Result<Record, RecordError> {
    let value: Value =
        serde_json::from_str(text).map_err(|source| RecordError::Parse { line, source })?;

    let Value::Object(mut map) = value else {
        return Err(RecordError::Shape {
            line,
            reason: "expected a JSON object".to_string(),
        });
    };

    let kind = match map.remove(KIND_FIELD) {
        Some(Value::String(tag)) => {
            RecordKind::from_tag(&tag).ok_or_else(|| RecordError::Shape {
                line,
                reason: format!("unknown record kind '{}'", tag),
            })?
        }
        Some(other) => {
            return Err(RecordError::Shape {
                line,
                reason: format!("record kind must be a string, got {}", other),
            })
        }
        None => RecordKind::sniff(&map).ok_or_else(|| RecordError::Shape {
            line,
            reason: "no kind tag, and fields match neither a node (id, labels, properties) \
                     nor an edge (type, from, to)"
                .to_string(),
        })?,
    };

    let invalid = |reason: String| RecordError::Invalid { line, kind, reason };
    let value = Value::Object(map);
    match kind {
        RecordKind::Node => {
            let node: Node = serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;
            match describe(validate_node(&node)) {
                Some(reason) => Err(invalid(reason)),
                None => Ok(Record::Node(node)),
            }
        }
        RecordKind::Edge => {
            let edge: Edge = serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;
            match describe(validate_edge(&edge)) {
                Some(reason) => Err(invalid(reason)),
                None => Ok(Record::Edge(edge)),
            }
        }
    }
}

fn encode(record: RecordRef<'_>) -> KgResult<String> {
    serde_json::to_string(&record).map_err(|e| KgError::serialization(e.to_string()))
}

/// Encode one record as a single line (no newline).
pub fn encode_record(record: &Record) -> KgResult<String> {
    encode(record.as_ref())
}

/// Encode a whole graph: all nodes, then all edges, newline-joined,
/// without a trailing newline.
pub fn encode_graph(graph: &KnowledgeGraph) -> KgResult<String> {
    let mut lines = Vec::with_capacity(graph.nodes.len() + graph.edges.len());
    for node in &graph.nodes {
        lines.push(encode(RecordRef::Node(node))?);
    }
    for edge in &graph.edges {
        lines.push(encode(RecordRef::Edge(edge))?);
    }
    Ok(lines.join("\n"))
}
