//! # Strategist Snapshot
//!
//! Turns a compressed save file into a resolved, read-only document graph.
//!
//! ## Pipeline
//!
//! ```text
//! bytes
//!     │
//!     ├──> Decompress (gzip / zlib / raw deflate)
//!     │
//!     ├──> Clean text
//!     │      ├─ Strip stray bytes before the first '{'
//!     │      └─ ±Infinity → ±1e300
//!     │
//!     ├──> Parse (serde_json)
//!     │
//!     └──> Resolve `$id` / `$ref` aliasing into an arena (SnapshotGraph)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use strategist_snapshot::{decode_bytes, DecodeOptions, SnapshotGraph};
//!
//! let text = br#"{"a": {"$id": "1", "v": 3}, "b": {"$ref": "1"}}"#;
//! let value = decode_bytes(text, &DecodeOptions::default()).unwrap();
//! let graph = SnapshotGraph::resolve(value).unwrap();
//!
//! let b = graph.root().get("b").unwrap();
//! assert_eq!(b.get("v").and_then(|n| n.as_u64()), Some(3));
//! ```

mod decode;
mod error;
mod graph;

pub use decode::{
    clean_text, decode_bytes, decode_file, DecodeOptions, NEGATIVE_INFINITY_SENTINEL,
    POSITIVE_INFINITY_SENTINEL,
};
pub use error::{DumpOutcome, Result, SnapshotError};
pub use graph::{NodeId, NodeKind, NodeRef, SnapshotGraph};

use std::path::Path;

/// Decode and resolve a snapshot file in one step.
pub async fn load_snapshot(path: &Path, options: &DecodeOptions) -> Result<SnapshotGraph> {
    let value = decode_file(path, options).await?;
    SnapshotGraph::resolve(value)
}

/// Decode and resolve an in-memory snapshot blob.
pub fn load_snapshot_bytes(bytes: &[u8], options: &DecodeOptions) -> Result<SnapshotGraph> {
    let value = decode_bytes(bytes, options)?;
    SnapshotGraph::resolve(value)
}
