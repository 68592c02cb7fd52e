//! Error types for mesh loading and rig construction

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or indexing an OBJ mesh
#[derive(Debug, Error)]
pub enum MeshError {
    /// The mesh file could not be opened or read
    #[error("failed to open mesh file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A `v` or `vn` record did not hold three floats
    #[error("line {line}: malformed '{record}' record")]
    Malformed { line: usize, record: String },

    /// A face record was not exactly three `v/vt/vn` triples
    #[error("line {line}: face is not three v/vt/vn triples, try exporting with other options")]
    UnsupportedFace { line: usize },

    /// A face referenced a position or normal that does not exist
    #[error("line {line}: {kind} index {index} out of range (file has {count})")]
    IndexOutOfRange {
        line: usize,
        kind: &'static str,
        index: u32,
        count: usize,
    },

    /// Position and normal streams handed to the indexer differ in length
    #[error("position stream has {positions} entries but normal stream has {normals}")]
    MismatchedStreams { positions: usize, normals: usize },
}

/// Errors raised while building a rig from its part table
#[derive(Debug, Error)]
pub enum RigError {
    #[error("part '{0}' appears more than once in the rig table")]
    DuplicatePart(&'static str),

    #[error("part '{part}' names parent '{parent}' before it is defined")]
    UnknownParent {
        part: &'static str,
        parent: &'static str,
    },

    #[error("rig table has no entry for part '{0}'")]
    MissingPart(&'static str),
}

/// Top-level error for the core library
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Rig(#[from] RigError),
}

/// Type alias for Results from core operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = MeshError::UnsupportedFace { line: 12 };
        assert!(format!("{}", error).starts_with("line 12: face is not three"));

        let error: Error = RigError::MissingPart("pen").into();
        assert_eq!(format!("{}", error), "rig table has no entry for part 'pen'");
    }
}
