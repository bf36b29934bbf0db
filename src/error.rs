use thiserror::Error;

/// Top-level error type surfaced by the binary's `main`. `GeometryReject` is
/// deliberately absent here: per-candidate FRAM rejections are expected,
/// non-fatal outcomes tracked in `Stats`, not `std::error::Error`s.
#[derive(Debug, Error)]
pub enum DfnError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(
        "no fractures survived cluster analysis (boundary faces {attempted_boundary_faces:?}); \
         try increasing family intensity, shrinking the domain, or setting ignoreBoundaryFaces"
    )]
    NoConnectivity {
        attempted_boundary_faces: [bool; 6],
        remediation: &'static str,
    },
}

/// Failures in the startup phase: bad CLI arguments, or a malformed input
/// file. Always fatal.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("expected exactly 2 arguments: <input-file-path> <output-folder-path>, got {0}")]
    WrongArgCount(usize),

    #[error("failed to read input file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed input file at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("missing required keyword '{0}' in input file")]
    MissingKeyword(&'static str),
}
