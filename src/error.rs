use thiserror::Error;

use crate::color::VertexId;

/** errors reported by the solver.

Input and configuration errors are fatal and reported with a non-zero exit
status by the binary. `Invariant` indicates a bug in the solver itself. */
#[derive(Error, Debug)]
pub enum ColoringError {
    /// a file could not be opened or written
    #[error("unable to access file \"{path}\": {source}")]
    Io {
        /// path of the offending file
        path: String,
        /// underlying IO error
        source: std::io::Error,
    },
    /// an instance or certificate file is malformed
    #[error("parse error in \"{path}\": {message}")]
    Parse {
        /// path of the offending file
        path: String,
        /// what went wrong
        message: String,
    },
    /// the requested instance format does not exist
    #[error("unknown instance format \"{0}\"")]
    UnknownFormat(String),
    /// the requested algorithm does not exist
    #[error("unknown algorithm \"{0}\"")]
    UnknownAlgorithm(String),
    /// the requested algorithm needs an external back-end that is not built in
    #[error("algorithm \"{0}\" requires an external back-end that is not enabled in this build")]
    BackendUnavailable(String),
    /// a vertex index outside [0, nb_vertices) was given
    #[error("invalid vertex index {vertex}: vertex indices belong to [0, {nb_vertices})")]
    VertexOutOfRange {
        /// the offending index
        vertex: VertexId,
        /// number of vertices of the instance
        nb_vertices: usize,
    },
    /// a command-line value could not be interpreted
    #[error("invalid value for \"{option}\": {message}")]
    InvalidParameter {
        /// name of the command-line option
        option: String,
        /// what went wrong
        message: String,
    },
    /// an internal invariant was broken (this is a bug)
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl ColoringError {
    /// builds an IO error attached to a file path
    pub fn io(path: &str, source: std::io::Error) -> Self {
        Self::Io { path: path.to_string(), source }
    }

    /// builds a parse error attached to a file path
    pub fn parse(path: &str, message: String) -> Self {
        Self::Parse { path: path.to_string(), message }
    }
}
