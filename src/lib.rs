//! Row-weighting heuristic solver for the Graph Coloring problem

// useful additional warnings if docs are missing, or crates imported but unused, etc.
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unsafe_code)]
#![warn(unused_extern_crates)]
#![warn(variant_size_differences)]

// not sure if already by default in clippy
#![warn(clippy::similar_names)]
#![warn(clippy::shadow_unrelated)]
#![warn(clippy::shadow_same)]
#![warn(clippy::shadow_reuse)]


/// shared vertex/edge/color identifiers
pub mod color;

/// error kinds reported by the solver
pub mod error;

/// graph coloring instance (adjacency storage, k-core)
pub mod instance;

/// read/write the supported instance file formats
pub mod formats;

/// indexed containers used by the solution and the searches
pub mod data_structures;

/// solution with incremental conflict & penalty bookkeeping
pub mod solution;

/// cooperative stopping criterion shared by the search workers
pub mod timer;

/// best-solution record, bound tracking and run reporting
pub mod output;

/// coloring algorithms
pub mod search;

/// helper and utility methods for executables
pub mod util;
