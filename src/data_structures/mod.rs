//! Indexed containers with O(1) operations over dense id ranges.

/// set over [0, capacity) with O(1) insert/remove/draw
pub mod sparse_set;

/// bidirectional vertex ↔ color mapping
pub mod doubly_indexed_map;
