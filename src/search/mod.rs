//! Search algorithms for the graph coloring problem.

/// greedy with configurable vertex ordering
pub mod greedy;

/// greedy DSATUR algorithm
pub mod greedy_dsatur;

/// row-weighting local search (merge & repair)
pub mod row_weighting;
