/** Vertex Id */
pub type VertexId = usize;

/** Edge Id */
pub type EdgeId = usize;

/** Color Id */
pub type ColorId = usize;

/** learned edge weight (16 bits to halve the footprint of the weight arrays) */
pub type Penalty = u16;

/** iteration counter */
pub type Counter = i64;

/** random seed */
pub type Seed = u64;
