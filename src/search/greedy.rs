use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use bit_set::BitSet;

use crate::color::{ColorId, VertexId};
use crate::error::ColoringError;
use crate::instance::Instance;
use crate::solution::Solution;

/// vertex ordering used by the greedy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    /// vertices in id order
    Default,
    /// by non-increasing degree
    LargestFirst,
    /// by number of already ordered neighbors
    IncidenceDegree,
    /// repeatedly take a vertex of smallest remaining degree
    SmallestLast,
    /// repeatedly take a vertex of largest remaining degree
    DynamicLargestFirst,
}

impl FromStr for Ordering {
    type Err = ColoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "largestfirst" | "lf" => Ok(Self::LargestFirst),
            "incidencedegree" | "id" => Ok(Self::IncidenceDegree),
            "smallestlast" | "sl" => Ok(Self::SmallestLast),
            "dynamiclargestfirst" | "dlf" => Ok(Self::DynamicLargestFirst),
            _ => Err(ColoringError::InvalidParameter {
                option: "ordering".to_string(),
                message: format!("unknown ordering \"{}\"", s),
            }),
        }
    }
}

impl fmt::Display for Ordering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Default => "default",
            Self::LargestFirst => "largestfirst",
            Self::IncidenceDegree => "incidencedegree",
            Self::SmallestLast => "smallestlast",
            Self::DynamicLargestFirst => "dynamiclargestfirst",
        };
        write!(f, "{}", name)
    }
}

/// sentinel for "not in any bucket"
const ABSENT: (usize, usize) = (usize::MAX, usize::MAX);

/// vertices bucketed by a dynamic degree-like key, with O(1) relocation
struct VertexBuckets {
    /// buckets[k]: vertices with current key k
    buckets: Vec<Vec<VertexId>>,
    /// positions[v]: (bucket, index) of v
    positions: Vec<(usize, usize)>,
}

impl VertexBuckets {
    fn new(nb_buckets: usize, nb_vertices: usize) -> Self {
        Self {
            buckets: vec![Vec::new(); nb_buckets],
            positions: vec![ABSENT; nb_vertices],
        }
    }

    fn push(&mut self, v: VertexId, bucket: usize) {
        self.positions[v] = (bucket, self.buckets[bucket].len());
        self.buckets[bucket].push(v);
    }

    fn is_empty(&self, bucket: usize) -> bool { self.buckets[bucket].is_empty() }

    fn bucket_of(&self, v: VertexId) -> usize { self.positions[v].0 }

    /// pops any vertex of the given bucket
    fn pop(&mut self, bucket: usize) -> Option<VertexId> {
        let v = self.buckets[bucket].pop()?;
        self.positions[v] = ABSENT;
        Some(v)
    }

    /// swap-deletes v from its bucket and pushes it to another one
    fn relocate(&mut self, v: VertexId, to: usize) {
        let (bucket, i) = self.positions[v];
        let last = self.buckets[bucket].len() - 1;
        self.buckets[bucket].swap(i, last);
        self.positions[self.buckets[bucket][i]] = (bucket, i);
        self.buckets[bucket].pop();
        self.push(v, to);
    }

    /// swaps two vertices of the same bucket
    fn swap_within_bucket(&mut self, v1: VertexId, v2: VertexId) {
        let (bucket, i1) = self.positions[v1];
        let (_, i2) = self.positions[v2];
        self.buckets[bucket].swap(i1, i2);
        self.positions[v1] = (bucket, i2);
        self.positions[v2] = (bucket, i1);
    }
}

/// vertices by non-increasing degree
fn largest_first(instance: &Instance) -> Vec<VertexId> {
    let mut buckets: Vec<Vec<VertexId>> = vec![Vec::new(); instance.max_degree() + 1];
    for v in 0..instance.nb_vertices() {
        buckets[instance.degree(v)].push(v);
    }
    let mut ordered = Vec::with_capacity(instance.nb_vertices());
    let mut d = instance.max_degree();
    for _ in 0..instance.nb_vertices() {
        while buckets[d].is_empty() { d -= 1; }
        let v = buckets[d].pop().unwrap();
        ordered.push(v);
    }
    ordered
}

/// vertices by number of already ordered neighbors, seeded with a
/// maximum-degree vertex
fn incidence_degree(instance: &Instance) -> Vec<VertexId> {
    let n = instance.nb_vertices();
    if n == 0 { return Vec::new(); }
    let mut buckets = VertexBuckets::new(instance.max_degree() + 1, n);
    let mut v_best = 0;
    for v in 0..n {
        buckets.push(v, 0);
        if instance.degree(v_best) < instance.degree(v) { v_best = v; }
    }
    // make the seed pop first
    buckets.swap_within_bucket(v_best, n - 1);
    let mut added = vec![false; n];
    let mut ordered = Vec::with_capacity(n);
    let mut d = 0;
    for _ in 0..n {
        while buckets.is_empty(d) { d += 1; }
        let v = buckets.pop(d).unwrap();
        for neighbor in instance.neighbors(v) {
            if added[neighbor.v] { continue; }
            let bucket = buckets.bucket_of(neighbor.v);
            buckets.relocate(neighbor.v, bucket + 1);
        }
        added[v] = true;
        ordered.push(v);
    }
    ordered
}

/// repeatedly removes a vertex of smallest remaining degree
fn smallest_last(instance: &Instance) -> Vec<VertexId> {
    let n = instance.nb_vertices();
    let mut buckets = VertexBuckets::new(instance.max_degree() + 1, n);
    for v in 0..n { buckets.push(v, instance.degree(v)); }
    let mut added = vec![false; n];
    let mut ordered = Vec::with_capacity(n);
    let mut d = 0;
    for _ in 0..n {
        if d > 0 && !buckets.is_empty(d - 1) { d -= 1; }
        while buckets.is_empty(d) { d += 1; }
        let v = buckets.pop(d).unwrap();
        for neighbor in instance.neighbors(v) {
            if added[neighbor.v] { continue; }
            let bucket = buckets.bucket_of(neighbor.v);
            buckets.relocate(neighbor.v, bucket - 1);
        }
        added[v] = true;
        ordered.push(v);
    }
    ordered
}

/// repeatedly removes a vertex of largest remaining degree
fn dynamic_largest_first(instance: &Instance) -> Vec<VertexId> {
    let n = instance.nb_vertices();
    let mut buckets = VertexBuckets::new(instance.max_degree() + 1, n);
    for v in 0..n { buckets.push(v, instance.degree(v)); }
    let mut added = vec![false; n];
    let mut ordered = Vec::with_capacity(n);
    let mut d = instance.max_degree();
    for _ in 0..n {
        while buckets.is_empty(d) { d -= 1; }
        let v = buckets.pop(d).unwrap();
        for neighbor in instance.neighbors(v) {
            if added[neighbor.v] { continue; }
            let bucket = buckets.bucket_of(neighbor.v);
            buckets.relocate(neighbor.v, bucket - 1);
        }
        added[v] = true;
        ordered.push(v);
    }
    ordered
}

/// computes the vertex sequence of an ordering
pub fn ordered_vertices(instance: &Instance, ordering: Ordering) -> Vec<VertexId> {
    match ordering {
        Ordering::Default => (0..instance.nb_vertices()).collect(),
        Ordering::LargestFirst => largest_first(instance),
        Ordering::IncidenceDegree => incidence_degree(instance),
        Ordering::SmallestLast => smallest_last(instance),
        Ordering::DynamicLargestFirst => dynamic_largest_first(instance),
    }
}

/** greedy coloring: along the ordering (reversed on demand), give each
vertex the smallest color unused in its colored neighborhood. */
pub fn greedy(instance: &Arc<Instance>, ordering: Ordering, reverse: bool) -> Solution {
    let mut ordered = ordered_vertices(instance, ordering);
    if reverse { ordered.reverse(); }
    let mut solution = Solution::new(instance.clone());
    let mut color_set: BitSet = BitSet::default();
    for &v in &ordered {
        color_set.clear();
        for neighbor in instance.neighbors(v) {
            if let Some(c) = solution.color(neighbor.v) { color_set.insert(c); }
        }
        let mut color: ColorId = 0;
        while color_set.contains(color) { color += 1; }
        solution.set(v, color);
    }
    solution
}
