use std::fmt::Write as _;
use std::sync::Arc;

use crate::color::{ColorId, EdgeId, Penalty, VertexId};
use crate::data_structures::doubly_indexed_map::DoublyIndexedMap;
use crate::data_structures::sparse_set::SparseSet;
use crate::error::ColoringError;
use crate::instance::Instance;

/** solution of a graph coloring instance.

Holds a possibly partial vertex → color assignment together with the set of
conflicting edges (both endpoints colored alike), a learned weight per edge
(the accumulator of the second row-weighting variant, initially 1) and the
total weight of the current conflicts. `set` and `unset` maintain everything
incrementally in O(degree); cloning is O(n + m) which keeps publishing a new
best solution cheap. */
#[derive(Debug, Clone)]
pub struct Solution {
    /// instance the solution refers to
    instance: Arc<Instance>,
    /// vertex ↔ color mapping
    map: DoublyIndexedMap,
    /// conflicting edge ids
    conflicts: SparseSet,
    /// penalties[e]: learned weight of edge e
    penalties: Vec<Penalty>,
    /// total penalty of the conflicting edges
    total_penalty: u64,
}

impl Solution {
    /// creates an empty solution (no vertex colored)
    pub fn new(instance: Arc<Instance>) -> Self {
        let nb_vertices = instance.nb_vertices();
        let nb_edges = instance.nb_edges();
        Self {
            instance,
            map: DoublyIndexedMap::new(nb_vertices, nb_vertices),
            conflicts: SparseSet::new(nb_edges),
            penalties: vec![1; nb_edges],
            total_penalty: 0,
        }
    }

    /** reads a solution from a certificate file: one color id per vertex in
    vertex-id order, tolerating the legacy layout whose first token is the
    number of colors. */
    pub fn from_certificate(instance: Arc<Instance>, path: &str) -> Result<Self, ColoringError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ColoringError::io(path, source))?;
        let nb_vertices = instance.nb_vertices();
        let mut tokens = Vec::with_capacity(nb_vertices);
        for token in content.split_whitespace() {
            let c: ColorId = token.parse().map_err(|_| {
                ColoringError::parse(path, format!("invalid color id \"{}\"", token))
            })?;
            tokens.push(c);
        }
        let colors: &[ColorId] = if tokens.len() == nb_vertices {
            &tokens
        } else if tokens.len() == nb_vertices + 1 {
            &tokens[1..] // legacy layout: leading color count
        } else {
            return Err(ColoringError::parse(
                path,
                format!("expected {} colors, found {} tokens", nb_vertices, tokens.len()),
            ));
        };
        let mut solution = Self::new(instance);
        for (v, &c) in colors.iter().enumerate() {
            if c >= nb_vertices {
                return Err(ColoringError::parse(
                    path,
                    format!("color id {} of vertex {} is out of range", c, v),
                ));
            }
            solution.set(v, c);
        }
        Ok(solution)
    }

    /// instance the solution refers to
    pub fn instance(&self) -> &Arc<Instance> { &self.instance }

    /// underlying vertex ↔ color mapping
    pub fn map(&self) -> &DoublyIndexedMap { &self.map }

    /// true iff v has a color
    pub fn contains(&self, v: VertexId) -> bool { self.map.contains(v) }

    /// color of v, if any
    pub fn color(&self, v: VertexId) -> Option<ColorId> { self.map.value(v) }

    /// number of colors currently in use
    pub fn nb_colors(&self) -> usize { self.map.nb_values() }

    /// number of colored vertices
    pub fn nb_colored_vertices(&self) -> usize { self.map.nb_elements() }

    /// number of vertices of color c
    pub fn nb_vertices_of(&self, c: ColorId) -> usize { self.map.nb_elements_of(c) }

    /// true iff every vertex is colored and no edge is conflicting
    pub fn feasible(&self) -> bool {
        self.nb_colored_vertices() == self.instance.nb_vertices() && self.conflicts.is_empty()
    }

    /// number of conflicting edges
    pub fn nb_conflicts(&self) -> usize { self.conflicts.len() }

    /// i-th conflicting edge (order unspecified)
    pub fn conflict(&self, i: usize) -> EdgeId { self.conflicts.nth(i) }

    /// set of conflicting edges
    pub fn conflicts(&self) -> &SparseSet { &self.conflicts }

    /// learned weight of edge e
    pub fn penalty(&self, e: EdgeId) -> Penalty { self.penalties[e] }

    /// total weight of the conflicting edges
    pub fn total_penalty(&self) -> u64 { self.total_penalty }

    /** colors vertex v with c, updating the conflict set and the total
    penalty incrementally. */
    pub fn set(&mut self, v: VertexId, c: ColorId) {
        let old = self.map.value(v);
        for neighbor in self.instance.neighbors(v) {
            let neighbor_color = self.map.value(neighbor.v);
            if neighbor_color.is_none() { continue; }
            if neighbor_color == old && self.conflicts.remove(neighbor.e) {
                self.total_penalty -= u64::from(self.penalties[neighbor.e]);
            }
            if neighbor_color == Some(c) && self.conflicts.insert(neighbor.e) {
                self.total_penalty += u64::from(self.penalties[neighbor.e]);
            }
        }
        self.map.set(v, c);
    }

    /// removes the color of vertex v, updating the conflict set
    pub fn unset(&mut self, v: VertexId) {
        let old = self.map.value(v);
        if old.is_none() { return; }
        for neighbor in self.instance.neighbors(v) {
            if self.map.value(neighbor.v) == old && self.conflicts.remove(neighbor.e) {
                self.total_penalty -= u64::from(self.penalties[neighbor.e]);
            }
        }
        self.map.unset(v);
    }

    /// adds p to the weight of edge e
    pub fn increment_penalty(&mut self, e: EdgeId, p: Penalty) {
        self.penalties[e] += p;
        if self.conflicts.contains(e) {
            self.total_penalty += u64::from(p);
        }
    }

    /// replaces the weight of edge e
    pub fn set_penalty(&mut self, e: EdgeId, p: Penalty) {
        if self.conflicts.contains(e) {
            self.total_penalty -= u64::from(self.penalties[e]);
            self.total_penalty += u64::from(p);
        }
        self.penalties[e] = p;
    }

    /// writes the certificate: one color id per vertex, in vertex-id order
    pub fn write(&self, path: &str) -> Result<(), ColoringError> {
        let mut content = String::default();
        for v in 0..self.instance.nb_vertices() {
            let c = self.color(v).ok_or_else(|| {
                ColoringError::Invariant(format!("writing a certificate with uncolored vertex {}", v))
            })?;
            let _ = writeln!(content, "{}", c);
        }
        std::fs::write(path, content)
            .map_err(|source| ColoringError::io(path, source))
    }
}

/// result of the solution checker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckerResult {
    /// the solution is feasible and uses the given number of colors
    Ok(usize),
    /// a vertex has no color
    UncoloredVertex(VertexId),
    /// both endpoints of an edge share a color
    ConflictingEdge(EdgeId),
}

/// checks a solution from scratch (independently of the incremental state)
pub fn checker(instance: &Instance, solution: &Solution) -> CheckerResult {
    for v in 0..instance.nb_vertices() {
        if !solution.contains(v) {
            return CheckerResult::UncoloredVertex(v);
        }
    }
    for (e, &(v1, v2)) in instance.edges().iter().enumerate() {
        if solution.color(v1) == solution.color(v2) {
            return CheckerResult::ConflictingEdge(e);
        }
    }
    CheckerResult::Ok(solution.nb_colors())
}


#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Arc<Instance> {
        let mut inst = Instance::new(3);
        inst.add_edge(0, 1).unwrap();
        inst.add_edge(1, 2).unwrap();
        inst.add_edge(0, 2).unwrap();
        Arc::new(inst)
    }

    /// recomputes the conflict set and total penalty from scratch
    fn audit(solution: &Solution) {
        let instance = solution.instance().clone();
        let mut expected_penalty = 0u64;
        for (e, &(v1, v2)) in instance.edges().iter().enumerate() {
            let conflicting = solution.contains(v1)
                && solution.color(v1) == solution.color(v2);
            assert_eq!(solution.conflicts().contains(e), conflicting, "edge {}", e);
            if conflicting { expected_penalty += u64::from(solution.penalty(e)); }
        }
        assert_eq!(solution.total_penalty(), expected_penalty);
    }

    #[test]
    fn test_incremental_conflicts() {
        let mut solution = Solution::new(triangle());
        assert!(!solution.feasible());
        solution.set(0, 0);
        solution.set(1, 0); // edge (0,1) now conflicting
        audit(&solution);
        assert_eq!(solution.nb_conflicts(), 1);
        assert_eq!(solution.total_penalty(), 1);
        solution.set(2, 0); // all three edges conflicting
        audit(&solution);
        assert_eq!(solution.nb_conflicts(), 3);
        solution.set(1, 1);
        audit(&solution);
        assert_eq!(solution.nb_conflicts(), 1); // only (0,2) remains
        solution.set(2, 2);
        audit(&solution);
        assert_eq!(solution.nb_conflicts(), 0);
        assert!(solution.feasible());
        assert_eq!(solution.nb_colors(), 3);
        assert_eq!(solution.nb_vertices_of(0), 1);
        assert_eq!(solution.nb_vertices_of(1), 1);
    }

    #[test]
    fn test_penalties_follow_conflicts() {
        let mut solution = Solution::new(triangle());
        solution.set(0, 0);
        solution.set(1, 0);
        solution.increment_penalty(0, 4); // edge (0,1) in conflict
        assert_eq!(solution.penalty(0), 5);
        assert_eq!(solution.total_penalty(), 5);
        solution.increment_penalty(1, 7); // edge (1,2) not in conflict
        assert_eq!(solution.total_penalty(), 5);
        audit(&solution);
        solution.set_penalty(0, 2);
        assert_eq!(solution.total_penalty(), 2);
        solution.set(1, 1); // conflict disappears
        audit(&solution);
        assert_eq!(solution.total_penalty(), 0);
    }

    #[test]
    fn test_merging_two_classes_removes_one_color() {
        let mut solution = Solution::new(triangle());
        solution.set(0, 0);
        solution.set(1, 1);
        solution.set(2, 2);
        // re-coloring a whole class leaves exactly one color less in use
        for &v in solution.map().elements_of(2).to_vec().iter() {
            solution.set(v, 0);
        }
        audit(&solution);
        assert_eq!(solution.nb_colors(), 2);
        assert_eq!(solution.nb_vertices_of(0), 2);
        assert_eq!(solution.nb_conflicts(), 1); // edge (0,2)
    }

    #[test]
    fn test_unset() {
        let mut solution = Solution::new(triangle());
        solution.set(0, 0);
        solution.set(1, 0);
        solution.unset(1);
        audit(&solution);
        assert_eq!(solution.nb_conflicts(), 0);
        assert_eq!(solution.nb_colored_vertices(), 1);
        assert!(!solution.feasible());
    }

    #[test]
    fn test_checker() {
        let instance = triangle();
        let mut solution = Solution::new(instance.clone());
        solution.set(0, 0);
        assert_eq!(checker(&instance, &solution), CheckerResult::UncoloredVertex(1));
        solution.set(1, 0);
        solution.set(2, 1);
        assert_eq!(checker(&instance, &solution), CheckerResult::ConflictingEdge(0));
        solution.set(1, 2);
        assert_eq!(checker(&instance, &solution), CheckerResult::Ok(3));
    }

    #[test]
    fn test_certificate_roundtrip() {
        let instance = triangle();
        let mut solution = Solution::new(instance.clone());
        solution.set(0, 0);
        solution.set(1, 1);
        solution.set(2, 2);
        let path_buf = std::env::temp_dir()
            .join(format!("rw_color_certificate_{}.sol", std::process::id()));
        let path = path_buf.to_str().unwrap().to_string();
        solution.write(&path).unwrap();
        let reread = Solution::from_certificate(instance, &path).unwrap();
        for v in 0..3 {
            assert_eq!(reread.color(v), solution.color(v));
        }
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_certificate_legacy_layout() {
        let instance = triangle();
        let path_buf = std::env::temp_dir()
            .join(format!("rw_color_certificate_legacy_{}.sol", std::process::id()));
        let path = path_buf.to_str().unwrap().to_string();
        std::fs::write(&path, "3\n0 1 2\n").unwrap();
        let solution = Solution::from_certificate(instance, &path).unwrap();
        assert_eq!(solution.color(0), Some(0));
        assert_eq!(solution.color(2), Some(2));
        assert!(solution.feasible());
        let _ = std::fs::remove_file(&path);
    }
}
