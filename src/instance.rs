use crate::color::{ColorId, EdgeId, VertexId};
use crate::error::ColoringError;

/// adjacency entry of a vertex: edge id and opposite endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexNeighbor {
    /// edge id
    pub e: EdgeId,
    /// opposite endpoint
    pub v: VertexId,
}

/** models a Graph Coloring instance.

Undirected simple graph with integer vertex ids in [0, n) and edge ids in
[0, m). Each edge appears in the adjacency list of both endpoints. Instances
are built once (by the format readers or by hand) and never mutated while
solving; `remove_duplicate_edges` may run beforehand and renumbers the edges. */
#[derive(Debug, Clone, Default)]
pub struct Instance {
    /// name of the instance (usually its file path)
    name: String,
    /// adj_list[v]: (edge id, opposite endpoint) pairs
    adj_list: Vec<Vec<VertexNeighbor>>,
    /// edges[e]: endpoints of edge e
    edges: Vec<(VertexId, VertexId)>,
    /// largest adjacency list length
    max_degree: usize,
}

impl Instance {
    /// creates an instance with `nb_vertices` vertices and no edge
    pub fn new(nb_vertices: usize) -> Self {
        Self {
            name: String::default(),
            adj_list: vec![Vec::new(); nb_vertices],
            edges: Vec::new(),
            max_degree: 0,
        }
    }

    /// name of the instance
    pub fn name(&self) -> &str { &self.name }

    /// sets the name of the instance
    pub fn set_name(&mut self, name: String) { self.name = name; }

    /// number of vertices
    pub fn nb_vertices(&self) -> usize { self.adj_list.len() }

    /// number of edges
    pub fn nb_edges(&self) -> usize { self.edges.len() }

    /// endpoints of every edge, indexed by edge id
    pub fn edges(&self) -> &[(VertexId, VertexId)] { &self.edges }

    /// endpoints of edge e
    pub fn edge(&self, e: EdgeId) -> (VertexId, VertexId) { self.edges[e] }

    /// adjacency list of vertex v
    pub fn neighbors(&self, v: VertexId) -> &[VertexNeighbor] { &self.adj_list[v] }

    /// degree of vertex v
    pub fn degree(&self, v: VertexId) -> usize { self.adj_list[v].len() }

    /// maximum degree of the instance
    pub fn max_degree(&self) -> usize { self.max_degree }

    /// adds a vertex, returning its id
    pub fn add_vertex(&mut self) -> VertexId {
        self.adj_list.push(Vec::new());
        self.adj_list.len() - 1
    }

    /** adds an edge between v1 and v2 and returns its id.

    Self-loops are silently ignored (no edge is created); endpoints outside
    [0, nb_vertices) are an input error. Duplicate edges are accepted. */
    pub fn add_edge(&mut self, v1: VertexId, v2: VertexId) -> Result<Option<EdgeId>, ColoringError> {
        self.check_vertex_index(v1)?;
        self.check_vertex_index(v2)?;
        if v1 == v2 { return Ok(None); }
        let e = self.edges.len();
        self.edges.push((v1, v2));
        self.adj_list[v1].push(VertexNeighbor { e, v: v2 });
        self.adj_list[v2].push(VertexNeighbor { e, v: v1 });
        self.max_degree = self.max_degree
            .max(self.adj_list[v1].len())
            .max(self.adj_list[v2].len());
        Ok(Some(e))
    }

    /// removes duplicate edges (edge ids change)
    pub fn remove_duplicate_edges(&mut self) {
        let nb_vertices = self.nb_vertices();
        let mut higher_neighbors: Vec<Vec<VertexId>> = vec![Vec::new(); nb_vertices];
        for (v, list) in self.adj_list.iter().enumerate() {
            for neighbor in list {
                if neighbor.v > v { higher_neighbors[v].push(neighbor.v); }
            }
        }
        for list in higher_neighbors.iter_mut() {
            list.sort_unstable();
            list.dedup();
        }
        self.edges.clear();
        self.max_degree = 0;
        for list in self.adj_list.iter_mut() { list.clear(); }
        for v1 in 0..nb_vertices {
            for i in 0..higher_neighbors[v1].len() {
                let v2 = higher_neighbors[v1][i];
                // endpoints already validated when first inserted
                let _ = self.add_edge(v1, v2);
            }
        }
    }

    /** computes the vertices outside the k-core.

    Repeatedly removes any vertex whose remaining degree is < k and returns
    the removal order. Given any k-coloring of the remaining vertices,
    re-inserting the removed ones in reverse order always finds a free color:
    at its removal each vertex had fewer than k remaining neighbors. */
    pub fn compute_core(&self, k: ColorId) -> Vec<VertexId> {
        let mut removed_vertices = Vec::new();
        let mut degrees: Vec<usize> = (0..self.nb_vertices()).map(|v| self.degree(v)).collect();
        let mut queue: Vec<VertexId> = (0..self.nb_vertices())
            .filter(|&v| degrees[v] < k)
            .collect();
        while let Some(v) = queue.pop() {
            removed_vertices.push(v);
            for neighbor in self.neighbors(v) {
                if degrees[neighbor.v] < k { continue; }
                degrees[neighbor.v] -= 1;
                if degrees[neighbor.v] < k { queue.push(neighbor.v); }
            }
        }
        removed_vertices
    }

    /// checks that a vertex index is within range
    fn check_vertex_index(&self, v: VertexId) -> Result<(), ColoringError> {
        if v >= self.nb_vertices() {
            return Err(ColoringError::VertexOutOfRange { vertex: v, nb_vertices: self.nb_vertices() });
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    /// two disjoint triangles {0,1,2} and {3,4,5}
    pub fn two_triangles() -> Instance {
        let mut inst = Instance::new(6);
        for &(v1, v2) in [(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5)].iter() {
            inst.add_edge(v1, v2).unwrap();
        }
        inst
    }

    #[test]
    fn test_construction() {
        let mut inst = Instance::new(3);
        inst.add_edge(0, 1).unwrap();
        inst.add_edge(1, 2).unwrap();
        assert_eq!(inst.nb_vertices(), 3);
        assert_eq!(inst.nb_edges(), 2);
        assert_eq!(inst.degree(1), 2);
        assert_eq!(inst.max_degree(), 2);
        assert_eq!(inst.neighbors(0), &[VertexNeighbor { e: 0, v: 1 }]);
        assert_eq!(inst.edge(1), (1, 2));
    }

    #[test]
    fn test_self_loop_ignored() {
        let mut inst = Instance::new(2);
        assert_eq!(inst.add_edge(0, 0).unwrap(), None);
        assert_eq!(inst.nb_edges(), 0);
        assert_eq!(inst.degree(0), 0);
    }

    #[test]
    fn test_vertex_out_of_range() {
        let mut inst = Instance::new(2);
        assert!(inst.add_edge(0, 2).is_err());
    }

    #[test]
    fn test_remove_duplicate_edges() {
        let mut inst = Instance::new(3);
        inst.add_edge(0, 1).unwrap();
        inst.add_edge(1, 0).unwrap();
        inst.add_edge(1, 2).unwrap();
        assert_eq!(inst.nb_edges(), 3);
        inst.remove_duplicate_edges();
        assert_eq!(inst.nb_edges(), 2);
        assert_eq!(inst.degree(1), 2);
        assert_eq!(inst.max_degree(), 2);
    }

    #[test]
    fn test_compute_core_on_two_triangles() {
        let inst = two_triangles();
        // every vertex has degree 2: the 3-core peel removes everything,
        // while nothing can be removed when looking for 3 colors
        assert_eq!(inst.compute_core(3), Vec::<VertexId>::new());
        assert_eq!(inst.compute_core(4).len(), 6);
    }

    #[test]
    fn test_compute_core_reinsertion_order() {
        // star K_{1,3}: looking for 2 colors, the leaves (degree 1) peel
        // first, then the center
        let mut inst = Instance::new(4);
        inst.add_edge(0, 1).unwrap();
        inst.add_edge(0, 2).unwrap();
        inst.add_edge(0, 3).unwrap();
        let removed = inst.compute_core(2);
        assert_eq!(removed.len(), 4);
        // the center is removed after its degree dropped below 2, hence
        // re-inserting in reverse order colors it before two of its leaves
        let center_pos = removed.iter().position(|&v| v == 0).unwrap();
        assert!(center_pos >= 2);
    }
}
