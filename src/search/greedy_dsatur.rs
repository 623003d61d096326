use std::cmp::Ordering;
use std::sync::Arc;

use bit_set::BitSet;
use priority_queue::PriorityQueue;

use crate::color::{ColorId, VertexId};
use crate::instance::Instance;
use crate::solution::Solution;

/// priority of an uncolored vertex: saturation first, degree second,
/// smallest id last
#[derive(Debug, PartialEq, Eq)]
struct DSatInfo {
    dsat: usize,
    degree: usize,
    vertex: VertexId,
}

impl Ord for DSatInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dsat.cmp(&other.dsat)
            .then_with(|| self.degree.cmp(&other.degree))
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

// `PartialOrd` needs to be implemented as well.
impl PartialOrd for DSatInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/** implements the greedy DSATUR algorithm.
    1. choose an uncolored vertex seeing the most colors (break ties by the
       largest degree, then by the smallest id, so a maximum-degree vertex
       starts)
    2. give it the smallest color unused in its neighborhood
    3. mark all its uncolored neighbors as seeing this color
    4. repeat until every vertex is colored

The result is always feasible and uses at most max_degree + 1 colors. */
pub fn greedy_dsatur(instance: &Arc<Instance>) -> Solution {
    let n = instance.nb_vertices();
    let mut remaining_vertices: PriorityQueue<VertexId, DSatInfo> = PriorityQueue::new();
    for v in 0..n {
        remaining_vertices.push(v, DSatInfo { dsat: 0, degree: instance.degree(v), vertex: v });
    }
    let mut solution = Solution::new(instance.clone());
    // adj_colors[v]: colors already used in the neighborhood of v
    let mut adj_colors: Vec<BitSet> = vec![BitSet::default(); n];
    while let Some((v, _)) = remaining_vertices.pop() {
        let mut color: ColorId = 0;
        while adj_colors[v].contains(color) { color += 1; }
        solution.set(v, color);
        for neighbor in instance.neighbors(v) {
            if solution.contains(neighbor.v) { continue; }
            if adj_colors[neighbor.v].insert(color) {
                remaining_vertices.change_priority_by(&neighbor.v, |p| { p.dsat += 1; });
            }
        }
    }
    solution
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::{checker, CheckerResult};

    fn build(n: usize, edges: &[(usize, usize)]) -> Arc<Instance> {
        let mut inst = Instance::new(n);
        for &(v1, v2) in edges { inst.add_edge(v1, v2).unwrap(); }
        Arc::new(inst)
    }

    #[test]
    fn test_path() {
        let instance = build(3, &[(0, 1), (1, 2)]);
        let solution = greedy_dsatur(&instance);
        assert_eq!(checker(&instance, &solution), CheckerResult::Ok(2));
    }

    #[test]
    fn test_triangle() {
        let instance = build(3, &[(0, 1), (1, 2), (0, 2)]);
        let solution = greedy_dsatur(&instance);
        assert_eq!(checker(&instance, &solution), CheckerResult::Ok(3));
    }

    #[test]
    fn test_k4_minus_one_edge() {
        let instance = build(4, &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3)]);
        let solution = greedy_dsatur(&instance);
        assert_eq!(checker(&instance, &solution), CheckerResult::Ok(3));
    }

    #[test]
    fn test_star() {
        let instance = build(6, &[(0, 1), (0, 2), (0, 3), (0, 4), (0, 5)]);
        let solution = greedy_dsatur(&instance);
        assert_eq!(checker(&instance, &solution), CheckerResult::Ok(2));
        // the maximum-degree center starts, hence gets color 0
        assert_eq!(solution.color(0), Some(0));
    }

    #[test]
    fn test_five_cycle() {
        let instance = build(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (0, 4)]);
        let solution = greedy_dsatur(&instance);
        assert_eq!(checker(&instance, &solution), CheckerResult::Ok(3));
    }

    #[test]
    fn test_at_most_max_degree_plus_one_colors() {
        // wheel W6: hub 0 of degree 6
        let instance = build(7, &[
            (0, 1), (0, 2), (0, 3), (0, 4), (0, 5), (0, 6),
            (1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (1, 6),
        ]);
        let solution = greedy_dsatur(&instance);
        assert!(solution.feasible());
        assert!(solution.nb_colors() <= instance.max_degree() + 1);
    }

    #[test]
    fn test_empty_graph() {
        let instance = build(4, &[]);
        let solution = greedy_dsatur(&instance);
        assert_eq!(checker(&instance, &solution), CheckerResult::Ok(1));
    }
}
