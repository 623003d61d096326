use std::sync::Arc;
use std::thread;

use bit_set::BitSet;
use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng};

use crate::color::{ColorId, Counter, EdgeId, Penalty, Seed, VertexId};
use crate::data_structures::sparse_set::SparseSet;
use crate::error::ColoringError;
use crate::instance::Instance;
use crate::output::Output;
use crate::search::greedy_dsatur::greedy_dsatur;
use crate::solution::Solution;
use crate::timer::Timer;

/// where the learned row weights live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightMode {
    /// persistent per-edge array owned by the worker
    PerEdge,
    /// weights stored in the solution's penalty accumulator
    PerConflict,
}

/// parameters of the row-weighting local search
#[derive(Debug, Clone)]
pub struct RowWeightingParameters {
    /// number of parallel workers
    pub nb_threads: usize,
    /// stop after this many iterations
    pub maximum_nb_iterations: Option<Counter>,
    /// stop after this many iterations without a new best solution
    pub maximum_nb_iterations_without_improvement: Option<Counter>,
    /// stop after this many accepted improvements
    pub maximum_nb_improvements: Option<Counter>,
    /// stop as soon as a coloring with this many colors is found
    pub goal: Option<usize>,
    /// shrink the active subgraph to the k-core after every merge
    pub enable_core_reduction: bool,
    /// warm-start solution (each worker runs DSATUR otherwise)
    pub initial_solution: Option<Solution>,
    /// accumulator targeted by the weight increments
    pub weight_mode: WeightMode,
}

impl Default for RowWeightingParameters {
    fn default() -> Self {
        Self {
            nb_threads: 3,
            maximum_nb_iterations: None,
            maximum_nb_iterations_without_improvement: None,
            maximum_nb_improvements: None,
            goal: None,
            enable_core_reduction: true,
            initial_solution: None,
            weight_mode: WeightMode::PerEdge,
        }
    }
}

/** row-weighting local search.

Runs `nb_threads` workers, each owning its solution, weight array and RNG;
they share only the output record and the timer. A worker alternates two
phases. While its solution is feasible it re-colors the vertices outside the
current k-core, publishes any improvement, then merges the two color classes
minimizing the inter-class weight, shrinking the active subgraph to the new
k-core. Once conflicting, it repairs a random conflicting edge by the best
single-vertex re-coloring and increments the weight of every edge still in
conflict, halving all weights whenever one approaches the 16-bit range.

Sub-seeds derive deterministically from `seed`, so runs are reproducible for
a fixed (seed, thread count). */
pub fn local_search_row_weighting(
    instance: &Arc<Instance>,
    parameters: &RowWeightingParameters,
    seed: Seed,
    timer: &Arc<Timer>,
    output: &Arc<Output>,
) -> Result<(), ColoringError> {
    let mut seeder = StdRng::seed_from_u64(seed);
    let seeds: Vec<Seed> = (0..parameters.nb_threads.max(1)).map(|_| seeder.gen()).collect();
    let mut result = Ok(());
    thread::scope(|scope| {
        let mut handles = Vec::new();
        for (thread_id, &worker_seed) in seeds.iter().enumerate() {
            handles.push(scope.spawn(move || {
                let res = Worker::new(instance, parameters, worker_seed, thread_id, timer, output).run();
                // bring the other workers down before reporting
                if res.is_err() { timer.request_end(); }
                res
            }));
        }
        for handle in handles {
            let res = match handle.join() {
                Ok(worker_result) => worker_result,
                Err(_) => {
                    timer.request_end();
                    Err(ColoringError::Invariant("worker thread panicked".to_string()))
                }
            };
            if result.is_ok() {
                result = res;
            }
        }
    });
    result
}

/// state owned by one local search worker
struct Worker<'a> {
    instance: &'a Arc<Instance>,
    parameters: &'a RowWeightingParameters,
    timer: &'a Arc<Timer>,
    output: &'a Arc<Output>,
    thread_id: usize,
    rng: fastrand::Rng,
    solution: Solution,
    /// persistent per-edge weights (PerEdge mode)
    weights: Vec<Penalty>,
    /// candidate scores indexed by color id (u64 to rule out overflow)
    scores: Vec<u64>,
    /// scratch: colors used in a neighborhood
    neighbor_colors: BitSet,
    /// colors of the current target coloring; unlike the solution's color
    /// set, survives classes emptied by the core reduction
    active_colors: SparseSet,
    /// vertices outside the current k-core, in removal order
    removed_vertices: Vec<VertexId>,
    /// target number of colors
    k: usize,
    /// best feasible color count seen by this worker
    best_nb_colors: usize,
    nb_iterations: Counter,
    nb_iterations_without_improvement: Counter,
    nb_improvements: Counter,
}

impl<'a> Worker<'a> {
    fn new(
        instance: &'a Arc<Instance>,
        parameters: &'a RowWeightingParameters,
        seed: Seed,
        thread_id: usize,
        timer: &'a Arc<Timer>,
        output: &'a Arc<Output>,
    ) -> Self {
        let solution = match &parameters.initial_solution {
            Some(initial) => initial.clone(),
            None => greedy_dsatur(instance),
        };
        let nb_vertices = instance.nb_vertices();
        let mut active_colors = SparseSet::new(nb_vertices);
        for &c in solution.map().values() { active_colors.insert(c); }
        let k = solution.nb_colors();
        let best_nb_colors = if solution.feasible() { k } else { usize::MAX };
        Self {
            instance,
            parameters,
            timer,
            output,
            thread_id,
            rng: fastrand::Rng::with_seed(seed),
            weights: vec![1; instance.nb_edges()],
            scores: vec![0; nb_vertices],
            neighbor_colors: BitSet::with_capacity(nb_vertices),
            active_colors,
            removed_vertices: Vec::new(),
            k,
            best_nb_colors,
            solution,
            nb_iterations: 0,
            nb_iterations_without_improvement: 0,
            nb_improvements: 0,
        }
    }

    fn run(&mut self) -> Result<(), ColoringError> {
        let initial_message = format!("thread {} initial solution", self.thread_id);
        self.output.update_solution(&self.solution, &initial_message, self.timer);
        loop {
            if self.timer.needs_to_end() { break; }
            self.nb_iterations += 1;
            if let Some(maximum) = self.parameters.maximum_nb_iterations {
                if self.nb_iterations > maximum { break; }
            }
            if let Some(maximum) = self.parameters.maximum_nb_iterations_without_improvement {
                if self.nb_iterations_without_improvement > maximum { break; }
            }
            if let Some(maximum) = self.parameters.maximum_nb_improvements {
                if self.nb_improvements >= maximum { break; }
            }
            if let Some(goal) = self.parameters.goal {
                if self.best_nb_colors <= goal { break; }
            }
            if !self.merge_colors()? { break; }
            if !self.repair()? { break; }
            self.nb_iterations_without_improvement += 1;
        }
        Ok(())
    }

    /** feasibility phase: as long as the solution has no conflict, complete
    it on the removed vertices, publish it, then merge the two color classes
    of minimum inter-class weight and shrink to the new k-core.

    Returns false when no merge is possible anymore (the coloring reached a
    single class), which ends the search. */
    fn merge_colors(&mut self) -> Result<bool, ColoringError> {
        while self.solution.nb_conflicts() == 0 {
            self.reinsert_removed_vertices()?;
            self.best_nb_colors = self.best_nb_colors.min(self.solution.nb_colors());
            let message = format!(
                "thread {}, it {} ({})",
                self.thread_id, self.nb_iterations, self.nb_iterations_without_improvement
            );
            if self.output.update_solution(&self.solution, &message, self.timer) {
                self.nb_improvements += 1;
            }
            self.nb_iterations_without_improvement = 0;
            if self.solution.nb_colors() <= 1 { return Ok(false); }

            // positions of the in-use colors, in iteration order
            let colors: Vec<ColorId> = self.solution.map().values().to_vec();
            let nb_colors = colors.len();
            let mut positions = vec![usize::MAX; self.instance.nb_vertices()];
            for (i, &c) in colors.iter().enumerate() { positions[c] = i; }

            // inter-class weights, triangular, saturating
            let mut merge_penalties: Vec<Vec<Penalty>> =
                (0..nb_colors).map(|i| vec![0; nb_colors - i - 1]).collect();
            for (e, &(v1, v2)) in self.instance.edges().iter().enumerate() {
                let c1 = self.solution.color(v1).ok_or_else(|| {
                    ColoringError::Invariant(format!("vertex {} uncolored in the merge phase", v1))
                })?;
                let c2 = self.solution.color(v2).ok_or_else(|| {
                    ColoringError::Invariant(format!("vertex {} uncolored in the merge phase", v2))
                })?;
                if c1 == c2 {
                    return Err(ColoringError::Invariant(format!(
                        "conflicting edge {} in the merge phase", e
                    )));
                }
                let i1 = positions[c1].min(positions[c2]);
                let i2 = positions[c1].max(positions[c2]) - i1 - 1;
                let w = self.weight(e);
                merge_penalties[i1][i2] = merge_penalties[i1][i2].saturating_add(w);
            }

            // best pair: first minimum in lexicographic position order
            let mut best_pair = (0, 1);
            let mut best_weight: Option<Penalty> = None;
            for i1 in 0..nb_colors {
                for i2 in (i1 + 1)..nb_colors {
                    let w = merge_penalties[i1][i2 - i1 - 1];
                    if best_weight.map_or(true, |bw| w < bw) {
                        best_pair = (i1, i2);
                        best_weight = Some(w);
                    }
                }
            }

            // move the higher-position class into the lower-position one
            let c_kept = colors[best_pair.0];
            let c_merged = colors[best_pair.1];
            let members = self.solution.map().elements_of(c_merged).to_vec();
            for v in members { self.solution.set(v, c_kept); }
            self.active_colors.remove(c_merged);
            self.k -= 1;

            if self.parameters.enable_core_reduction {
                self.removed_vertices = self.instance.compute_core(self.k);
                for i in 0..self.removed_vertices.len() {
                    let v = self.removed_vertices[i];
                    self.solution.unset(v);
                }
            }
        }
        Ok(true)
    }

    /** re-colors the vertices outside the k-core, in reverse removal order.
    The k-core construction guarantees a free color; not finding one is a
    bug. */
    fn reinsert_removed_vertices(&mut self) -> Result<(), ColoringError> {
        if self.removed_vertices.is_empty() { return Ok(()); }
        for i in (0..self.removed_vertices.len()).rev() {
            let v = self.removed_vertices[i];
            self.neighbor_colors.clear();
            for neighbor in self.instance.neighbors(v) {
                if let Some(c) = self.solution.color(neighbor.v) {
                    self.neighbor_colors.insert(c);
                }
            }
            let free = self.active_colors.iter()
                .find(|&c| !self.neighbor_colors.contains(c));
            match free {
                None => {
                    return Err(ColoringError::Invariant(format!(
                        "no available color for vertex {}", v
                    )));
                }
                Some(color) => self.solution.set(v, color),
            }
        }
        self.removed_vertices.clear();
        if self.solution.nb_conflicts() != 0 {
            return Err(ColoringError::Invariant(
                "conflicts after re-inserting the removed vertices".to_string(),
            ));
        }
        Ok(())
    }

    /** repair phase: draw a conflicting edge uniformly at random and apply
    the best single-vertex re-coloring among both endpoints and every other
    active color, then increment the weight of every remaining conflict.

    Returns false when no candidate move exists (single active color), which
    ends the search. */
    fn repair(&mut self) -> Result<bool, ColoringError> {
        let nb_conflicts = self.solution.nb_conflicts();
        if nb_conflicts == 0 {
            return Err(ColoringError::Invariant(
                "repair phase with an empty conflict set".to_string(),
            ));
        }
        let e = self.solution.conflict(self.rng.usize(0..nb_conflicts));
        let (v1, v2) = self.instance.edge(e);
        let mut best: Option<(VertexId, ColorId)> = None;
        let mut best_score = u64::MAX;
        for &v in [v1, v2].iter() {
            // in-use colors are a subset of the active ones, so zeroing the
            // active entries covers every score read below
            for c in self.active_colors.iter() { self.scores[c] = 0; }
            for neighbor in self.instance.neighbors(v) {
                if let Some(c) = self.solution.color(neighbor.v) {
                    let w = self.weight(neighbor.e);
                    self.scores[c] += u64::from(w);
                }
            }
            let current_color = self.solution.color(v);
            for c in self.active_colors.iter() {
                if Some(c) == current_color { continue; }
                if best.is_none() || self.scores[c] < best_score {
                    best = Some((v, c));
                    best_score = self.scores[c];
                }
            }
        }
        match best {
            None => Ok(false),
            Some((v, c)) => {
                self.solution.set(v, c);
                self.increment_weights();
                Ok(true)
            }
        }
    }

    /** increments the weight of every edge still in conflict; when any
    weight leaves the safe half-range, halves all of them (weights stay >= 1
    and no pair's ordering is inverted). */
    fn increment_weights(&mut self) {
        let threshold = Penalty::MAX / 2;
        let mut reduce = false;
        match self.parameters.weight_mode {
            WeightMode::PerEdge => {
                for i in 0..self.solution.nb_conflicts() {
                    let e = self.solution.conflict(i);
                    self.weights[e] += 1;
                    if self.weights[e] > threshold { reduce = true; }
                }
                if reduce {
                    for w in self.weights.iter_mut() { *w = (*w - 1) / 2 + 1; }
                }
            }
            WeightMode::PerConflict => {
                for i in 0..self.solution.nb_conflicts() {
                    let e = self.solution.conflict(i);
                    self.solution.increment_penalty(e, 1);
                    if self.solution.penalty(e) > threshold { reduce = true; }
                }
                if reduce {
                    for e in 0..self.instance.nb_edges() {
                        let p = self.solution.penalty(e);
                        self.solution.set_penalty(e, (p - 1) / 2 + 1);
                    }
                }
            }
        }
    }

    /// learned weight of an edge, wherever the mode stores it
    fn weight(&self, e: EdgeId) -> Penalty {
        match self.parameters.weight_mode {
            WeightMode::PerEdge => self.weights[e],
            WeightMode::PerConflict => self.solution.penalty(e),
        }
    }
}
