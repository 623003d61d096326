//! Command-line interface of the solver.

// useful additional warnings if docs are missing, or crates imported but unused, etc.
#![warn(missing_debug_implementations)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unsafe_code)]
#![warn(unused_extern_crates)]

use std::sync::Arc;

use clap::{load_yaml, App, ArgMatches};

use rw_color::error::ColoringError;
use rw_color::formats;
use rw_color::output::Output;
use rw_color::search::greedy::greedy;
use rw_color::search::greedy_dsatur::greedy_dsatur;
use rw_color::search::row_weighting::{
    local_search_row_weighting, RowWeightingParameters, WeightMode,
};
use rw_color::solution::Solution;
use rw_color::timer::Timer;
use rw_color::util::{init_display, read_params};

/**
reads an instance, runs the algorithm given on the command line and reports
the best coloring found (0: success, 1: argument or runtime error)
*/
pub fn main() {
    let yaml = load_yaml!("main_args.yml");
    let matches = App::from_yaml(yaml).get_matches();
    if let Err(e) = run(&matches) {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), ColoringError> {
    let params = read_params(matches)?;
    let mut graph = formats::read_instance(&params.instance_path, &params.format)?;
    let local_search = params.algorithm.starts_with("local-search-row-weighting");
    if local_search {
        // keeps the k-core reinsertion guarantee sound
        graph.remove_duplicate_edges();
    }
    let instance = Arc::new(graph);
    let timer = Arc::new(Timer::new(params.time_limit));
    let output = Arc::new(Output::new(instance.clone(), params.output_options.clone())?);
    init_display(&instance, &output);
    output.display_headers();
    let initial_solution = match &params.initial_solution_path {
        None => None,
        Some(path) => Some(Solution::from_certificate(instance.clone(), path)?),
    };
    match params.algorithm.as_str() {
        "greedy" => {
            let solution = greedy(&instance, params.ordering, params.reverse);
            output.update_solution(&solution, "greedy", &timer);
        }
        "greedy-dsatur" | "dsatur" => {
            let solution = greedy_dsatur(&instance);
            output.update_solution(&solution, "greedy-dsatur", &timer);
        }
        "local-search-row-weighting" | "local-search-row-weighting-2" => {
            let weight_mode = if params.algorithm.ends_with("-2") {
                WeightMode::PerConflict
            } else {
                WeightMode::PerEdge
            };
            let parameters = RowWeightingParameters {
                nb_threads: params.nb_threads,
                maximum_nb_iterations: params.maximum_nb_iterations,
                maximum_nb_iterations_without_improvement:
                    params.maximum_nb_iterations_without_improvement,
                maximum_nb_improvements: params.maximum_nb_improvements,
                goal: params.goal,
                enable_core_reduction: true,
                initial_solution,
                weight_mode,
            };
            local_search_row_weighting(&instance, &parameters, params.seed, &timer, &output)?;
        }
        "column-generation-greedy"
        | "column-generation-limited-discrepancy-search"
        | "milp-assignment"
        | "milp-representatives"
        | "milp-partial-ordering" => {
            return Err(ColoringError::BackendUnavailable(params.algorithm.clone()));
        }
        _ => return Err(ColoringError::UnknownAlgorithm(params.algorithm.clone())),
    }
    output.finalize(&timer)
}
