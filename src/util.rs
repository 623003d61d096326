use std::str::FromStr;

use clap::ArgMatches;

use crate::color::{Counter, Seed};
use crate::error::ColoringError;
use crate::instance::Instance;
use crate::output::{Output, OutputOptions};
use crate::search::greedy::Ordering;

/// run configuration read from the command line
#[derive(Debug, Clone)]
pub struct RunParams {
    /// algorithm name
    pub algorithm: String,
    /// instance file
    pub instance_path: String,
    /// instance format name
    pub format: String,
    /// warm-start certificate, if any
    pub initial_solution_path: Option<String>,
    /// time limit in seconds, if any
    pub time_limit: Option<f64>,
    /// master random seed
    pub seed: Seed,
    /// number of local search workers
    pub nb_threads: usize,
    /// vertex ordering of the greedy
    pub ordering: Ordering,
    /// reverse the greedy ordering
    pub reverse: bool,
    /// local search iteration budget
    pub maximum_nb_iterations: Option<Counter>,
    /// local search budget without improvement
    pub maximum_nb_iterations_without_improvement: Option<Counter>,
    /// local search improvement budget
    pub maximum_nb_improvements: Option<Counter>,
    /// stop as soon as this color count is reached
    pub goal: Option<usize>,
    /// reporting options
    pub output_options: OutputOptions,
}

/// reads the command-line matches into a typed run configuration
pub fn read_params(matches: &ArgMatches) -> Result<RunParams, ColoringError> {
    Ok(RunParams {
        algorithm: required(matches, "algorithm")?,
        instance_path: required(matches, "input")?,
        format: matches.value_of("format").unwrap_or("dimacs").to_string(),
        initial_solution_path: matches.value_of("initial-solution").map(str::to_string),
        time_limit: parse_value::<f64>(matches, "time-limit")?,
        seed: parse_value::<Seed>(matches, "seed")?.unwrap_or(0),
        nb_threads: parse_value::<usize>(matches, "number-of-threads")?.unwrap_or(3),
        ordering: parse_value::<Ordering>(matches, "ordering")?.unwrap_or(Ordering::Default),
        reverse: parse_value::<bool>(matches, "reverse")?.unwrap_or(false),
        maximum_nb_iterations: parse_value::<Counter>(matches, "maximum-number-of-iterations")?,
        maximum_nb_iterations_without_improvement:
            parse_value::<Counter>(matches, "maximum-number-of-iterations-without-improvement")?,
        maximum_nb_improvements: parse_value::<Counter>(matches, "maximum-number-of-improvements")?,
        goal: parse_value::<usize>(matches, "goal")?,
        output_options: OutputOptions {
            verbosity_level: parse_value::<u32>(matches, "verbosity-level")?.unwrap_or(1),
            log_path: matches.value_of("log").map(str::to_string),
            log_to_stderr: matches.is_present("log-to-stderr"),
            only_write_at_the_end: matches.is_present("only-write-at-the-end"),
            certificate_path: matches.value_of("certificate").map(str::to_string),
            json_path: matches.value_of("output").map(str::to_string),
        },
    })
}

/// displays the instance banner
pub fn init_display(instance: &Instance, output: &Output) {
    let n = instance.nb_vertices();
    let m = instance.nb_edges();
    let density = if n >= 2 { 2. * m as f64 / (n as f64 * (n as f64 - 1.)) } else { 0. };
    let average_degree = if n >= 1 { 2. * m as f64 / n as f64 } else { 0. };
    output.log("=====================================");
    output.log("           Coloring Solver           ");
    output.log("=====================================");
    output.log("");
    output.log(&format!("Instance:            {}", instance.name()));
    output.log(&format!("Number of vertices:  {}", n));
    output.log(&format!("Number of edges:     {}", m));
    output.log(&format!("Density:             {:.4}", density));
    output.log(&format!("Average degree:      {:.2}", average_degree));
    output.log(&format!("Maximum degree:      {}", instance.max_degree()));
    output.log("");
}

/// value of a required option
fn required(matches: &ArgMatches, option: &str) -> Result<String, ColoringError> {
    matches.value_of(option).map(str::to_string).ok_or_else(|| {
        ColoringError::InvalidParameter {
            option: option.to_string(),
            message: "missing required value".to_string(),
        }
    })
}

/// parses an optional typed command-line value
fn parse_value<T: FromStr>(matches: &ArgMatches, option: &str) -> Result<Option<T>, ColoringError>
where
    T::Err: std::fmt::Display,
{
    match matches.value_of(option) {
        None => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(|e| {
            ColoringError::InvalidParameter {
                option: option.to_string(),
                message: e.to_string(),
            }
        }),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use clap::{App, Arg};

    fn matches_for(args: Vec<&str>) -> ArgMatches<'static> {
        App::new("test")
            .arg(Arg::with_name("seed").long("seed").takes_value(true))
            .arg(Arg::with_name("ordering").long("ordering").takes_value(true))
            .get_matches_from(args)
    }

    #[test]
    fn test_parse_value() {
        let matches = matches_for(vec!["test", "--seed", "42"]);
        assert_eq!(parse_value::<Seed>(&matches, "seed").unwrap(), Some(42));
        assert_eq!(parse_value::<Seed>(&matches, "ordering").unwrap(), None);
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        let matches = matches_for(vec!["test", "--seed", "not-a-number"]);
        assert!(parse_value::<Seed>(&matches, "seed").is_err());
    }

    #[test]
    fn test_parse_ordering_value() {
        let matches = matches_for(vec!["test", "--ordering", "smallestlast"]);
        assert_eq!(parse_value::<Ordering>(&matches, "ordering").unwrap(),
            Some(Ordering::SmallestLast));
    }
}
