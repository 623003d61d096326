use std::fmt;
use std::fs::File;
use std::io::Write as _;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::json;

use crate::error::ColoringError;
use crate::instance::Instance;
use crate::solution::Solution;
use crate::timer::Timer;

/// callback invoked under the lock whenever a better solution is accepted
pub type NewSolutionCallback = Box<dyn Fn(&Solution, &str) + Send + Sync>;

/// recorded solution or bound update
#[derive(Debug, Clone, Serialize)]
pub struct UpdateEvent {
    /// number of colors (solution) or bound value
    #[serde(rename = "Value")]
    pub value: usize,
    /// elapsed time of the update, in seconds
    #[serde(rename = "Time")]
    pub time: f64,
    /// annotation (which worker, which iteration, ...)
    #[serde(rename = "String")]
    pub message: String,
}

/// reporting options of a run
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    /// 0: silent; >= 1: metric rows and the final summary on stdout
    pub verbosity_level: u32,
    /// also append every row to this file
    pub log_path: Option<String>,
    /// also write every row to stderr
    pub log_to_stderr: bool,
    /// postpone certificate/JSON writes to the end of the run
    pub only_write_at_the_end: bool,
    /// certificate (coloring) file
    pub certificate_path: Option<String>,
    /// JSON result file
    pub json_path: Option<String>,
}

/// log sink shared by the workers; every row is written in a single call
struct Logger {
    verbosity_level: u32,
    log_to_stderr: bool,
    log_file: Option<Mutex<File>>,
}

impl Logger {
    fn new(options: &OutputOptions) -> Result<Self, ColoringError> {
        let log_file = match &options.log_path {
            None => None,
            Some(path) => Some(Mutex::new(
                File::create(path).map_err(|source| ColoringError::io(path, source))?,
            )),
        };
        Ok(Self {
            verbosity_level: options.verbosity_level,
            log_to_stderr: options.log_to_stderr,
            log_file,
        })
    }

    fn line(&self, message: &str) {
        if self.verbosity_level >= 1 {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            let _ = writeln!(handle, "{}", message);
        }
        if self.log_to_stderr {
            let stderr = std::io::stderr();
            let mut handle = stderr.lock();
            let _ = writeln!(handle, "{}", message);
        }
        if let Some(file) = &self.log_file {
            if let Ok(mut handle) = file.lock() {
                let _ = writeln!(handle, "{}", message);
            }
        }
    }
}

/// mutex-guarded part of the output
struct State {
    best_solution: Option<Solution>,
    lower_bound: usize,
    solutions: Vec<UpdateEvent>,
    bounds: Vec<UpdateEvent>,
}

/** best-so-far upper and lower bounds of a run.

Workers publish through `update_solution` / `update_lower_bound`; both are
serialized by a single mutex, keep the number of colors non-increasing and
the lower bound non-decreasing, log one row per accepted update and invoke
the user callback. Workers never observe each other's intermediate states. */
pub struct Output {
    /// instance being solved
    instance: Arc<Instance>,
    /// reporting options
    options: OutputOptions,
    /// log sink
    logger: Logger,
    /// guarded best solution, lower bound and update events
    state: Mutex<State>,
    /// user callback, invoked under the lock on every accepted solution
    new_solution_callback: Option<NewSolutionCallback>,
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("instance", &self.instance.name())
            .field("options", &self.options)
            .finish()
    }
}

impl Output {
    /// creates the output record of a run
    pub fn new(instance: Arc<Instance>, options: OutputOptions) -> Result<Self, ColoringError> {
        let logger = Logger::new(&options)?;
        Ok(Self {
            instance,
            options,
            logger,
            state: Mutex::new(State {
                best_solution: None,
                lower_bound: 0,
                solutions: Vec::new(),
                bounds: Vec::new(),
            }),
            new_solution_callback: None,
        })
    }

    /// registers the callback invoked on every accepted solution
    pub fn set_new_solution_callback(&mut self, callback: NewSolutionCallback) {
        self.new_solution_callback = Some(callback);
    }

    /// writes a line to the log sinks
    pub fn log(&self, message: &str) { self.logger.line(message); }

    /// writes the metric column headers
    pub fn display_headers(&self) {
        self.logger.line(&format!(
            "{:<12}{:<12}{:<12}{:<12}{:<12}",
            "T (s)", "UB", "LB", "GAP", "GAP (%)"
        ));
    }

    /// number of colors of the best solution, if any
    pub fn best_nb_colors(&self) -> Option<usize> {
        self.state.lock().unwrap().best_solution.as_ref().map(|s| s.nb_colors())
    }

    /// copy of the best solution, if any
    pub fn best_solution(&self) -> Option<Solution> {
        self.state.lock().unwrap().best_solution.clone()
    }

    /// current lower bound
    pub fn lower_bound(&self) -> usize {
        self.state.lock().unwrap().lower_bound
    }

    /** publishes a candidate solution; accepted iff feasible and strictly
    better than the current best. Returns whether it was accepted. */
    pub fn update_solution(&self, solution: &Solution, message: &str, timer: &Timer) -> bool {
        if !solution.feasible() { return false; }
        let mut state = self.state.lock().unwrap();
        if let Some(best) = &state.best_solution {
            if best.nb_colors() <= solution.nb_colors() { return false; }
        }
        let time = timer.elapsed();
        state.best_solution = Some(solution.clone());
        state.solutions.push(UpdateEvent {
            value: solution.nb_colors(),
            time,
            message: message.to_string(),
        });
        self.row(solution.nb_colors(), state.lower_bound, time, message);
        if let Some(callback) = &self.new_solution_callback {
            callback(solution, message);
        }
        if !self.options.only_write_at_the_end {
            if let Err(e) = self.write_files(&state, time) {
                self.logger.line(&format!("WARNING: {}", e));
            }
        }
        true
    }

    /** publishes a lower bound; accepted iff strictly larger than the
    current one. Returns whether it was accepted. */
    pub fn update_lower_bound(&self, lower_bound: usize, message: &str, timer: &Timer) -> bool {
        let mut state = self.state.lock().unwrap();
        if lower_bound <= state.lower_bound { return false; }
        let time = timer.elapsed();
        state.lower_bound = lower_bound;
        state.bounds.push(UpdateEvent {
            value: lower_bound,
            time,
            message: message.to_string(),
        });
        self.row(self.upper_bound(&state), lower_bound, time, message);
        if !self.options.only_write_at_the_end {
            if let Err(e) = self.write_files(&state, time) {
                self.logger.line(&format!("WARNING: {}", e));
            }
        }
        true
    }

    /// prints the final summary and writes the result files
    pub fn finalize(&self, timer: &Timer) -> Result<(), ColoringError> {
        let state = self.state.lock().unwrap();
        let time = timer.elapsed();
        let ub = self.upper_bound(&state);
        let lb = state.lower_bound;
        self.logger.line("---");
        self.logger.line(&format!("Value: {}", ub));
        self.logger.line(&format!("Bound: {}", lb));
        self.logger.line(&format!("Gap: {}", ub as i64 - lb as i64));
        self.logger.line(&format!("Gap (%): {:.2}", gap_percentage(ub, lb)));
        self.logger.line(&format!("Time (s): {:.4}", time));
        self.write_files(&state, time)
    }

    /// best feasible color count, or the trivial max_degree + 1 bound
    fn upper_bound(&self, state: &State) -> usize {
        state.best_solution.as_ref()
            .map_or(self.instance.max_degree() + 1, |s| s.nb_colors())
    }

    /// logs one metric row
    fn row(&self, ub: usize, lb: usize, time: f64, message: &str) {
        self.logger.line(&format!(
            "{:<12.4}{:<12}{:<12}{:<12}{:<12.2}{}",
            time, ub, lb, ub as i64 - lb as i64, gap_percentage(ub, lb), message
        ));
    }

    /// writes the certificate and JSON result files, when configured
    fn write_files(&self, state: &State, time: f64) -> Result<(), ColoringError> {
        if let Some(path) = &self.options.certificate_path {
            if let Some(best) = &state.best_solution {
                best.write(path)?;
            }
        }
        if let Some(path) = &self.options.json_path {
            let value = self.json_value(state, time);
            let content = serde_json::to_string_pretty(&value).map_err(|e| {
                ColoringError::io(path, std::io::Error::new(std::io::ErrorKind::Other, e))
            })?;
            std::fs::write(path, content)
                .map_err(|source| ColoringError::io(path, source))?;
        }
        Ok(())
    }

    /// builds the JSON result object
    fn json_value(&self, state: &State, time: f64) -> serde_json::Value {
        json!({
            "NumberOfColors": self.upper_bound(state),
            "NumberOfVertices": self.instance.nb_vertices(),
            "NumberOfConflicts": state.best_solution.as_ref().map(|s| s.nb_conflicts()),
            "Feasible": state.best_solution.is_some(),
            "Bound": state.lower_bound,
            "Time": time,
            "Solutions": &state.solutions,
            "Bounds": &state.bounds,
        })
    }
}

/// relative gap, infinite while no lower bound is known
fn gap_percentage(ub: usize, lb: usize) -> f64 {
    if lb == 0 { return f64::INFINITY; }
    (ub as f64 - lb as f64) / lb as f64 * 100.
}
