use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/** cooperative stopping criterion shared by the search workers.

Workers poll `needs_to_end` at the start of every iteration; the flag flips
when the optional time limit expires or when `request_end` is called (the
hook an embedding program wires to its interruption signal). Workers finish
their current iteration and join. */
#[derive(Debug)]
pub struct Timer {
    /// start of the run
    start: Instant,
    /// time limit in seconds, if any
    time_limit: Option<f64>,
    /// cooperative termination flag
    end_requested: AtomicBool,
}

impl Timer {
    /// creates a timer, started now
    pub fn new(time_limit: Option<f64>) -> Self {
        Self {
            start: Instant::now(),
            time_limit,
            end_requested: AtomicBool::new(false),
        }
    }

    /// elapsed time since the start of the run, in seconds
    pub fn elapsed(&self) -> f64 { self.start.elapsed().as_secs_f64() }

    /// asks every worker to stop at the end of its current iteration
    pub fn request_end(&self) { self.end_requested.store(true, Ordering::Relaxed); }

    /// true iff the workers should stop
    pub fn needs_to_end(&self) -> bool {
        self.end_requested.load(Ordering::Relaxed)
            || self.time_limit.map_or(false, |limit| self.elapsed() >= limit)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_limit() {
        let timer = Timer::new(None);
        assert!(!timer.needs_to_end());
        assert!(timer.elapsed() >= 0.);
    }

    #[test]
    fn test_request_end() {
        let timer = Timer::new(Some(3600.));
        assert!(!timer.needs_to_end());
        timer.request_end();
        assert!(timer.needs_to_end());
    }

    #[test]
    fn test_expired_limit() {
        let timer = Timer::new(Some(0.));
        assert!(timer.needs_to_end());
    }
}
