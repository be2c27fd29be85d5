/// Knobs for a single search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Give up after this many expansions. `None` searches until done.
    pub max_iterations: Option<usize>,
    /// Log a progress line every this many expansions. `0` turns it off.
    pub progress_interval: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: None,
            progress_interval: 1000,
        }
    }
}

impl SolverConfig {
    pub fn with_max_iterations(mut self, limit: usize) -> Self {
        self.max_iterations = Some(limit);
        self
    }

    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }
}
