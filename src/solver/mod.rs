use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::{ConfigError, InputError, KwdError};
use crate::flow::{BatchDriver, solve_column};
use crate::graph::TransportGraph;
use crate::metrics::IterationRecord;
use crate::problem::{Distribution, Support, check_len, check_weights};
use crate::solution::Solution;
use crate::types::*;
use crate::utils::WeightMatrix;

/// Entry point: configure with `set_param`, then call `compare` or `compare_batch`.
///
/// Every call validates its inputs, builds the transport graph, solves, and
/// records the runtime of the solve phase.
#[derive(Default)]
pub struct Solver {
    config: Config,
    runtime: Duration,
    solutions: Vec<Solution>,
    instrument: bool,
    iteration_data: Vec<IterationRecord>,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Solver {
            config,
            ..Self::default()
        }
    }

    pub fn set_param(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        self.config.set(name, value)
    }

    pub fn get_param(&self, name: &str) -> Result<String, ConfigError> {
        self.config.get(name)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Keep per-round column generation records of the following calls.
    pub fn set_instrumentation(&mut self, enabled: bool) {
        self.instrument = enabled;
    }

    /// Records of the last call, if instrumentation is on.
    pub fn iteration_records(&self) -> &[IterationRecord] {
        &self.iteration_data
    }

    /// Seconds spent in the solve phase of the last call.
    pub fn runtime(&self) -> f64 {
        self.runtime.as_secs_f64()
    }

    /// Solutions of the last call, one per compared pair.
    pub fn last_solutions(&self) -> &[Solution] {
        &self.solutions
    }

    /// Distance between `a` and `b`, given on the same `n` input coordinates.
    /// `l` is the truncation radius used when the method is `Approx`.
    pub fn compare(
        &mut self,
        n: usize,
        x: &[Coord],
        y: &[Coord],
        a: &[Mass],
        b: &[Mass],
        l: u32,
    ) -> Result<f64, KwdError> {
        self.reset();
        check_len("X", n, x.len())?;
        check_len("Y", n, y.len())?;
        check_len("A", n, a.len())?;
        check_len("B", n, b.len())?;
        if n == 0 {
            return Err(InputError::EmptyInput.into());
        }

        let support = Support::new(x, y)?;
        let first = Distribution::named("A", &support, a)?;
        let second = Distribution::named("B", &support, b)?;

        let config = self.effective_config(l);
        let solution = self.solve_pair(&config, &first, &second)?;
        Ok(solution.distance)
    }

    /// Distances between `a` and each of the `m` columns of the row-major
    /// `n`×`m` matrix `w`, in column order.
    #[allow(clippy::too_many_arguments)]
    pub fn compare_batch(
        &mut self,
        n: usize,
        m: usize,
        x: &[Coord],
        y: &[Coord],
        a: &[Mass],
        w: &[Mass],
        l: u32,
    ) -> Result<Vec<f64>, KwdError> {
        self.reset();
        check_len("X", n, x.len())?;
        check_len("Y", n, y.len())?;
        check_len("A", n, a.len())?;
        if n == 0 {
            return Err(InputError::EmptyInput.into());
        }
        if m == 0 {
            return Err(InputError::EmptyBatch.into());
        }
        let expected = n.saturating_mul(m);
        check_len("W", expected, w.len())?;
        check_weights("W", w)?;

        let weights = WeightMatrix::from_vec(n, m, w.to_vec()).ok_or(InputError::LengthMismatch {
            field: "W",
            expected,
            actual: w.len(),
        })?;
        for j in 0..m {
            if weights.column(j).sum::<Mass>() <= 0.0 {
                return Err(InputError::ZeroMass { field: "W" }.into());
            }
        }

        let support = Support::new(x, y)?;
        let base = Distribution::named("A", &support, a)?;

        let config = self.effective_config(l);
        let solutions = self.solve_batch(&config, &base, &weights)?;
        Ok(solutions.iter().map(|s| s.distance).collect())
    }

    /// Typed counterpart of `compare`, using the configured radius.
    pub fn distance(
        &mut self,
        a: &Distribution<'_>,
        b: &Distribution<'_>,
    ) -> Result<Solution, KwdError> {
        self.reset();
        let config = self.config.clone();
        self.solve_pair(&config, a, b)
    }

    /// Typed counterpart of `compare_batch`; `weights` has one row per input coordinate.
    pub fn distance_batch(
        &mut self,
        base: &Distribution<'_>,
        weights: &WeightMatrix,
    ) -> Result<Vec<Solution>, KwdError> {
        self.reset();
        check_len("W", base.support().input_len(), weights.rows)?;
        if weights.cols == 0 {
            return Err(InputError::EmptyBatch.into());
        }
        check_weights("W", &weights.data)?;
        let config = self.config.clone();
        self.solve_batch(&config, base, weights)
    }

    fn effective_config(&self, radius: u32) -> Config {
        Config {
            radius,
            ..self.config.clone()
        }
    }

    fn solve_pair(
        &mut self,
        config: &Config,
        a: &Distribution<'_>,
        b: &Distribution<'_>,
    ) -> Result<Solution, KwdError> {
        config.validate()?;
        let balance = a.balance(b, config.normalize)?;

        let start = Instant::now();
        let graph = TransportGraph::build(a.support(), config);
        let mut records = Vec::new();
        let solution = solve_column(
            &graph,
            balance,
            config,
            0,
            self.instrument.then_some(&mut records),
        );
        self.runtime = start.elapsed();

        let solution = solution?;
        self.solutions.push(solution.clone());
        self.iteration_data = records;
        Ok(solution)
    }

    fn solve_batch(
        &mut self,
        config: &Config,
        base: &Distribution<'_>,
        weights: &WeightMatrix,
    ) -> Result<Vec<Solution>, KwdError> {
        config.validate()?;

        let start = Instant::now();
        let graph = TransportGraph::build(base.support(), config);
        let mut records = Vec::new();
        let solutions = BatchDriver::new(&graph, config).run(
            base,
            weights,
            self.instrument.then_some(&mut records),
        );
        self.runtime = start.elapsed();

        let solutions = solutions?;
        self.solutions = solutions.clone();
        self.iteration_data = records;
        Ok(solutions)
    }

    /// Forget the results of the previous call, so a failed call leaves none behind.
    fn reset(&mut self) {
        self.runtime = Duration::ZERO;
        self.solutions.clear();
        self.iteration_data.clear();
    }
}
