use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::types::Cost;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Method {
    /// Complete bipartite network between supply and demand points.
    #[default]
    Exact,
    /// Transshipment network truncated to the window of radius `L`.
    Approx,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Model {
    #[default]
    MinCostFlow,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Network simplex over the fully materialized arc set.
    #[default]
    Simplex,
    /// Network simplex over a restricted arc set grown by pricing.
    ColGen,
}

/// Ground distance between two grid cells.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum GroundMetric {
    #[default]
    Euclidean,
    Manhattan,
    Chebyshev,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verbosity {
    Silent,
    #[default]
    Info,
    Debug,
}

impl GroundMetric {
    /// Cost of moving one unit of mass by `(dx, dy)`.
    #[inline(always)]
    pub fn cost(self, dx: i64, dy: i64) -> Cost {
        let (dx, dy) = (dx.abs(), dy.abs());
        match self {
            GroundMetric::Euclidean => (dx as f64).hypot(dy as f64),
            GroundMetric::Manhattan => dx as f64 + dy as f64,
            GroundMetric::Chebyshev => dx.max(dy) as f64,
        }
    }
}

/// Case-insensitive lookup of `value` in a table of spellings.
fn parse_named<T: Copy>(
    key: &'static str,
    value: &str,
    table: &[(&str, T)],
    expected: &'static str,
) -> Result<T, ConfigError> {
    let needle = value.trim();
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(needle))
        .map(|&(_, v)| v)
        .ok_or_else(|| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            expected,
        })
}

impl FromStr for Method {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named(
            "Method",
            s,
            &[("exact", Method::Exact), ("approx", Method::Approx)],
            "`exact` or `approx`",
        )
    }
}

impl FromStr for Model {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("mincostflow") {
            Ok(Model::MinCostFlow)
        } else {
            Err(ConfigError::UnsupportedModel(s.to_string()))
        }
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named(
            "Algorithm",
            s,
            &[("simplex", Algorithm::Simplex), ("colgen", Algorithm::ColGen)],
            "`simplex` or `colgen`",
        )
    }
}

impl FromStr for GroundMetric {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named(
            "Metric",
            s,
            &[
                ("euclidean", GroundMetric::Euclidean),
                ("manhattan", GroundMetric::Manhattan),
                ("chebyshev", GroundMetric::Chebyshev),
            ],
            "`euclidean`, `manhattan` or `chebyshev`",
        )
    }
}

impl FromStr for Verbosity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named(
            "Verbosity",
            s,
            &[
                ("silent", Verbosity::Silent),
                ("info", Verbosity::Info),
                ("debug", Verbosity::Debug),
            ],
            "`silent`, `info` or `debug`",
        )
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Exact => "exact",
            Method::Approx => "approx",
        })
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("mincostflow")
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Algorithm::Simplex => "simplex",
            Algorithm::ColGen => "colgen",
        })
    }
}

impl fmt::Display for GroundMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GroundMetric::Euclidean => "euclidean",
            GroundMetric::Manhattan => "manhattan",
            GroundMetric::Chebyshev => "chebyshev",
        })
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verbosity::Silent => "silent",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
        })
    }
}

/// Names accepted by `Config::set` and `Config::get`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Param {
    Method,
    Model,
    Algorithm,
    Radius,
    OptTolerance,
    TimeLimit,
    MaxIterations,
    ColgenBatch,
    Normalize,
    Metric,
    Verbosity,
    Threads,
}

impl Param {
    pub const ALL: [Param; 12] = [
        Param::Method,
        Param::Model,
        Param::Algorithm,
        Param::Radius,
        Param::OptTolerance,
        Param::TimeLimit,
        Param::MaxIterations,
        Param::ColgenBatch,
        Param::Normalize,
        Param::Metric,
        Param::Verbosity,
        Param::Threads,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Param::Method => "Method",
            Param::Model => "Model",
            Param::Algorithm => "Algorithm",
            Param::Radius => "L",
            Param::OptTolerance => "OptTolerance",
            Param::TimeLimit => "TimeLimit",
            Param::MaxIterations => "MaxIterations",
            Param::ColgenBatch => "ColgenBatch",
            Param::Normalize => "Normalize",
            Param::Metric => "Metric",
            Param::Verbosity => "Verbosity",
            Param::Threads => "Threads",
        }
    }
}

impl FromStr for Param {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        if key.eq_ignore_ascii_case("radius") {
            return Ok(Param::Radius);
        }
        Param::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(key))
            .ok_or_else(|| ConfigError::UnknownParameter(s.to_string()))
    }
}

/// Solver options. Read-only while a solve is running.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub method: Method,
    pub model: Model,
    pub algorithm: Algorithm,
    /// Truncation radius for `Method::Approx`.
    pub radius: u32,
    /// Relative pricing tolerance, scaled by the largest arc cost.
    pub opt_tolerance: f64,
    pub time_limit: Option<Duration>,
    /// Cap on column generation rounds.
    pub max_iterations: Option<usize>,
    /// Cap on arcs admitted per round, 0 for none.
    pub colgen_batch: usize,
    pub normalize: bool,
    pub metric: GroundMetric,
    pub verbosity: Verbosity,
    /// Worker threads for batch solves, 0 for the rayon default.
    pub threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            method: Method::Exact,
            model: Model::MinCostFlow,
            algorithm: Algorithm::Simplex,
            radius: 3,
            opt_tolerance: 1e-9,
            time_limit: None,
            max_iterations: None,
            colgen_batch: 0,
            normalize: true,
            metric: GroundMetric::Euclidean,
            verbosity: Verbosity::Info,
            threads: 0,
        }
    }
}

fn invalid(param: Param, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        key: param.name(),
        value: value.to_string(),
        expected,
    }
}

fn is_unbounded(value: &str) -> bool {
    let v = value.trim();
    v.eq_ignore_ascii_case("inf") || v.eq_ignore_ascii_case("none")
}

fn parse_positive_int(param: Param, value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(invalid(param, value, "a positive integer")),
    }
}

fn parse_count(param: Param, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| invalid(param, value, "a non-negative integer"))
}

fn parse_positive_float(param: Param, value: &str) -> Result<f64, ConfigError> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(invalid(param, value, "a positive finite number")),
    }
}

impl Config {
    /// Sets a parameter from its string form.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let param: Param = name.parse()?;
        match param {
            Param::Method => self.method = value.parse()?,
            Param::Model => self.model = value.parse()?,
            Param::Algorithm => self.algorithm = value.parse()?,
            Param::Radius => {
                self.radius = u32::try_from(parse_positive_int(param, value)?)
                    .map_err(|_| invalid(param, value, "a positive 32-bit integer"))?;
            }
            Param::OptTolerance => self.opt_tolerance = parse_positive_float(param, value)?,
            Param::TimeLimit => {
                self.time_limit = if is_unbounded(value) {
                    None
                } else {
                    let secs = parse_positive_float(param, value)?;
                    Some(
                        Duration::try_from_secs_f64(secs)
                            .map_err(|_| invalid(param, value, "a representable duration"))?,
                    )
                };
            }
            Param::MaxIterations => {
                self.max_iterations = if is_unbounded(value) {
                    None
                } else {
                    Some(parse_positive_int(param, value)?)
                };
            }
            Param::ColgenBatch => self.colgen_batch = parse_count(param, value)?,
            Param::Normalize => {
                self.normalize = match value.trim().to_ascii_lowercase().as_str() {
                    "true" | "1" | "yes" => true,
                    "false" | "0" | "no" => false,
                    _ => return Err(invalid(param, value, "`true` or `false`")),
                };
            }
            Param::Metric => self.metric = value.parse()?,
            Param::Verbosity => self.verbosity = value.parse()?,
            Param::Threads => self.threads = parse_count(param, value)?,
        }
        Ok(())
    }

    /// Returns the current value of a parameter in the form `set` accepts.
    pub fn get(&self, name: &str) -> Result<String, ConfigError> {
        let param: Param = name.parse()?;
        Ok(match param {
            Param::Method => self.method.to_string(),
            Param::Model => self.model.to_string(),
            Param::Algorithm => self.algorithm.to_string(),
            Param::Radius => self.radius.to_string(),
            Param::OptTolerance => self.opt_tolerance.to_string(),
            Param::TimeLimit => match self.time_limit {
                Some(limit) => limit.as_secs_f64().to_string(),
                None => "inf".to_string(),
            },
            Param::MaxIterations => match self.max_iterations {
                Some(max) => max.to_string(),
                None => "inf".to_string(),
            },
            Param::ColgenBatch => self.colgen_batch.to_string(),
            Param::Normalize => self.normalize.to_string(),
            Param::Metric => self.metric.to_string(),
            Param::Verbosity => self.verbosity.to_string(),
            Param::Threads => self.threads.to_string(),
        })
    }

    /// Checks the typed fields, which may have been set without going through `set`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.method == Method::Approx && self.radius == 0 {
            return Err(invalid(Param::Radius, "0", "a positive integer"));
        }
        if !(self.opt_tolerance.is_finite() && self.opt_tolerance > 0.0) {
            return Err(invalid(
                Param::OptTolerance,
                &self.opt_tolerance.to_string(),
                "a positive finite number",
            ));
        }
        if self.time_limit.is_some_and(|t| t.is_zero()) {
            return Err(invalid(Param::TimeLimit, "0", "a positive number of seconds"));
        }
        if self.max_iterations == Some(0) {
            return Err(invalid(Param::MaxIterations, "0", "a positive integer"));
        }
        Ok(())
    }

    pub(crate) fn logs_info(&self) -> bool {
        self.verbosity >= Verbosity::Info
    }

    pub(crate) fn logs_debug(&self) -> bool {
        self.verbosity >= Verbosity::Debug
    }
}
