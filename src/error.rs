use thiserror::Error;

/// Rejected configuration changes.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),

    #[error("invalid value `{value}` for parameter `{key}`: expected {expected}")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("unsupported model `{0}`: only `mincostflow` is available")]
    UnsupportedModel(String),
}

/// Malformed caller input, detected before any solving starts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("support must contain at least one point")]
    EmptyInput,

    #[error("support has {0} distinct points, more than an index can address")]
    TooManyPoints(usize),

    #[error("batch must contain at least one column")]
    EmptyBatch,

    #[error("`{field}` has length {actual}, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("`{field}[{index}]` is negative ({value})")]
    NegativeWeight {
        field: &'static str,
        index: usize,
        value: f64,
    },

    #[error("`{field}[{index}]` is not finite")]
    NonFiniteWeight { field: &'static str, index: usize },

    #[error("`{field}` has zero total mass")]
    ZeroMass { field: &'static str },

    #[error("support has {points} points but {len} weights were given")]
    SupportMismatch { points: usize, len: usize },

    #[error("distributions are defined over different supports")]
    ForeignSupport,
}

#[derive(Debug, Error)]
pub enum KwdError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("total supply {supply} does not match total demand {demand}")]
    Infeasible { supply: f64, demand: f64 },

    #[error("flow network is unbounded")]
    Unbounded,

    #[error("flow network left {residual} units on artificial arcs")]
    Residual { residual: f64 },

    #[error("could not build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Failures while writing instrumentation files.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
