use std::path::PathBuf;

use clap::Parser;

use crate::config::{Algorithm, Config, Method};

#[derive(Parser, Debug)]
#[command(about = "Kantorovich-Wasserstein distances between random spatial histograms")]
pub struct Args {
    /// Coordinates are drawn from [0, n]
    #[arg(short, long, default_value_t = 64)]
    pub n: i32,

    /// Points sampled per histogram, n*n/2 if omitted
    #[arg(short, long)]
    pub samples: Option<usize>,

    /// Seed of the instance generator
    #[arg(long, default_value_t = 13)]
    pub seed: u64,

    /// `exact` or `approx`
    #[arg(short, long, default_value = "approx")]
    pub method: Method,

    /// `simplex` or `colgen`
    #[arg(short, long, default_value = "colgen")]
    pub algorithm: Algorithm,

    /// Truncation radius, repeat to sweep several
    #[arg(short = 'l', long = "radius", default_values_t = [3u32])]
    pub radius: Vec<u32>,

    /// Number of runs to perform with equal parameters
    #[arg(short, long, default_value_t = 1)]
    pub runs: u32,

    /// Maximum running time in seconds
    #[arg(short, long)]
    pub time_limit: Option<f64>,

    /// Weight columns of a batch comparison
    #[arg(short, long, default_value_t = 3)]
    pub columns: usize,

    /// Worker threads for batch comparisons, 0 for one per core
    #[arg(long, default_value_t = 0)]
    pub threads: usize,

    /// Directory for Parquet files with column generation rounds
    #[arg(short, long)]
    pub instrument: Option<PathBuf>,
}

impl Args {
    /// Solver configuration for the chosen options.
    pub fn config(&self) -> Config {
        Config {
            method: self.method,
            algorithm: self.algorithm,
            time_limit: self
                .time_limit
                .and_then(|t| std::time::Duration::try_from_secs_f64(t).ok()),
            threads: self.threads,
            ..Config::default()
        }
    }

    pub fn samples(&self) -> usize {
        self.samples.unwrap_or_else(|| (self.n.max(0) as usize).pow(2) / 2)
    }
}
