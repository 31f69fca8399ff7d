//! Kantorovich-Wasserstein distances between mass distributions on 2D integer grids.
//!
//! Distances are computed as min-cost flows, either on the complete bipartite
//! network between surplus and deficit points or on a transshipment network
//! truncated to a window of radius `L`, with a network simplex optionally
//! driven by column generation.

pub mod config;
pub mod error;
pub mod flow;
pub mod graph;
pub mod metrics;
pub mod problem;
pub mod solution;
pub mod solver;
pub mod types;
pub mod utils;

pub use config::{Algorithm, Config, GroundMetric, Method, Model, Verbosity};
pub use error::{ConfigError, InputError, KwdError};
pub use problem::{Distribution, Support};
pub use solution::{Solution, Termination};
pub use solver::Solver;
pub use utils::WeightMatrix;
