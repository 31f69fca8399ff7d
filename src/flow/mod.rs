pub mod batch;
pub mod colgen;
pub mod network;
pub mod pricing;
pub mod progress;
pub mod simplex;
mod solve;

pub use batch::BatchDriver;
pub use solve::{Outcome, solve_column};

pub(crate) use solve::feasibility_tolerance;

#[cfg(test)]
mod tests;
