mod dsu;
pub mod matrix;
mod io;
pub mod random;

pub use dsu::DisjointSets;
pub use matrix::{Matrix2, WeightMatrix};

pub use io::Args;
pub use clap::Parser;
