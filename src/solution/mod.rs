mod solution;

pub use solution::{Solution, Termination};
