use std::fmt;
use std::time::Duration;

use crate::types::Cost;

/// Why a solve stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Termination {
    /// No arc of the network can improve the plan.
    Converged,
    /// The time limit ran out; the distance is an upper bound.
    TimeLimit,
    /// The column generation round cap was reached; the distance is an upper bound.
    IterationLimit,
}

/// Outcome of one distance computation.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    /// Cost of the best transport plan found.
    pub distance: Cost,
    pub termination: Termination,
    /// Solved on a network truncated to the window of radius `L`.
    pub truncated: bool,
    /// Column generation pricing rounds; 0 for the direct simplex.
    pub rounds: usize,
    pub pivots: u64,
    /// Real arcs in the final network.
    pub arcs: usize,
    pub nodes: usize,
    pub runtime: Duration,
}

impl Solution {
    /// Solution for two distributions that already agree everywhere.
    pub fn zero(truncated: bool, runtime: Duration) -> Self {
        Solution {
            distance: 0.0,
            termination: Termination::Converged,
            truncated,
            rounds: 0,
            pivots: 0,
            arcs: 0,
            nodes: 0,
            runtime,
        }
    }

    /// True if the plan is optimal for the network it was solved on.
    #[inline(always)]
    pub fn is_optimal(&self) -> bool {
        self.termination == Termination::Converged
    }

    /// True if the distance is the exact Wasserstein distance.
    #[inline(always)]
    pub fn is_exact(&self) -> bool {
        self.is_optimal() && !self.truncated
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Termination::Converged => "converged",
            Termination::TimeLimit => "time limit",
            Termination::IterationLimit => "iteration limit",
        })
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6} ({}{}, {} nodes, {} arcs, {} rounds, {} pivots, {:.3?})",
            self.distance,
            self.termination,
            if self.truncated { ", truncated" } else { "" },
            self.nodes,
            self.arcs,
            self.rounds,
            self.pivots,
            self.runtime
        )
    }
}
