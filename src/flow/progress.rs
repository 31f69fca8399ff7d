use std::time::{Duration, Instant};

use crate::types::Cost;

/// Wall-clock allowance for one solve.
#[derive(Debug, Clone, Copy)]
pub struct Budget {
    start: Instant,
    deadline: Option<Instant>,
}

impl Budget {
    pub fn new(start: Instant, limit: Option<Duration>) -> Self {
        Budget {
            start,
            deadline: limit.and_then(|l| start.checked_add(l)),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(Instant::now(), None)
    }

    #[inline(always)]
    pub fn exhausted(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Tracks the state of a column generation run
#[derive(Debug)]
pub struct ColgenProgress {
    /// Completed pricing rounds
    pub round: usize,
    /// Arcs admitted over all rounds
    pub admitted: usize,
    /// Admissions that overwrote a released arc slot
    pub reused: usize,
    /// Cheapest feasible plan cost seen so far
    pub best_bound: Cost,
    /// Most negative reduced cost found by the last pricing round
    pub min_reduced_cost: Cost,
}

impl ColgenProgress {
    pub fn new(initial_bound: Cost) -> Self {
        ColgenProgress {
            round: 0,
            admitted: 0,
            reused: 0,
            best_bound: initial_bound,
            min_reduced_cost: 0.0,
        }
    }

    pub fn record_feasible(&mut self, cost: Cost) {
        if cost < self.best_bound {
            self.best_bound = cost;
        }
    }

    pub fn record_admission(&mut self, admitted: usize, reused: usize) {
        self.admitted += admitted;
        self.reused += reused;
    }
}
