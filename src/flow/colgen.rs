use log::{debug, warn};

use crate::config::Config;
use crate::error::KwdError;
use crate::flow::network::FlowNetwork;
use crate::flow::pricing::{self, ArcUniverse};
use crate::flow::progress::{Budget, ColgenProgress};
use crate::flow::simplex::{NetworkSimplex, SimplexStatus};
use crate::flow::{Outcome, feasibility_tolerance};
use crate::metrics::IterationRecord;
use crate::solution::Termination;

/// Column generation: solve on a restricted arc set, price the rest of the
/// universe against the potentials and admit the most violated arcs until
/// none is left.
pub struct ColumnGeneration<'a, U: ArcUniverse> {
    universe: &'a U,
    config: &'a Config,
    /// Batch column, for logs and records.
    column: usize,
}

impl<'a, U: ArcUniverse> ColumnGeneration<'a, U> {
    pub fn new(universe: &'a U, config: &'a Config, column: usize) -> Self {
        ColumnGeneration {
            universe,
            config,
            column,
        }
    }

    pub fn run(
        &self,
        network: &FlowNetwork,
        budget: &Budget,
        mut iteration_data: Option<&mut Vec<IterationRecord>>,
    ) -> Result<Outcome, KwdError> {
        let max_cost = self.universe.max_cost();
        let tolerance = self.config.opt_tolerance * max_cost.max(1.0);
        let feasibility = feasibility_tolerance(network);

        let basis = self.universe.initial_basis();
        let mut progress = ColgenProgress::new(basis.bound);

        let mut simplex = NetworkSimplex::new(network.supply.clone(), max_cost, tolerance)
            .with_progress_log(self.config.logs_debug());
        for arc in &basis.arcs {
            simplex.add_arc(arc.source as usize, arc.target as usize, arc.cost);
        }

        let mut status = simplex.run(budget);
        let termination = loop {
            match status {
                SimplexStatus::Optimal => {}
                SimplexStatus::BudgetExhausted => break Termination::TimeLimit,
                SimplexStatus::Unbounded => return Err(KwdError::Unbounded),
            }

            progress.round += 1;
            let objective = simplex.total_cost();
            if simplex.artificial_flow() <= feasibility {
                progress.record_feasible(objective);
            }

            let candidates = pricing::price(
                self.universe,
                simplex.potentials(),
                tolerance,
                self.config.colgen_batch,
            );
            progress.min_reduced_cost = candidates.first().map_or(0.0, |c| c.reduced);

            if let Some(records) = iteration_data.as_deref_mut() {
                records.push(IterationRecord {
                    column: self.column,
                    round: progress.round,
                    arcs: simplex.arc_count(),
                    admitted: candidates.len(),
                    reused: 0,
                    objective,
                    min_reduced_cost: progress.min_reduced_cost,
                    pivots: simplex.pivots(),
                    time: budget.elapsed().as_secs_f64(),
                });
            }
            if self.config.logs_debug() {
                debug!(
                    "column {} round {}: cost {:.9}, {} arcs, {} violated (min {:.3e}), {} pivots",
                    self.column,
                    progress.round,
                    objective,
                    simplex.arc_count(),
                    candidates.len(),
                    progress.min_reduced_cost,
                    simplex.pivots()
                );
            }

            if candidates.is_empty() {
                break Termination::Converged;
            }
            if self
                .config
                .max_iterations
                .is_some_and(|max| progress.round >= max)
            {
                break Termination::IterationLimit;
            }
            if budget.exhausted() {
                break Termination::TimeLimit;
            }

            let reused = simplex.admit(&candidates);
            progress.record_admission(candidates.len(), reused);
            if let Some(last) = iteration_data.as_deref_mut().and_then(|r| r.last_mut()) {
                last.reused = reused;
            }
            status = simplex.resume(budget);
        };

        if self.config.logs_debug() {
            debug!(
                "column {}: {} arcs admitted in {} rounds, {} into reused slots",
                self.column, progress.admitted, progress.round, progress.reused
            );
        }

        let distance = match termination {
            Termination::Converged => {
                let residual = simplex.artificial_flow();
                if residual > feasibility {
                    return Err(KwdError::Residual { residual });
                }
                simplex.total_cost()
            }
            Termination::TimeLimit | Termination::IterationLimit => {
                if simplex.artificial_flow() <= feasibility {
                    progress.record_feasible(simplex.total_cost());
                }
                if self.config.logs_info() {
                    warn!(
                        "column {}: stopped on {} after {} rounds, reporting upper bound {:.9}",
                        self.column, termination, progress.round, progress.best_bound
                    );
                }
                progress.best_bound
            }
        };

        Ok(Outcome {
            distance,
            termination,
            rounds: progress.round,
            pivots: simplex.pivots(),
            arcs: simplex.arc_count(),
        })
    }
}
