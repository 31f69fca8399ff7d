use std::time::Instant;

use log::{info, warn};

use crate::config::{Algorithm, Config};
use crate::error::KwdError;
use crate::flow::colgen::ColumnGeneration;
use crate::flow::network::FlowNetwork;
use crate::flow::pricing::{ArcUniverse, BipartiteArcs, ExplicitArcs};
use crate::flow::progress::Budget;
use crate::flow::simplex::{NetworkSimplex, SimplexStatus};
use crate::graph::{Topology, TransportGraph};
use crate::metrics::IterationRecord;
use crate::solution::{Solution, Termination};
use crate::types::*;

/// Residual mass on artificial arcs tolerated per unit of supply.
const FEASIBILITY_TOLERANCE: f64 = 1e-9;

/// Result of solving one flow network, before it is wrapped into a `Solution`.
#[derive(Debug, Clone, Copy)]
pub struct Outcome {
    pub distance: Cost,
    pub termination: Termination,
    pub rounds: usize,
    pub pivots: u64,
    pub arcs: usize,
}

pub(crate) fn feasibility_tolerance(network: &FlowNetwork) -> Mass {
    FEASIBILITY_TOLERANCE * network.total_supply().max(1.0)
}

/// Computes the transport cost of one balance vector over a prebuilt graph.
///
/// `balance` holds the net supply of every support point. The time limit of
/// `config` counts from the call.
pub fn solve_column(
    graph: &TransportGraph<'_>,
    balance: Vec<Mass>,
    config: &Config,
    column: usize,
    iteration_data: Option<&mut Vec<IterationRecord>>,
) -> Result<Solution, KwdError> {
    let start = Instant::now();
    let budget = Budget::new(start, config.time_limit);

    let network = match graph.topology() {
        Topology::Complete => FlowNetwork::bipartite(graph.support(), &balance),
        Topology::Truncated(_) => FlowNetwork::transshipment(balance),
    };
    if network.is_trivial() {
        return Ok(Solution::zero(graph.is_truncated(), start.elapsed()));
    }

    let outcome = match graph.topology() {
        Topology::Complete => {
            let universe = BipartiteArcs::new(graph, &network);
            solve_network(&universe, &network, config, &budget, column, iteration_data)?
        }
        Topology::Truncated(truncated) => {
            let universe = ExplicitArcs::new(graph, truncated, &network);
            solve_network(&universe, &network, config, &budget, column, iteration_data)?
        }
    };

    let solution = Solution {
        distance: outcome.distance,
        termination: outcome.termination,
        truncated: graph.is_truncated(),
        rounds: outcome.rounds,
        pivots: outcome.pivots,
        arcs: outcome.arcs,
        nodes: network.len(),
        runtime: start.elapsed(),
    };
    if config.logs_info() {
        info!("column {}: {}", column, solution);
    }
    Ok(solution)
}

fn solve_network<U: ArcUniverse>(
    universe: &U,
    network: &FlowNetwork,
    config: &Config,
    budget: &Budget,
    column: usize,
    iteration_data: Option<&mut Vec<IterationRecord>>,
) -> Result<Outcome, KwdError> {
    match config.algorithm {
        Algorithm::Simplex => solve_direct(universe, network, config, budget, column),
        Algorithm::ColGen => {
            ColumnGeneration::new(universe, config, column).run(network, budget, iteration_data)
        }
    }
}

/// Network simplex over every arc of the universe.
fn solve_direct<U: ArcUniverse>(
    universe: &U,
    network: &FlowNetwork,
    config: &Config,
    budget: &Budget,
    column: usize,
) -> Result<Outcome, KwdError> {
    let max_cost = universe.max_cost();
    let tolerance = config.opt_tolerance * max_cost.max(1.0);
    let feasibility = feasibility_tolerance(network);

    let mut simplex = NetworkSimplex::new(network.supply.clone(), max_cost, tolerance)
        .with_progress_log(config.logs_debug());
    universe.for_each_arc(&mut |arc| {
        simplex.add_arc(arc.source as usize, arc.target as usize, arc.cost);
    });

    let (distance, termination) = match simplex.run(budget) {
        SimplexStatus::Optimal => {
            let residual = simplex.artificial_flow();
            if residual > feasibility {
                return Err(KwdError::Residual { residual });
            }
            (simplex.total_cost(), Termination::Converged)
        }
        SimplexStatus::BudgetExhausted => {
            let mut bound = universe.initial_basis().bound;
            if simplex.artificial_flow() <= feasibility {
                bound = bound.min(simplex.total_cost());
            }
            if config.logs_info() {
                warn!(
                    "column {}: time limit hit after {} pivots, reporting upper bound {:.9}",
                    column,
                    simplex.pivots(),
                    bound
                );
            }
            (bound, Termination::TimeLimit)
        }
        SimplexStatus::Unbounded => return Err(KwdError::Unbounded),
    };

    Ok(Outcome {
        distance,
        termination,
        rounds: 0,
        pivots: simplex.pivots(),
        arcs: simplex.arc_count(),
    })
}
