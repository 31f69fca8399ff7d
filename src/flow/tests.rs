use super::network::FlowNetwork;
use super::pricing::{self, ArcUniverse, BipartiteArcs, ExplicitArcs};
use super::progress::Budget;
use super::simplex::{NetworkSimplex, SimplexStatus};
use super::*;
use std::time::{Duration, Instant};

use crate::config::{Algorithm, Config, GroundMetric, Method};
use crate::graph::{Topology, TransportGraph};
use crate::problem::{Distribution, Support};
use crate::solution::Termination;
use crate::utils::WeightMatrix;
use crate::utils::random::{random_batch, random_pair};

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn config(method: Method, algorithm: Algorithm) -> Config {
        Config {
            method,
            algorithm,
            ..Config::default()
        }
    }

    /// Support and balance of a seeded random pair on `[0, n]²`.
    fn random_instance(n: i32, samples: usize, seed: u64) -> (Support, Vec<f64>) {
        let pair = random_pair(n, samples, seed);
        let support = Support::new(&pair.x, &pair.y).unwrap();
        let balance = {
            let a = Distribution::new(&support, &pair.a).unwrap();
            let b = Distribution::new(&support, &pair.b).unwrap();
            a.balance(&b, true).unwrap()
        };
        (support, balance)
    }

    fn solve(support: &Support, balance: &[f64], config: &Config) -> crate::solution::Solution {
        let graph = TransportGraph::build(support, config);
        solve_column(&graph, balance.to_vec(), config, 0, None).unwrap()
    }

    #[test]
    fn test_simplex_assignment() {
        let mut simplex = NetworkSimplex::new(vec![1.0, 1.0, -1.0, -1.0], 3.0, 1e-12);
        simplex.add_arc(0, 2, 1.0);
        simplex.add_arc(0, 3, 3.0);
        simplex.add_arc(1, 2, 2.0);
        simplex.add_arc(1, 3, 1.0);

        assert_eq!(simplex.run(&Budget::unlimited()), SimplexStatus::Optimal);
        assert!((simplex.total_cost() - 2.0).abs() < EPS);
        assert!(simplex.artificial_flow() < EPS);

        let mut flows: Vec<_> = simplex.flows().collect();
        flows.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        assert_eq!(flows, vec![(0, 2, 1.0), (1, 3, 1.0)]);
    }

    #[test]
    fn test_simplex_routes_through_transshipment_node() {
        let mut simplex = NetworkSimplex::new(vec![2.0, 0.0, -2.0], 3.0, 1e-12);
        simplex.add_arc(0, 2, 3.0);
        simplex.add_arc(0, 1, 1.0);
        simplex.add_arc(1, 2, 1.0);

        assert_eq!(simplex.run(&Budget::unlimited()), SimplexStatus::Optimal);
        assert!((simplex.total_cost() - 4.0).abs() < EPS);
        assert!(simplex.pivots() > 0);
    }

    #[test]
    fn test_simplex_resumes_after_admission() {
        let mut simplex = NetworkSimplex::new(vec![2.0, 0.0, -2.0], 3.0, 1e-12);
        simplex.add_arc(0, 2, 3.0);
        assert_eq!(simplex.run(&Budget::unlimited()), SimplexStatus::Optimal);
        assert!((simplex.total_cost() - 6.0).abs() < EPS);

        let pi = simplex.potentials().to_vec();
        let candidates: Vec<_> = [(0u32, 1u32, 1.0), (1, 2, 1.0)]
            .into_iter()
            .map(|(source, target, cost)| pricing::Candidate {
                source,
                target,
                cost,
                reduced: cost + pi[source as usize] - pi[target as usize],
            })
            .collect();
        simplex.admit(&candidates);
        assert_eq!(simplex.arc_count(), 3);

        assert_eq!(simplex.resume(&Budget::unlimited()), SimplexStatus::Optimal);
        assert!((simplex.total_cost() - 4.0).abs() < EPS);
    }

    #[test]
    fn test_simplex_reports_missing_arcs_as_artificial_flow() {
        let mut simplex = NetworkSimplex::new(vec![1.0, -1.0], 1.0, 1e-12);
        assert_eq!(simplex.run(&Budget::unlimited()), SimplexStatus::Optimal);
        assert!((simplex.artificial_flow() - 1.0).abs() < EPS);
        assert_eq!(simplex.total_cost(), 0.0);
    }

    #[test]
    fn test_admit_reuses_released_slots() {
        // Arc 0 -> 1 is far too expensive to ever enter.
        let mut simplex = NetworkSimplex::new(vec![1.0, 0.0, -1.0], 100.0, 1e-12);
        simplex.add_arc(0, 2, 1.0);
        simplex.add_arc(0, 1, 100.0);
        assert_eq!(simplex.run(&Budget::unlimited()), SimplexStatus::Optimal);

        let candidate = pricing::Candidate {
            source: 1,
            target: 2,
            cost: 1.0,
            reduced: -1.0,
        };
        let reused = simplex.admit(&[candidate]);
        assert_eq!(reused, 1);
        assert_eq!(simplex.arc_count(), 2);
        assert_eq!(simplex.resume(&Budget::unlimited()), SimplexStatus::Optimal);
        assert!((simplex.total_cost() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_bipartite_initial_basis_is_feasible() {
        let (support, balance) = random_instance(12, 40, 3);
        let graph = TransportGraph::exact(&support, GroundMetric::Euclidean);
        let network = FlowNetwork::bipartite(&support, &balance);
        let universe = BipartiteArcs::new(&graph, &network);

        let basis = universe.initial_basis();
        let mut simplex = NetworkSimplex::new(network.supply.clone(), universe.max_cost(), 1e-12);
        for arc in &basis.arcs {
            simplex.add_arc(arc.source as usize, arc.target as usize, arc.cost);
        }
        assert_eq!(simplex.run(&Budget::unlimited()), SimplexStatus::Optimal);
        assert!(simplex.artificial_flow() < 1e-9);
        assert!(basis.bound + EPS >= simplex.total_cost());

        let optimum = solve(&support, &balance, &config(Method::Exact, Algorithm::Simplex));
        assert!(basis.bound + EPS >= optimum.distance);
    }

    #[test]
    fn test_tree_bound_is_an_upper_bound() {
        let (support, balance) = random_instance(12, 40, 5);
        let graph = TransportGraph::truncated(&support, GroundMetric::Euclidean, 2);
        let Topology::Truncated(truncated) = graph.topology() else {
            panic!("expected a truncated topology");
        };
        let network = FlowNetwork::transshipment(balance.clone());
        let universe = ExplicitArcs::new(&graph, truncated, &network);

        let bound = universe.initial_basis().bound;
        let optimum = solve(&support, &balance, &Config {
            radius: 2,
            ..config(Method::Approx, Algorithm::Simplex)
        });
        assert!(bound + EPS >= optimum.distance);
    }

    #[test]
    fn test_pricing_order_and_cap() {
        let support = Support::new(&[0, 1, 5, 9], &[0, 0, 0, 0]).unwrap();
        let graph = TransportGraph::exact(&support, GroundMetric::Manhattan);
        let network = FlowNetwork::bipartite(&support, &[0.5, 0.5, -0.5, -0.5]);
        let universe = BipartiteArcs::new(&graph, &network);

        // Zero potentials on supply, large ones on demand: every arc is violated.
        let pi = vec![0.0, 0.0, 20.0, 20.0];
        let all = pricing::price(&universe, &pi, 1e-9, 0);
        assert_eq!(all.len(), 2);
        assert!(all[0].reduced <= all[1].reduced);
        // Best arc of source 1 is to point 5 (cost 4), of source 0 too (cost 5).
        assert_eq!((all[0].source, all[0].target), (1, 2));
        assert_eq!((all[1].source, all[1].target), (0, 2));

        let capped = pricing::price(&universe, &pi, 1e-9, 1);
        assert_eq!(capped, all[..1].to_vec());
    }

    #[test]
    fn test_colgen_matches_simplex_exact() {
        for seed in [1, 2, 3] {
            let (support, balance) = random_instance(10, 30, seed);
            let direct = solve(&support, &balance, &config(Method::Exact, Algorithm::Simplex));
            let colgen = solve(&support, &balance, &config(Method::Exact, Algorithm::ColGen));
            assert!(direct.is_exact());
            assert!(colgen.is_exact());
            assert!(colgen.rounds >= 1);
            assert!(
                (direct.distance - colgen.distance).abs() < 1e-7,
                "seed {}: {} vs {}",
                seed,
                direct.distance,
                colgen.distance
            );
        }
    }

    #[test]
    fn test_colgen_matches_simplex_truncated() {
        let (support, balance) = random_instance(16, 60, 11);
        for radius in [1, 2, 4] {
            let direct = solve(&support, &balance, &Config {
                radius,
                ..config(Method::Approx, Algorithm::Simplex)
            });
            let colgen = solve(&support, &balance, &Config {
                radius,
                ..config(Method::Approx, Algorithm::ColGen)
            });
            assert!(direct.truncated && colgen.truncated);
            assert!((direct.distance - colgen.distance).abs() < 1e-7);
        }
    }

    #[test]
    fn test_wide_window_equals_exact() {
        let (support, balance) = random_instance(8, 25, 21);
        let exact = solve(&support, &balance, &config(Method::Exact, Algorithm::Simplex));
        let approx = solve(&support, &balance, &Config {
            radius: 8,
            ..config(Method::Approx, Algorithm::ColGen)
        });
        assert!((exact.distance - approx.distance).abs() < 1e-7);
    }

    #[test]
    fn test_iteration_cap_returns_upper_bound() {
        let (support, balance) = random_instance(20, 120, 8);
        let optimum = solve(&support, &balance, &config(Method::Exact, Algorithm::Simplex));
        let capped = solve(&support, &balance, &Config {
            max_iterations: Some(1),
            ..config(Method::Exact, Algorithm::ColGen)
        });

        assert!(capped.distance.is_finite());
        assert!(capped.distance + 1e-7 >= optimum.distance);
        if capped.is_optimal() {
            assert!((capped.distance - optimum.distance).abs() < 1e-7);
        } else {
            assert_eq!(capped.termination, Termination::IterationLimit);
            assert_eq!(capped.rounds, 1);
        }
    }

    #[test]
    fn test_simplex_stops_when_budget_runs_out() {
        let n = 1500;
        let mut supply = vec![1.0; n];
        supply.extend(vec![-1.0; n]);
        let mut simplex = NetworkSimplex::new(supply, 1.0, 1e-12);
        for i in 0..n {
            simplex.add_arc(i, n + i, 1.0);
        }

        // Every demand node needs its own pivot, so the first check comes first.
        let expired = Budget::new(Instant::now(), Some(Duration::from_nanos(1)));
        assert_eq!(simplex.run(&expired), SimplexStatus::BudgetExhausted);
        assert_eq!(simplex.pivots(), 1000);
        assert!(simplex.artificial_flow() > 0.0);

        assert_eq!(simplex.resume(&Budget::unlimited()), SimplexStatus::Optimal);
        assert!(simplex.artificial_flow() < EPS);
        assert!((simplex.total_cost() - n as f64).abs() < 1e-7);
    }

    #[test]
    fn test_time_limit_returns_upper_bound() {
        let (support, balance) = random_instance(100, 1500, 31);
        let optimum = solve(&support, &balance, &config(Method::Exact, Algorithm::ColGen));

        for method in [Method::Exact, Method::Approx] {
            for algorithm in [Algorithm::Simplex, Algorithm::ColGen] {
                let limited = solve(&support, &balance, &Config {
                    time_limit: Some(Duration::from_micros(1)),
                    ..config(method, algorithm)
                });
                assert_eq!(
                    limited.termination,
                    Termination::TimeLimit,
                    "{:?} {:?}",
                    method,
                    algorithm
                );
                assert!(limited.distance.is_finite());
                assert!(limited.distance + 1e-7 >= optimum.distance);
            }
        }
    }

    #[test]
    fn test_identical_balance_is_trivial() {
        let support = Support::new(&[0, 3], &[0, 4]).unwrap();
        let solution = solve(&support, &[0.0, 0.0], &config(Method::Exact, Algorithm::ColGen));
        assert_eq!(solution.distance, 0.0);
        assert!(solution.is_exact());
        assert_eq!(solution.nodes, 0);
    }

    #[test]
    fn test_iteration_records_follow_rounds() {
        let (support, balance) = random_instance(10, 30, 4);
        let config = config(Method::Exact, Algorithm::ColGen);
        let graph = TransportGraph::build(&support, &config);
        let mut records = Vec::new();
        let solution = solve_column(&graph, balance, &config, 7, Some(&mut records)).unwrap();

        assert_eq!(records.len(), solution.rounds);
        assert!(records.iter().all(|r| r.column == 7));
        let last = records.last().unwrap();
        assert_eq!(last.admitted, 0);
        assert!((last.objective - solution.distance).abs() < EPS);
        assert!(records.windows(2).all(|w| w[0].round + 1 == w[1].round));
    }

    #[test]
    fn test_batch_solves_repeated_columns_once() {
        let batch = random_batch(24, 2, 0, 10, 9);
        let mut w = Vec::with_capacity(24 * 3);
        for row in batch.w.chunks(2) {
            w.extend([row[0], row[1], row[0]]);
        }
        let weights = WeightMatrix::from_vec(24, 3, w).unwrap();
        let support = Support::new(&batch.x, &batch.y).unwrap();
        let base = Distribution::new(&support, &batch.a).unwrap();

        let mut distances = Vec::new();
        for threads in [1, 2] {
            let config = Config {
                threads,
                ..config(Method::Exact, Algorithm::ColGen)
            };
            let graph = TransportGraph::build(&support, &config);
            let mut records = Vec::new();
            let solutions = BatchDriver::new(&graph, &config)
                .run(&base, &weights, Some(&mut records))
                .unwrap();

            assert_eq!(solutions.len(), 3);
            assert_eq!(solutions[0], solutions[2]);
            assert!(records.iter().all(|r| r.column < 2));
            assert!(records.iter().any(|r| r.column == 1));
            distances.push(solutions.iter().map(|s| s.distance).collect::<Vec<_>>());
        }
        for (a, b) in distances[0].iter().zip(&distances[1]) {
            assert!((a - b).abs() < 1e-9);
        }
    }
}
