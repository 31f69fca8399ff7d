use super::*;
use crate::config::GroundMetric;
use crate::problem::Support;
use crate::utils::DisjointSets;
use crate::utils::random::random_batch;

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(side: i32) -> Support {
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for x in 0..side {
            for y in 0..side {
                xs.push(x);
                ys.push(y);
            }
        }
        Support::new(&xs, &ys).unwrap()
    }

    fn truncated<'a>(graph: &'a TransportGraph<'_>) -> &'a Truncated {
        match graph.topology() {
            Topology::Truncated(t) => t,
            Topology::Complete => panic!("expected a truncated topology"),
        }
    }

    #[test]
    fn test_arc_set_csr() {
        let arcs = ArcSet::from_arcs(
            3,
            vec![(2, 0, 1.0), (0, 2, 2.0), (0, 1, 1.0), (0, 1, 0.5)],
        );
        assert_eq!(arcs.len(), 3);
        assert_eq!(arcs.nodes(), 3);
        assert_eq!(arcs.out_arcs(0), 0..2);
        assert_eq!(arcs.out_arcs(1), 2..2);
        assert_eq!(arcs.out_arcs(2), 2..3);
        // Parallel arcs keep the cheaper copy.
        assert_eq!(arcs.cost(0), 0.5);
        assert_eq!(arcs.target(1), 2);
        assert_eq!(arcs.max_cost(), 2.0);
    }

    #[test]
    fn test_truncated_grid_prunes_collinear_arcs() {
        let support = grid(3);
        let graph = TransportGraph::truncated(&support, GroundMetric::Euclidean, 2);
        let t = truncated(&graph);

        // From the corner (0,0) the window holds 8 other points; (0,2), (2,0)
        // and (2,2) sit behind a closer point on the same line.
        let corner = support.find(Point::new(0, 0)).unwrap().index();
        let targets: Vec<Point> = t
            .arcs
            .out_arcs(corner)
            .map(|e| support.points()[t.arcs.target(e)])
            .collect();
        assert_eq!(targets.len(), 5);
        assert!(!targets.contains(&Point::new(2, 2)));
        assert!(targets.contains(&Point::new(2, 1)));

        assert_eq!(t.tree.len(), support.len() - 1);
        assert_eq!(t.fallback, 0);
    }

    #[test]
    fn test_truncated_keeps_arc_without_intermediate_point() {
        let support = Support::new(&[0, 2], &[0, 2]).unwrap();
        let graph = TransportGraph::truncated(&support, GroundMetric::Euclidean, 2);
        let t = truncated(&graph);
        assert_eq!(t.arcs.len(), 2);
        assert!((t.arcs.cost(0) - 8f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_disconnected_window_gets_fallback_edges() {
        // Two clusters ten cells apart.
        let support = Support::new(&[0, 1, 10, 11], &[0, 0, 0, 0]).unwrap();
        let graph = TransportGraph::truncated(&support, GroundMetric::Manhattan, 1);
        let t = truncated(&graph);
        assert_eq!(t.fallback, 1);
        assert_eq!(t.tree.len(), 3);
        // Two window edges and one bridge, each in both directions.
        assert_eq!(t.arcs.len(), 6);
        assert_eq!(t.arcs.max_cost(), 9.0);
    }

    #[test]
    fn test_exact_max_cost_bounds_every_pair() {
        let support = Support::new(&[0, 3, 1], &[0, 1, 4]).unwrap();
        let graph = TransportGraph::exact(&support, GroundMetric::Euclidean);
        assert!(!graph.is_truncated());
        let bound = graph.max_cost();
        for p in 0..support.len() {
            for q in 0..support.len() {
                let (p, q) = (
                    crate::types::PointId::from_index(p).unwrap(),
                    crate::types::PointId::from_index(q).unwrap(),
                );
                assert!(graph.cost(p, q) <= bound);
            }
        }
    }

    #[test]
    fn test_bridges_of_singletons_form_the_spanning_tree() {
        let points = vec![
            Point::new(0, 0),
            Point::new(5, 0),
            Point::new(0, 5),
            Point::new(5, 4),
        ];
        let mut sets = DisjointSets::new(points.len());
        let first = builder::bridge_components(&points, &mut sets);
        assert_eq!(sets.components(), 1);
        // Ties at distance 5 go to the lowest ids.
        assert_eq!(first, vec![(1, 3), (0, 1), (0, 2)]);

        let mut sets = DisjointSets::new(points.len());
        assert_eq!(builder::bridge_components(&points, &mut sets), first);
    }

    #[test]
    fn test_bridges_are_the_long_spanning_tree_edges() {
        let batch = random_batch(150, 0, 0, 300, 9);
        let support = Support::new(&batch.x, &batch.y).unwrap();
        let points = support.points();
        let n = points.len();

        let mut all: Vec<(i64, u32, u32)> = Vec::new();
        for i in 0..n {
            for j in i + 1..n {
                all.push((points[i].chebyshev(points[j]), i as u32, j as u32));
            }
        }
        all.sort_unstable();

        for radius in [4, 12, 30] {
            let mut reference = Vec::new();
            let mut kruskal = DisjointSets::new(n);
            for &(d, s, t) in &all {
                if kruskal.union(s as usize, t as usize) && d > radius as i64 {
                    reference.push((s, t));
                }
            }

            let mut sets = DisjointSets::new(n);
            for &(d, s, t) in &all {
                if d <= radius as i64 {
                    sets.union(s as usize, t as usize);
                }
            }
            let bridges = builder::bridge_components(points, &mut sets);
            assert_eq!(bridges, reference, "radius {}", radius);

            let graph = TransportGraph::truncated(&support, GroundMetric::Chebyshev, radius);
            let t = truncated(&graph);
            assert_eq!(t.fallback, reference.len());
            assert_eq!(t.tree.len(), n - 1);
        }
    }
}
