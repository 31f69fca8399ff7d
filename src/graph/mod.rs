mod arcs;
mod builder;

pub use arcs::ArcSet;

use crate::config::{Config, GroundMetric, Method};
use crate::problem::Support;
use crate::types::*;

/// Arcs of a truncated transshipment network.
#[derive(Debug, Clone)]
pub struct Truncated {
    pub radius: u32,
    pub arcs: ArcSet,
    /// Undirected spanning tree over all points, drawn from `arcs`.
    pub tree: Vec<(u32, u32)>,
    /// Spanning tree edges longer than `radius` that were added to keep the network connected.
    pub fallback: usize,
}

#[derive(Debug, Clone)]
pub enum Topology {
    /// Every supply point may ship directly to every demand point.
    Complete,
    Truncated(Truncated),
}

/// Network topology over a support, shared read-only by every solve on it.
pub struct TransportGraph<'s> {
    support: &'s Support,
    metric: GroundMetric,
    topology: Topology,
}

impl<'s> TransportGraph<'s> {
    /// Builds the topology the configured method asks for.
    pub fn build(support: &'s Support, config: &Config) -> Self {
        match config.method {
            Method::Exact => Self::exact(support, config.metric),
            Method::Approx => Self::truncated(support, config.metric, config.radius),
        }
    }

    pub fn exact(support: &'s Support, metric: GroundMetric) -> Self {
        TransportGraph {
            support,
            metric,
            topology: Topology::Complete,
        }
    }

    pub fn truncated(support: &'s Support, metric: GroundMetric, radius: u32) -> Self {
        TransportGraph {
            support,
            metric,
            topology: Topology::Truncated(builder::build_truncated(support, metric, radius)),
        }
    }

    #[inline(always)]
    pub fn support(&self) -> &'s Support {
        self.support
    }

    #[inline(always)]
    pub fn metric(&self) -> GroundMetric {
        self.metric
    }

    #[inline(always)]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self.topology, Topology::Truncated(_))
    }

    /// Ground distance between two points of the support.
    #[inline(always)]
    pub fn cost(&self, p: PointId, q: PointId) -> Cost {
        let (dx, dy) = self.support.point(p).delta(self.support.point(q));
        self.metric.cost(dx, dy)
    }

    /// Upper bound on the cost of any arc this graph can produce.
    pub fn max_cost(&self) -> Cost {
        match &self.topology {
            Topology::Complete => {
                let (dx, dy) = self.support.extent();
                self.metric.cost(dx, dy)
            }
            Topology::Truncated(t) => t.arcs.max_cost(),
        }
    }
}

#[cfg(test)]
mod tests;
