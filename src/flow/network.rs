use crate::problem::Support;
use crate::types::*;

/// Node supplies of one solve, derived from a balance vector over a support.
#[derive(Debug, Clone)]
pub struct FlowNetwork {
    /// Net supply per node; positive ships mass out.
    pub supply: Vec<Mass>,
    /// Support point behind each node.
    pub points: Vec<PointId>,
    /// In bipartite networks nodes `0..n_supply` are the supply side.
    pub n_supply: usize,
}

impl FlowNetwork {
    /// Supply points first, then demand points; points in balance are left out.
    pub fn bipartite(support: &Support, balance: &[Mass]) -> Self {
        debug_assert_eq!(support.len(), balance.len());
        let mut supply = Vec::new();
        let mut points = Vec::new();

        for (i, &b) in balance.iter().enumerate() {
            if b > 0.0 {
                supply.push(b);
                points.push(PointId::from_raw(i as u32));
            }
        }
        let n_supply = supply.len();
        for (i, &b) in balance.iter().enumerate() {
            if b < 0.0 {
                supply.push(b);
                points.push(PointId::from_raw(i as u32));
            }
        }

        FlowNetwork {
            supply,
            points,
            n_supply,
        }
    }

    /// One node per support point; points in balance relay mass.
    pub fn transshipment(balance: Vec<Mass>) -> Self {
        let points = (0..balance.len() as u32).map(PointId::from_raw).collect();
        let n_supply = balance.iter().filter(|&&b| b > 0.0).count();
        FlowNetwork {
            supply: balance,
            points,
            n_supply,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.supply.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.supply.is_empty()
    }

    /// True when there is nothing to move.
    pub fn is_trivial(&self) -> bool {
        self.supply.iter().all(|&s| s == 0.0)
    }

    /// Total mass leaving supply nodes.
    pub fn total_supply(&self) -> Mass {
        self.supply.iter().filter(|&&s| s > 0.0).sum()
    }
}
