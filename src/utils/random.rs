use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::types::*;

/// Two histograms sampled on their own coordinates, laid out over the union
/// of both: `a` is zero on the points of `b` and vice versa.
#[derive(Debug, Clone)]
pub struct RandomPair {
    pub x: Vec<Coord>,
    pub y: Vec<Coord>,
    pub a: Vec<Mass>,
    pub b: Vec<Mass>,
}

/// One base histogram and `columns` others on a shared set of random points.
#[derive(Debug, Clone)]
pub struct RandomBatch {
    pub x: Vec<Coord>,
    pub y: Vec<Coord>,
    pub a: Vec<Mass>,
    /// Row-major `x.len()` × `columns`.
    pub w: Vec<Mass>,
    pub columns: usize,
}

/// `samples` uniform points in `[0, n]²` per histogram with uniform `[0, 1)` weights.
pub fn random_pair(n: Coord, samples: usize, seed: u64) -> RandomPair {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut pair = RandomPair {
        x: Vec::with_capacity(2 * samples),
        y: Vec::with_capacity(2 * samples),
        a: Vec::with_capacity(2 * samples),
        b: Vec::with_capacity(2 * samples),
    };

    for _ in 0..samples {
        pair.x.push(rng.random_range(0..=n));
        pair.y.push(rng.random_range(0..=n));
        pair.a.push(rng.random::<f64>());
        pair.b.push(0.0);

        pair.x.push(rng.random_range(0..=n));
        pair.y.push(rng.random_range(0..=n));
        pair.a.push(0.0);
        pair.b.push(rng.random::<f64>());
    }
    pair
}

/// `points` uniform coordinates in `[lo, hi]²`, every weight uniform in `[0, 1)`.
pub fn random_batch(points: usize, columns: usize, lo: Coord, hi: Coord, seed: u64) -> RandomBatch {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let x = (0..points).map(|_| rng.random_range(lo..=hi)).collect();
    let y = (0..points).map(|_| rng.random_range(lo..=hi)).collect();
    let a = (0..points).map(|_| rng.random::<f64>()).collect();
    let w = (0..points * columns).map(|_| rng.random::<f64>()).collect();
    RandomBatch {
        x,
        y,
        a,
        w,
        columns,
    }
}
