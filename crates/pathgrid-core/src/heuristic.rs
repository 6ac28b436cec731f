//! Heuristic providers for A* scoring.
//!
//! A [`Heuristic`] supplies both the `h` estimate used to score frontier
//! nodes and the step distance charged for diagonal moves, so that path
//! cost and estimate always agree on what a diagonal is worth.

use crate::geom::Index;

/// Distance measure between two grid indices.
pub trait Heuristic: Send + Sync {
    /// Estimated cost of travelling from `a` to `b`. Must never
    /// overestimate the true cost (admissible).
    fn distance(&self, a: Index, b: Index) -> f32;
}

/// Straight-line (L2) distance. The default provider; diagonal steps cost
/// `sqrt(2)` under it.
#[derive(Copy, Clone, Debug, Default)]
pub struct Euclidean;

impl Heuristic for Euclidean {
    #[inline]
    fn distance(&self, a: Index, b: Index) -> f32 {
        let dx = (a.x - b.x) as f32;
        let dy = (a.y - b.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Taxicab (L1) distance. Suited to 4-way movement.
#[derive(Copy, Clone, Debug, Default)]
pub struct Manhattan;

impl Heuristic for Manhattan {
    #[inline]
    fn distance(&self, a: Index, b: Index) -> f32 {
        ((a.x - b.x).abs() + (a.y - b.y).abs()) as f32
    }
}

/// Chessboard (L-infinity) distance. Diagonal steps cost 1 under it.
#[derive(Copy, Clone, Debug, Default)]
pub struct Chebyshev;

impl Heuristic for Chebyshev {
    #[inline]
    fn distance(&self, a: Index, b: Index) -> f32 {
        (a.x - b.x).abs().max((a.y - b.y).abs()) as f32
    }
}

impl<F> Heuristic for F
where
    F: Fn(Index, Index) -> f32 + Send + Sync,
{
    #[inline]
    fn distance(&self, a: Index, b: Index) -> f32 {
        self(a, b)
    }
}
