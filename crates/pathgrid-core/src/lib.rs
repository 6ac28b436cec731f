//! **pathgrid-core** — Grid pathfinding engine (core types).
//!
//! This crate provides the foundational types used by the *pathgrid*
//! engine: grid coordinates and world-space geometry, the cell capability
//! contract, and pluggable distance heuristics.

pub mod cell;
pub mod geom;
pub mod heuristic;

pub use cell::{DiagonalMode, GridCell, PathCell};
pub use geom::{Aabb, Index, Vec3};
pub use heuristic::{Chebyshev, Euclidean, Heuristic, Manhattan};
