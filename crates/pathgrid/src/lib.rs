//! **pathgrid** — a real-time grid pathfinding engine.
//!
//! Given a 2D grid of weighted, walkable cells and a set of moving
//! obstacles, this crate finds least-cost routes and keeps them honest as
//! the world changes:
//!
//! - **A\*** search over a flat node arena ([`PathGrid::find_path`]) with
//!   per-cell weighting, pluggable heuristics and corner-cutting rules
//! - **Routes as values** ([`Path`]) with on-demand reachability checks
//!   against the live grid
//! - **Dynamic obstacles** ([`ObstacleTracker`]) whose covered cells the
//!   search treats as blocked
//! - **Asynchronous dispatch** ([`PathDispatcher`]) running searches on a
//!   worker pool and posting results back over channels
//!
//! Per-request failures (bad index, no route, same start and end) are
//! reported through [`PathStatus`] in the returned [`SearchResult`], never
//! panics; only malformed construction input is an `Err` ([`GridError`]).
//!
//! Cell data comes from the host through the [`pathgrid_core::PathCell`]
//! trait; see [`pathgrid_core`] for the geometry and heuristic types.

mod arena;
mod dispatch;
mod error;
mod grid;
mod obstacles;
mod path;
mod search;

pub use dispatch::{PathDispatcher, PathTicket};
pub use error::{GridError, PathStatus, SearchResult};
pub use grid::{ConnectionFilter, GridConfig, PathGrid};
pub use obstacles::{DynamicObstacle, OBSTACLE_PADDING, ObstacleId, ObstacleTracker};
pub use path::{Path, RouteNode};
