//! The [`PathGrid`] — node arena, configuration and indexing.
//!
//! A `PathGrid` wraps host-supplied cell data (anything implementing
//! [`PathCell`]) in a flat row-major arena and runs searches over it. The
//! search algorithm itself lives in [`crate::search`].

use std::sync::Arc;

use pathgrid_core::{DiagonalMode, Euclidean, Heuristic, Index, PathCell, Vec3};

use crate::arena::SearchState;
use crate::error::GridError;
use crate::obstacles::ObstacleTracker;

/// Pluggable center-to-neighbor transition predicate.
pub type ConnectionFilter = dyn Fn(Index, Index) -> bool + Send + Sync;

// ---------------------------------------------------------------------------
// GridConfig
// ---------------------------------------------------------------------------

/// Tunable search parameters.
#[derive(Copy, Clone, Debug)]
pub struct GridConfig {
    /// Grid-wide diagonal policy, used where a cell defers via
    /// [`DiagonalMode::UseGlobal`].
    pub diagonal_mode: DiagonalMode,
    /// Distance between adjacent nodes in world units; bounds the
    /// early-exit in [`PathGrid::find_nearest_index`].
    pub node_spacing: f32,
    /// Multiplier applied to a cell's weighting when computing edge cost.
    pub weighting_influence: f32,
    /// Upper bound on the number of nodes in a returned path.
    /// `None` = unbounded.
    pub max_path_length: Option<usize>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            diagonal_mode: DiagonalMode::NoDiagonal,
            node_spacing: 1.0,
            weighting_influence: 1.0,
            max_path_length: None,
        }
    }
}

impl GridConfig {
    /// Set the global diagonal mode (builder).
    pub fn with_diagonal_mode(mut self, mode: DiagonalMode) -> Self {
        self.diagonal_mode = mode;
        self
    }

    /// Set the node spacing (builder).
    pub fn with_node_spacing(mut self, spacing: f32) -> Self {
        self.node_spacing = spacing;
        self
    }

    /// Set the weighting influence (builder).
    pub fn with_weighting_influence(mut self, influence: f32) -> Self {
        self.weighting_influence = influence;
        self
    }

    /// Set the maximum path length (builder).
    pub fn with_max_path_length(mut self, max: Option<usize>) -> Self {
        self.max_path_length = max;
        self
    }
}

// ---------------------------------------------------------------------------
// PathGrid
// ---------------------------------------------------------------------------

/// A 2D grid of path cells with everything needed to search it.
pub struct PathGrid<C: PathCell> {
    pub(crate) cells: Vec<C>,
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) config: GridConfig,
    pub(crate) heuristic: Box<dyn Heuristic>,
    pub(crate) connection_filter: Option<Box<ConnectionFilter>>,
    pub(crate) occupancy: Option<Arc<ObstacleTracker>>,
    pub(crate) state: SearchState,
}

impl<C: PathCell> PathGrid<C> {
    /// Build a grid from row-major cell data with the default
    /// configuration.
    pub fn new(cells: Vec<C>, width: usize, height: usize) -> Result<Self, GridError> {
        Self::with_config(cells, width, height, GridConfig::default())
    }

    /// Build a grid from row-major cell data.
    ///
    /// Fails if either dimension is zero or the cell count does not match
    /// `width * height`.
    pub fn with_config(
        cells: Vec<C>,
        width: usize,
        height: usize,
        config: GridConfig,
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        if cells.len() != width * height {
            return Err(GridError::CellCountMismatch {
                cells: cells.len(),
                width,
                height,
            });
        }
        let len = cells.len();
        Ok(Self {
            cells,
            width,
            height,
            config,
            heuristic: Box::new(Euclidean),
            connection_filter: None,
            occupancy: None,
            state: SearchState::new(len),
        })
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Current configuration.
    #[inline]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Mutable configuration access. Must not be used while a search for
    /// this grid is in flight on another thread.
    #[inline]
    pub fn config_mut(&mut self) -> &mut GridConfig {
        &mut self.config
    }

    /// Replace the heuristic provider.
    pub fn set_heuristic(&mut self, heuristic: impl Heuristic + 'static) {
        self.heuristic = Box::new(heuristic);
    }

    /// Install a connection filter rejecting specific center-to-neighbor
    /// transitions. Rejection behaves like a non-walkable neighbor for
    /// that edge only.
    pub fn set_connection_filter(
        &mut self,
        filter: impl Fn(Index, Index) -> bool + Send + Sync + 'static,
    ) {
        self.connection_filter = Some(Box::new(filter));
    }

    /// Remove the connection filter, allowing every transition again.
    pub fn clear_connection_filter(&mut self) {
        self.connection_filter = None;
    }

    /// Attach the obstacle tracker consulted by the occupancy hook.
    pub fn set_obstacle_tracker(&mut self, tracker: Arc<ObstacleTracker>) {
        self.occupancy = Some(tracker);
    }

    /// The attached obstacle tracker, if any.
    pub fn obstacle_tracker(&self) -> Option<&Arc<ObstacleTracker>> {
        self.occupancy.as_ref()
    }

    // -----------------------------------------------------------------------
    // Indexing
    // -----------------------------------------------------------------------

    /// Whether `index` lies inside the grid bounds.
    #[inline]
    pub fn contains(&self, index: Index) -> bool {
        index.x >= 0
            && index.y >= 0
            && (index.x as usize) < self.width
            && (index.y as usize) < self.height
    }

    /// Convert an `Index` to a flat arena offset. `None` if out of bounds.
    #[inline]
    pub(crate) fn idx(&self, index: Index) -> Option<usize> {
        if self.contains(index) {
            Some(index.y as usize * self.width + index.x as usize)
        } else {
            None
        }
    }

    /// Convert a flat arena offset back to an `Index`.
    #[inline]
    pub(crate) fn index_at(&self, offset: usize) -> Index {
        Index::new((offset % self.width) as i32, (offset / self.width) as i32)
    }

    /// Bounds-checked cell access by coordinates.
    #[inline]
    pub fn at(&self, x: i32, y: i32) -> Option<&C> {
        self.cell(Index::new(x, y))
    }

    /// Bounds-checked cell access by index.
    #[inline]
    pub fn cell(&self, index: Index) -> Option<&C> {
        self.idx(index).map(|i| &self.cells[i])
    }

    /// Mutable cell access. Must not be used while a search for this grid
    /// is in flight on another thread.
    #[inline]
    pub fn cell_mut(&mut self, index: Index) -> Option<&mut C> {
        self.idx(index).map(|i| &mut self.cells[i])
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Find the index of the node closest to `world`.
    ///
    /// This is an exhaustive scan over every node, O(width * height); on
    /// large grids callers should throttle how often they invoke it. A
    /// candidate closer than the node spacing is accepted immediately as
    /// good enough.
    pub fn find_nearest_index(&self, world: Vec3) -> Index {
        let good_enough = self.config.node_spacing * self.config.node_spacing;
        let mut best = 0;
        let mut best_d2 = f32::INFINITY;
        for (i, cell) in self.cells.iter().enumerate() {
            let d2 = cell.world_position().distance_squared(world);
            if d2 < good_enough {
                return self.index_at(i);
            }
            if d2 < best_d2 {
                best_d2 = d2;
                best = i;
            }
        }
        self.index_at(best)
    }

    /// Expected node count of an unobstructed route between two cells:
    /// Chebyshev distance plus one when diagonals are allowed, Manhattan
    /// distance plus one otherwise.
    pub fn find_node_distance(&self, start: Index, end: Index, mode: DiagonalMode) -> usize {
        let dx = (start.x - end.x).unsigned_abs() as usize;
        let dy = (start.y - end.y).unsigned_abs() as usize;
        if mode.resolve(self.config.diagonal_mode).allows_diagonals() {
            dx.max(dy) + 1
        } else {
            dx + dy + 1
        }
    }

    /// The occupancy hook: whether `index` is currently reported occupied
    /// by a tracked dynamic obstacle.
    #[inline]
    pub fn is_index_occupied(&self, index: Index) -> bool {
        match &self.occupancy {
            Some(tracker) => tracker.is_index_occupied(index),
            None => false,
        }
    }

    /// Whether the connection filter (if any) allows the `center` to
    /// `neighbor` transition.
    #[inline]
    pub(crate) fn connection_allowed(&self, center: Index, neighbor: Index) -> bool {
        match &self.connection_filter {
            Some(filter) => filter(center, neighbor),
            None => true,
        }
    }
}
