//! Dynamic obstacle tracking.
//!
//! An [`ObstacleTracker`] keeps one record per registered obstacle: a cached
//! list of the grid indices the obstacle currently covers. Records are
//! rebuilt on demand by an external timer (the engine never drives this
//! itself) and read by the search loop's occupancy hook. A single mutex
//! guards both sides, so readers always see a consistent snapshot and a
//! half-finished rebuild is never observable.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use pathgrid_core::{Aabb, Index, PathCell, Vec3};

use crate::grid::PathGrid;

/// World-space padding added around an obstacle's bounds before mapping
/// them onto the grid, so cells straddling the boundary are still tested.
pub const OBSTACLE_PADDING: f32 = 1.0;

/// Contract a moving obstacle must satisfy.
///
/// Implementations are shared with worker threads and queried during
/// rebuild passes, so all methods take `&self`; interior mutability is the
/// implementor's concern.
pub trait DynamicObstacle: Send + Sync {
    /// Whether the obstacle moved or changed since the last rebuild.
    fn is_dirty(&self) -> bool;

    /// Whether the obstacle currently blocks cells at all.
    fn is_obstructing(&self) -> bool;

    /// Current world-space bounding box.
    fn bounds(&self) -> Aabb;

    /// Point-containment test for a cell's world position.
    fn contains(&self, point: Vec3) -> bool;

    /// Called once per rebuild pass to clear dirtiness.
    fn mark_updated(&self);
}

/// Handle identifying a registered obstacle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObstacleId(u64);

struct ObstacleRecord {
    id: ObstacleId,
    obstacle: Arc<dyn DynamicObstacle>,
    obstructed: Vec<Index>,
    last_rebuild: Option<Instant>,
}

#[derive(Default)]
struct TrackerInner {
    records: Vec<ObstacleRecord>,
    next_id: u64,
}

/// Per-grid registry of dynamic obstacles.
#[derive(Default)]
pub struct ObstacleTracker {
    inner: Mutex<TrackerInner>,
}

impl ObstacleTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an obstacle. Its obstructed cells are empty until the next
    /// rebuild pass.
    pub fn register(&self, obstacle: Arc<dyn DynamicObstacle>) -> ObstacleId {
        let mut inner = self.inner.lock().expect("obstacle tracker lock poisoned");
        inner.next_id += 1;
        let id = ObstacleId(inner.next_id);
        inner.records.push(ObstacleRecord {
            id,
            obstacle,
            obstructed: Vec::new(),
            last_rebuild: None,
        });
        log::debug!("registered obstacle {:?}", id);
        id
    }

    /// Remove an obstacle and its cached cells. Returns whether anything
    /// was removed.
    pub fn unregister(&self, id: ObstacleId) -> bool {
        let mut inner = self.inner.lock().expect("obstacle tracker lock poisoned");
        let before = inner.records.len();
        inner.records.retain(|r| r.id != id);
        let removed = inner.records.len() != before;
        if removed {
            log::debug!("unregistered obstacle {:?}", id);
        }
        removed
    }

    /// Number of registered obstacles.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .expect("obstacle tracker lock poisoned")
            .records
            .len()
    }

    /// Whether no obstacles are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rebuild the obstructed-cell cache of every dirty obstacle.
    ///
    /// For each dirty record: clear its cache; if the obstacle is
    /// obstructing, expand its bounds by [`OBSTACLE_PADDING`], map the
    /// corners onto the grid and test every cell of that sub-rectangle
    /// against the obstacle's own containment check; finally clear the
    /// dirty flag. Holds the tracker lock for the whole pass.
    pub fn rebuild<C: PathCell>(&self, grid: &PathGrid<C>) {
        let mut inner = self.inner.lock().expect("obstacle tracker lock poisoned");
        for record in inner.records.iter_mut() {
            if !record.obstacle.is_dirty() {
                continue;
            }
            record.obstructed.clear();
            if record.obstacle.is_obstructing() {
                let bounds = record.obstacle.bounds().expanded(OBSTACLE_PADDING);
                let lo = grid.find_nearest_index(bounds.min);
                let hi = grid.find_nearest_index(bounds.max);
                let (x0, x1) = (lo.x.min(hi.x), lo.x.max(hi.x));
                let (y0, y1) = (lo.y.min(hi.y), lo.y.max(hi.y));
                for y in y0..=y1 {
                    for x in x0..=x1 {
                        let index = Index::new(x, y);
                        let Some(cell) = grid.cell(index) else {
                            continue;
                        };
                        if record.obstacle.contains(cell.world_position()) {
                            record.obstructed.push(index);
                        }
                    }
                }
            }
            record.obstacle.mark_updated();
            record.last_rebuild = Some(Instant::now());
            log::debug!(
                "obstacle {:?} rebuilt, {} cells obstructed",
                record.id,
                record.obstructed.len()
            );
        }
    }

    /// Whether any registered obstacle currently covers `index`.
    ///
    /// Safe to call concurrently with a rebuild pass; the shared lock means
    /// the caller sees either the old cache or the new one, never a torn
    /// state.
    pub fn is_index_occupied(&self, index: Index) -> bool {
        let inner = self.inner.lock().expect("obstacle tracker lock poisoned");
        inner
            .records
            .iter()
            .any(|r| r.obstructed.contains(&index))
    }

    /// The cached obstructed indices of one obstacle, or `None` if the id
    /// is unknown.
    pub fn obstructed_indices(&self, id: ObstacleId) -> Option<Vec<Index>> {
        let inner = self.inner.lock().expect("obstacle tracker lock poisoned");
        inner
            .records
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.obstructed.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use pathgrid_core::{DiagonalMode, GridCell};

    use super::*;
    use crate::error::PathStatus;

    /// A box-shaped obstacle that can be moved and toggled from tests.
    struct BoxObstacle {
        bounds: Mutex<Aabb>,
        dirty: AtomicBool,
        obstructing: AtomicBool,
    }

    impl BoxObstacle {
        fn new(bounds: Aabb) -> Self {
            Self {
                bounds: Mutex::new(bounds),
                dirty: AtomicBool::new(true),
                obstructing: AtomicBool::new(true),
            }
        }

        fn move_to(&self, bounds: Aabb) {
            *self.bounds.lock().unwrap() = bounds;
            self.dirty.store(true, Ordering::SeqCst);
        }

        fn set_obstructing(&self, obstructing: bool) {
            self.obstructing.store(obstructing, Ordering::SeqCst);
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    impl DynamicObstacle for BoxObstacle {
        fn is_dirty(&self) -> bool {
            self.dirty.load(Ordering::SeqCst)
        }

        fn is_obstructing(&self) -> bool {
            self.obstructing.load(Ordering::SeqCst)
        }

        fn bounds(&self) -> Aabb {
            *self.bounds.lock().unwrap()
        }

        fn contains(&self, point: Vec3) -> bool {
            self.bounds().contains(point)
        }

        fn mark_updated(&self) {
            self.dirty.store(false, Ordering::SeqCst);
        }
    }

    fn open_grid(size: usize) -> PathGrid<GridCell> {
        let cells = (0..size * size)
            .map(|i| {
                let x = (i % size) as f32;
                let y = (i / size) as f32;
                GridCell::new(Vec3::new(x, 0.0, y))
            })
            .collect();
        PathGrid::new(cells, size, size).unwrap()
    }

    fn cell_box(x: i32, y: i32) -> Aabb {
        let center = Vec3::new(x as f32, 0.0, y as f32);
        Aabb::new(center - Vec3::new(0.4, 0.4, 0.4), center + Vec3::new(0.4, 0.4, 0.4))
    }

    #[test]
    fn rebuild_caches_covered_cells() {
        let grid = open_grid(5);
        let tracker = ObstacleTracker::new();
        let obstacle = Arc::new(BoxObstacle::new(cell_box(2, 2)));
        let id = tracker.register(obstacle.clone());

        // Nothing cached before the first rebuild.
        assert!(!tracker.is_index_occupied(Index::new(2, 2)));

        tracker.rebuild(&grid);
        assert!(tracker.is_index_occupied(Index::new(2, 2)));
        assert!(!tracker.is_index_occupied(Index::new(0, 0)));
        assert_eq!(tracker.obstructed_indices(id).unwrap(), vec![Index::new(2, 2)]);
        assert!(!obstacle.is_dirty());
    }

    #[test]
    fn clean_obstacles_are_skipped() {
        let grid = open_grid(5);
        let tracker = ObstacleTracker::new();
        let obstacle = Arc::new(BoxObstacle::new(cell_box(1, 1)));
        tracker.register(obstacle.clone());

        tracker.rebuild(&grid);
        assert!(tracker.is_index_occupied(Index::new(1, 1)));

        // Moving without marking dirty is invisible until the flag is set.
        *obstacle.bounds.lock().unwrap() = cell_box(3, 3);
        tracker.rebuild(&grid);
        assert!(tracker.is_index_occupied(Index::new(1, 1)));
        assert!(!tracker.is_index_occupied(Index::new(3, 3)));

        obstacle.dirty.store(true, Ordering::SeqCst);
        tracker.rebuild(&grid);
        assert!(!tracker.is_index_occupied(Index::new(1, 1)));
        assert!(tracker.is_index_occupied(Index::new(3, 3)));
    }

    #[test]
    fn non_obstructing_obstacles_cover_nothing() {
        let grid = open_grid(5);
        let tracker = ObstacleTracker::new();
        let obstacle = Arc::new(BoxObstacle::new(cell_box(2, 2)));
        tracker.register(obstacle.clone());
        tracker.rebuild(&grid);
        assert!(tracker.is_index_occupied(Index::new(2, 2)));

        obstacle.set_obstructing(false);
        tracker.rebuild(&grid);
        assert!(!tracker.is_index_occupied(Index::new(2, 2)));
    }

    #[test]
    fn unregister_drops_cached_cells() {
        let grid = open_grid(5);
        let tracker = ObstacleTracker::new();
        let id = tracker.register(Arc::new(BoxObstacle::new(cell_box(2, 2))));
        tracker.rebuild(&grid);
        assert_eq!(tracker.len(), 1);

        assert!(tracker.unregister(id));
        assert!(!tracker.unregister(id));
        assert!(tracker.is_empty());
        assert!(!tracker.is_index_occupied(Index::new(2, 2)));
        assert!(tracker.obstructed_indices(id).is_none());
    }

    #[test]
    fn searches_route_around_tracked_obstacles() {
        let mut grid = open_grid(3);
        let tracker = Arc::new(ObstacleTracker::new());
        let obstacle = Arc::new(BoxObstacle::new(cell_box(1, 1)));
        tracker.register(obstacle.clone());
        tracker.rebuild(&grid);
        grid.set_obstacle_tracker(tracker.clone());

        let result = grid.find_path(Index::new(0, 1), Index::new(2, 1), DiagonalMode::NoDiagonal);
        assert_eq!(result.status, PathStatus::PathFound);
        let path = result.path.unwrap();
        assert!(!path.to_index_array().contains(&Index::new(1, 1)));

        // The path stops being fully reachable the moment the obstacle
        // covers one of its cells, and recovers once it moves off — with
        // no re-search in between.
        assert!(path.is_fully_reachable(&grid));
        obstacle.move_to(cell_box(2, 0));
        tracker.rebuild(&grid);
        assert!(!path.is_fully_reachable(&grid));
        assert!(path.is_reachable(&grid));
        obstacle.move_to(cell_box(1, 2));
        tracker.rebuild(&grid);
        assert!(path.is_fully_reachable(&grid));
    }
}
