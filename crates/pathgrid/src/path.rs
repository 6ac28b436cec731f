//! The [`Path`] produced by a successful search.
//!
//! A path is immutable after construction: its node sequence never changes
//! length or order. Reachability, by contrast, is a property of the world
//! *now* — both predicates re-check the grid on every call instead of
//! caching, since cells and obstacles move on after the search.

use std::sync::OnceLock;

use pathgrid_core::{Index, PathCell, Vec3};

use crate::grid::PathGrid;

/// A frozen snapshot of one route step: the cell's index and its world
/// position at search time.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteNode {
    pub index: Index,
    pub world: Vec3,
}

impl RouteNode {
    pub(crate) fn new(index: Index, world: Vec3) -> Self {
        Self { index, world }
    }
}

/// An ordered route from start to end.
#[derive(Clone, Debug, Default)]
pub struct Path {
    nodes: Vec<RouteNode>,
    world_cache: OnceLock<Vec<Vec3>>,
    index_cache: OnceLock<Vec<Index>>,
}

impl Path {
    pub(crate) fn new(nodes: Vec<RouteNode>) -> Self {
        Self {
            nodes,
            world_cache: OnceLock::new(),
            index_cache: OnceLock::new(),
        }
    }

    /// Whether the path holds no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of route nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The first node of the route.
    #[inline]
    pub fn start_node(&self) -> Option<&RouteNode> {
        self.nodes.first()
    }

    /// The final node of the route.
    #[inline]
    pub fn last_node(&self) -> Option<&RouteNode> {
        self.nodes.last()
    }

    /// The `i`-th node, or `None` out of range.
    #[inline]
    pub fn get(&self, i: usize) -> Option<&RouteNode> {
        self.nodes.get(i)
    }

    /// All route nodes in traversal order.
    #[inline]
    pub fn nodes(&self) -> &[RouteNode] {
        &self.nodes
    }

    /// Iterate the route in traversal order.
    pub fn iter(&self) -> std::slice::Iter<'_, RouteNode> {
        self.nodes.iter()
    }

    /// Whether every route node is currently walkable on `grid`.
    pub fn is_reachable<C: PathCell>(&self, grid: &PathGrid<C>) -> bool {
        self.nodes
            .iter()
            .all(|n| grid.cell(n.index).is_some_and(|c| c.is_walkable()))
    }

    /// Whether the route is walkable *and* free of dynamic obstacles: no
    /// node's index is currently reported occupied by `grid`'s occupancy
    /// hook. Accounts for obstacles that moved after the search ran.
    pub fn is_fully_reachable<C: PathCell>(&self, grid: &PathGrid<C>) -> bool {
        self.is_reachable(grid) && !self.nodes.iter().any(|n| grid.is_index_occupied(n.index))
    }

    /// World positions of the route, built lazily on first call and cached.
    pub fn to_world_array(&self) -> &[Vec3] {
        self.world_cache
            .get_or_init(|| self.nodes.iter().map(|n| n.world).collect())
    }

    /// Indices of the route, built lazily on first call and cached.
    pub fn to_index_array(&self) -> &[Index] {
        self.index_cache
            .get_or_init(|| self.nodes.iter().map(|n| n.index).collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a RouteNode;
    type IntoIter = std::slice::Iter<'a, RouteNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use pathgrid_core::GridCell;

    use super::*;

    fn sample_path() -> Path {
        Path::new(vec![
            RouteNode::new(Index::new(0, 0), Vec3::new(0.0, 0.0, 0.0)),
            RouteNode::new(Index::new(1, 0), Vec3::new(1.0, 0.0, 0.0)),
            RouteNode::new(Index::new(2, 1), Vec3::new(2.0, 0.0, 1.0)),
        ])
    }

    fn sample_grid() -> PathGrid<GridCell> {
        let cells = (0..9)
            .map(|i| GridCell::new(Vec3::new((i % 3) as f32, 0.0, (i / 3) as f32)))
            .collect();
        PathGrid::new(cells, 3, 3).unwrap()
    }

    #[test]
    fn accessors_follow_traversal_order() {
        let path = sample_path();
        assert!(!path.is_empty());
        assert_eq!(path.node_count(), 3);
        assert_eq!(path.start_node().unwrap().index, Index::new(0, 0));
        assert_eq!(path.last_node().unwrap().index, Index::new(2, 1));
        assert_eq!(path.get(1).unwrap().index, Index::new(1, 0));
        assert!(path.get(3).is_none());

        let visited: Vec<Index> = path.iter().map(|n| n.index).collect();
        assert_eq!(
            visited,
            vec![Index::new(0, 0), Index::new(1, 0), Index::new(2, 1)]
        );
    }

    #[test]
    fn projections_are_cached() {
        let path = sample_path();
        let first = path.to_index_array().as_ptr();
        let second = path.to_index_array().as_ptr();
        assert_eq!(first, second);
        assert_eq!(path.to_world_array()[2], Vec3::new(2.0, 0.0, 1.0));
        assert_eq!(path.to_index_array().len(), path.node_count());
    }

    #[test]
    fn reachability_reflects_current_walkability() {
        let path = sample_path();
        let mut grid = sample_grid();
        assert!(path.is_reachable(&grid));

        grid.cell_mut(Index::new(1, 0)).unwrap().set_walkable(false);
        assert!(!path.is_reachable(&grid));

        grid.cell_mut(Index::new(1, 0)).unwrap().set_walkable(true);
        assert!(path.is_reachable(&grid));
    }

    #[test]
    fn empty_path_has_no_endpoints() {
        let path = Path::new(Vec::new());
        assert!(path.is_empty());
        assert!(path.start_node().is_none());
        assert!(path.last_node().is_none());
        assert!(path.is_reachable(&sample_grid()));
    }
}
