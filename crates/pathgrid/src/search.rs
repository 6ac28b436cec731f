//! The path search algorithm: neighbor construction and A*.

use pathgrid_core::{DiagonalMode, Index, PathCell};

use crate::arena::NO_PARENT;
use crate::error::{PathStatus, SearchResult};
use crate::grid::PathGrid;
use crate::path::{Path, RouteNode};

/// Orthogonal step distance in cost units. Diagonal steps are charged the
/// heuristic's own distance so cost and estimate agree.
const ORTHO_STEP: f32 = 1.0;

impl<C: PathCell> PathGrid<C> {
    /// Compute the least-cost route from `start` to `end`.
    ///
    /// `mode` is the diagonal policy for this request; pass
    /// [`DiagonalMode::UseGlobal`] to use the grid's configured mode.
    /// Individual cells may still override it.
    ///
    /// Never panics and never blocks indefinitely: the search ends when the
    /// end node is reached or the frontier empties. All per-request failure
    /// conditions are reported through the result's [`PathStatus`].
    pub fn find_path(&mut self, start: Index, end: Index, mode: DiagonalMode) -> SearchResult {
        let Some(start_idx) = self.idx(start) else {
            return SearchResult::status(PathStatus::InvalidIndex);
        };
        let Some(end_idx) = self.idx(end) else {
            return SearchResult::status(PathStatus::InvalidIndex);
        };
        if start_idx == end_idx {
            return SearchResult::status(PathStatus::SameStartEnd);
        }

        // Take the transient state out so the arena can be mutated while
        // cells, heuristic and hooks are read through `self`.
        let mut state = std::mem::take(&mut self.state);
        state.reset();
        let cur_gen = state.generation;

        // Seed the start node.
        {
            let h = self.heuristic.distance(start, end);
            let node = &mut state.nodes[start_idx];
            node.g = 0.0;
            node.h = h;
            node.f = h;
            node.parent = NO_PARENT;
            node.generation = cur_gen;
            node.open = true;
            state.frontier.push(start_idx, h);
        }

        let found = loop {
            let Some(ci) = state.frontier.pop() else {
                break false;
            };

            // Skip stale frontier entries (lazy decrease-key leftovers).
            if state.nodes[ci].generation != cur_gen || !state.nodes[ci].open {
                continue;
            }

            if ci == end_idx {
                break true;
            }

            // Move from the open to the closed set.
            state.nodes[ci].open = false;
            let current_g = state.nodes[ci].g;
            let cp = self.index_at(ci);

            state.nbuf.clear();
            self.neighbors(cp, mode, &mut state.nbuf);

            for i in 0..state.nbuf.len() {
                let np = state.nbuf[i];
                let Some(ni) = self.idx(np) else {
                    continue;
                };
                if !self.cells[ni].is_walkable() {
                    continue;
                }
                // Already finalised this search.
                if state.nodes[ni].generation == cur_gen && !state.nodes[ni].open {
                    continue;
                }
                if !self.connection_allowed(cp, np) {
                    continue;
                }
                if self.is_index_occupied(np) {
                    continue;
                }

                let step = if np.is_diagonal_to(cp) {
                    self.heuristic.distance(cp, np)
                } else {
                    ORTHO_STEP
                };
                let score = current_g
                    + step
                    + self.cells[ni].weighting().clamp(0.0, 1.0) * self.config.weighting_influence;
                let h = self.heuristic.distance(np, end);

                let node = &mut state.nodes[ni];
                let improved = if node.generation == cur_gen {
                    // In the open set: only a strictly better score counts.
                    score < node.g
                } else {
                    node.generation = cur_gen;
                    true
                };
                if improved {
                    node.g = score;
                    node.h = h;
                    node.f = score + h;
                    node.parent = ci;
                    node.open = true;
                    state.frontier.push(ni, score + h);
                }
            }
        };

        if !found {
            self.state = state;
            return SearchResult::status(PathStatus::PathNotFound);
        }

        // Reconstruct by unwinding the predecessor chain from the end.
        let mut offsets = Vec::new();
        let mut ci = end_idx;
        while ci != NO_PARENT {
            offsets.push(ci);
            ci = state.nodes[ci].parent;
        }
        offsets.reverse();
        self.state = state;

        if let Some(max) = self.config.max_path_length {
            if offsets.len() > max {
                log::trace!(
                    "route {start} -> {end} needs {} nodes, over the limit of {max}",
                    offsets.len()
                );
                return SearchResult::status(PathStatus::PathNotFound);
            }
        }

        let nodes = offsets
            .into_iter()
            .map(|i| RouteNode::new(self.index_at(i), self.cells[i].world_position()))
            .collect();
        SearchResult::found(Path::new(nodes))
    }

    /// Append the up-to-8 neighbors of `center` into `buf` under the
    /// effective diagonal mode: the center cell's own override if it is not
    /// `UseGlobal`, otherwise the request mode, otherwise the grid's
    /// configured mode.
    ///
    /// Orthogonal neighbors come first (left, right, up, down), then
    /// diagonals, in a fixed order so equal-cost searches are reproducible.
    /// Under `DiagonalNoCutting` a diagonal is suppressed when either
    /// orthogonal cell it cuts across is non-walkable.
    pub fn neighbors(&self, center: Index, requested: DiagonalMode, buf: &mut Vec<Index>) {
        let global = requested.resolve(self.config.diagonal_mode);
        let mode = self
            .cell(center)
            .map(|c| c.diagonal_mode())
            .unwrap_or(DiagonalMode::UseGlobal)
            .resolve(global);

        const ORTHO: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
        for (dx, dy) in ORTHO {
            let n = center.shift(dx, dy);
            if self.contains(n) {
                buf.push(n);
            }
        }

        if !mode.allows_diagonals() {
            return;
        }

        const DIAG: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];
        for (dx, dy) in DIAG {
            let n = center.shift(dx, dy);
            if !self.contains(n) {
                continue;
            }
            if mode == DiagonalMode::DiagonalNoCutting {
                let flank_a = self.cell(center.shift(dx, 0));
                let flank_b = self.cell(center.shift(0, dy));
                let cuttable = flank_a.is_some_and(|c| c.is_walkable())
                    && flank_b.is_some_and(|c| c.is_walkable());
                if !cuttable {
                    continue;
                }
            }
            buf.push(n);
        }
    }
}
