//! Per-search transient state: the search-node arena and the priority
//! frontier.
//!
//! Search nodes live in a flat array addressed by row-major cell index and
//! are recycled across searches through generation stamping — bumping the
//! generation counter lazily invalidates every node without touching the
//! array. A node whose `generation` matches the current search is a member
//! of the open set while `open` is true and of the closed set once it has
//! been expanded; its `g` is the runtime score and `parent` the predecessor
//! link used for path reconstruction.

use std::collections::BinaryHeap;

use pathgrid_core::Index;

/// Sentinel parent meaning "no predecessor".
pub(crate) const NO_PARENT: usize = usize::MAX;

/// One arena entry: mutable scores plus membership bookkeeping.
#[derive(Clone)]
pub(crate) struct SearchNode {
    pub(crate) g: f32,
    pub(crate) h: f32,
    pub(crate) f: f32,
    pub(crate) parent: usize,
    pub(crate) generation: u32,
    pub(crate) open: bool,
}

impl Default for SearchNode {
    fn default() -> Self {
        Self {
            g: 0.0,
            h: 0.0,
            f: 0.0,
            parent: NO_PARENT,
            generation: 0,
            open: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Frontier
// ---------------------------------------------------------------------------

/// Heap entry ordered by `f`, ties broken by insertion sequence.
#[derive(Clone, Copy)]
struct FrontierEntry {
    idx: usize,
    f: f32,
    seq: u64,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f.total_cmp(&other.f).is_eq() && self.seq == other.seq
    }
}

impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse both keys so BinaryHeap (a max-heap) pops the smallest f
        // first, and among equal f the earliest-pushed entry (FIFO).
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-priority queue over arena indices ordered by f-score.
///
/// Decrease-key is lazy: an improved node is pushed again with its new
/// score and the stale entry is skipped on pop (the caller checks the
/// arena's membership flags). The same mechanism covers removal.
#[derive(Default)]
pub(crate) struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    seq: u64,
}

impl Frontier {
    pub(crate) fn clear(&mut self) {
        self.heap.clear();
        self.seq = 0;
    }

    pub(crate) fn push(&mut self, idx: usize, f: f32) {
        self.seq += 1;
        self.heap.push(FrontierEntry {
            idx,
            f,
            seq: self.seq,
        });
    }

    /// Pop the entry with the lowest f-score. Entries may be stale.
    pub(crate) fn pop(&mut self) -> Option<usize> {
        self.heap.pop().map(|e| e.idx)
    }
}

// ---------------------------------------------------------------------------
// SearchState
// ---------------------------------------------------------------------------

/// All transient state owned by one grid's searches.
pub(crate) struct SearchState {
    pub(crate) nodes: Vec<SearchNode>,
    pub(crate) generation: u32,
    pub(crate) frontier: Frontier,
    /// Scratch buffer for neighbor queries, reused across expansions.
    pub(crate) nbuf: Vec<Index>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SearchState {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            nodes: vec![SearchNode::default(); len],
            generation: 0,
            frontier: Frontier::default(),
            nbuf: Vec::with_capacity(8),
        }
    }

    /// Reset for a fresh search: bump the generation so every node is
    /// lazily invalidated, and empty the frontier.
    pub(crate) fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.frontier.clear();
    }
}
