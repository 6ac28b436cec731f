//! Cell capabilities: the [`PathCell`] trait and the plain [`GridCell`]
//! implementation.
//!
//! The engine never owns cell data beyond what this trait exposes; any host
//! type carrying walkability, a cost weight, a world position and an optional
//! diagonal-movement override can back a grid.

use crate::geom::Vec3;

// ---------------------------------------------------------------------------
// DiagonalMode
// ---------------------------------------------------------------------------

/// Policy governing diagonal movement out of a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagonalMode {
    /// Only the four orthogonal neighbours are considered.
    #[default]
    NoDiagonal,
    /// All eight neighbours are considered unconditionally.
    Diagonal,
    /// Diagonal neighbours are considered unless either flanking orthogonal
    /// cell is non-walkable (no corner cutting).
    DiagonalNoCutting,
    /// Defer to the grid's configured global mode.
    UseGlobal,
}

impl DiagonalMode {
    /// Collapse `UseGlobal` onto the grid-wide mode. A global mode of
    /// `UseGlobal` has nothing left to defer to and resolves to
    /// `NoDiagonal`.
    #[inline]
    pub fn resolve(self, global: DiagonalMode) -> DiagonalMode {
        match self {
            DiagonalMode::UseGlobal => match global {
                DiagonalMode::UseGlobal => DiagonalMode::NoDiagonal,
                other => other,
            },
            other => other,
        }
    }

    /// Whether this (already resolved) mode produces diagonal neighbours.
    #[inline]
    pub fn allows_diagonals(self) -> bool {
        matches!(self, DiagonalMode::Diagonal | DiagonalMode::DiagonalNoCutting)
    }
}

// ---------------------------------------------------------------------------
// PathCell
// ---------------------------------------------------------------------------

/// Capability contract a grid cell must satisfy.
///
/// Implementations are queried during every search, so these methods should
/// be cheap. `weighting` is clamped to `[0, 1]` by the engine on read.
pub trait PathCell {
    /// Whether the cell can be traversed at all.
    fn is_walkable(&self) -> bool;

    /// Additional traversal cost in `[0, 1]`, scaled by the grid's
    /// weighting influence.
    fn weighting(&self) -> f32;

    /// The cell's position in world space.
    fn world_position(&self) -> Vec3;

    /// Per-cell diagonal-movement override.
    fn diagonal_mode(&self) -> DiagonalMode {
        DiagonalMode::UseGlobal
    }
}

// ---------------------------------------------------------------------------
// GridCell
// ---------------------------------------------------------------------------

/// A plain-data [`PathCell`] implementation.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCell {
    walkable: bool,
    weighting: f32,
    world: Vec3,
    diagonal: DiagonalMode,
}

impl GridCell {
    /// Create a walkable, unweighted cell at `world`.
    pub const fn new(world: Vec3) -> Self {
        Self {
            walkable: true,
            weighting: 0.0,
            world,
            diagonal: DiagonalMode::UseGlobal,
        }
    }

    /// Set walkability (builder).
    #[inline]
    pub const fn with_walkable(mut self, walkable: bool) -> Self {
        self.walkable = walkable;
        self
    }

    /// Set the weighting (builder). Clamped to `[0, 1]`.
    #[inline]
    pub fn with_weighting(mut self, weighting: f32) -> Self {
        self.set_weighting(weighting);
        self
    }

    /// Set the diagonal override (builder).
    #[inline]
    pub const fn with_diagonal(mut self, mode: DiagonalMode) -> Self {
        self.diagonal = mode;
        self
    }

    /// Update walkability in place.
    #[inline]
    pub fn set_walkable(&mut self, walkable: bool) {
        self.walkable = walkable;
    }

    /// Update the weighting in place. Clamped to `[0, 1]` on write.
    #[inline]
    pub fn set_weighting(&mut self, weighting: f32) {
        self.weighting = weighting.clamp(0.0, 1.0);
    }
}

impl Default for GridCell {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl PathCell for GridCell {
    #[inline]
    fn is_walkable(&self) -> bool {
        self.walkable
    }

    #[inline]
    fn weighting(&self) -> f32 {
        self.weighting
    }

    #[inline]
    fn world_position(&self) -> Vec3 {
        self.world
    }

    #[inline]
    fn diagonal_mode(&self) -> DiagonalMode {
        self.diagonal
    }
}
