//! Geometry primitives: [`Index`], [`Vec3`] and [`Aabb`].
//!
//! [`Index`] addresses grid cells; [`Vec3`] / [`Aabb`] describe the world
//! space those cells are embedded in.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Sub};

// ---------------------------------------------------------------------------
// Index
// ---------------------------------------------------------------------------

/// A 2D integer grid coordinate. X grows right, Y grows down.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Index {
    pub x: i32,
    pub y: i32,
}

impl Index {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new index.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return an index shifted by (dx, dy).
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Whether `self` and `other` differ in both components, i.e. a step
    /// between them would be a diagonal move.
    #[inline]
    pub const fn is_diagonal_to(self, other: Self) -> bool {
        self.x != other.x && self.y != other.y
    }
}

// --- trait impls for Index ---

impl Hash for Index {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
    }
}

impl PartialOrd for Index {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Index {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Index {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Index {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<i32> for Index {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<i32> for Index {
    type Output = Self;
    #[inline]
    fn div(self, rhs: i32) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

// ---------------------------------------------------------------------------
// Vec3
// ---------------------------------------------------------------------------

/// A 3-component world position.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    /// Origin (0, 0, 0).
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Squared Euclidean distance to `other`.
    #[inline]
    pub fn distance_squared(self, other: Self) -> f32 {
        let d = self - other;
        d.x * d.x + d.y * d.y + d.z * d.z
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Self) -> f32 {
        self.distance_squared(other).sqrt()
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Add for Vec3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

// ---------------------------------------------------------------------------
// Aabb
// ---------------------------------------------------------------------------

/// An axis-aligned bounding box in world space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from its corners. Components are normalised so that
    /// `min <= max` holds per axis.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: Vec3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Vec3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Return the box grown by `padding` on every side.
    pub fn expanded(self, padding: f32) -> Self {
        let p = Vec3::new(padding, padding, padding);
        Self {
            min: self.min - p,
            max: self.max + p,
        }
    }

    /// Whether `point` lies inside the box (inclusive on all faces).
    pub fn contains(self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_arithmetic() {
        let a = Index::new(2, 3);
        let b = Index::new(-1, 4);
        assert_eq!(a + b, Index::new(1, 7));
        assert_eq!(a - b, Index::new(3, -1));
        assert_eq!(a * 2, Index::new(4, 6));
        assert_eq!(a.shift(1, -1), Index::new(3, 2));
        assert_eq!(Index::ZERO, Index::new(0, 0));
    }

    #[test]
    fn index_diagonality() {
        let c = Index::new(1, 1);
        assert!(c.is_diagonal_to(Index::new(0, 0)));
        assert!(c.is_diagonal_to(Index::new(2, 0)));
        assert!(!c.is_diagonal_to(Index::new(0, 1)));
        assert!(!c.is_diagonal_to(Index::new(1, 0)));
    }

    #[test]
    fn index_ordering_row_major() {
        let mut v = vec![Index::new(1, 1), Index::new(0, 2), Index::new(2, 0)];
        v.sort();
        assert_eq!(v, vec![Index::new(2, 0), Index::new(1, 1), Index::new(0, 2)]);
    }

    #[test]
    fn vec3_distances() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 4.0, 0.0);
        assert_eq!(a.distance_squared(b), 25.0);
        assert_eq!(a.distance(b), 5.0);
    }

    #[test]
    fn aabb_normalises_corners() {
        let b = Aabb::new(Vec3::new(2.0, 0.0, 5.0), Vec3::new(-1.0, 3.0, 4.0));
        assert_eq!(b.min, Vec3::new(-1.0, 0.0, 4.0));
        assert_eq!(b.max, Vec3::new(2.0, 3.0, 5.0));
    }

    #[test]
    fn aabb_contains_and_expand() {
        let b = Aabb::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0));
        assert!(b.contains(Vec3::new(0.5, 0.5, 0.5)));
        assert!(b.contains(Vec3::new(1.0, 1.0, 1.0)));
        assert!(!b.contains(Vec3::new(1.1, 0.5, 0.5)));
        assert!(b.expanded(0.5).contains(Vec3::new(1.4, -0.4, 0.0)));
    }
}
