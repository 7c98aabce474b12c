#![forbid(unsafe_code)]

//! Geometric primitives shared by the solver and the gesture layer.
//!
//! All values are `f64` in the host's transform units (CSS pixels for a
//! browser host). [`BoundingBox`] is the only viewport-space type; every
//! other value lives in applied-transform space.

use std::ops::{Add, Sub};

use bitflags::bitflags;

/// One of the two drag axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Both axes, in x-then-y order.
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// The flag corresponding to this axis.
    #[must_use]
    pub const fn flag(self) -> Axes {
        match self {
            Self::X => Axes::X,
            Self::Y => Axes::Y,
        }
    }
}

bitflags! {
    /// Set of axes a drag may move along.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Axes: u8 {
        /// Horizontal movement.
        const X = 0b01;
        /// Vertical movement.
        const Y = 0b10;
    }
}

impl Axes {
    /// Whether `axis` is part of the set.
    #[inline]
    #[must_use]
    pub const fn has(self, axis: Axis) -> bool {
        self.contains(axis.flag())
    }
}

/// A value per axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisPair<T> {
    pub x: T,
    pub y: T,
}

impl<T> AxisPair<T> {
    /// Create a pair from its components.
    #[must_use]
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Borrow the component for `axis`.
    #[inline]
    pub fn get(&self, axis: Axis) -> &T {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    /// Mutably borrow the component for `axis`.
    #[inline]
    pub fn get_mut(&mut self, axis: Axis) -> &mut T {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }

    /// Apply `f` to each component, passing its axis.
    pub fn map<U>(self, mut f: impl FnMut(Axis, T) -> U) -> AxisPair<U> {
        AxisPair {
            x: f(Axis::X, self.x),
            y: f(Axis::Y, self.y),
        }
    }
}

/// A 2D point or vector.
pub type Point = AxisPair<f64>;

impl Point {
    /// The origin.
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    /// Euclidean length.
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Whether both components are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A measured rectangle in viewport coordinates, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
}

impl BoundingBox {
    /// Create a box from its edges.
    #[must_use]
    pub const fn new(top: f64, left: f64, right: f64, bottom: f64) -> Self {
        Self {
            top,
            left,
            right,
            bottom,
        }
    }

    /// Create a box from an origin and a size.
    #[must_use]
    pub fn from_origin_size(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self::new(top, left, left + width, top + height)
    }

    /// Horizontal extent.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Vertical extent.
    #[inline]
    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// The `(start, end)` edges along `axis`.
    #[inline]
    #[must_use]
    pub fn span(&self, axis: Axis) -> (f64, f64) {
        match axis {
            Axis::X => (self.left, self.right),
            Axis::Y => (self.top, self.bottom),
        }
    }

    /// The same box moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Point) -> Self {
        Self::new(
            self.top + offset.y,
            self.left + offset.x,
            self.right + offset.x,
            self.bottom + offset.y,
        )
    }

    /// Whether every edge is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.top.is_finite()
            && self.left.is_finite()
            && self.right.is_finite()
            && self.bottom.is_finite()
    }
}
