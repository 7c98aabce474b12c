#![forbid(unsafe_code)]

//! Boundary constraint solving.
//!
//! Maps raw drag offsets to constrained offsets and resolves drag bounds from
//! either a container's geometry or explicit pixel limits.
//!
//! # Elastic law
//!
//! One law is used everywhere a point escapes its bounds:
//!
//! ```text
//! constrained = bound + (point - bound) * elastic
//! ```
//!
//! i.e. a linear mix between the violated bound and the raw point. A factor of
//! `0` is a hard clamp and `1` applies no resistance. The factor may differ per
//! side ([`Elastic::PerSide`]).
//!
//! # Coordinate frame
//!
//! [`Bounds`] are expressed in applied-transform units, the same frame as the
//! values being dragged. Container bounds are derived from a bounding-box
//! snapshot and shifted by the drag origin so that they remain valid in that
//! frame.

use crate::error::ConfigError;
use crate::geometry::{Axis, AxisPair, BoundingBox, Point};

/// Elastic factor used when elasticity is switched on without a value.
pub const DEFAULT_ELASTIC: f64 = 0.35;

/// Movable range along one axis. Either side may be infinite.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl Bounds {
    /// No limits in either direction.
    pub const UNBOUNDED: Bounds = Bounds {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    /// Create bounds, swapping the sides if they arrive inverted.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        if min > max {
            Self { min: max, max: min }
        } else {
            Self { min, max }
        }
    }

    /// Whether `value` lies within `[min, max]`.
    #[inline]
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Hard clamp `value` into the range.
    #[inline]
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// The bound `value` has escaped past, if any.
    #[must_use]
    pub fn violated(&self, value: f64) -> Option<f64> {
        if value < self.min {
            Some(self.min)
        } else if value > self.max {
            Some(self.max)
        } else {
            None
        }
    }

    /// Whether neither side is finite.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.min == f64::NEG_INFINITY && self.max == f64::INFINITY
    }
}

/// How far a dragged point may overshoot its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "factor", rename_all = "snake_case"))]
pub enum Elastic {
    /// Hard walls.
    #[default]
    Disabled,
    /// The same factor on both sides.
    Uniform(f64),
    /// Separate factors for the `min` and `max` sides.
    PerSide { min: f64, max: f64 },
}

impl From<bool> for Elastic {
    fn from(enabled: bool) -> Self {
        if enabled {
            Self::Uniform(DEFAULT_ELASTIC)
        } else {
            Self::Disabled
        }
    }
}

impl From<f64> for Elastic {
    fn from(factor: f64) -> Self {
        Self::Uniform(factor)
    }
}

impl Elastic {
    /// Whether any side allows overshoot.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        match *self {
            Self::Disabled => false,
            Self::Uniform(factor) => factor != 0.0,
            Self::PerSide { min, max } => min != 0.0 || max != 0.0,
        }
    }

    /// Factor applied below `min`, clamped to `[0, 1]`.
    #[must_use]
    pub fn min_factor(&self) -> f64 {
        match *self {
            Self::Disabled => 0.0,
            Self::Uniform(factor) | Self::PerSide { min: factor, .. } => unit(factor),
        }
    }

    /// Factor applied above `max`, clamped to `[0, 1]`.
    #[must_use]
    pub fn max_factor(&self) -> f64 {
        match *self {
            Self::Disabled => 0.0,
            Self::Uniform(factor) | Self::PerSide { max: factor, .. } => unit(factor),
        }
    }

    /// Reject factors outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let check = |value: f64| {
            if value.is_finite() && (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::ElasticOutOfRange { value })
            }
        };
        match *self {
            Self::Disabled => Ok(()),
            Self::Uniform(factor) => check(factor),
            Self::PerSide { min, max } => check(min).and(check(max)),
        }
    }
}

fn unit(factor: f64) -> f64 {
    if factor.is_nan() {
        0.0
    } else {
        factor.clamp(0.0, 1.0)
    }
}

/// Linear mix from `from` to `to` by `progress`.
#[inline]
fn mix(from: f64, to: f64, progress: f64) -> f64 {
    from + (to - from) * progress
}

/// Constrain `point` to `bounds`, letting it overshoot by `elastic`.
///
/// Points inside the bounds are returned unchanged. Outside, the result is
/// `bound + (point - bound) * factor`, which is a hard clamp for
/// [`Elastic::Disabled`].
#[must_use]
pub fn constrain(point: f64, bounds: Bounds, elastic: Elastic) -> f64 {
    if point < bounds.min {
        mix(bounds.min, point, elastic.min_factor())
    } else if point > bounds.max {
        mix(bounds.max, point, elastic.max_factor())
    } else {
        point
    }
}

/// Explicit per-side limits in transform units. Missing sides are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelLimits {
    #[cfg_attr(feature = "serde", serde(default))]
    pub top: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub left: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub right: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bottom: Option<f64>,
}

impl PixelLimits {
    /// Limits along the horizontal axis only.
    #[must_use]
    pub const fn horizontal(left: f64, right: f64) -> Self {
        Self {
            top: None,
            left: Some(left),
            right: Some(right),
            bottom: None,
        }
    }

    /// Limits along the vertical axis only.
    #[must_use]
    pub const fn vertical(top: f64, bottom: f64) -> Self {
        Self {
            top: Some(top),
            left: None,
            right: None,
            bottom: Some(bottom),
        }
    }

    /// Limits on all four sides.
    #[must_use]
    pub const fn all(top: f64, left: f64, right: f64, bottom: f64) -> Self {
        Self {
            top: Some(top),
            left: Some(left),
            right: Some(right),
            bottom: Some(bottom),
        }
    }

    fn sides(&self, axis: Axis) -> (Option<f64>, Option<f64>) {
        match axis {
            Axis::X => (self.left, self.right),
            Axis::Y => (self.top, self.bottom),
        }
    }
}

/// Where a drag's bounds come from, with any geometry already measured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundsSource {
    /// No constraints.
    Unbounded,
    /// Explicit limits.
    Pixels(PixelLimits),
    /// Keep the element's box inside the container's box.
    Container {
        container: BoundingBox,
        element: BoundingBox,
    },
}

const AXES: AxisPair<Axis> = AxisPair::new(Axis::X, Axis::Y);

/// Resolve per-axis bounds for a drag starting at transform `origin`.
///
/// Container geometry must be a snapshot taken at the start of this drag:
/// `element` already includes the transform `origin`, so the room left on each
/// side is added to `origin` to land back in transform space. An element
/// larger than its container gets its sides swapped, letting it travel far
/// enough to reveal either edge.
#[must_use]
pub fn resolve_bounds(source: &BoundsSource, origin: Point) -> AxisPair<Bounds> {
    match source {
        BoundsSource::Unbounded => AxisPair::new(Bounds::UNBOUNDED, Bounds::UNBOUNDED),
        BoundsSource::Pixels(limits) => AXES.map(|_, axis| {
            let (min, max) = limits.sides(axis);
            Bounds::new(
                min.unwrap_or(f64::NEG_INFINITY),
                max.unwrap_or(f64::INFINITY),
            )
        }),
        BoundsSource::Container { container, element } => {
            AXES.map(|_, axis| {
                let (container_start, container_end) = container.span(axis);
                let (element_start, element_end) = element.span(axis);
                let start = *origin.get(axis);
                Bounds::new(
                    start + (container_start - element_start),
                    start + (container_end - element_end),
                )
            })
        }
    }
}
