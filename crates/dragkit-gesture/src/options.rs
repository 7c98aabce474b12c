#![forbid(unsafe_code)]

//! Drag configuration.
//!
//! [`DragOptions`] is fixed for the lifetime of a controller and validated
//! once by [`crate::DragController::attach`].

use dragkit_core::{Axes, Axis, ConfigError, Elastic, PhysicsOverrides, PixelLimits};
use thiserror::Error;

/// Default stiffness of the settle spring.
pub const DEFAULT_SETTLE_STIFFNESS: f64 = 400.0;
/// Default damping of the settle spring.
pub const DEFAULT_SETTLE_DAMPING: f64 = 40.0;

/// Axes the element may be dragged along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DragAxis {
    #[default]
    Both,
    X,
    Y,
}

impl DragAxis {
    /// The axes this setting enables.
    #[must_use]
    pub const fn axes(self) -> Axes {
        match self {
            Self::Both => Axes::all(),
            Self::X => Axes::X,
            Self::Y => Axes::Y,
        }
    }
}

/// Where a drag's bounds come from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "limits", rename_all = "snake_case"))]
pub enum DragConstraints {
    /// Free movement.
    #[default]
    None,
    /// Explicit limits on the applied transform.
    Pixels(PixelLimits),
    /// Keep the element inside the host's container, measured at every drag
    /// start.
    Container,
}

/// How a release without momentum reaches its target.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum SettleTransition {
    /// Jump straight to the target.
    Instant,
    /// Spring to the target over the following frames.
    Spring { stiffness: f64, damping: f64 },
}

impl Default for SettleTransition {
    fn default() -> Self {
        Self::Spring {
            stiffness: DEFAULT_SETTLE_STIFFNESS,
            damping: DEFAULT_SETTLE_DAMPING,
        }
    }
}

/// Invalid drag configuration.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DragConfigError {
    #[error(transparent)]
    Physics(#[from] ConfigError),

    #[error("pixel limit `{side}` must be finite (got {value})")]
    NonFiniteLimit { side: &'static str, value: f64 },

    #[error("pixel limits on the {axis:?} axis are inverted ({min} > {max})")]
    InvertedLimits { axis: Axis, min: f64, max: f64 },
}

/// Drag behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DragOptions {
    pub axis: DragAxis,
    pub constraints: DragConstraints,
    /// Overshoot allowed past the constraints while dragging.
    pub elastic: Elastic,
    /// Carry release velocity into inertia.
    pub momentum: bool,
    pub physics: PhysicsOverrides,
    /// Commit to one axis once movement clearly favors it.
    pub direction_lock: bool,
    /// Return to the drag origin on release.
    pub snap_to_origin: bool,
    /// Transition for releases that skip momentum.
    pub settle: SettleTransition,
}

impl Default for DragOptions {
    fn default() -> Self {
        Self {
            axis: DragAxis::Both,
            constraints: DragConstraints::None,
            elastic: Elastic::from(true),
            momentum: true,
            physics: PhysicsOverrides::default(),
            direction_lock: false,
            snap_to_origin: false,
            settle: SettleTransition::default(),
        }
    }
}

impl DragOptions {
    #[must_use]
    pub fn with_axis(mut self, axis: DragAxis) -> Self {
        self.axis = axis;
        self
    }

    #[must_use]
    pub fn with_constraints(mut self, constraints: DragConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Set the overshoot factor; accepts an [`Elastic`], a `bool` or an `f64`.
    #[must_use]
    pub fn with_elastic(mut self, elastic: impl Into<Elastic>) -> Self {
        self.elastic = elastic.into();
        self
    }

    #[must_use]
    pub fn with_momentum(mut self, momentum: bool) -> Self {
        self.momentum = momentum;
        self
    }

    #[must_use]
    pub fn with_physics(mut self, physics: PhysicsOverrides) -> Self {
        self.physics = physics;
        self
    }

    #[must_use]
    pub fn with_direction_lock(mut self, direction_lock: bool) -> Self {
        self.direction_lock = direction_lock;
        self
    }

    #[must_use]
    pub fn with_snap_to_origin(mut self, snap_to_origin: bool) -> Self {
        self.snap_to_origin = snap_to_origin;
        self
    }

    #[must_use]
    pub fn with_settle(mut self, settle: SettleTransition) -> Self {
        self.settle = settle;
        self
    }

    /// Check every value the controller will rely on.
    pub fn validate(&self) -> Result<(), DragConfigError> {
        self.elastic.validate()?;
        self.physics.validate()?;

        if let SettleTransition::Spring { stiffness, damping } = self.settle {
            if !stiffness.is_finite() || stiffness <= 0.0 {
                return Err(ConfigError::NonPositive {
                    field: "settle.stiffness",
                    value: stiffness,
                }
                .into());
            }
            if !damping.is_finite() || damping <= 0.0 {
                return Err(ConfigError::NonPositive {
                    field: "settle.damping",
                    value: damping,
                }
                .into());
            }
        }

        if let DragConstraints::Pixels(limits) = self.constraints {
            validate_limits(&limits)?;
        }
        Ok(())
    }
}

fn validate_limits(limits: &PixelLimits) -> Result<(), DragConfigError> {
    let sides = [
        ("top", limits.top),
        ("left", limits.left),
        ("right", limits.right),
        ("bottom", limits.bottom),
    ];
    for (side, value) in sides {
        if let Some(value) = value
            && !value.is_finite()
        {
            return Err(DragConfigError::NonFiniteLimit { side, value });
        }
    }

    let pairs = [
        (Axis::X, limits.left, limits.right),
        (Axis::Y, limits.top, limits.bottom),
    ];
    for (axis, min, max) in pairs {
        if let (Some(min), Some(max)) = (min, max)
            && min > max
        {
            return Err(DragConfigError::InvertedLimits { axis, min, max });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = DragOptions::default();
        assert_eq!(options.axis, DragAxis::Both);
        assert_eq!(options.constraints, DragConstraints::None);
        assert_eq!(options.elastic, Elastic::Uniform(0.35));
        assert!(options.momentum);
        assert!(!options.direction_lock);
        assert!(!options.snap_to_origin);
        assert_eq!(
            options.settle,
            SettleTransition::Spring {
                stiffness: 400.0,
                damping: 40.0
            }
        );
        assert!(options.validate().is_ok());
    }

    #[test]
    fn axis_flags() {
        assert_eq!(DragAxis::Both.axes(), Axes::X | Axes::Y);
        assert!(DragAxis::X.axes().has(Axis::X));
        assert!(!DragAxis::X.axes().has(Axis::Y));
    }

    #[test]
    fn builder_accepts_elastic_shapes() {
        assert_eq!(
            DragOptions::default().with_elastic(false).elastic,
            Elastic::Disabled
        );
        assert_eq!(
            DragOptions::default().with_elastic(0.2).elastic,
            Elastic::Uniform(0.2)
        );
    }

    #[test]
    fn rejects_out_of_range_elastic() {
        let err = DragOptions::default()
            .with_elastic(1.5)
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            DragConfigError::Physics(ConfigError::ElasticOutOfRange { value: 1.5 })
        );
    }

    #[test]
    fn rejects_bad_physics_and_settle() {
        let bad = DragOptions::default()
            .with_physics(PhysicsOverrides::default().with_bounce(-1.0, 10.0));
        assert!(matches!(
            bad.validate(),
            Err(DragConfigError::Physics(ConfigError::NonPositive { .. }))
        ));

        let bad = DragOptions::default().with_settle(SettleTransition::Spring {
            stiffness: 100.0,
            damping: f64::NAN,
        });
        assert!(bad.validate().is_err());
        assert!(
            DragOptions::default()
                .with_settle(SettleTransition::Instant)
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn rejects_undamped_settle_spring() {
        let undamped = DragOptions::default().with_settle(SettleTransition::Spring {
            stiffness: 400.0,
            damping: 0.0,
        });
        assert_eq!(
            undamped.validate(),
            Err(DragConfigError::Physics(ConfigError::NonPositive {
                field: "settle.damping",
                value: 0.0
            }))
        );
    }

    #[test]
    fn rejects_zero_rest_thresholds() {
        let never_rests = DragOptions::default()
            .with_elastic(false)
            .with_constraints(DragConstraints::Pixels(PixelLimits::horizontal(-100.0, 100.0)))
            .with_physics(PhysicsOverrides::default().with_rest(0.0, 0.0));
        assert!(matches!(
            never_rests.validate(),
            Err(DragConfigError::Physics(ConfigError::NonPositive {
                field: "rest_delta",
                ..
            }))
        ));
    }

    #[test]
    fn rejects_bad_limits() {
        let inverted =
            DragOptions::default().with_constraints(DragConstraints::Pixels(PixelLimits::horizontal(50.0, -50.0)));
        assert_eq!(
            inverted.validate(),
            Err(DragConfigError::InvertedLimits {
                axis: Axis::X,
                min: 50.0,
                max: -50.0
            })
        );

        let infinite = DragOptions::default().with_constraints(DragConstraints::Pixels(PixelLimits {
            bottom: Some(f64::INFINITY),
            ..PixelLimits::default()
        }));
        assert!(matches!(
            infinite.validate(),
            Err(DragConfigError::NonFiniteLimit { side: "bottom", .. })
        ));
    }
}
