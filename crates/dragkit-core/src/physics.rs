#![forbid(unsafe_code)]

//! Physics parameter derivation.
//!
//! Turns the single elasticity knob plus optional overrides into the constants
//! shared by both axes' handoff solvers.
//!
//! | elastic   | bounce_stiffness | bounce_damping |
//! |-----------|------------------|----------------|
//! | enabled   | 200              | 40             |
//! | disabled  | 1 000 000        | 10 000 000     |
//!
//! The disabled pair is overdamped: a hard wall absorbs the
//! incoming velocity without a visible bounce. Overrides always win over the
//! table, whatever the elastic flag says.

use crate::constraints::Elastic;
use crate::error::{ConfigError, ensure_positive};

/// Default inertia time constant, in seconds.
pub const DEFAULT_TIME_CONSTANT_SECS: f64 = 0.75;
/// Default rest distance, in transform units.
pub const DEFAULT_REST_DELTA: f64 = 1.0;
/// Default rest speed, in transform units per second.
pub const DEFAULT_REST_SPEED: f64 = 10.0;
/// Default inertia power (scale applied to the release velocity).
pub const DEFAULT_POWER: f64 = 1.0;

const ELASTIC_BOUNCE_STIFFNESS: f64 = 200.0;
const ELASTIC_BOUNCE_DAMPING: f64 = 40.0;
const RIGID_BOUNCE_STIFFNESS: f64 = 1_000_000.0;
const RIGID_BOUNCE_DAMPING: f64 = 10_000_000.0;

/// Lower bound on the time constant once converted to milliseconds.
const MIN_TIME_CONSTANT_MS: f64 = 1.0;

/// Simulation constants for one release, shared by both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundaryPhysics {
    /// Inertia decay time constant in milliseconds (at least 1).
    pub time_constant_ms: f64,
    /// Distance from the target below which a spring may rest.
    pub rest_delta: f64,
    /// Speed below which motion may rest.
    pub rest_speed: f64,
    /// Spring stiffness used once a boundary is engaged.
    pub bounce_stiffness: f64,
    /// Spring damping used once a boundary is engaged.
    pub bounce_damping: f64,
    /// Scale applied to release velocity when computing inertia reach.
    pub power: f64,
}

impl Default for BoundaryPhysics {
    fn default() -> Self {
        derive(Elastic::Disabled, &PhysicsOverrides::default())
    }
}

impl BoundaryPhysics {
    /// The time constant in seconds.
    #[inline]
    #[must_use]
    pub fn time_constant_secs(&self) -> f64 {
        self.time_constant_ms / 1000.0
    }
}

/// Explicit values that replace the derived defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PhysicsOverrides {
    pub bounce_stiffness: Option<f64>,
    pub bounce_damping: Option<f64>,
    /// Inertia time constant in seconds.
    pub time_constant: Option<f64>,
    pub rest_delta: Option<f64>,
    pub rest_speed: Option<f64>,
    pub power: Option<f64>,
}

impl PhysicsOverrides {
    /// Override the bounce spring.
    #[must_use]
    pub fn with_bounce(mut self, stiffness: f64, damping: f64) -> Self {
        self.bounce_stiffness = Some(stiffness);
        self.bounce_damping = Some(damping);
        self
    }

    /// Override the inertia time constant, in seconds.
    #[must_use]
    pub fn with_time_constant(mut self, seconds: f64) -> Self {
        self.time_constant = Some(seconds);
        self
    }

    /// Override the rest thresholds.
    #[must_use]
    pub fn with_rest(mut self, delta: f64, speed: f64) -> Self {
        self.rest_delta = Some(delta);
        self.rest_speed = Some(speed);
        self
    }

    /// Override the inertia power.
    #[must_use]
    pub fn with_power(mut self, power: f64) -> Self {
        self.power = Some(power);
        self
    }

    /// Reject values the solvers cannot work with.
    ///
    /// Every override must be finite and strictly positive. A zero rest
    /// threshold can never be met, so a release would never settle.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(value) = self.bounce_stiffness {
            ensure_positive("bounce_stiffness", value)?;
        }
        if let Some(value) = self.bounce_damping {
            ensure_positive("bounce_damping", value)?;
        }
        if let Some(value) = self.time_constant {
            ensure_positive("time_constant", value)?;
        }
        if let Some(value) = self.rest_delta {
            ensure_positive("rest_delta", value)?;
        }
        if let Some(value) = self.rest_speed {
            ensure_positive("rest_speed", value)?;
        }
        if let Some(value) = self.power {
            ensure_positive("power", value)?;
        }
        Ok(())
    }
}

/// Derive the release physics for an elasticity setting.
///
/// Pure: the result depends only on the arguments and is reused for both axes.
#[must_use]
pub fn derive(elastic: Elastic, overrides: &PhysicsOverrides) -> BoundaryPhysics {
    let (stiffness, damping) = if elastic.is_enabled() {
        (ELASTIC_BOUNCE_STIFFNESS, ELASTIC_BOUNCE_DAMPING)
    } else {
        (RIGID_BOUNCE_STIFFNESS, RIGID_BOUNCE_DAMPING)
    };

    let time_constant_secs = overrides
        .time_constant
        .unwrap_or(DEFAULT_TIME_CONSTANT_SECS);

    BoundaryPhysics {
        time_constant_ms: (time_constant_secs * 1000.0).max(MIN_TIME_CONSTANT_MS),
        rest_delta: overrides.rest_delta.unwrap_or(DEFAULT_REST_DELTA),
        rest_speed: overrides.rest_speed.unwrap_or(DEFAULT_REST_SPEED),
        bounce_stiffness: overrides.bounce_stiffness.unwrap_or(stiffness),
        bounce_damping: overrides.bounce_damping.unwrap_or(damping),
        power: overrides.power.unwrap_or(DEFAULT_POWER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inelastic_is_overdamped() {
        let physics = derive(Elastic::Disabled, &PhysicsOverrides::default());
        assert_eq!(physics.bounce_stiffness, 1_000_000.0);
        assert_eq!(physics.bounce_damping, 10_000_000.0);

        let zero = derive(Elastic::Uniform(0.0), &PhysicsOverrides::default());
        assert_eq!(zero, physics);
    }

    #[test]
    fn elastic_uses_soft_bounce() {
        let physics = derive(Elastic::Uniform(0.5), &PhysicsOverrides::default());
        assert_eq!(physics.bounce_stiffness, 200.0);
        assert_eq!(physics.bounce_damping, 40.0);

        let flag = derive(Elastic::from(true), &PhysicsOverrides::default());
        assert_eq!(flag.bounce_stiffness, 200.0);
    }

    #[test]
    fn defaults() {
        let physics = BoundaryPhysics::default();
        assert_eq!(physics.time_constant_ms, 750.0);
        assert_eq!(physics.rest_delta, 1.0);
        assert_eq!(physics.rest_speed, 10.0);
        assert_eq!(physics.power, 1.0);
        assert!((physics.time_constant_secs() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn overrides_win_regardless_of_elastic() {
        let overrides = PhysicsOverrides::default()
            .with_bounce(500.0, 10.0)
            .with_rest(0.5, 2.0)
            .with_time_constant(0.3)
            .with_power(0.8);
        for elastic in [Elastic::Disabled, Elastic::Uniform(0.2)] {
            let physics = derive(elastic, &overrides);
            assert_eq!(physics.bounce_stiffness, 500.0);
            assert_eq!(physics.bounce_damping, 10.0);
            assert_eq!(physics.rest_delta, 0.5);
            assert_eq!(physics.rest_speed, 2.0);
            assert_eq!(physics.time_constant_ms, 300.0);
            assert_eq!(physics.power, 0.8);
        }
    }

    #[test]
    fn partial_override_keeps_derived_rest() {
        let overrides = PhysicsOverrides {
            bounce_damping: Some(12.0),
            ..PhysicsOverrides::default()
        };
        let physics = derive(Elastic::Uniform(0.5), &overrides);
        assert_eq!(physics.bounce_stiffness, 200.0);
        assert_eq!(physics.bounce_damping, 12.0);
    }

    #[test]
    fn time_constant_is_floored_at_one_millisecond() {
        let overrides = PhysicsOverrides::default().with_time_constant(0.0001);
        let physics = derive(Elastic::Disabled, &overrides);
        assert_eq!(physics.time_constant_ms, 1.0);
    }

    #[test]
    fn validation_rejects_nonsense() {
        assert!(PhysicsOverrides::default().validate().is_ok());
        let bad = PhysicsOverrides::default().with_time_constant(-1.0);
        assert!(matches!(
            bad.validate(),
            Err(ConfigError::NonPositive {
                field: "time_constant",
                ..
            })
        ));
        let bad = PhysicsOverrides::default().with_rest(f64::INFINITY, 1.0);
        assert!(bad.validate().is_err());
        let bad = PhysicsOverrides::default().with_bounce(0.0, 1.0);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn validation_rejects_zero_thresholds_damping_and_power() {
        let zeroes = [
            ("rest_delta", PhysicsOverrides::default().with_rest(0.0, 10.0)),
            ("rest_speed", PhysicsOverrides::default().with_rest(1.0, 0.0)),
            ("bounce_damping", PhysicsOverrides::default().with_bounce(200.0, 0.0)),
            ("power", PhysicsOverrides::default().with_power(0.0)),
        ];
        for (expected, overrides) in zeroes {
            assert_eq!(
                overrides.validate(),
                Err(ConfigError::NonPositive {
                    field: expected,
                    value: 0.0
                }),
                "{expected} = 0 must be rejected"
            );
        }
    }
}
