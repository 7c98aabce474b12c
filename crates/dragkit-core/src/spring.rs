#![forbid(unsafe_code)]

//! Damped harmonic oscillator (spring) with unit mass.
//!
//! ```text
//! F = -stiffness × (position - target) - damping × velocity
//! ```
//!
//! # Parameters
//!
//! - **stiffness** (k): restoring force strength.
//! - **damping** (c): velocity drag.
//!   - Underdamped (c < 2√k): oscillates past target before settling
//!   - Critically damped (c ≈ 2√k): fastest convergence without overshoot
//!   - Overdamped (c > 2√k): slow convergence, no overshoot
//!
//! # Integration
//!
//! Fixed substeps of at most [`MAX_STEP_SECS`]. Each substep solves the
//! velocity with the force evaluated at the end of the step, then moves the
//! position with the new velocity:
//!
//! ```text
//! v' = (v - k·dt·(x - target)) / (1 + c·dt + k·dt²)
//! x' = x + v'·dt
//! ```
//!
//! The explicit form diverges once `c·dt` exceeds 2, which the rigid-wall
//! constants (`c = 10⁷`) do at any practical step size. The end-of-step form
//! is stable for every non-negative `k` and `c` and never overshoots when the
//! spring is overdamped.
//!
//! # Invariants
//!
//! 1. Stiffness is at least [`MIN_STIFFNESS`]; damping is non-negative.
//! 2. A spring at rest stays at rest.
//! 3. On coming to rest the position snaps exactly to the target and the
//!    velocity to zero.

/// Maximum integration substep, in seconds.
pub const MAX_STEP_SECS: f64 = 0.004;

/// Minimum stiffness to prevent degenerate springs.
pub const MIN_STIFFNESS: f64 = 0.1;

/// A damped spring pulling a value toward a target.
#[derive(Debug, Clone, PartialEq)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    damping: f64,
    rest_delta: f64,
    rest_speed: f64,
    at_rest: bool,
}

impl Spring {
    /// Create a spring at `position`, at rest velocity, pulling toward
    /// `target`.
    ///
    /// Defaults: stiffness 170, damping 26, rest delta 0.001, rest speed 0.01.
    #[must_use]
    pub fn new(position: f64, target: f64) -> Self {
        Self {
            position,
            velocity: 0.0,
            target,
            stiffness: 170.0,
            damping: 26.0,
            rest_delta: 0.001,
            rest_speed: 0.01,
            at_rest: false,
        }
    }

    /// Set the initial velocity (builder pattern).
    #[must_use]
    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set stiffness (builder pattern). Clamped to [`MIN_STIFFNESS`].
    #[must_use]
    pub fn with_stiffness(mut self, k: f64) -> Self {
        self.stiffness = if k.is_nan() { MIN_STIFFNESS } else { k.max(MIN_STIFFNESS) };
        self
    }

    /// Set damping (builder pattern). Clamped to minimum 0.0.
    #[must_use]
    pub fn with_damping(mut self, c: f64) -> Self {
        self.damping = if c.is_nan() { 0.0 } else { c.max(0.0) };
        self
    }

    /// Set the rest thresholds (builder pattern).
    #[must_use]
    pub fn with_rest(mut self, delta: f64, speed: f64) -> Self {
        self.rest_delta = delta.abs();
        self.rest_speed = speed.abs();
        self
    }

    /// Current position.
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current target.
    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// One substep of `dt` seconds.
    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let denominator = 1.0 + self.damping * dt + self.stiffness * dt * dt;
        self.velocity = (self.velocity - self.stiffness * dt * displacement) / denominator;
        self.position += self.velocity * dt;
    }

    fn within_rest(&self) -> bool {
        (self.position - self.target).abs() <= self.rest_delta
            && self.velocity.abs() <= self.rest_speed
    }

    /// Advance the spring by `dt_secs`, subdividing into fixed substeps.
    ///
    /// Returns `true` once the spring is at rest.
    pub fn advance(&mut self, dt_secs: f64) -> bool {
        if self.at_rest {
            return true;
        }

        if self.within_rest() {
            self.settle();
            return true;
        }

        if !dt_secs.is_finite() || dt_secs <= 0.0 {
            return false;
        }

        let mut remaining = dt_secs;
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }

        if self.within_rest() {
            self.settle();
        }
        self.at_rest
    }

    fn settle(&mut self) {
        self.position = self.target;
        self.velocity = 0.0;
        self.at_rest = true;
    }
}
