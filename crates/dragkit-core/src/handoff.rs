#![forbid(unsafe_code)]

//! Inertia→spring handoff solver.
//!
//! One solver drives one axis after release. Motion starts as exponentially
//! decaying inertia, evaluated in closed form:
//!
//! ```text
//! x(t) = x0 + A·(1 − e^(−t/τ))        A = power · v0 · τ
//! v(t) = (A/τ)·e^(−t/τ)
//! ```
//!
//! If the asymptote `x0 + A` lies beyond the boundary in the direction of
//! travel, the crossing time is solved exactly at construction:
//!
//! ```text
//! t_cross = −τ · ln(1 − Δ/A)          Δ = boundary − x0
//! ```
//!
//! Once `elapsed ≥ t_cross` the solver hands off to a [`Spring`] seeded with
//! the inertia position and velocity at `t_cross`, so both are continuous
//! across the switch. A release that starts outside the bounds skips inertia
//! and springs straight back to the violated boundary.
//!
//! # Invariants
//!
//! 1. Every sample is finite for finite inputs.
//! 2. A crossing time, when present, is finite and non-negative.
//! 3. `Done` is absorbing: once reported, the value never changes again.
//! 4. Steps must arrive with non-decreasing elapsed time; earlier steps are
//!    rejected and answered with the previous sample.

use tracing::{debug, warn};

use crate::constraints::Bounds;
use crate::physics::BoundaryPhysics;
use crate::spring::Spring;

/// Position and velocity of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisState {
    /// Applied-transform value.
    pub value: f64,
    /// Velocity in units per second.
    pub velocity: f64,
}

impl AxisState {
    /// Create an axis state.
    #[must_use]
    pub const fn new(value: f64, velocity: f64) -> Self {
        Self { value, velocity }
    }
}

/// Result of one solver step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSample {
    pub value: f64,
    pub done: bool,
}

/// Which part of the motion the solver is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoffPhase {
    Inertia,
    Spring,
    Done,
}

/// A scheduled boundary crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    /// Elapsed milliseconds at which inertia reaches the boundary.
    pub time_ms: f64,
    /// The boundary being crossed.
    pub boundary: f64,
}

#[derive(Debug, Clone)]
enum Mode {
    Inertia,
    Spring { spring: Spring, clock_ms: f64 },
    Done,
}

/// Stateful per-axis stepper for post-release motion.
#[derive(Debug, Clone)]
pub struct HandoffSolver {
    origin: f64,
    velocity: f64,
    amplitude: f64,
    bounds: Bounds,
    physics: BoundaryPhysics,
    target_modifier: Option<fn(f64) -> f64>,
    crossing: Option<Crossing>,
    mode: Mode,
    watermark_ms: f64,
    last: AxisSample,
}

impl HandoffSolver {
    /// Build a solver for an axis released at `initial` inside `bounds`.
    #[must_use]
    pub fn new(initial: AxisState, bounds: Bounds, physics: BoundaryPhysics) -> Self {
        let velocity = if initial.velocity.is_finite() {
            initial.velocity
        } else {
            0.0
        };
        let mut solver = Self {
            origin: initial.value,
            velocity,
            amplitude: 0.0,
            bounds,
            physics,
            target_modifier: None,
            crossing: None,
            mode: Mode::Inertia,
            watermark_ms: 0.0,
            last: AxisSample {
                value: initial.value,
                done: false,
            },
        };

        if let Some(boundary) = bounds.violated(initial.value) {
            debug!(
                value = initial.value,
                boundary, "release outside bounds, springing back immediately"
            );
            solver.mode = Mode::Spring {
                spring: solver.boundary_spring(initial.value, velocity, boundary),
                clock_ms: 0.0,
            };
        } else {
            solver.plan();
        }
        solver
    }

    /// Rewrite the inertia resting point, e.g. to snap it to a grid.
    ///
    /// The modifier receives the natural resting point `x0 + A` and returns
    /// the point to decay toward instead. Ignored once the solver has left
    /// the inertia phase.
    #[must_use]
    pub fn with_target_modifier(mut self, modifier: fn(f64) -> f64) -> Self {
        if matches!(self.mode, Mode::Inertia) {
            self.target_modifier = Some(modifier);
            self.plan();
        }
        self
    }

    /// Compute the inertia amplitude and any boundary crossing.
    fn plan(&mut self) {
        let tau = self.physics.time_constant_secs();
        let mut amplitude = self.physics.power * self.velocity * tau;
        if let Some(modifier) = self.target_modifier {
            let target = modifier(self.origin + amplitude);
            if target.is_finite() {
                amplitude = target - self.origin;
            }
        }
        if !amplitude.is_finite() {
            amplitude = 0.0;
        }
        self.amplitude = amplitude;
        self.crossing = crossing(
            self.origin,
            amplitude,
            self.bounds,
            self.physics.time_constant_ms,
        );
    }

    fn boundary_spring(&self, value: f64, velocity: f64, boundary: f64) -> Spring {
        Spring::new(value, boundary)
            .with_velocity(velocity)
            .with_stiffness(self.physics.bounce_stiffness)
            .with_damping(self.physics.bounce_damping)
            .with_rest(self.physics.rest_delta, self.physics.rest_speed)
    }

    /// Inertia position and velocity at `elapsed_ms`.
    fn inertia_at(&self, elapsed_ms: f64) -> AxisState {
        let decay = (-elapsed_ms / self.physics.time_constant_ms).exp();
        AxisState {
            value: self.origin + self.amplitude * (1.0 - decay),
            velocity: self.amplitude / self.physics.time_constant_secs() * decay,
        }
    }

    /// The point inertia decays toward.
    #[must_use]
    pub fn resting_point(&self) -> f64 {
        self.origin + self.amplitude
    }

    /// The scheduled boundary crossing, if inertia reaches one.
    #[must_use]
    pub fn crossing(&self) -> Option<Crossing> {
        self.crossing
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> HandoffPhase {
        match self.mode {
            Mode::Inertia => HandoffPhase::Inertia,
            Mode::Spring { .. } => HandoffPhase::Spring,
            Mode::Done => HandoffPhase::Done,
        }
    }

    /// The most recent sample.
    #[must_use]
    pub fn last_sample(&self) -> AxisSample {
        self.last
    }

    /// Position at `elapsed_ms` since release.
    pub fn step(&mut self, elapsed_ms: f64) -> AxisSample {
        if elapsed_ms.is_nan() || elapsed_ms < self.watermark_ms {
            warn!(
                elapsed_ms,
                watermark_ms = self.watermark_ms,
                "out-of-order handoff step rejected"
            );
            return self.last;
        }
        self.watermark_ms = elapsed_ms;

        if matches!(self.mode, Mode::Inertia) {
            match self.crossing {
                Some(crossing) if elapsed_ms >= crossing.time_ms => {
                    let at = self.inertia_at(crossing.time_ms);
                    debug!(
                        time_ms = crossing.time_ms,
                        boundary = crossing.boundary,
                        velocity = at.velocity,
                        "inertia crossed boundary, handing off to spring"
                    );
                    self.mode = Mode::Spring {
                        spring: self.boundary_spring(at.value, at.velocity, crossing.boundary),
                        clock_ms: crossing.time_ms,
                    };
                }
                _ => {
                    self.last = self.step_inertia(elapsed_ms);
                    return self.last;
                }
            }
        }

        self.last = match &mut self.mode {
            Mode::Spring { spring, clock_ms } => {
                let dt_secs = (elapsed_ms - *clock_ms) / 1000.0;
                *clock_ms = elapsed_ms;
                if spring.advance(dt_secs) {
                    let value = spring.target();
                    self.mode = Mode::Done;
                    AxisSample { value, done: true }
                } else {
                    AxisSample {
                        value: spring.position(),
                        done: false,
                    }
                }
            }
            Mode::Done => AxisSample {
                value: self.last.value,
                done: true,
            },
            Mode::Inertia => self.last,
        };
        self.last
    }

    fn step_inertia(&mut self, elapsed_ms: f64) -> AxisSample {
        let state = self.inertia_at(elapsed_ms);
        let slow = state.velocity.abs() <= self.physics.rest_speed;
        let arrived = match self.target_modifier {
            // A modified target is a destination; decay must actually reach it.
            Some(_) => (self.resting_point() - state.value).abs() <= self.physics.rest_delta,
            None => true,
        };
        if slow && arrived {
            self.mode = Mode::Done;
            let value = if self.target_modifier.is_some() {
                self.resting_point()
            } else {
                state.value
            };
            AxisSample { value, done: true }
        } else {
            AxisSample {
                value: state.value,
                done: false,
            }
        }
    }
}

/// Solve when inertia starting at `origin` with reach `amplitude` meets the
/// boundary in its direction of travel.
///
/// Returns `None` for zero reach, an infinite boundary, or a boundary at or
/// beyond the asymptote.
#[must_use]
pub fn crossing(origin: f64, amplitude: f64, bounds: Bounds, time_constant_ms: f64) -> Option<Crossing> {
    if amplitude == 0.0 || !amplitude.is_finite() {
        return None;
    }
    let boundary = if amplitude > 0.0 { bounds.max } else { bounds.min };
    if !boundary.is_finite() {
        return None;
    }
    let ratio = (boundary - origin) / amplitude;
    if !(0.0..1.0).contains(&ratio) {
        return None;
    }
    let time_ms = (-time_constant_ms * (1.0 - ratio).ln()).max(0.0);
    time_ms.is_finite().then_some(Crossing { time_ms, boundary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::Elastic;
    use crate::physics::{PhysicsOverrides, derive};

    fn rigid() -> BoundaryPhysics {
        derive(Elastic::Disabled, &PhysicsOverrides::default())
    }

    fn elastic() -> BoundaryPhysics {
        derive(Elastic::Uniform(0.5), &PhysicsOverrides::default())
    }

    fn run(solver: &mut HandoffSolver, frames: usize) -> Vec<AxisSample> {
        (1..=frames)
            .map(|frame| solver.step(frame as f64 * 16.0))
            .collect()
    }

    #[test]
    fn pure_inertia_settles_in_bounds() {
        let mut solver = HandoffSolver::new(
            AxisState::new(0.0, 1000.0),
            Bounds::new(-1000.0, 1000.0),
            rigid(),
        );
        assert!(solver.crossing().is_none());
        let samples = run(&mut solver, 600);
        let last = samples.last().copied().unwrap();
        assert!(last.done);
        assert!(last.value.abs() < 1000.0);
        assert!(last.value > 700.0, "reach should approach 750, got {}", last.value);
        assert!(samples.iter().all(|s| s.value.abs() < 1000.0));
        assert_ne!(solver.phase(), HandoffPhase::Spring);
    }

    #[test]
    fn inertia_is_continuous_at_start() {
        let mut solver = HandoffSolver::new(
            AxisState::new(10.0, 500.0),
            Bounds::UNBOUNDED,
            rigid(),
        );
        let sample = solver.step(0.0);
        assert_eq!(sample.value, 10.0);
        assert!(!sample.done);
    }

    #[test]
    fn zero_velocity_is_done_immediately() {
        let mut solver = HandoffSolver::new(
            AxisState::new(25.0, 0.0),
            Bounds::new(0.0, 100.0),
            rigid(),
        );
        assert!(solver.crossing().is_none());
        let sample = solver.step(0.0);
        assert!(sample.done);
        assert_eq!(sample.value, 25.0);
    }

    #[test]
    fn immediate_spring_when_released_out_of_bounds() {
        let mut solver = HandoffSolver::new(
            AxisState::new(120.0, 0.0),
            Bounds::new(-50.0, 50.0),
            elastic(),
        );
        assert_eq!(solver.phase(), HandoffPhase::Spring);
        let start = solver.step(0.0);
        assert!(!start.done);
        assert_eq!(start.value, 120.0);
        let later = solver.step(200.0);
        assert!(later.value < 120.0, "moved away from boundary: {}", later.value);
        assert!(later.value >= 50.0 - 1e-6);
    }

    #[test]
    fn rigid_oob_release_moves_toward_boundary() {
        let mut solver = HandoffSolver::new(
            AxisState::new(120.0, 0.0),
            Bounds::new(-50.0, 50.0),
            rigid(),
        );
        assert!(!solver.step(0.0).done);
        let later = solver.step(200.0);
        assert!(later.value < 120.0 && later.value > 50.0);
    }

    #[test]
    fn crossing_time_matches_closed_form() {
        let physics = rigid();
        let solver = HandoffSolver::new(
            AxisState::new(0.0, 2000.0),
            Bounds::new(-10.0, 60.0),
            physics,
        );
        let crossing = solver.crossing().unwrap();
        let expected = -750.0 * (1.0 - 60.0 / 1500.0_f64).ln();
        assert!((crossing.time_ms - expected).abs() < 1e-9);
        assert_eq!(crossing.boundary, 60.0);
    }

    #[test]
    fn crossing_hands_off_and_finishes_on_boundary() {
        let mut solver = HandoffSolver::new(
            AxisState::new(0.0, 2000.0),
            Bounds::new(-10.0, 60.0),
            rigid(),
        );
        let samples = run(&mut solver, 200);
        assert!(samples.iter().all(|s| s.value <= 61.0), "overshot the wall");
        let last = samples.last().copied().unwrap();
        assert!(last.done);
        assert_eq!(last.value, 60.0);
    }

    #[test]
    fn elastic_crossing_bounces_back_to_boundary() {
        let mut solver = HandoffSolver::new(
            AxisState::new(0.0, -2000.0),
            Bounds::new(-60.0, 10.0),
            elastic(),
        );
        let samples = run(&mut solver, 300);
        assert!(samples.iter().any(|s| s.value < -60.0), "no visible overshoot");
        let last = samples.last().copied().unwrap();
        assert!(last.done);
        assert_eq!(last.value, -60.0);
    }

    #[test]
    fn handoff_preserves_position_continuity() {
        let physics = elastic();
        let mut solver = HandoffSolver::new(
            AxisState::new(0.0, 2000.0),
            Bounds::new(-10.0, 60.0),
            physics,
        );
        let crossing = solver.crossing().unwrap();
        let before = solver.step(crossing.time_ms - 0.01);
        let after = solver.step(crossing.time_ms + 0.01);
        assert!((after.value - before.value).abs() < 0.1);
        assert_eq!(solver.phase(), HandoffPhase::Spring);
    }

    #[test]
    fn unreachable_boundary_has_no_crossing() {
        let solver = HandoffSolver::new(
            AxisState::new(0.0, 100.0),
            Bounds::new(-500.0, 500.0),
            rigid(),
        );
        assert!(solver.crossing().is_none());
        // Asymptote exactly on the boundary never crosses.
        assert!(crossing(0.0, 75.0, Bounds::new(-1.0, 75.0), 750.0).is_none());
        assert!(crossing(0.0, 0.0, Bounds::new(-1.0, 1.0), 750.0).is_none());
    }

    #[test]
    fn crossing_at_the_boundary_is_immediate() {
        let found = crossing(50.0, 300.0, Bounds::new(-50.0, 50.0), 750.0).unwrap();
        assert_eq!(found.time_ms, 0.0);
    }

    #[test]
    fn out_of_order_steps_are_rejected() {
        let mut solver = HandoffSolver::new(
            AxisState::new(0.0, 800.0),
            Bounds::UNBOUNDED,
            rigid(),
        );
        let later = solver.step(100.0);
        let stale = solver.step(50.0);
        assert_eq!(stale, later);
        let nan = solver.step(f64::NAN);
        assert_eq!(nan, later);
    }

    #[test]
    fn done_is_absorbing() {
        let mut solver = HandoffSolver::new(
            AxisState::new(0.0, 2000.0),
            Bounds::new(-10.0, 60.0),
            rigid(),
        );
        let settled = run(&mut solver, 200).last().copied().unwrap();
        assert!(settled.done);
        assert_eq!(solver.step(1_000_000.0), settled);
        assert_eq!(solver.phase(), HandoffPhase::Done);
    }

    #[test]
    fn non_finite_velocity_is_treated_as_rest() {
        let mut solver = HandoffSolver::new(
            AxisState::new(5.0, f64::NAN),
            Bounds::new(0.0, 10.0),
            rigid(),
        );
        let sample = solver.step(16.0);
        assert!(sample.value.is_finite());
        assert!(sample.done);
    }

    #[test]
    fn target_modifier_snaps_resting_point() {
        fn to_grid(point: f64) -> f64 {
            (point / 100.0).round() * 100.0
        }
        let mut solver = HandoffSolver::new(
            AxisState::new(0.0, 1000.0),
            Bounds::UNBOUNDED,
            rigid(),
        )
        .with_target_modifier(to_grid);
        assert_eq!(solver.resting_point(), 800.0);
        let last = run(&mut solver, 1000).last().copied().unwrap();
        assert!(last.done);
        assert_eq!(last.value, 800.0);
    }

    #[test]
    fn power_scales_reach() {
        let overrides = PhysicsOverrides::default().with_power(0.5);
        let physics = derive(Elastic::Disabled, &overrides);
        let solver = HandoffSolver::new(AxisState::new(0.0, 1000.0), Bounds::UNBOUNDED, physics);
        assert!((solver.resting_point() - 375.0).abs() < 1e-9);
    }
}
