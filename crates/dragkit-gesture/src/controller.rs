#![forbid(unsafe_code)]

//! Drag gesture state machine.
//!
//! [`DragController`] turns pointer events and frame callbacks into transform
//! writes through a [`DragHost`]. Every call returns a [`DragTransition`]
//! describing what happened, including explicit no-ops.
//!
//! # State Machine
//!
//! ```text
//! Idle ──down──▶ Dragging ──up/cancel──▶ Releasing ──settled──▶ Idle
//!                   ▲                        │
//!                   └──────────down──────────┘   (interrupts the release)
//! ```
//!
//! - **Dragging** captures the pointer, snapshots the origin from the applied
//!   transform and resolves bounds from live geometry.
//! - **Releasing** steps one motion per active axis on every
//!   [`DragController::on_frame`]: inertia/spring handoff when momentum is on,
//!   otherwise a settle spring toward a clamped target (or the origin).
//!
//! # Invariants
//!
//! 1. The applied transform is exactly the last value written to the host.
//!    Every drag starts from it, never from measured geometry.
//! 2. Bounds are resolved once per drag start and never change mid-drag.
//! 3. Once a direction lock resolves, the other axis stays at its origin for
//!    the rest of the drag and its release.
//! 4. `on_direction_lock` fires at most once per drag.
//! 5. Transition ids increase by one per returned transition.
//!
//! # Failure Modes
//!
//! - Missing or non-finite geometry on pointer-down: the drag does not start
//!   (`MissingGeometry` no-op) and any release in flight keeps running.
//! - Pointer capture failure: logged and ignored.
//! - A frame arriving after the release was interrupted or stopped: no-op.

use std::mem;
use std::time::Duration;

use dragkit_core::{
    Axes, Axis, AxisPair, AxisSample, AxisState, BoundaryPhysics, Bounds, BoundsSource,
    HandoffSolver, Point, Spring, VelocityRing, VelocitySample, constrain, derive,
    resolve_bounds,
};
use tracing::{debug, trace, warn};
use web_time::Instant;

use crate::callbacks::{DragCallbacks, DragInfo};
use crate::event::{PointerEvent, PointerEventKind};
use crate::host::{DragHost, MeasureTarget, TransformUpdate};
use crate::options::{DragConfigError, DragConstraints, DragOptions, SettleTransition};

/// Pointer travel, in viewport units, before a direction lock resolves.
pub const DIRECTION_LOCK_THRESHOLD: f64 = 4.0;

/// Changes smaller than this are not written while motion is in progress.
pub const WRITE_EPSILON: f64 = 0.01;

/// A release this long after the last pointer sample carries no velocity.
pub const STALE_VELOCITY_AFTER: Duration = Duration::from_millis(100);

/// How a release moves the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReleaseKind {
    /// Inertia handing off to a boundary spring.
    Momentum,
    /// A spring (or jump) to a fixed target.
    Settle,
}

/// Observable lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "phase", rename_all = "snake_case"))]
pub enum DragPhase {
    Idle,
    Dragging { pointer_id: u32 },
    Releasing { release: ReleaseKind },
}

/// Why an input was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DragNoopReason {
    Detached,
    NoActiveDrag,
    ActiveDragAlreadyInProgress,
    PointerMismatch,
    NonFinitePointer,
    MissingGeometry,
    NoReleaseInFlight,
}

/// What one transition did.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "effect", rename_all = "snake_case"))]
pub enum DragEffect {
    Started {
        pointer_id: u32,
        origin: Point,
    },
    /// A pointer-down cut a release short and started a new drag.
    Interrupted {
        pointer_id: u32,
        origin: Point,
    },
    Moved {
        applied: Point,
        written: bool,
    },
    DirectionLocked {
        axis: Axis,
        applied: Point,
    },
    Released {
        release: ReleaseKind,
        velocity: Point,
    },
    FrameStepped {
        applied: Point,
    },
    Settled {
        applied: Point,
    },
    Stopped {
        applied: Point,
    },
    Noop {
        reason: DragNoopReason,
    },
}

/// One state-machine step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DragTransition {
    pub transition_id: u64,
    pub from: DragPhase,
    pub to: DragPhase,
    pub effect: DragEffect,
}

const fn noop(reason: DragNoopReason) -> DragEffect {
    DragEffect::Noop { reason }
}

#[derive(Debug, Clone)]
struct DragSession {
    pointer_id: u32,
    /// Applied transform when the drag started.
    origin: Point,
    start_point: Point,
    last_point: Point,
    started_at: Instant,
    bounds: AxisPair<Bounds>,
    history: VelocityRing,
    lock: Option<Axis>,
}

impl DragSession {
    fn elapsed_secs(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.started_at).as_secs_f64()
    }

    fn offset(&self) -> Point {
        self.last_point - self.start_point
    }

    fn info(&self, delta: Point, velocity: Point) -> DragInfo {
        DragInfo {
            point: self.last_point,
            delta,
            offset: self.offset(),
            velocity,
        }
    }
}

#[derive(Debug, Clone)]
enum AxisMotion {
    Momentum(HandoffSolver),
    Settle { spring: Spring, clock_ms: f64 },
}

impl AxisMotion {
    fn step(&mut self, elapsed_ms: f64) -> AxisSample {
        match self {
            Self::Momentum(solver) => solver.step(elapsed_ms),
            Self::Settle { spring, clock_ms } => {
                let dt_secs = ((elapsed_ms - *clock_ms) / 1000.0).max(0.0);
                *clock_ms = clock_ms.max(elapsed_ms);
                let done = spring.advance(dt_secs);
                AxisSample {
                    value: spring.position(),
                    done,
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Release {
    kind: ReleaseKind,
    released_at: Instant,
    motion: AxisPair<Option<AxisMotion>>,
}

#[derive(Debug, Clone)]
enum State {
    Idle,
    Dragging(DragSession),
    Releasing(Release),
}

impl State {
    fn phase(&self) -> DragPhase {
        match self {
            Self::Idle => DragPhase::Idle,
            Self::Dragging(session) => DragPhase::Dragging {
                pointer_id: session.pointer_id,
            },
            Self::Releasing(release) => DragPhase::Releasing {
                release: release.kind,
            },
        }
    }
}

/// Drag behavior bound to one element through its host.
#[derive(Debug)]
pub struct DragController<H: DragHost> {
    host: H,
    options: DragOptions,
    physics: BoundaryPhysics,
    callbacks: DragCallbacks,
    state: State,
    applied: Point,
    detached: bool,
    transition_counter: u64,
}

impl<H: DragHost> DragController<H> {
    /// Validate `options` and bind a controller to `host`.
    pub fn attach(host: H, options: DragOptions) -> Result<Self, DragConfigError> {
        options.validate()?;
        let physics = derive(options.elastic, &options.physics);
        debug!(
            axis = ?options.axis,
            momentum = options.momentum,
            direction_lock = options.direction_lock,
            "drag controller attached"
        );
        Ok(Self {
            host,
            options,
            physics,
            callbacks: DragCallbacks::default(),
            state: State::Idle,
            applied: Point::ZERO,
            detached: false,
            transition_counter: 0,
        })
    }

    /// Install lifecycle callbacks.
    #[must_use]
    pub fn with_callbacks(mut self, callbacks: DragCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Seed the applied transform for an element mounted at an offset.
    /// Non-finite components are ignored.
    #[must_use]
    pub fn with_initial_transform(mut self, applied: Point) -> Self {
        if applied.x.is_finite() {
            self.applied.x = applied.x;
        }
        if applied.y.is_finite() {
            self.applied.y = applied.y;
        }
        self
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn options(&self) -> &DragOptions {
        &self.options
    }

    /// Release physics derived from the options.
    #[must_use]
    pub fn physics(&self) -> &BoundaryPhysics {
        &self.physics
    }

    /// The last transform written to the host.
    #[must_use]
    pub fn applied_transform(&self) -> Point {
        self.applied
    }

    #[must_use]
    pub fn phase(&self) -> DragPhase {
        self.state.phase()
    }

    /// Whether a drag or release is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self.state, State::Idle)
    }

    /// The resolved direction lock of the current drag.
    #[must_use]
    pub fn lock_axis(&self) -> Option<Axis> {
        match &self.state {
            State::Dragging(session) => session.lock,
            _ => None,
        }
    }

    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Stop listening to pointer input.
    ///
    /// A drag in progress is stopped in place. A release already in flight
    /// keeps running on [`DragController::on_frame`].
    pub fn detach(&mut self) -> Option<DragTransition> {
        self.detached = true;
        debug!("drag controller detached");
        if matches!(self.state, State::Dragging(_)) {
            self.stop()
        } else {
            None
        }
    }

    /// Cancel any drag or release without writing. Returns `None` when idle.
    pub fn stop(&mut self) -> Option<DragTransition> {
        let from = self.state.phase();
        match mem::replace(&mut self.state, State::Idle) {
            State::Idle => None,
            State::Dragging(session) => {
                self.host.release_pointer(session.pointer_id);
                debug!(pointer_id = session.pointer_id, "drag stopped");
                Some(self.record(from, DragEffect::Stopped { applied: self.applied }))
            }
            State::Releasing(release) => {
                debug!(release = ?release.kind, "release stopped");
                Some(self.record(from, DragEffect::Stopped { applied: self.applied }))
            }
        }
    }

    /// Feed one pointer event.
    pub fn handle_pointer(&mut self, event: &PointerEvent, now: Instant) -> DragTransition {
        let from = self.state.phase();
        if self.detached {
            return self.record(from, noop(DragNoopReason::Detached));
        }
        if !event.client.is_finite() {
            warn!(pointer_id = event.pointer_id, "non-finite pointer coordinates ignored");
            return self.record(from, noop(DragNoopReason::NonFinitePointer));
        }

        let state = mem::replace(&mut self.state, State::Idle);
        let (state, effect) = match (state, event.kind) {
            (State::Dragging(session), PointerEventKind::Down) => (
                State::Dragging(session),
                noop(DragNoopReason::ActiveDragAlreadyInProgress),
            ),
            (previous, PointerEventKind::Down) => self.begin(previous, event, now),
            (State::Dragging(session), _) if session.pointer_id != event.pointer_id => (
                State::Dragging(session),
                noop(DragNoopReason::PointerMismatch),
            ),
            (State::Dragging(session), PointerEventKind::Move) => self.drag_to(session, event, now),
            (State::Dragging(session), PointerEventKind::Up | PointerEventKind::Cancel) => {
                self.release(session, now)
            }
            (previous, _) => (previous, noop(DragNoopReason::NoActiveDrag)),
        };
        self.state = state;
        self.record(from, effect)
    }

    /// Advance a release by one frame.
    ///
    /// Re-requests a frame from the host until every axis has settled. Frames
    /// that arrive when no release is running are no-ops.
    pub fn on_frame(&mut self, now: Instant) -> DragTransition {
        let from = self.state.phase();
        let state = mem::replace(&mut self.state, State::Idle);
        let State::Releasing(mut release) = state else {
            self.state = state;
            return self.record(from, noop(DragNoopReason::NoReleaseInFlight));
        };

        let elapsed_ms = now
            .saturating_duration_since(release.released_at)
            .as_secs_f64()
            * 1000.0;
        let mut next = self.applied;
        let mut done = true;
        for axis in Axis::ALL {
            if let Some(motion) = release.motion.get_mut(axis) {
                let sample = motion.step(elapsed_ms);
                *next.get_mut(axis) = sample.value;
                done &= sample.done;
            }
        }

        if done {
            self.write(next, true);
            debug!(
                x = self.applied.x,
                y = self.applied.y,
                elapsed_ms,
                "release settled"
            );
            self.callbacks.transition_end();
            self.record(from, DragEffect::Settled { applied: self.applied })
        } else {
            self.write(next, false);
            trace!(x = self.applied.x, y = self.applied.y, elapsed_ms, "release frame");
            self.host.request_frame();
            self.state = State::Releasing(release);
            self.record(from, DragEffect::FrameStepped { applied: self.applied })
        }
    }

    fn begin(&mut self, previous: State, event: &PointerEvent, now: Instant) -> (State, DragEffect) {
        let Some(source) = self.bounds_source() else {
            warn!(
                pointer_id = event.pointer_id,
                "drag not started: element or container could not be measured"
            );
            return (previous, noop(DragNoopReason::MissingGeometry));
        };

        if let Err(error) = self.host.capture_pointer(event.pointer_id) {
            warn!(pointer_id = event.pointer_id, %error, "pointer capture failed, continuing without it");
        }

        let origin = self.applied;
        let bounds = resolve_bounds(&source, origin);
        let mut history = VelocityRing::new();
        history.reset(VelocitySample::new(event.client, 0.0));
        let session = DragSession {
            pointer_id: event.pointer_id,
            origin,
            start_point: event.client,
            last_point: event.client,
            started_at: now,
            bounds,
            history,
            lock: None,
        };

        let interrupted = matches!(previous, State::Releasing(_));
        debug!(
            pointer_id = event.pointer_id,
            origin_x = origin.x,
            origin_y = origin.y,
            interrupted,
            "drag started"
        );
        self.callbacks.start(&session.info(Point::ZERO, Point::ZERO));

        let effect = if interrupted {
            DragEffect::Interrupted {
                pointer_id: event.pointer_id,
                origin,
            }
        } else {
            DragEffect::Started {
                pointer_id: event.pointer_id,
                origin,
            }
        };
        (State::Dragging(session), effect)
    }

    fn bounds_source(&self) -> Option<BoundsSource> {
        match self.options.constraints {
            DragConstraints::None => Some(BoundsSource::Unbounded),
            DragConstraints::Pixels(limits) => Some(BoundsSource::Pixels(limits)),
            DragConstraints::Container => {
                let element = self
                    .host
                    .measure(MeasureTarget::Element)
                    .filter(|bbox| bbox.is_finite())?;
                let container = self
                    .host
                    .measure(MeasureTarget::Container)
                    .filter(|bbox| bbox.is_finite())?;
                Some(BoundsSource::Container { container, element })
            }
        }
    }

    fn active_axes(&self, lock: Option<Axis>) -> Axes {
        let enabled = self.options.axis.axes();
        match lock {
            Some(axis) => enabled & axis.flag(),
            None => enabled,
        }
    }

    fn drag_to(&mut self, mut session: DragSession, event: &PointerEvent, now: Instant) -> (State, DragEffect) {
        let delta = event.client - session.last_point;
        session.last_point = event.client;
        let elapsed = session.elapsed_secs(now);
        session.history.push(VelocitySample::new(event.client, elapsed));
        let offset = session.offset();
        let velocity = session.history.velocity();

        let mut locked_now = None;
        if self.options.direction_lock && session.lock.is_none() {
            if offset.length() <= DIRECTION_LOCK_THRESHOLD {
                trace!(dx = offset.x, dy = offset.y, "waiting for direction lock");
                self.callbacks.moved(&session.info(delta, velocity));
                return (
                    State::Dragging(session),
                    DragEffect::Moved {
                        applied: self.applied,
                        written: false,
                    },
                );
            }
            let axis = if offset.y.abs() > offset.x.abs() {
                Axis::Y
            } else {
                Axis::X
            };
            session.lock = Some(axis);
            locked_now = Some(axis);
            debug!(?axis, "direction locked");
            self.callbacks.direction_lock(axis);
        }

        let active = self.active_axes(session.lock);
        let mut target = self.applied;
        for axis in Axis::ALL {
            if active.has(axis) {
                let raw = session.origin.get(axis) + offset.get(axis);
                *target.get_mut(axis) = constrain(raw, *session.bounds.get(axis), self.options.elastic);
            }
        }
        let written = self.write(target, false);
        trace!(x = self.applied.x, y = self.applied.y, written, "drag move");
        self.callbacks.moved(&session.info(delta, velocity));

        let effect = match locked_now {
            Some(axis) => DragEffect::DirectionLocked {
                axis,
                applied: self.applied,
            },
            None => DragEffect::Moved {
                applied: self.applied,
                written,
            },
        };
        (State::Dragging(session), effect)
    }

    fn release(&mut self, session: DragSession, now: Instant) -> (State, DragEffect) {
        self.host.release_pointer(session.pointer_id);
        let velocity = session
            .history
            .velocity_at(session.elapsed_secs(now), STALE_VELOCITY_AFTER.as_secs_f64());
        self.callbacks.end(&session.info(Point::ZERO, velocity));

        let active = self.active_axes(session.lock);
        let settle_target = if self.options.snap_to_origin {
            Some((Axes::all(), session.origin))
        } else if !self.options.momentum {
            let offset = session.offset();
            let target = self.applied.map(|axis, value| {
                if active.has(axis) {
                    session.bounds.get(axis).clamp(session.origin.get(axis) + offset.get(axis))
                } else {
                    value
                }
            });
            Some((active, target))
        } else {
            None
        };

        let release = match settle_target {
            Some((axes, target)) => match self.options.settle {
                SettleTransition::Instant => {
                    self.write(target, true);
                    debug!(x = self.applied.x, y = self.applied.y, "released, settled instantly");
                    self.callbacks.transition_end();
                    return (
                        State::Idle,
                        DragEffect::Released {
                            release: ReleaseKind::Settle,
                            velocity,
                        },
                    );
                }
                SettleTransition::Spring { stiffness, damping } => Release {
                    kind: ReleaseKind::Settle,
                    released_at: now,
                    motion: self.applied.map(|axis, value| {
                        axes.has(axis).then(|| AxisMotion::Settle {
                            spring: Spring::new(value, *target.get(axis))
                                .with_velocity(if active.has(axis) { *velocity.get(axis) } else { 0.0 })
                                .with_stiffness(stiffness)
                                .with_damping(damping)
                                .with_rest(self.physics.rest_delta, self.physics.rest_speed),
                            clock_ms: 0.0,
                        })
                    }),
                },
            },
            None => Release {
                kind: ReleaseKind::Momentum,
                released_at: now,
                motion: self.applied.map(|axis, value| {
                    active.has(axis).then(|| {
                        AxisMotion::Momentum(HandoffSolver::new(
                            AxisState::new(value, *velocity.get(axis)),
                            *session.bounds.get(axis),
                            self.physics,
                        ))
                    })
                }),
            },
        };

        debug!(
            release = ?release.kind,
            vx = velocity.x,
            vy = velocity.y,
            lock = ?session.lock,
            "drag released"
        );
        let kind = release.kind;
        self.host.request_frame();
        (
            State::Releasing(release),
            DragEffect::Released {
                release: kind,
                velocity,
            },
        )
    }

    /// Write `next` to the host, skipping axes that did not move. Outside of
    /// `exact` mode sub-[`WRITE_EPSILON`] changes are skipped too.
    fn write(&mut self, next: Point, exact: bool) -> bool {
        let pick = |current: f64, next: f64| {
            let moved = if exact {
                next != current
            } else {
                (next - current).abs() >= WRITE_EPSILON
            };
            (moved && next.is_finite()).then_some(next)
        };
        let update = TransformUpdate {
            x: pick(self.applied.x, next.x),
            y: pick(self.applied.y, next.y),
        };
        if update.is_empty() {
            return false;
        }
        if let Some(x) = update.x {
            self.applied.x = x;
        }
        if let Some(y) = update.y {
            self.applied.y = y;
        }
        self.host.apply_transform(update);
        true
    }

    fn record(&mut self, from: DragPhase, effect: DragEffect) -> DragTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        DragTransition {
            transition_id: self.transition_counter,
            from,
            to: self.state.phase(),
            effect,
        }
    }
}
