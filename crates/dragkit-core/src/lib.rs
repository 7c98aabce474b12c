#![forbid(unsafe_code)]

//! Core: the numeric layer behind pointer drags.
//!
//! # Role in dragkit
//! `dragkit-core` decides *where* a dragged point should be. It has no host
//! knowledge: no pointer events, no element measurement, no frame scheduling.
//! `dragkit-gesture` wires these pieces to pointer input.
//!
//! # Primary responsibilities
//! - **Constraints**: elastic or hard limits on a dragged offset, and bounds
//!   resolved from a container snapshot or explicit limits.
//! - **Physics**: one elasticity knob plus overrides turned into release
//!   constants shared by both axes.
//! - **Handoff**: closed-form inertia that switches, position- and
//!   velocity-continuously, to a spring when it crosses a boundary.
//! - **Velocity**: bounded sample ring for smoothed pointer velocity.

pub mod constraints;
pub mod error;
pub mod geometry;
pub mod handoff;
pub mod physics;
pub mod spring;
pub mod velocity;

pub use constraints::{Bounds, BoundsSource, Elastic, PixelLimits, constrain, resolve_bounds};
pub use error::ConfigError;
pub use geometry::{Axes, Axis, AxisPair, BoundingBox, Point};
pub use handoff::{AxisSample, AxisState, HandoffPhase, HandoffSolver};
pub use physics::{BoundaryPhysics, PhysicsOverrides, derive};
pub use spring::Spring;
pub use velocity::{VelocityRing, VelocitySample};
