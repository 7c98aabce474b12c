#![forbid(unsafe_code)]

//! Gesture: pointer-driven dragging on top of `dragkit-core`.
//!
//! # Role in dragkit
//! `dragkit-gesture` owns the drag lifecycle. It listens to pointer events,
//! moves the element through a host-supplied [`DragHost`], and after release
//! drives momentum or a settle spring from host frame callbacks.
//!
//! # How it fits
//! - [`DragController`] is the state machine, one per dragged element.
//! - [`DragOptions`] configures axes, constraints, elasticity and release.
//! - [`DragCallbacks`] receives lifecycle notifications with a [`DragInfo`].
//! - Enable the `test-helpers` feature for [`testing::SimulatedHost`].

pub mod callbacks;
pub mod controller;
pub mod event;
pub mod host;
pub mod options;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use callbacks::{DragCallbacks, DragInfo};
pub use controller::{
    DIRECTION_LOCK_THRESHOLD, DragController, DragEffect, DragNoopReason, DragPhase,
    DragTransition, ReleaseKind, STALE_VELOCITY_AFTER, WRITE_EPSILON,
};
pub use event::{PointerEvent, PointerEventKind};
pub use host::{DragHost, MeasureTarget, PointerCaptureError, TransformUpdate};
pub use options::{DragAxis, DragConfigError, DragConstraints, DragOptions, SettleTransition};

pub use dragkit_core::{Axis, BoundingBox, Elastic, PhysicsOverrides, PixelLimits, Point};
