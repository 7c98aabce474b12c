#![forbid(unsafe_code)]

//! The seam between the controller and whatever renders the element.
//!
//! The controller never touches elements directly. It asks the host to
//! measure, to write a translation, to capture the pointer and to schedule
//! the next frame. Implementations are expected to apply transforms
//! instantly and to treat a near-zero change as a no-op.

use dragkit_core::BoundingBox;
use thiserror::Error;

/// What the controller wants measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasureTarget {
    /// The dragged element, including its current transform.
    Element,
    /// The element's constraint container.
    Container,
}

/// A translation to apply. `None` leaves that axis untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransformUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl TransformUpdate {
    /// Whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none()
    }
}

/// Pointer capture could not be established.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointerCaptureError {
    #[error("pointer capture is not supported by this host")]
    Unsupported,
    #[error("pointer {pointer_id} is not active")]
    InactivePointer { pointer_id: u32 },
    #[error("pointer capture failed: {0}")]
    Host(String),
}

/// Host operations the drag controller depends on.
pub trait DragHost {
    /// Current bounding box of `target` in viewport coordinates, or `None`
    /// when it cannot be measured (detached, hidden).
    fn measure(&self, target: MeasureTarget) -> Option<BoundingBox>;

    /// Write a translation to the element.
    fn apply_transform(&mut self, update: TransformUpdate);

    /// Route further events for `pointer_id` to the element.
    fn capture_pointer(&mut self, pointer_id: u32) -> Result<(), PointerCaptureError> {
        let _ = pointer_id;
        Ok(())
    }

    /// Undo [`DragHost::capture_pointer`].
    fn release_pointer(&mut self, pointer_id: u32) {
        let _ = pointer_id;
    }

    /// Ask for [`crate::DragController::on_frame`] to be called on the next
    /// frame.
    fn request_frame(&mut self);
}
