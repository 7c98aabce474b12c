#![forbid(unsafe_code)]

//! Deterministic host for tests.
//!
//! [`SimulatedHost`] keeps the element's layout box and current translation,
//! so [`DragHost::measure`] reports the element where a real renderer would:
//! moved by every transform written so far. All host calls are recorded.

use std::time::Duration;

use dragkit_core::{BoundingBox, Point};
use web_time::Instant;

use crate::controller::DragController;
use crate::host::{DragHost, MeasureTarget, PointerCaptureError, TransformUpdate};

/// Recording host with configurable geometry.
#[derive(Debug, Clone, Default)]
pub struct SimulatedHost {
    element: Option<BoundingBox>,
    container: Option<BoundingBox>,
    capture_error: Option<PointerCaptureError>,
    transform: Point,
    writes: Vec<TransformUpdate>,
    frame_requests: usize,
    captured: Vec<u32>,
    released: Vec<u32>,
}

impl SimulatedHost {
    /// A host with no measurable geometry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the element's untransformed layout box.
    #[must_use]
    pub fn with_element(mut self, layout: BoundingBox) -> Self {
        self.element = Some(layout);
        self
    }

    /// Set the container box.
    #[must_use]
    pub fn with_container(mut self, container: BoundingBox) -> Self {
        self.container = Some(container);
        self
    }

    /// Make every capture attempt fail with `error`.
    #[must_use]
    pub fn with_capture_error(mut self, error: PointerCaptureError) -> Self {
        self.capture_error = Some(error);
        self
    }

    /// Replace the element layout box; `None` simulates a detached element.
    pub fn set_element(&mut self, layout: Option<BoundingBox>) {
        self.element = layout;
    }

    /// Replace the container box, e.g. after a resize.
    pub fn set_container(&mut self, container: Option<BoundingBox>) {
        self.container = container;
    }

    /// Current translation of the element.
    #[must_use]
    pub fn transform(&self) -> Point {
        self.transform
    }

    /// Every transform update, oldest first.
    #[must_use]
    pub fn writes(&self) -> &[TransformUpdate] {
        &self.writes
    }

    /// Number of frames requested so far.
    #[must_use]
    pub fn frame_requests(&self) -> usize {
        self.frame_requests
    }

    /// Pointer ids passed to successful capture calls.
    #[must_use]
    pub fn captured(&self) -> &[u32] {
        &self.captured
    }

    /// Pointer ids released.
    #[must_use]
    pub fn released(&self) -> &[u32] {
        &self.released
    }
}

impl DragHost for SimulatedHost {
    fn measure(&self, target: MeasureTarget) -> Option<BoundingBox> {
        match target {
            MeasureTarget::Element => self.element.map(|layout| layout.translated(self.transform)),
            MeasureTarget::Container => self.container,
        }
    }

    fn apply_transform(&mut self, update: TransformUpdate) {
        if let Some(x) = update.x {
            self.transform.x = x;
        }
        if let Some(y) = update.y {
            self.transform.y = y;
        }
        self.writes.push(update);
    }

    fn capture_pointer(&mut self, pointer_id: u32) -> Result<(), PointerCaptureError> {
        if let Some(error) = &self.capture_error {
            return Err(error.clone());
        }
        self.captured.push(pointer_id);
        Ok(())
    }

    fn release_pointer(&mut self, pointer_id: u32) {
        self.released.push(pointer_id);
    }

    fn request_frame(&mut self) {
        self.frame_requests += 1;
    }
}

/// Call [`DragController::on_frame`] every `interval` after `start` until the
/// controller goes idle or `max_frames` have run.
///
/// Returns the number of frames run and the time of the last one.
pub fn run_frames<H: DragHost>(
    controller: &mut DragController<H>,
    start: Instant,
    interval: Duration,
    max_frames: usize,
) -> (usize, Instant) {
    let mut now = start;
    let mut frames = 0;
    while controller.is_active() && frames < max_frames {
        now += interval;
        controller.on_frame(now);
        frames += 1;
    }
    (frames, now)
}
