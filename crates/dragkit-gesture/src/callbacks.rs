#![forbid(unsafe_code)]

//! Lifecycle callbacks and the snapshot they receive.

use std::fmt;

use dragkit_core::{Axis, Point};

/// Pointer state handed to lifecycle callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DragInfo {
    /// Pointer position in viewport coordinates.
    pub point: Point,
    /// Movement since the previous pointer event.
    pub delta: Point,
    /// Movement since the drag started.
    pub offset: Point,
    /// Smoothed pointer velocity, in units per second.
    pub velocity: Point,
}

type InfoHandler = Box<dyn FnMut(&DragInfo)>;

/// Optional hooks fired by the controller.
///
/// `on_move` fires for every move of the active pointer, including moves
/// made before a pending direction lock resolves (nothing is written for
/// those). `on_direction_lock` fires at most once per drag. `on_transition_end`
/// fires when release motion has settled and the controller is idle again.
#[derive(Default)]
pub struct DragCallbacks {
    on_start: Option<InfoHandler>,
    on_move: Option<InfoHandler>,
    on_end: Option<InfoHandler>,
    on_direction_lock: Option<Box<dyn FnMut(Axis)>>,
    on_transition_end: Option<Box<dyn FnMut()>>,
}

impl fmt::Debug for DragCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragCallbacks")
            .field("on_start", &self.on_start.is_some())
            .field("on_move", &self.on_move.is_some())
            .field("on_end", &self.on_end.is_some())
            .field("on_direction_lock", &self.on_direction_lock.is_some())
            .field("on_transition_end", &self.on_transition_end.is_some())
            .finish()
    }
}

impl DragCallbacks {
    #[must_use]
    pub fn on_start(mut self, handler: impl FnMut(&DragInfo) + 'static) -> Self {
        self.on_start = Some(Box::new(handler));
        self
    }

    #[must_use]
    pub fn on_move(mut self, handler: impl FnMut(&DragInfo) + 'static) -> Self {
        self.on_move = Some(Box::new(handler));
        self
    }

    #[must_use]
    pub fn on_end(mut self, handler: impl FnMut(&DragInfo) + 'static) -> Self {
        self.on_end = Some(Box::new(handler));
        self
    }

    #[must_use]
    pub fn on_direction_lock(mut self, handler: impl FnMut(Axis) + 'static) -> Self {
        self.on_direction_lock = Some(Box::new(handler));
        self
    }

    #[must_use]
    pub fn on_transition_end(mut self, handler: impl FnMut() + 'static) -> Self {
        self.on_transition_end = Some(Box::new(handler));
        self
    }

    pub(crate) fn start(&mut self, info: &DragInfo) {
        if let Some(handler) = self.on_start.as_mut() {
            handler(info);
        }
    }

    pub(crate) fn moved(&mut self, info: &DragInfo) {
        if let Some(handler) = self.on_move.as_mut() {
            handler(info);
        }
    }

    pub(crate) fn end(&mut self, info: &DragInfo) {
        if let Some(handler) = self.on_end.as_mut() {
            handler(info);
        }
    }

    pub(crate) fn direction_lock(&mut self, axis: Axis) {
        if let Some(handler) = self.on_direction_lock.as_mut() {
            handler(axis);
        }
    }

    pub(crate) fn transition_end(&mut self) {
        if let Some(handler) = self.on_transition_end.as_mut() {
            handler();
        }
    }
}
