#![forbid(unsafe_code)]

//! Pointer input consumed by the drag controller.

use dragkit_core::Point;

/// Pointer lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// A pointer event in viewport (client) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerEvent {
    pub pointer_id: u32,
    pub client: Point,
    pub kind: PointerEventKind,
}

impl PointerEvent {
    /// Create an event.
    #[must_use]
    pub const fn new(kind: PointerEventKind, pointer_id: u32, client_x: f64, client_y: f64) -> Self {
        Self {
            pointer_id,
            client: Point::new(client_x, client_y),
            kind,
        }
    }

    /// Pointer pressed.
    #[must_use]
    pub const fn down(pointer_id: u32, client_x: f64, client_y: f64) -> Self {
        Self::new(PointerEventKind::Down, pointer_id, client_x, client_y)
    }

    /// Pointer moved.
    #[must_use]
    pub const fn moved(pointer_id: u32, client_x: f64, client_y: f64) -> Self {
        Self::new(PointerEventKind::Move, pointer_id, client_x, client_y)
    }

    /// Pointer released.
    #[must_use]
    pub const fn up(pointer_id: u32, client_x: f64, client_y: f64) -> Self {
        Self::new(PointerEventKind::Up, pointer_id, client_x, client_y)
    }

    /// Pointer interaction cancelled by the host.
    #[must_use]
    pub const fn cancel(pointer_id: u32, client_x: f64, client_y: f64) -> Self {
        Self::new(PointerEventKind::Cancel, pointer_id, client_x, client_y)
    }
}
