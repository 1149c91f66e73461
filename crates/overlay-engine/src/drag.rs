//! Pointer-driven dragging.
//!
//! The controller only turns raw pointer events into position deltas. It owns
//! no window state; the engine applies the resulting [`DragAction`].

use config::Alignment;
use tracing::trace;

/// Raw pointer event in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    Cancel { x: f32, y: f32 },
}

/// State of one touch sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Last pointer position that produced a drag step (or the down point).
    pub origin_x: f32,
    pub origin_y: f32,
    pub is_dragging: bool,
}

/// What the engine should do in response to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragAction {
    /// Nothing to apply.
    None,
    /// Cancel any snap animation; a new touch sequence began.
    Began,
    /// Offset the window by this many pixels.
    MoveBy { dx: i32, dy: i32 },
    /// The touch sequence ended.
    Released,
}

/// Turns pointer events into drag actions.
#[derive(Debug)]
pub struct DragController {
    session: Option<DragSession>,
    threshold_px2: f32,
}

impl DragController {
    /// `threshold_px2` is the squared pointer travel below which a sequence
    /// is not yet a drag.
    pub fn new(threshold_px2: f32) -> Self {
        Self {
            session: None,
            threshold_px2,
        }
    }

    pub fn session(&self) -> Option<DragSession> {
        self.session
    }

    /// Process one event for an overlay anchored at `alignment`.
    pub fn handle(&mut self, event: PointerEvent, alignment: Alignment) -> DragAction {
        match event {
            PointerEvent::Down { x, y } => {
                self.session = Some(DragSession {
                    origin_x: x,
                    origin_y: y,
                    is_dragging: false,
                });
                DragAction::Began
            }
            PointerEvent::Move { x, y } => {
                let Some(session) = self.session.as_mut() else {
                    return DragAction::None;
                };
                let dx = x - session.origin_x;
                let dy = y - session.origin_y;
                // The origin stays put below the threshold, so slow creep
                // accumulates until it crosses it.
                if !session.is_dragging && dx * dx + dy * dy < self.threshold_px2 {
                    trace!(dx, dy, "below drag threshold");
                    return DragAction::None;
                }
                session.origin_x = x;
                session.origin_y = y;
                session.is_dragging = true;
                let sx = if alignment.anchored_right() { -1 } else { 1 };
                let sy = if alignment.anchored_bottom() { -1 } else { 1 };
                DragAction::MoveBy {
                    dx: (dx as i32).saturating_mul(sx),
                    dy: (dy as i32).saturating_mul(sy),
                }
            }
            PointerEvent::Up { .. } | PointerEvent::Cancel { .. } => {
                self.session = None;
                DragAction::Released
            }
        }
    }
}
