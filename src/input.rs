//! Translation from winit window events to overlay pointer events.

use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};

use crate::interaction::{OverlayEvent, PointerEvent};

/// Tracks the cursor across window events and produces overlay events.
///
/// winit mouse-button and wheel events carry no coordinates, so the tracker
/// remembers the last cursor position. Button or wheel events that arrive
/// before any cursor position are dropped; malformed input is ignored, never
/// propagated.
#[derive(Debug, Default)]
pub struct PointerTracker {
    cursor: Option<(f32, f32)>,
    viewport: (u32, u32),
}

impl PointerTracker {
    /// Create a tracker for a viewport of the given pixel dimensions.
    pub fn new(viewport: (u32, u32)) -> Self {
        Self {
            cursor: None,
            viewport,
        }
    }

    /// Current viewport dimensions in pixels.
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Update the viewport dimensions.
    pub fn set_viewport(&mut self, viewport: (u32, u32)) {
        self.viewport = viewport;
    }

    /// Translate one window event into an overlay event.
    ///
    /// Returns `None` for events that are not pointer input for the overlay
    /// or that carry no usable coordinates.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<OverlayEvent> {
        match event {
            WindowEvent::Resized(size) => {
                self.viewport = (size.width, size.height);
                None
            }
            WindowEvent::CursorMoved { position, .. } => {
                let at = (position.x as f32, position.y as f32);
                self.cursor = Some(at);
                Some(OverlayEvent::PointerMove(self.pointer(at)))
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self
                .cursor
                .map(|at| OverlayEvent::PointerDown(self.pointer(at))),
            WindowEvent::Touch(touch) => {
                let at = (touch.location.x as f32, touch.location.y as f32);
                self.cursor = Some(at);
                match touch.phase {
                    TouchPhase::Started => Some(OverlayEvent::TouchStart(self.pointer(at))),
                    TouchPhase::Moved => Some(OverlayEvent::TouchMove(self.pointer(at))),
                    TouchPhase::Ended | TouchPhase::Cancelled => None,
                }
            }
            WindowEvent::MouseWheel { .. } => {
                self.cursor.map(|at| OverlayEvent::Wheel(self.pointer(at)))
            }
            _ => None,
        }
    }

    fn pointer(&self, at: (f32, f32)) -> PointerEvent {
        PointerEvent {
            position: at,
            viewport: self.viewport,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_starts_without_a_cursor() {
        let tracker = PointerTracker::new((800, 600));
        assert_eq!(tracker.viewport(), (800, 600));
        assert!(tracker.cursor.is_none());
    }

    #[test]
    fn viewport_updates() {
        let mut tracker = PointerTracker::new((800, 600));
        tracker.set_viewport((1024, 768));
        assert_eq!(tracker.viewport(), (1024, 768));
    }
}
