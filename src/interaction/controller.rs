//! Hover/selection state machine.
//!
//! All entry points run to completion on the host's event-dispatch thread;
//! the host serializes events, so no two of them ever execute concurrently
//! and no locking is needed.

use glam::Vec3;

use crate::batch::{MarkerBatch, BASE_INTENSITY, HOVER_INTENSITY};
use crate::host::MarkupHost;
use crate::interaction::raycaster::PointRaycaster;
use crate::marker::MarkerSet;

/// A pointer event in viewport pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Pointer position in pixels, relative to the viewport's top-left.
    pub position: (f32, f32),
    /// Viewport dimensions in pixels.
    pub viewport: (u32, u32),
}

/// Events delivered to the overlay by the embedder.
#[derive(Debug, Clone)]
pub enum OverlayEvent {
    /// The marker set was replaced wholesale.
    MarkersReplaced(MarkerSet),
    /// The pointer moved.
    PointerMove(PointerEvent),
    /// A pointer button went down.
    PointerDown(PointerEvent),
    /// Touch began; alias for pointer-down at the touch point.
    TouchStart(PointerEvent),
    /// Touch moved; alias for pointer-move at the touch point.
    TouchMove(PointerEvent),
    /// Wheel/zoom; re-runs the hover test because a camera distance change
    /// can alter which marker is nearest under the same screen position.
    Wheel(PointerEvent),
}

/// Owns hover/selection state, drives the hit tester, and instructs the
/// batch's visual state.
///
/// `hovered` and `selected` are explicit options: index 0 is a valid value
/// and is never overloaded to mean "nothing".
#[derive(Debug)]
pub struct InteractionController {
    batch: MarkerBatch,
    raycaster: PointRaycaster,
    hovered: Option<usize>,
    selected: Option<usize>,
}

impl InteractionController {
    /// Create a controller with the default pick tolerance.
    ///
    /// `offset` aligns marker space with the host scene and is fixed from
    /// here on.
    pub fn new(offset: Vec3) -> Self {
        Self::with_raycaster(offset, PointRaycaster::default())
    }

    /// Create a controller with a custom raycaster.
    pub fn with_raycaster(offset: Vec3, raycaster: PointRaycaster) -> Self {
        Self {
            batch: MarkerBatch::new(offset),
            raycaster,
            hovered: None,
            selected: None,
        }
    }

    /// Index of the hovered marker, if any.
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Index of the selected marker, if any.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// The batched renderable.
    pub fn batch(&self) -> &MarkerBatch {
        &self.batch
    }

    /// Mutable access to the batch, for the GPU upload path.
    pub fn batch_mut(&mut self) -> &mut MarkerBatch {
        &mut self.batch
    }

    /// Dispatch one overlay event. Touch events alias their pointer
    /// equivalents; wheel aliases pointer-move.
    pub fn handle_event<H: MarkupHost>(&mut self, event: &OverlayEvent, host: &mut H) {
        match event {
            OverlayEvent::MarkersReplaced(markers) => {
                self.on_marker_set_replaced(markers.clone(), host);
            }
            OverlayEvent::PointerMove(e) | OverlayEvent::TouchMove(e) | OverlayEvent::Wheel(e) => {
                self.on_pointer_move(*e, host);
            }
            OverlayEvent::PointerDown(e) | OverlayEvent::TouchStart(e) => {
                self.on_pointer_down(*e, host);
            }
        }
    }

    /// Replace the marker set.
    ///
    /// Old indices are meaningless against the new collection, so hover and
    /// selection always reset to `None`. The rebuilt renderable is handed to
    /// the host and a single redraw is requested.
    pub fn on_marker_set_replaced<H: MarkupHost>(&mut self, markers: MarkerSet, host: &mut H) {
        self.hovered = None;
        self.selected = None;
        let handle = self.batch.rebuild(markers);
        host.attach_overlay(handle);
        host.request_redraw();
    }

    /// Update hover from a pointer position.
    ///
    /// An unchanged result is a strict no-op: no state mutation and no
    /// redraw request. That idempotence is part of the contract, not an
    /// optimization.
    pub fn on_pointer_move<H: MarkupHost>(&mut self, event: PointerEvent, host: &mut H) {
        let hit = self.pick(event, host);
        if hit == self.hovered {
            return;
        }
        self.batch.set_highlight(self.hovered, BASE_INTENSITY);
        self.batch.set_highlight(hit, HOVER_INTENSITY);
        self.hovered = hit;
        host.request_redraw();
    }

    /// Update selection from a pointer-down.
    ///
    /// Always performs its own hit test at the event's coordinates; a
    /// pointer-down may arrive with no intervening move (touch input), so
    /// the last hover result cannot be trusted. Host-scene selection is
    /// cleared either way: marker selection and host selection are mutually
    /// exclusive, and a miss deselects everything.
    pub fn on_pointer_down<H: MarkupHost>(&mut self, event: PointerEvent, host: &mut H) {
        match self.pick(event, host) {
            Some(index) => {
                self.selected = Some(index);
                tracing::debug!(index, "marker selected");
                host.request_redraw();
            }
            None => {
                self.selected = None;
            }
        }
        host.clear_scene_selection();
    }

    /// Tear down: empty the batch and detach the renderable from the host.
    pub fn shutdown<H: MarkupHost>(&mut self, host: &mut H) {
        self.hovered = None;
        self.selected = None;
        self.batch.clear();
        host.detach_overlay();
    }

    fn pick<H: MarkupHost>(&self, event: PointerEvent, host: &H) -> Option<usize> {
        // No camera yet means no hit; that is a normal startup state.
        let camera = host.camera()?;
        self.raycaster
            .pick(event.position, event.viewport, &camera, &self.batch)
            .map(|hit| hit.index)
    }
}
