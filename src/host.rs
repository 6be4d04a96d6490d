//! Host boundary: what the embedding renderer provides to the overlay.

use glam::{Mat4, Vec3};

use crate::batch::RenderableHandle;

/// Camera state read from the host at the moment of a hit test.
///
/// A snapshot is taken per event and never cached across events; the camera
/// or the marker layout may have changed in between.
#[derive(Debug, Clone, Copy)]
pub struct CameraSnapshot {
    /// Camera position in world space.
    pub position: Vec3,
    /// Combined world-to-clip transform.
    pub view_proj: Mat4,
}

/// Services the hosting renderer exposes to the marker overlay.
///
/// The host is an external collaborator: if it rejects an attachment or is
/// missing a texture, that surfaces only as missing rendering on its side,
/// never as an error inside the overlay.
pub trait MarkupHost {
    /// Current camera, or `None` before the host has a frame ready.
    fn camera(&self) -> Option<CameraSnapshot>;

    /// Constant translation aligning marker space with the host scene.
    fn global_offset(&self) -> Vec3;

    /// Accept (or replace) the overlay's batched renderable.
    fn attach_overlay(&mut self, handle: RenderableHandle);

    /// Remove the overlay renderable from the display surface.
    fn detach_overlay(&mut self);

    /// Fire-and-forget redraw signal; no acknowledgement is awaited.
    fn request_redraw(&mut self);

    /// Deselect everything in the host scene. Marker selection and host-scene
    /// selection are mutually exclusive.
    fn clear_scene_selection(&mut self);
}
