#![warn(missing_docs)]
//! 3D marker overlay with pointer-driven hover and selection.
//!
//! This crate overlays a sparse set of labeled markers onto an
//! already-rendered 3D scene. All markers live in one batched point set
//! ([`MarkerBatch`]) that is rebuilt whenever the marker set changes; a
//! pointer ray test ([`PointRaycaster`]) finds the marker under the cursor;
//! the [`InteractionController`] state machine drives hover and selection and
//! asks the host to redraw.
//!
//! The hosting renderer is an external collaborator behind the [`MarkupHost`]
//! trait: the overlay reads the camera from it, hands it one renderable
//! handle, and signals redraws. Hosts integrate the overlay either directly
//! through [`InteractionController`] or through the named-extension surface
//! in [`extension`]. The optional [`render`] module draws the batch as
//! instanced point sprites with wgpu.
//!
//! # Example
//!
//! ```rust
//! use glam::{Mat4, Vec3};
//! use markup3d::{
//!     CameraSnapshot, InteractionController, Marker, MarkupHost, OverlayEvent, PointerEvent,
//!     RenderableHandle,
//! };
//!
//! struct Host {
//!     camera: CameraSnapshot,
//! }
//!
//! impl MarkupHost for Host {
//!     fn camera(&self) -> Option<CameraSnapshot> {
//!         Some(self.camera)
//!     }
//!     fn global_offset(&self) -> Vec3 {
//!         Vec3::ZERO
//!     }
//!     fn attach_overlay(&mut self, _handle: RenderableHandle) {}
//!     fn detach_overlay(&mut self) {}
//!     fn request_redraw(&mut self) {}
//!     fn clear_scene_selection(&mut self) {}
//! }
//!
//! let eye = Vec3::new(0.0, 0.0, 5.0);
//! let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
//! let proj = Mat4::perspective_rh(1.0, 1.0, 0.1, 100.0);
//! let mut host = Host {
//!     camera: CameraSnapshot { position: eye, view_proj: proj * view },
//! };
//!
//! let mut controller = InteractionController::new(Vec3::ZERO);
//! controller.handle_event(
//!     &OverlayEvent::MarkersReplaced(vec![Marker::new(Vec3::ZERO, 0)]),
//!     &mut host,
//! );
//! controller.handle_event(
//!     &OverlayEvent::PointerMove(PointerEvent {
//!         position: (320.0, 240.0),
//!         viewport: (640, 480),
//!     }),
//!     &mut host,
//! );
//! assert_eq!(controller.hovered(), Some(0));
//! ```

pub mod batch;
pub mod extension;
pub mod host;
pub mod input;
pub mod interaction;
pub mod marker;
pub mod render;

pub use batch::{
    MarkerBatch, PointInstance, RenderableHandle, BASE_INTENSITY, DEFAULT_POINT_SIZE,
    HOVER_INTENSITY,
};
pub use extension::{Extension, ExtensionRegistry, MarkupExtension, RegistryError, EXTENSION_NAME};
pub use host::{CameraSnapshot, MarkupHost};
pub use input::PointerTracker;
pub use interaction::{
    screen_to_ray, InteractionController, OverlayEvent, PickHit, PointRaycaster, PointerEvent,
};
pub use marker::{Marker, MarkerSet, ATLAS_COLUMNS};
pub use render::{MarkerPipeline, SpriteAtlas};

/// Version of the markup3d crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the crate version at startup.
pub fn init() {
    tracing::info!("initializing markup3d v{}", VERSION);
}
