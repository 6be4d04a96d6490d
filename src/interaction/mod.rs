//! Pointer interaction: hit testing and the hover/selection state machine.

pub mod controller;
pub mod raycaster;

pub use controller::{InteractionController, OverlayEvent, PointerEvent};
pub use raycaster::{screen_to_ray, PickHit, PointRaycaster};
