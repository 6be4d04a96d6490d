//! Host extension surface.
//!
//! Hosts that integrate overlays through named extensions register a
//! [`MarkupExtension`] with an [`ExtensionRegistry`]. There is no inheritance
//! hierarchy to extend; satisfying the [`Extension`] capability trait is all
//! the host needs. Marker-set updates arrive as explicit [`OverlayEvent`]s
//! through the registry rather than through any process-wide event bus.

use thiserror::Error;

use crate::host::MarkupHost;
use crate::interaction::raycaster::PointRaycaster;
use crate::interaction::{InteractionController, OverlayEvent};

/// Name under which [`MarkupExtension`] registers itself.
pub const EXTENSION_NAME: &str = "markup3d";

/// Errors raised by the extension registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// An extension with the same name is already registered.
    #[error("extension `{0}` is already registered")]
    DuplicateName(String),
}

/// Capability interface for overlay extensions.
pub trait Extension<H: MarkupHost> {
    /// Called once when the host is ready; host-provided state such as the
    /// global offset is valid from this point on.
    fn load(&mut self, host: &mut H);

    /// Called on teardown; must remove anything attached to the host.
    fn unload(&mut self, host: &mut H);

    /// Called for every event the host dispatches to the overlay.
    fn on_event(&mut self, event: &OverlayEvent, host: &mut H);
}

/// Registry of named extensions.
///
/// Dispatch order is registration order, kept deterministic on purpose.
pub struct ExtensionRegistry<H: MarkupHost> {
    extensions: Vec<(String, Box<dyn Extension<H>>)>,
}

impl<H: MarkupHost> Default for ExtensionRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: MarkupHost> ExtensionRegistry<H> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            extensions: Vec::new(),
        }
    }

    /// Register an extension under a unique name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        extension: Box<dyn Extension<H>>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.contains(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        tracing::info!(name = %name, "registered extension");
        self.extensions.push((name, extension));
        Ok(())
    }

    /// Whether an extension with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.extensions.iter().any(|(n, _)| n == name)
    }

    /// Number of registered extensions.
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Load every extension, in registration order.
    pub fn load_all(&mut self, host: &mut H) {
        for (name, extension) in &mut self.extensions {
            tracing::debug!(name = %name, "loading extension");
            extension.load(host);
        }
    }

    /// Unload every extension, in reverse registration order.
    pub fn unload_all(&mut self, host: &mut H) {
        for (name, extension) in self.extensions.iter_mut().rev() {
            tracing::debug!(name = %name, "unloading extension");
            extension.unload(host);
        }
    }

    /// Dispatch one event to every extension, in registration order.
    pub fn dispatch(&mut self, event: &OverlayEvent, host: &mut H) {
        for (_, extension) in &mut self.extensions {
            extension.on_event(event, host);
        }
    }
}

/// The marker-overlay extension itself.
///
/// Thin wiring between the host's extension surface and the
/// [`InteractionController`]; the controller is created at `load`, when the
/// host's global offset becomes available.
#[derive(Debug, Default)]
pub struct MarkupExtension {
    controller: Option<InteractionController>,
    raycaster: PointRaycaster,
}

impl MarkupExtension {
    /// Create the extension with the default pick tolerance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the extension with a custom pick tolerance in world units.
    pub fn with_threshold(threshold: f32) -> Self {
        Self {
            controller: None,
            raycaster: PointRaycaster::new(threshold),
        }
    }

    /// The interaction controller, once loaded.
    pub fn controller(&self) -> Option<&InteractionController> {
        self.controller.as_ref()
    }
}

impl<H: MarkupHost> Extension<H> for MarkupExtension {
    fn load(&mut self, host: &mut H) {
        let offset = host.global_offset();
        self.controller = Some(InteractionController::with_raycaster(offset, self.raycaster));
        tracing::info!(?offset, "markup3d extension loaded");
    }

    fn unload(&mut self, host: &mut H) {
        if let Some(mut controller) = self.controller.take() {
            controller.shutdown(host);
        }
    }

    fn on_event(&mut self, event: &OverlayEvent, host: &mut H) {
        // Events delivered before load are dropped, not errors.
        if let Some(controller) = self.controller.as_mut() {
            controller.handle_event(event, host);
        }
    }
}
