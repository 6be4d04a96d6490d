//! Batched marker renderable.
//!
//! All markers live in a single point set that is rebuilt from scratch on
//! every marker-set update and mutated in place for highlight-only changes.

use glam::Vec3;

use crate::marker::{Marker, MarkerSet};

/// Intensity stored for a marker that is neither hovered nor selected.
pub const BASE_INTENSITY: f32 = 1.0;

/// Intensity applied to the hovered marker.
pub const HOVER_INTENSITY: f32 = 2.0;

/// Default sprite size in the units consumed by the marker shader.
pub const DEFAULT_POINT_SIZE: f32 = 150.0;

/// Opaque handle identifying one generation of the batched renderable.
///
/// Every rebuild produces a fresh handle, so a handle held by the host can
/// never alias a newer batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderableHandle(u64);

impl RenderableHandle {
    /// Raw generation counter backing this handle.
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// GPU instance for a single marker sprite.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointInstance {
    /// Offset-adjusted world-space center of the sprite.
    pub position: [f32; 3],
    /// `(intensity, category, 0)` consumed by the marker shader. The category
    /// channel selects an atlas column and is never decoded on the CPU side.
    pub color: [f32; 3],
}

impl PointInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    /// Per-instance vertex buffer layout.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// All markers as one batched point set.
///
/// The batch owns the current [`MarkerSet`] exclusively; it is replaced, not
/// mutated, on every update.
#[derive(Debug)]
pub struct MarkerBatch {
    markers: MarkerSet,
    instances: Vec<PointInstance>,
    offset: Vec3,
    point_size: f32,
    generation: u64,
    dirty: bool,
}

impl MarkerBatch {
    /// Create an empty batch.
    ///
    /// `offset` is the constant translation aligning marker space with the
    /// host scene; it is fixed for the lifetime of the batch.
    pub fn new(offset: Vec3) -> Self {
        Self {
            markers: Vec::new(),
            instances: Vec::new(),
            offset,
            point_size: DEFAULT_POINT_SIZE,
            generation: 0,
            dirty: false,
        }
    }

    /// Replace the marker set and rebuild the batched renderable from scratch.
    ///
    /// The previous instances are fully discarded before the new ones are
    /// built, so stale geometry can never coexist with the new batch. Each
    /// position is shifted by `-offset`; each color encodes
    /// `(BASE_INTENSITY, category, 0)`.
    pub fn rebuild(&mut self, markers: MarkerSet) -> RenderableHandle {
        self.instances.clear();
        self.instances.reserve(markers.len());
        for marker in &markers {
            let position = marker.position - self.offset;
            self.instances.push(PointInstance {
                position: position.to_array(),
                color: [BASE_INTENSITY, marker.category as f32, 0.0],
            });
        }
        self.markers = markers;
        self.generation += 1;
        self.dirty = true;
        tracing::debug!(
            count = self.markers.len(),
            generation = self.generation,
            "rebuilt marker batch"
        );
        RenderableHandle(self.generation)
    }

    /// Set the highlight intensity of one marker and mark the batch dirty.
    ///
    /// A `None` or out-of-range index is a routine condition (hover over
    /// empty space, indices from a replaced set) and is silently ignored.
    pub fn set_highlight(&mut self, index: Option<usize>, intensity: f32) {
        let Some(index) = index else { return };
        let Some(instance) = self.instances.get_mut(index) else {
            return;
        };
        instance.color[0] = intensity;
        self.dirty = true;
    }

    /// Remove everything from the batch and invalidate the renderable.
    pub fn clear(&mut self) {
        self.markers.clear();
        self.instances.clear();
        self.generation += 1;
        self.dirty = true;
    }

    /// Markers currently in the batch, in index order.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// GPU instances for the current batch, in index order.
    pub fn instances(&self) -> &[PointInstance] {
        &self.instances
    }

    /// Offset-adjusted positions of all points, in index order.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.instances.iter().map(|i| Vec3::from_array(i.position))
    }

    /// Number of markers in the batch.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether the batch holds no markers.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// The constant marker-space to scene-space offset.
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Base sprite size consumed by the marker shader.
    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    /// Override the base sprite size.
    pub fn set_point_size(&mut self, size: f32) {
        self.point_size = size;
        self.dirty = true;
    }

    /// Generation counter; bumped on every rebuild or clear.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Handle for the current renderable, or `None` before the first rebuild.
    pub fn handle(&self) -> Option<RenderableHandle> {
        (self.generation > 0).then_some(RenderableHandle(self.generation))
    }

    /// Consume the dirty flag; true when instance data changed since the
    /// last upload.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> MarkerSet {
        vec![
            Marker::new(Vec3::new(1.0, 2.0, 3.0), 0),
            Marker::new(Vec3::new(-4.0, 0.0, 9.0), 3),
        ]
    }

    #[test]
    fn rebuild_applies_offset_and_encodes_category() {
        let mut batch = MarkerBatch::new(Vec3::new(1.0, 1.0, 1.0));
        batch.rebuild(set());

        let instances = batch.instances();
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].position, [0.0, 1.0, 2.0]);
        assert_eq!(instances[0].color, [BASE_INTENSITY, 0.0, 0.0]);
        assert_eq!(instances[1].position, [-5.0, -1.0, 8.0]);
        assert_eq!(instances[1].color, [BASE_INTENSITY, 3.0, 0.0]);
    }

    #[test]
    fn rebuild_discards_previous_instances() {
        let mut batch = MarkerBatch::new(Vec3::ZERO);
        batch.rebuild(set());
        let first = batch.rebuild(vec![Marker::new(Vec3::ZERO, 1)]);

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.handle(), Some(first));

        let second = batch.rebuild(Vec::new());
        assert!(batch.is_empty());
        assert_ne!(first, second);
    }

    #[test]
    fn set_highlight_mutates_intensity_channel() {
        let mut batch = MarkerBatch::new(Vec3::ZERO);
        batch.rebuild(set());
        batch.take_dirty();

        batch.set_highlight(Some(1), HOVER_INTENSITY);
        assert_eq!(batch.instances()[1].color[0], HOVER_INTENSITY);
        assert_eq!(batch.instances()[1].color[1], 3.0);
        assert!(batch.take_dirty());
    }

    #[test]
    fn set_highlight_out_of_range_is_a_noop() {
        let mut batch = MarkerBatch::new(Vec3::ZERO);
        batch.rebuild(set());
        batch.take_dirty();

        batch.set_highlight(Some(99), HOVER_INTENSITY);
        batch.set_highlight(None, HOVER_INTENSITY);
        assert!(!batch.take_dirty());

        let mut empty = MarkerBatch::new(Vec3::ZERO);
        empty.set_highlight(Some(0), HOVER_INTENSITY);
        assert!(!empty.take_dirty());
    }

    #[test]
    fn clear_invalidates_handle() {
        let mut batch = MarkerBatch::new(Vec3::ZERO);
        let handle = batch.rebuild(set());
        batch.clear();

        assert!(batch.is_empty());
        assert_ne!(batch.handle(), Some(handle));
    }

    #[test]
    fn no_handle_before_first_rebuild() {
        let batch = MarkerBatch::new(Vec3::ZERO);
        assert_eq!(batch.handle(), None);
    }
}
