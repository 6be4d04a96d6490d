//! Pointer-to-marker hit testing.

use glam::Vec3;

use crate::batch::MarkerBatch;
use crate::host::CameraSnapshot;

/// Default pick tolerance in world units.
pub const DEFAULT_THRESHOLD: f32 = 5.0;

/// Result of a successful pick.
#[derive(Debug, Clone, Copy)]
pub struct PickHit {
    /// Index of the marker in the current set.
    pub index: usize,
    /// Distance from the camera along the ray.
    pub distance: f32,
    /// Offset-adjusted world position of the marker.
    pub position: Vec3,
}

/// Convert a pointer pixel into a world-space ray.
///
/// The pixel is mapped to normalized device coordinates in `[-1,1]²` with the
/// y axis inverted (pixel row 0 is the top of the viewport, NDC +1 is up),
/// unprojected at mid-depth through the inverse view-projection, and turned
/// into a ray from the camera position through the resulting world point.
/// Returns `None` for a degenerate viewport.
pub fn screen_to_ray(
    pointer_px: (f32, f32),
    viewport_px: (u32, u32),
    camera: &CameraSnapshot,
) -> Option<(Vec3, Vec3)> {
    let (width, height) = viewport_px;
    if width == 0 || height == 0 {
        return None;
    }
    let x = 2.0 * (pointer_px.0 / width as f32) - 1.0;
    let y = 1.0 - 2.0 * (pointer_px.1 / height as f32);

    // Any depth along the pointer ray yields the same ray; mid-depth keeps
    // the unprojected point well inside the clip volume.
    let world = camera.view_proj.inverse().project_point3(Vec3::new(x, y, 0.5));
    let direction = (world - camera.position).normalize_or_zero();
    if direction == Vec3::ZERO {
        return None;
    }
    Some((camera.position, direction))
}

/// Finds the marker nearest the camera within a fixed distance of the ray.
///
/// Point sprites have no geometric extent, so a proximity tolerance
/// substitutes for a true surface intersection.
#[derive(Debug, Clone, Copy)]
pub struct PointRaycaster {
    /// Maximum perpendicular ray-to-point distance that still counts as a
    /// hit, in world units.
    pub threshold: f32,
}

impl Default for PointRaycaster {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl PointRaycaster {
    /// Create a raycaster with the given tolerance.
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Pick the marker under the pointer, or `None` if the pointer is not
    /// within tolerance of any marker.
    ///
    /// Every point in the batch is tested on every call; nothing is cached
    /// between events. When several points fall within tolerance, the one
    /// with the smallest distance along the ray wins through an explicit
    /// comparison, never through an intersection API's implicit ordering.
    pub fn pick(
        &self,
        pointer_px: (f32, f32),
        viewport_px: (u32, u32),
        camera: &CameraSnapshot,
        batch: &MarkerBatch,
    ) -> Option<PickHit> {
        if batch.is_empty() {
            return None;
        }
        let (origin, direction) = screen_to_ray(pointer_px, viewport_px, camera)?;

        let mut nearest: Option<PickHit> = None;
        for (index, point) in batch.positions().enumerate() {
            let to_point = point - origin;
            let along = to_point.dot(direction);
            if along < 0.0 {
                // Behind the camera.
                continue;
            }
            let perpendicular = (to_point - direction * along).length();
            if perpendicular > self.threshold {
                continue;
            }
            if nearest.map_or(true, |hit| along < hit.distance) {
                nearest = Some(PickHit {
                    index,
                    distance: along,
                    position: point,
                });
            }
        }
        nearest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::Marker;
    use glam::Mat4;

    fn camera_at(eye: Vec3, target: Vec3) -> CameraSnapshot {
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_3, 4.0 / 3.0, 0.1, 1000.0);
        CameraSnapshot {
            position: eye,
            view_proj: proj * view,
        }
    }

    fn batch_of(positions: &[Vec3]) -> MarkerBatch {
        let mut batch = MarkerBatch::new(Vec3::ZERO);
        batch.rebuild(positions.iter().map(|&p| Marker::new(p, 0)).collect());
        batch
    }

    #[test]
    fn center_pointer_picks_marker_on_axis() {
        let camera = camera_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let batch = batch_of(&[Vec3::ZERO]);

        let hit = PointRaycaster::default()
            .pick((400.0, 300.0), (800, 600), &camera, &batch)
            .expect("marker under the pointer");
        assert_eq!(hit.index, 0);
        assert!((hit.distance - 5.0).abs() < 1e-3);
    }

    #[test]
    fn pointer_outside_tolerance_misses() {
        let camera = camera_at(Vec3::new(0.0, 0.0, 50.0), Vec3::ZERO);
        let batch = batch_of(&[Vec3::ZERO]);

        let caster = PointRaycaster::new(0.25);
        assert!(caster.pick((700.0, 300.0), (800, 600), &camera, &batch).is_none());
        assert!(caster.pick((400.0, 50.0), (800, 600), &camera, &batch).is_none());
    }

    #[test]
    fn nearest_along_ray_wins() {
        let camera = camera_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        // Both project to the viewport center; index 1 is nearer the camera.
        let batch = batch_of(&[Vec3::new(0.0, 0.0, -10.0), Vec3::ZERO]);

        let hit = PointRaycaster::default()
            .pick((400.0, 300.0), (800, 600), &camera, &batch)
            .expect("hit");
        assert_eq!(hit.index, 1);
        assert!((hit.distance - 5.0).abs() < 1e-3);
    }

    #[test]
    fn points_behind_the_camera_are_skipped() {
        let camera = camera_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let batch = batch_of(&[Vec3::new(0.0, 0.0, 20.0)]);

        assert!(PointRaycaster::default()
            .pick((400.0, 300.0), (800, 600), &camera, &batch)
            .is_none());
    }

    #[test]
    fn empty_batch_never_hits() {
        let camera = camera_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let batch = MarkerBatch::new(Vec3::ZERO);

        assert!(PointRaycaster::default()
            .pick((400.0, 300.0), (800, 600), &camera, &batch)
            .is_none());
    }

    #[test]
    fn degenerate_viewport_yields_no_ray() {
        let camera = camera_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        assert!(screen_to_ray((0.0, 0.0), (0, 600), &camera).is_none());
        assert!(screen_to_ray((0.0, 0.0), (800, 0), &camera).is_none());
    }
}
