//! Shared test host and camera helpers.
#![allow(dead_code)]

use glam::{Mat4, Vec3};
use markup3d::{CameraSnapshot, MarkupHost, RenderableHandle};

/// Host double that records every call the overlay makes.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub camera: Option<CameraSnapshot>,
    pub offset: Vec3,
    pub attached: Option<RenderableHandle>,
    pub detach_count: usize,
    pub redraw_count: usize,
    pub clear_selection_count: usize,
}

impl RecordingHost {
    pub fn with_camera(camera: CameraSnapshot) -> Self {
        Self {
            camera: Some(camera),
            ..Default::default()
        }
    }
}

impl MarkupHost for RecordingHost {
    fn camera(&self) -> Option<CameraSnapshot> {
        self.camera
    }

    fn global_offset(&self) -> Vec3 {
        self.offset
    }

    fn attach_overlay(&mut self, handle: RenderableHandle) {
        self.attached = Some(handle);
    }

    fn detach_overlay(&mut self) {
        self.attached = None;
        self.detach_count += 1;
    }

    fn request_redraw(&mut self) {
        self.redraw_count += 1;
    }

    fn clear_scene_selection(&mut self) {
        self.clear_selection_count += 1;
    }
}

/// Perspective camera at `eye` looking at `target`, 60° fov, 4:3 aspect.
pub fn look_at_camera(eye: Vec3, target: Vec3) -> CameraSnapshot {
    let view = Mat4::look_at_rh(eye, target, Vec3::Y);
    let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_3, 4.0 / 3.0, 0.1, 1000.0);
    CameraSnapshot {
        position: eye,
        view_proj: proj * view,
    }
}

/// Project a world point to viewport pixels through the camera.
pub fn project_to_pixels(point: Vec3, camera: &CameraSnapshot, viewport: (u32, u32)) -> (f32, f32) {
    let ndc = camera.view_proj.project_point3(point);
    (
        (ndc.x + 1.0) * 0.5 * viewport.0 as f32,
        (1.0 - ndc.y) * 0.5 * viewport.1 as f32,
    )
}
