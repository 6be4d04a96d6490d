//! Headless walkthrough of the marker overlay: twenty random markers, a
//! pointer sweep across the viewport, and a click on one marker.

use glam::{Mat4, Vec3};
use markup3d::{
    CameraSnapshot, InteractionController, Marker, MarkupHost, OverlayEvent, PointerEvent,
    RenderableHandle,
};
use rand::Rng;

const VIEWPORT: (u32, u32) = (1280, 720);

/// Stand-in for a rendering host; logs every call the overlay makes.
struct DemoHost {
    camera: CameraSnapshot,
    redraws: usize,
}

impl MarkupHost for DemoHost {
    fn camera(&self) -> Option<CameraSnapshot> {
        Some(self.camera)
    }

    fn global_offset(&self) -> Vec3 {
        Vec3::ZERO
    }

    fn attach_overlay(&mut self, handle: RenderableHandle) {
        tracing::info!(generation = handle.generation(), "overlay attached");
    }

    fn detach_overlay(&mut self) {
        tracing::info!("overlay detached");
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
    }

    fn clear_scene_selection(&mut self) {
        tracing::info!("host scene selection cleared");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
    markup3d::init();

    let eye = Vec3::new(0.0, 20.0, 300.0);
    let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
    let proj = Mat4::perspective_rh(
        std::f32::consts::FRAC_PI_3,
        VIEWPORT.0 as f32 / VIEWPORT.1 as f32,
        0.1,
        1000.0,
    );
    let mut host = DemoHost {
        camera: CameraSnapshot {
            position: eye,
            view_proj: proj * view,
        },
        redraws: 0,
    };

    // Twenty random markers, the same spread the original demo data used.
    let mut rng = rand::thread_rng();
    let markers: Vec<Marker> = (0..20)
        .map(|_| {
            Marker::new(
                Vec3::new(
                    rng.gen_range(-150.0..150.0),
                    rng.gen_range(-20.0..30.0),
                    rng.gen_range(-130.0..20.0),
                ),
                rng.gen_range(0..4),
            )
        })
        .collect();

    let mut controller = InteractionController::new(Vec3::ZERO);
    controller.handle_event(&OverlayEvent::MarkersReplaced(markers.clone()), &mut host);

    // Sweep the pointer across the viewport diagonal and report hover changes.
    let mut last_hovered = None;
    for step in 0..=100 {
        let t = step as f32 / 100.0;
        let event = PointerEvent {
            position: (t * VIEWPORT.0 as f32, t * VIEWPORT.1 as f32),
            viewport: VIEWPORT,
        };
        controller.handle_event(&OverlayEvent::PointerMove(event), &mut host);
        if controller.hovered() != last_hovered {
            last_hovered = controller.hovered();
            tracing::info!(hovered = ?last_hovered, at = ?event.position, "hover changed");
        }
    }

    // Click on the projected position of the first marker.
    let ndc = host.camera.view_proj.project_point3(markers[0].position);
    let pixel = (
        (ndc.x + 1.0) * 0.5 * VIEWPORT.0 as f32,
        (1.0 - ndc.y) * 0.5 * VIEWPORT.1 as f32,
    );
    controller.handle_event(
        &OverlayEvent::PointerDown(PointerEvent {
            position: pixel,
            viewport: VIEWPORT,
        }),
        &mut host,
    );
    tracing::info!(
        selected = ?controller.selected(),
        redraws = host.redraws,
        "demo finished"
    );
}
