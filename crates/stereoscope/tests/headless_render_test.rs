//! Headless rendering integration tests.
//!
//! These run the real wgpu backend. They require a GPU adapter (real or
//! software fallback); without one they print a message and return early.

use pollster::FutureExt;
use stereoscope::*;

/// Creates a headless engine, or `None` when no adapter is available.
fn engine(eye_width: u32, eye_height: u32) -> Option<StereoEngine> {
    match StereoEngine::new_headless(eye_width, eye_height, false).block_on() {
        Ok(engine) => Some(engine),
        Err(e) => {
            eprintln!("Skipping headless test: no GPU adapter available ({e})");
            None
        }
    }
}

fn is_uniform(image: &MirrorImage, rgba: [u8; 4]) -> bool {
    image.data.chunks_exact(4).all(|px| px == rgba)
}

/// Renders one eye as a solid color by clearing over the default clear.
struct SolidEye {
    left: wgpu::Color,
    right: wgpu::Color,
}

impl EyeRenderer for SolidEye {
    fn render_eye(&mut self, ctx: &mut RenderContext<'_>) {
        let color = match ctx.eye {
            Eye::Left => self.left,
            Eye::Right => self.right,
        };
        let _pass = ctx.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("solid eye pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: ctx.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            ..Default::default()
        });
    }
}

#[test]
fn headless_clear_color_reaches_mirror() {
    let Some(engine) = engine(64, 32) else {
        return;
    };
    let options = StereoOptions {
        srgb: false,
        clear_color: Vec3::new(1.0, 0.0, 0.0),
        ..StereoOptions::default()
    };
    let mut pipeline = StereoPipeline::new(
        options,
        GpuBackend::new(engine),
        MockTracker::tracking(Pose::IDENTITY),
        RecordingPresenter::new(),
    );

    let report = pipeline.tick(None);
    assert!(report.submitted(), "{:?}", report.outcome);

    let engine = pipeline.backend().engine();
    engine.wait_idle();
    let image = engine.capture_mirror().expect("mirror capture failed");
    assert_eq!((image.width, image.height), (64, 32));
    assert!(is_uniform(&image, [255, 0, 0, 255]));

    // Submitted handles resolve to the live eye textures.
    let frame = pipeline.presenter().last().unwrap();
    assert!(engine.texture_for_handle(frame.left_texture).is_some());
    assert!(engine.texture_for_handle(frame.right_texture).is_some());
    assert!(engine.frames_sent() >= 1);
}

#[test]
fn headless_side_by_side_places_eyes() {
    let Some(engine) = engine(32, 16) else {
        return;
    };
    let renderer = SolidEye {
        left: wgpu::Color::GREEN,
        right: wgpu::Color::BLUE,
    };
    let options = StereoOptions {
        srgb: false,
        mirror_mode: MirrorMode::Stereoscopic,
        ..StereoOptions::default()
    };
    let mut pipeline = StereoPipeline::new(
        options,
        GpuBackend::with_renderer(engine, renderer),
        MockTracker::tracking(Pose::IDENTITY),
        NullPresenter,
    );
    assert!(pipeline.tick(None).submitted());

    let engine = pipeline.backend().engine();
    engine.wait_idle();
    let image = engine.capture_mirror().expect("mirror capture failed");
    assert_eq!((image.width, image.height), (64, 16));
    assert_eq!(image.pixel(0, 0), Some([0, 255, 0, 255]));
    assert_eq!(image.pixel(31, 15), Some([0, 255, 0, 255]));
    assert_eq!(image.pixel(32, 0), Some([0, 0, 255, 255]));
    assert_eq!(image.pixel(63, 15), Some([0, 0, 255, 255]));
}

#[test]
fn headless_invalidation_recreates_targets() {
    let Some(engine) = engine(16, 16) else {
        return;
    };
    let mut pipeline = StereoPipeline::new(
        StereoOptions::default(),
        GpuBackend::new(engine),
        MockTracker::tracking(Pose::IDENTITY),
        RecordingPresenter::new(),
    );
    assert!(pipeline.tick(None).submitted());
    let stale = pipeline.presenter().last().unwrap().left_texture;

    pipeline.invalidate_all();
    assert!(pipeline.backend().engine().texture_for_handle(stale).is_none());

    let report = pipeline.tick(None);
    assert_eq!(report.targets_recreated, 2);
    assert!(report.submitted());
    let fresh = pipeline.presenter().last().unwrap().left_texture;
    assert_ne!(fresh, stale);
    assert!(pipeline.backend().engine().texture_for_handle(fresh).is_some());
}

#[test]
fn headless_unavailable_viewer_renders_nothing() {
    let Some(engine) = engine(16, 16) else {
        return;
    };
    let mut pipeline = StereoPipeline::new(
        StereoOptions::default(),
        GpuBackend::new(engine),
        NullTracker,
        RecordingPresenter::new(),
    );
    for _ in 0..3 {
        assert_eq!(pipeline.tick(None).outcome, FrameOutcome::Mono);
    }
    assert!(pipeline.backend().engine().capture_mirror().is_err());
    assert_eq!(pipeline.presenter().attempts(), 0);
}

#[test]
fn headless_frames_api() {
    if engine(1, 1).is_none() {
        return;
    }
    // The null presenter reports the fallback display size.
    let options = StereoOptions::default().with_mirror_mode(MirrorMode::Stereoscopic);
    let image = render_headless_frames(&options, 2).expect("headless render failed");
    assert_eq!((image.width, image.height), (2432, 768));
    assert_eq!(image.data.len(), 2432 * 768 * 4);

    let none = StereoOptions::default().with_mirror_mode(MirrorMode::None);
    assert!(render_headless_frames(&none, 1).is_err());
}
