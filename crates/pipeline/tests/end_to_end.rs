use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::RgbImage;

use rsurf_common::clock::CreationClock;
use rsurf_common::error::{RsurfError, RsurfResult, Stage};
use rsurf_display::{DisplaySurface, HeadlessDisplay, Presentation};
use rsurf_pipeline::{
    execute, execute_with, render_image, Delivery, OutputRequest, QualityLevel,
    RenderConfiguration, RenderJob,
};
use rsurf_renderer::{
    AntiAliasing, AntiAliasingMode, AntiAliasingPattern, CpuSurfaceRenderer, SurfaceRenderer,
};
use rsurf_scene::{Scene, SceneSource};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join(name)
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rsurf_e2e_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn file_request(path: &Path) -> OutputRequest {
    OutputRequest {
        positional: Some(path.to_string_lossy().into_owned()),
        option: None,
        display_requested: false,
    }
}

fn fixed_clock() -> CreationClock {
    CreationClock::from_epoch_seconds(1_700_000_000).unwrap()
}

fn text_entries(bytes: &[u8]) -> Vec<(String, String)> {
    let decoder = png::Decoder::new(Cursor::new(bytes));
    let reader = decoder.read_info().unwrap();
    reader
        .info()
        .uncompressed_latin1_text
        .iter()
        .map(|chunk| (chunk.keyword.clone(), chunk.text.clone()))
        .collect()
}

struct FakeDisplay {
    available: bool,
    shown: Vec<Presentation>,
}

impl DisplaySurface for FakeDisplay {
    fn is_available(&self) -> bool {
        self.available
    }

    fn dispatch(&mut self, presentation: Presentation) -> RsurfResult<()> {
        self.shown.push(presentation);
        Ok(())
    }
}

struct BrokenRenderer;

impl SurfaceRenderer for BrokenRenderer {
    fn draw(&self, _: AntiAliasing, _: &mut [u8], _: u32, _: u32) -> RsurfResult<()> {
        Err(RsurfError::render("surface evaluation diverged"))
    }

    fn name(&self) -> &str {
        "broken"
    }
}

#[test]
fn extreme_quality_writes_tagged_png() {
    let dir = scratch_dir("extreme");
    let out = dir.join("sphere.png");
    let config = RenderConfiguration::new(64, QualityLevel::parse("3").unwrap()).unwrap();
    assert_eq!(
        config.anti_aliasing(),
        AntiAliasing::new(
            AntiAliasingMode::Supersampling,
            AntiAliasingPattern::OrderedGrid4x4
        )
    );

    let job = RenderJob::new(
        SceneSource::File(fixture("sphere.jsurf")),
        &file_request(&out),
        config,
        fixed_clock(),
        false,
    );
    let delivery = execute(&job, &mut HeadlessDisplay).unwrap();
    assert_eq!(delivery, Delivery::Written(out.clone()));

    let bytes = std::fs::read(&out).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (64, 64));

    let entries = text_entries(&bytes);
    let source = entries.iter().find(|(k, _)| k == "Source").unwrap();
    assert!(source.1.contains("--quality 3"), "{}", source.1);
    let created = entries.iter().find(|(k, _)| k == "CreationTime").unwrap();
    assert_eq!(created.1, "2023-11-14T22:13+0000");
    assert!(entries.iter().any(|(k, v)| k == "Software" && v.starts_with("rsurf version ")));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn fixed_epoch_gives_identical_files() {
    let dir = scratch_dir("reproducible");
    let config = RenderConfiguration::new(24, QualityLevel::MEDIUM).unwrap();

    let mut outputs = Vec::new();
    for name in ["first.png", "second.png"] {
        let out = dir.join(name);
        let job = RenderJob::new(
            SceneSource::File(fixture("torus.jsurf")),
            &file_request(&out),
            config,
            fixed_clock(),
            false,
        );
        execute(&job, &mut HeadlessDisplay).unwrap();
        outputs.push(std::fs::read(&out).unwrap());
    }
    assert_eq!(outputs[0], outputs[1]);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn decoded_pixels_match_render() {
    let dir = scratch_dir("roundtrip");
    let out = dir.join("torus.png");
    let config = RenderConfiguration::new(20, QualityLevel::HIGH).unwrap();
    let scene = Scene::load(&SceneSource::File(fixture("torus.jsurf"))).unwrap();
    let renderer = CpuSurfaceRenderer::new(scene);

    let expected: RgbImage = render_image(&renderer, &config).unwrap();

    let job = RenderJob::new(
        SceneSource::File(fixture("torus.jsurf")),
        &file_request(&out),
        config,
        fixed_clock(),
        false,
    );
    execute_with(&job, &renderer, &mut HeadlessDisplay).unwrap();

    let bytes = std::fs::read(&out).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
    assert_eq!(decoded, expected);

    let keys: Vec<_> = text_entries(&bytes).into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["Software", "CreationTime", "Source"]);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn one_pixel_render() {
    let dir = scratch_dir("one_pixel");
    let out = dir.join("dot.png");
    let job = RenderJob::new(
        SceneSource::File(fixture("sphere.jsurf")),
        &file_request(&out),
        RenderConfiguration::new(1, QualityLevel::LOW).unwrap(),
        fixed_clock(),
        false,
    );
    execute(&job, &mut HeadlessDisplay).unwrap();

    let decoded = image::open(&out).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (1, 1));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn available_display_writes_no_file() {
    let dir = scratch_dir("display");
    let out = dir.join("never.png");
    let mut display = FakeDisplay {
        available: true,
        shown: Vec::new(),
    };
    let request = OutputRequest {
        display_requested: true,
        ..file_request(&out)
    };

    let job = RenderJob::new(
        SceneSource::File(fixture("sphere.jsurf")),
        &request,
        RenderConfiguration::new(8, QualityLevel::LOW).unwrap(),
        fixed_clock(),
        display.is_available(),
    );
    let delivery = execute(&job, &mut display).unwrap();

    assert_eq!(delivery, Delivery::Displayed);
    assert!(!out.exists());
    assert_eq!(display.shown.len(), 1);
    assert_eq!(display.shown[0].image.dimensions(), (8, 8));
    assert!(display.shown[0].title.starts_with("rsurf: sphere ("));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn unavailable_display_falls_back_to_file() {
    let dir = scratch_dir("fallback");
    let out = dir.join("fallback.png");
    let mut display = FakeDisplay {
        available: false,
        shown: Vec::new(),
    };
    let request = OutputRequest {
        display_requested: true,
        ..file_request(&out)
    };

    let job = RenderJob::new(
        SceneSource::File(fixture("sphere.jsurf")),
        &request,
        RenderConfiguration::new(8, QualityLevel::LOW).unwrap(),
        fixed_clock(),
        display.is_available(),
    );
    execute(&job, &mut display).unwrap();

    assert!(out.exists());
    assert!(display.shown.is_empty());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn render_failure_leaves_no_file() {
    let dir = scratch_dir("render_failure");
    let out = dir.join("failed.png");
    let job = RenderJob::new(
        SceneSource::File(fixture("sphere.jsurf")),
        &file_request(&out),
        RenderConfiguration::new(8, QualityLevel::LOW).unwrap(),
        fixed_clock(),
        false,
    );

    let err = execute_with(&job, &BrokenRenderer, &mut HeadlessDisplay).unwrap_err();
    assert_eq!(err.stage(), Stage::Render);
    assert_eq!(err.exit_code(), 253);
    assert!(!out.exists());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn scene_failure_leaves_no_file() {
    let dir = scratch_dir("scene_failure");
    let out = dir.join("broken.png");
    let job = RenderJob::new(
        SceneSource::File(fixture("broken.jsurf")),
        &file_request(&out),
        RenderConfiguration::new(8, QualityLevel::LOW).unwrap(),
        fixed_clock(),
        false,
    );

    let err = execute(&job, &mut HeadlessDisplay).unwrap_err();
    assert_eq!(err.stage(), Stage::SceneLoad);
    assert_eq!(err.exit_code(), 254);
    assert!(!out.exists());

    std::fs::remove_dir_all(&dir).ok();
}
