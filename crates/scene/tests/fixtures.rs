use std::path::PathBuf;

use rsurf_common::error::Stage;
use rsurf_scene::{Scene, SceneSource};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join(name)
}

#[test]
fn sphere_fixture_loads() {
    let scene = Scene::load(&SceneSource::File(fixture("sphere.jsurf"))).unwrap();
    assert_eq!(scene.parameters.get("a"), Some(&0.64));
    assert!((scene.surface.eval([0.8, 0.0, 0.0])).abs() < 1e-12);
    assert!(scene.surface.eval([0.0, 0.0, 0.0]) < 0.0);
}

#[test]
fn torus_fixture_joins_continuation_lines() {
    let scene = Scene::load(&SceneSource::File(fixture("torus.jsurf"))).unwrap();
    assert!(scene.equation.contains("- 4*R^2*(x^2+y^2)"));

    // A point on the tube centre circle lies inside the solid torus.
    assert!(scene.surface.eval([0.6, 0.0, 0.0]) < 0.0);
    // The origin is in the hole.
    assert!(scene.surface.eval([0.0, 0.0, 0.0]) > 0.0);
    assert!((scene.transform.0[1][1] - 0.7071).abs() < 1e-12);
}

#[test]
fn broken_fixture_reports_path() {
    let path = fixture("broken.jsurf");
    let err = Scene::load(&SceneSource::File(path)).unwrap_err();
    assert_eq!(err.stage(), Stage::SceneLoad);
    assert!(err.to_string().contains("broken.jsurf"));
    assert!(err.to_string().contains("unknown identifier 'q'"));
}

#[test]
fn missing_file_is_scene_error() {
    let err = Scene::load(&SceneSource::File(fixture("does-not-exist.jsurf"))).unwrap_err();
    assert_eq!(err.stage(), Stage::SceneLoad);
    assert!(err.to_string().contains("does-not-exist.jsurf"));
}
