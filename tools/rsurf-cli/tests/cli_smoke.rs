use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join(name)
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rsurf_cli_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// `rsurf` isolated from the user's config, display and clock override.
fn rsurf(cwd: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rsurf"));
    cmd.current_dir(cwd)
        .env("RSURF_CONFIG", cwd.join("no-such-config.json"))
        .env("SOURCE_DATE_EPOCH", "1700000000")
        .env_remove("RUST_LOG")
        .env_remove("DISPLAY")
        .env_remove("WAYLAND_DISPLAY");
    cmd
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().unwrap()
}

fn code(output: &Output) -> i32 {
    output.status.code().unwrap()
}

#[test]
fn renders_to_positional_path() {
    let dir = scratch_dir("positional");
    let out = dir.join("sphere.png");
    let output = run(rsurf(&dir)
        .arg(fixture("sphere.jsurf"))
        .arg(&out)
        .args(["-s", "16", "-q", "0"]));

    assert_eq!(code(&output), 0, "{}", String::from_utf8_lossy(&output.stderr));
    assert!(std::fs::read(&out).unwrap().starts_with(PNG_SIGNATURE));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn positional_output_beats_option() {
    let dir = scratch_dir("precedence");
    let output = run(rsurf(&dir)
        .arg(fixture("sphere.jsurf"))
        .arg("positional.png")
        .args(["-o", "option.png", "--size", "8"]));

    assert_eq!(code(&output), 0);
    assert!(dir.join("positional.png").exists());
    assert!(!dir.join("option.png").exists());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn default_output_uses_scene_name() {
    let dir = scratch_dir("default_name");
    let output = run(rsurf(&dir).arg(fixture("torus.jsurf")).args(["-s", "8"]));

    assert_eq!(code(&output), 0);
    assert!(dir.join("torus.png").exists());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn dash_streams_png_to_stdout() {
    let dir = scratch_dir("stdout");
    let output = run(rsurf(&dir).arg(fixture("sphere.jsurf")).args(["-", "-s", "8"]));

    assert_eq!(code(&output), 0);
    assert!(output.stdout.starts_with(PNG_SIGNATURE));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn stdout_is_reproducible_with_fixed_epoch() {
    let dir = scratch_dir("reproducible");
    let first = run(rsurf(&dir).arg(fixture("sphere.jsurf")).args(["-", "-s", "12"]));
    let second = run(rsurf(&dir).arg(fixture("sphere.jsurf")).args(["-", "-s", "12"]));

    assert_eq!(code(&first), 0);
    assert_eq!(first.stdout, second.stdout);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn reads_scene_from_stdin() {
    let dir = scratch_dir("stdin");
    let script = std::fs::read(fixture("sphere.jsurf")).unwrap();
    let mut child = rsurf(&dir)
        .args(["-", "-", "-s", "8"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(&script).unwrap();
    let output = child.wait_with_output().unwrap();

    assert_eq!(code(&output), 0, "{}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.starts_with(PNG_SIGNATURE));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn gui_without_display_writes_file() {
    let dir = scratch_dir("gui_fallback");
    let output = run(rsurf(&dir)
        .arg(fixture("sphere.jsurf"))
        .args(["out.png", "--gui", "-s", "8"]));

    assert_eq!(code(&output), 0);
    assert!(dir.join("out.png").exists());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn invalid_quality_exits_255() {
    let dir = scratch_dir("bad_quality");
    let output = run(rsurf(&dir)
        .arg(fixture("sphere.jsurf"))
        .args(["out.png", "-q", "7"]));

    assert_eq!(code(&output), 255);
    assert!(String::from_utf8_lossy(&output.stderr).contains("rsurf: configuration error"));
    assert!(!dir.join("out.png").exists());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn invalid_sizes_exit_255() {
    let dir = scratch_dir("bad_size");
    for size in ["0", "-3", "big"] {
        let output = run(rsurf(&dir)
            .arg(fixture("sphere.jsurf"))
            .args(["out.png", "-s", size]));
        assert_eq!(code(&output), 255, "size {size}");
    }
    assert!(!dir.join("out.png").exists());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn invalid_source_date_epoch_exits_255() {
    let dir = scratch_dir("bad_epoch");
    let output = run(rsurf(&dir)
        .env("SOURCE_DATE_EPOCH", "yesterday")
        .arg(fixture("sphere.jsurf"))
        .args(["out.png", "-s", "8"]));

    assert_eq!(code(&output), 255);
    assert!(!dir.join("out.png").exists());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_scene_exits_254() {
    let dir = scratch_dir("missing_scene");
    let output = run(rsurf(&dir).args(["nowhere.jsurf", "out.png"]));

    assert_eq!(code(&output), 254);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("rsurf: scene error"), "{stderr}");
    assert!(stderr.contains("nowhere.jsurf"), "{stderr}");
    assert!(!dir.join("out.png").exists());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn deeply_nested_equation_exits_254() {
    let dir = scratch_dir("deep_equation");
    let depth = 100_000;
    let script = format!(
        "surface_equation={}x{}\n",
        "(".repeat(depth),
        ")".repeat(depth)
    );
    std::fs::write(dir.join("deep.jsurf"), script).unwrap();
    let output = run(rsurf(&dir).args(["deep.jsurf", "out.png", "-s", "8"]));

    assert_eq!(code(&output), 254);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nested too deeply"), "{stderr}");
    assert!(!dir.join("out.png").exists());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn unwritable_output_exits_252() {
    let dir = scratch_dir("unwritable");
    let output = run(rsurf(&dir)
        .arg(fixture("sphere.jsurf"))
        .args(["missing-dir/out.png", "-s", "8"]));

    assert_eq!(code(&output), 252);
    assert!(String::from_utf8_lossy(&output.stderr).contains("rsurf: output error"));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_input_is_usage_error() {
    let dir = scratch_dir("no_args");
    let output = run(&mut rsurf(&dir));
    assert_eq!(code(&output), 255);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn help_and_version_exit_zero() {
    let dir = scratch_dir("help");
    let help = run(rsurf(&dir).arg("--help"));
    assert_eq!(code(&help), 0);
    assert!(String::from_utf8_lossy(&help.stdout).contains("--quality"));

    let version = run(rsurf(&dir).arg("--version"));
    assert_eq!(code(&version), 0);
    assert!(String::from_utf8_lossy(&version.stdout).starts_with("rsurf "));
    std::fs::remove_dir_all(&dir).ok();
}
