use image::Rgba;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_oldes_icon(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_oldes-icon"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to run oldes-icon command")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        eprintln!("Command failed with status: {}", output.status);
        eprintln!("stdout: {}", String::from_utf8_lossy(&output.stdout));
        eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
        panic!("oldes-icon command failed");
    }
}

/// Running without arguments writes the stock icon to the default path
#[test]
fn test_default_invocation_writes_stock_icon() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let output = run_oldes_icon(temp_dir.path(), &[]);
    assert_success(&output);

    let icon_path = temp_dir
        .path()
        .join("assets")
        .join("images")
        .join("app_icon.png");
    assert!(
        icon_path.exists(),
        "Icon should exist at: {}",
        icon_path.display()
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().filter(|line| !line.trim().is_empty()).collect();
    assert_eq!(lines.len(), 1, "stdout: {stdout}");
    assert!(lines[0].starts_with("Icon written to"), "stdout: {stdout}");
    assert!(lines[0].contains("app_icon.png"), "stdout: {stdout}");

    let icon = image::open(&icon_path)
        .expect("Failed to load generated icon")
        .to_rgba8();
    assert_eq!(icon.dimensions(), (512, 512));
    for x in 0..512 {
        assert_eq!(*icon.get_pixel(x, 0), Rgba([243, 112, 33, 255]));
        assert_eq!(*icon.get_pixel(x, 511), Rgba([210, 81, 18, 255]));
    }
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    assert_success(&run_oldes_icon(temp_dir.path(), &["-o", "first.png"]));
    assert_success(&run_oldes_icon(temp_dir.path(), &["-o", "second.png"]));

    let first = std::fs::read(temp_dir.path().join("first.png")).unwrap();
    let second = std::fs::read(temp_dir.path().join("second.png")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_flags_override_size_and_colors() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let output = run_oldes_icon(
        temp_dir.path(),
        &[
            "--size",
            "256",
            "--top-color",
            "#000",
            "--bottom-color",
            "#fff",
            "--no-system-fonts",
            "-o",
            "out/icon.png",
        ],
    );
    assert_success(&output);

    let icon = image::open(temp_dir.path().join("out").join("icon.png"))
        .expect("Failed to load generated icon")
        .to_rgba8();
    assert_eq!(icon.dimensions(), (256, 256));
    assert_eq!(*icon.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    assert_eq!(*icon.get_pixel(0, 255), Rgba([255, 255, 255, 255]));
}

#[test]
fn test_config_file_is_applied() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    std::fs::write(
        temp_dir.path().join("icon.json"),
        r#"{ "size": 128, "border_inset": 16, "font_candidates": [] }"#,
    )
    .unwrap();

    let output = run_oldes_icon(temp_dir.path(), &["-c", "icon.json", "-o", "icon.png"]);
    assert_success(&output);

    let icon = image::open(temp_dir.path().join("icon.png"))
        .expect("Failed to load generated icon")
        .to_rgba8();
    assert_eq!(icon.dimensions(), (128, 128));
}

#[test]
fn test_invalid_color_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let output = run_oldes_icon(temp_dir.path(), &["--text-color", "nope", "-o", "x.png"]);

    assert!(!output.status.success());
    assert!(!temp_dir.path().join("x.png").exists());
}

#[test]
fn test_unwritable_output_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    // A regular file where a directory is expected
    std::fs::write(temp_dir.path().join("blocker"), b"").unwrap();

    let output = run_oldes_icon(temp_dir.path(), &["-o", "blocker/icon.png"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Can't create output directory"), "stderr: {stderr}");
}
