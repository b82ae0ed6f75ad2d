//! Integration tests for the palswap CLI
//!
//! These tests run the built binary against images written to temporary
//! directories and check exit codes, output files and printed summaries.

use image::{Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Get the path to the palswap binary
fn palswap_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_palswap"))
}

fn run(args: &[&str], cwd: &Path) -> Output {
    Command::new(palswap_binary())
        .args(args)
        .current_dir(cwd)
        .env("XDG_CONFIG_HOME", cwd)
        .output()
        .expect("Failed to execute palswap")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// 2x2 image drawn with the default palette: dark, light / primary, secondary
fn write_default_image(dir: &Path) -> PathBuf {
    let mut image = RgbaImage::new(2, 2);
    image.put_pixel(0, 0, Rgba([0x33, 0x33, 0x33, 255]));
    image.put_pixel(1, 0, Rgba([0x55, 0x55, 0x55, 255]));
    image.put_pixel(0, 1, Rgba([0x00, 0x00, 0x00, 255]));
    image.put_pixel(1, 1, Rgba([0xff, 0xff, 0xff, 255]));
    let path = dir.join("bg.png");
    image.save(&path).unwrap();
    path
}

fn write_theme(dir: &Path) -> PathBuf {
    let path = dir.join("theme.json");
    fs::write(
        &path,
        r##"{"dark": ["#101010", "#202020"], "light": ["#e0e0e0", "#f0f0f0"],
            "primary": ["#ff0000", "#aa0000"], "secondary": ["#00ff00", "#00aa00"]}"##,
    )
    .unwrap();
    path
}

#[test]
fn test_decode_then_encode_round_trip() {
    let temp = TempDir::new().unwrap();
    write_default_image(temp.path());

    let output = run(&["decode", "bg.png", "-p", "@default", "-o", "bg.json"], temp.path());
    assert!(output.status.success(), "decode failed: {}", stderr(&output));
    assert!(stdout(&output).contains("matched:   4/4"));

    let pattern: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join("bg.json")).unwrap()).unwrap();
    assert_eq!(pattern["shape"]["height"], 2);
    assert_eq!(pattern["pixels"][0]["key"], "dark");
    assert_eq!(pattern["pixels"][3]["key"], "secondary");

    write_theme(temp.path());
    let output = run(&["encode", "bg.json", "-p", "theme.json", "-o", "out.png"], temp.path());
    assert!(output.status.success(), "encode failed: {}", stderr(&output));

    let out = image::open(temp.path().join("out.png")).unwrap().to_rgba8();
    assert_eq!(*out.get_pixel(0, 0), Rgba([0x10, 0x10, 0x10, 255]));
    assert_eq!(*out.get_pixel(1, 0), Rgba([0xe0, 0xe0, 0xe0, 255]));
    assert_eq!(*out.get_pixel(0, 1), Rgba([0xff, 0x00, 0x00, 255]));
    assert_eq!(*out.get_pixel(1, 1), Rgba([0x00, 0xff, 0x00, 255]));
}

#[test]
fn test_decode_warns_on_unmatched_pixels() {
    let temp = TempDir::new().unwrap();
    let image = RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 255]));
    image.save(temp.path().join("odd.png")).unwrap();

    let output = run(&["decode", "odd.png"], temp.path());
    assert!(output.status.success());
    assert!(stderr(&output).contains("Warning: 1 of 1 pixels did not match"));
    assert!(temp.path().join("odd_pattern.json").exists());

    let output = run(&["decode", "odd.png", "--strict", "-o", "strict.json"], temp.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(!temp.path().join("strict.json").exists());
}

#[test]
fn test_encode_rejects_incompatible_palette() {
    let temp = TempDir::new().unwrap();
    write_default_image(temp.path());
    let output = run(&["decode", "bg.png", "-o", "bg.json"], temp.path());
    assert!(output.status.success());

    fs::write(temp.path().join("tiny.json"), r##"{"dark": ["#000000"]}"##).unwrap();
    let output = run(&["encode", "bg.json", "-p", "tiny.json"], temp.path());
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("light[0] (no such key)"), "stderr: {}", err);
}

#[test]
fn test_recolor_multiple_images_into_directory() {
    let temp = TempDir::new().unwrap();
    write_default_image(temp.path());
    fs::copy(temp.path().join("bg.png"), temp.path().join("bg2.png")).unwrap();

    let output = run(
        &["recolor", "bg.png", "bg2.png", "--to", "@nord", "-o", "out/", "--jobs", "2"],
        temp.path(),
    );
    assert!(output.status.success(), "recolor failed: {}", stderr(&output));

    for name in ["bg.png", "bg2.png"] {
        let out = image::open(temp.path().join("out").join(name)).unwrap().to_rgba8();
        assert_eq!(*out.get_pixel(0, 0), Rgba([0x3b, 0x42, 0x52, 255]));
    }
}

#[test]
fn test_recolor_refuses_colliding_outputs() {
    let temp = TempDir::new().unwrap();
    for dir in ["a", "b"] {
        fs::create_dir(temp.path().join(dir)).unwrap();
        write_default_image(&temp.path().join(dir));
    }

    let output = run(&["recolor", "a/bg.png", "b/bg.png", "--to", "@nord", "-o", "out/"], temp.path());
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("would both be written to"), "stderr: {}", stderr(&output));
    assert!(!temp.path().join("out").exists());

    let output = run(&["recolor", "a/bg.png", "b/bg.png", "--to", "@nord", "-o", "x.png"], temp.path());
    assert_eq!(output.status.code(), Some(2));
    assert!(!temp.path().join("x_bg.png").exists());
}

#[test]
fn test_recolor_with_scale_from_config() {
    let temp = TempDir::new().unwrap();
    write_default_image(temp.path());
    fs::write(temp.path().join("palswap.toml"), "[paths]\npalette = \"@default\"\n\n[encode]\nscale = 3\n")
        .unwrap();

    let output = run(&["recolor", "bg.png", "--to", "@gruvbox"], temp.path());
    assert!(output.status.success(), "recolor failed: {}", stderr(&output));

    let out = image::open(temp.path().join("bg_gruvbox.png")).unwrap().to_rgba8();
    assert_eq!(out.dimensions(), (6, 6));
}

#[test]
fn test_invalid_config_is_reported() {
    let temp = TempDir::new().unwrap();
    write_default_image(temp.path());
    fs::write(temp.path().join("palswap.toml"), "[encode]\nscale = 0\n").unwrap();

    let output = run(&["decode", "bg.png"], temp.path());
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("encode.scale"));
}

#[test]
fn test_palettes_list_and_show() {
    let temp = TempDir::new().unwrap();

    let output = run(&["palettes", "list"], temp.path());
    assert!(output.status.success());
    assert!(stdout(&output).contains("@dracula"));

    let output = run(&["palettes", "show", "default", "--json"], temp.path());
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(json["dark"][0], "#333333");

    let output = run(&["palettes", "show", "@missing"], temp.path());
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_inspect_json() {
    let temp = TempDir::new().unwrap();
    write_default_image(temp.path());
    let output = run(&["decode", "bg.png", "-o", "bg.json", "--quiet"], temp.path());
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());

    let output = run(&["inspect", "bg.json", "--json"], temp.path());
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(json["pixels"], 4);
    assert_eq!(json["unmatched"], 0);
    assert_eq!(json["palette"], "default");
    assert_eq!(json["keys"]["dark"], 1);
}
