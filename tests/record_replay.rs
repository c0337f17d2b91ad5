//! Cassette replay integration tests — zero network I/O.
//!
//! Each test writes a cassette to a temp file and points `SIMPLE_GEMINI_REPLAY`
//! at it so that the binary never contacts a live API endpoint.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use base64::Engine;
use chrono::Utc;
use image::{ImageFormat, Rgb, RgbImage};
use predicates::prelude::*;
use serde_json::{json, Value};
use simple_gemini::cassette::format::{Cassette, Interaction};

const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

fn cmd(cassette: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("simple-gemini");
    cmd.env("SIMPLE_GEMINI_REPLAY", cassette)
        .env("SIMPLE_GEMINI_CONFIG", "/nonexistent/simple-gemini/config.toml")
        .env_remove("SIMPLE_GEMINI_REC")
        .env_remove("RUST_LOG");
    cmd
}

fn png_base64(width: u32, height: u32, color: [u8; 3]) -> String {
    let mut buf = Cursor::new(Vec::new());
    RgbImage::from_pixel(width, height, Rgb(color)).write_to(&mut buf, ImageFormat::Png).unwrap();
    base64::engine::general_purpose::STANDARD.encode(buf.into_inner())
}

/// Write a one-interaction cassette and return its path.
fn write_cassette(name: &str, method: &str, output: Value) -> PathBuf {
    let cassette = Cassette {
        name: name.into(),
        recorded_at: Utc::now(),
        commit: "test".into(),
        interactions: vec![Interaction {
            seq: 0,
            port: "generation_service".into(),
            method: method.into(),
            input: json!({}),
            output,
        }],
    };
    let path = std::env::temp_dir().join(format!("simple_gemini_{name}.cassette.yaml"));
    std::fs::write(&path, serde_yaml::to_string(&cassette).unwrap()).unwrap();
    path
}

fn temp_output(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(name);
    let _ = std::fs::remove_file(&path);
    path
}

#[test]
fn multimodal_replay_saves_image_and_prints_text() {
    let cassette = write_cassette(
        "multimodal_ok",
        "generate_content",
        json!({"Ok": [
            {"text": "Here it is"},
            {"inline_image": {"data": png_base64(8, 6, [220, 20, 20]), "mime_type": "image/png"}},
        ]}),
    );
    let input = std::env::temp_dir().join("simple_gemini_replay_input.png");
    RgbImage::from_pixel(64, 64, Rgb([10, 20, 30])).save(&input).unwrap();
    let out = temp_output("simple_gemini_multimodal_out.png");

    cmd(&cassette)
        .args(["-k", "test", "-m", "gemini-2.5-flash-image", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .arg("make it red")
        .assert()
        .success()
        .stdout(predicate::str::contains("Here it is"))
        .stderr(predicate::str::contains("Saved:"));

    let data = std::fs::read(&out).unwrap();
    assert_eq!(&data[..8], &PNG_MAGIC, "Output should be a valid PNG file");
    let saved = image::load_from_memory(&data).unwrap();
    assert_eq!((saved.width(), saved.height()), (8, 6));

    let _ = std::fs::remove_file(&out);
    let _ = std::fs::remove_file(&input);
    let _ = std::fs::remove_file(&cassette);
}

#[test]
fn text_to_image_replay_saves_first_image() {
    let cassette = write_cassette(
        "imagen_ok",
        "generate_images",
        json!({"Ok": [
            {"data": png_base64(16, 9, [0, 0, 255]), "mime_type": "image/png"},
            {"data": png_base64(16, 9, [0, 255, 0]), "mime_type": "image/png"},
        ]}),
    );
    let out = temp_output("simple_gemini_imagen_out.png");

    cmd(&cassette)
        .args(["-k", "test", "-m", "imagen-4.0-generate-001", "-n", "2", "-a", "16:9", "-o"])
        .arg(&out)
        .arg("a cat")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let saved = image::open(&out).unwrap().to_rgb8();
    assert_eq!(saved.get_pixel(0, 0).0, [0, 0, 255]);

    let _ = std::fs::remove_file(&out);
    let _ = std::fs::remove_file(&cassette);
}

#[test]
fn jpeg_output_format() {
    let cassette = write_cassette(
        "imagen_jpeg",
        "generate_images",
        json!({"Ok": [{"data": png_base64(4, 4, [128, 128, 128]), "mime_type": "image/png"}]}),
    );
    let out = temp_output("simple_gemini_jpeg_out.jpg");

    cmd(&cassette)
        .args(["-k", "test", "-m", "imagen-3.0-generate-002", "-f", "jpeg", "-o"])
        .arg(&out)
        .arg("a cat")
        .assert()
        .success();

    let data = std::fs::read(&out).unwrap();
    assert_eq!(&data[..2], &[0xFF, 0xD8], "Output should be a JPEG file");

    let _ = std::fs::remove_file(&out);
    let _ = std::fs::remove_file(&cassette);
}

#[test]
fn text_only_response_fails_with_text() {
    let cassette = write_cassette(
        "multimodal_text_only",
        "generate_content",
        json!({"Ok": [{"text": "Sorry, "}, {"text": "I can't draw that."}]}),
    );
    let out = temp_output("simple_gemini_text_only_out.png");

    cmd(&cassette)
        .args(["-k", "test", "-m", "nano-banana", "-o"])
        .arg(&out)
        .arg("a cat")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No image generated. Response text: Sorry, I can't draw that."));

    assert!(!out.exists(), "No output should be written on failure");
    let _ = std::fs::remove_file(&cassette);
}

#[test]
fn empty_image_list_fails() {
    let cassette = write_cassette("imagen_empty", "generate_images", json!({"Ok": []}));

    cmd(&cassette)
        .args(["-k", "test", "-m", "imagen-4.0-fast-generate-001", "a cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No images returned"));

    let _ = std::fs::remove_file(&cassette);
}

#[test]
fn recorded_error_is_propagated() {
    let cassette = write_cassette("multimodal_err", "generate_content", json!({"Err": "quota exceeded"}));

    cmd(&cassette)
        .args(["-k", "test", "-m", "gemini-3-pro-image-preview", "a cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("quota exceeded"));

    let _ = std::fs::remove_file(&cassette);
}

#[test]
fn wrong_operation_in_cassette_fails_cleanly() {
    let cassette = write_cassette("imagen_only", "generate_images", json!({"Ok": []}));

    cmd(&cassette)
        .args(["-k", "test", "-m", "gemini-2.5-flash-image", "a cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no interactions recorded"));

    let _ = std::fs::remove_file(&cassette);
}
