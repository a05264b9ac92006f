//! End-to-end rendering tests.
//!
//! Tests require fixture files from `tests/fixtures/generate_fixtures.sh`.

use std::path::Path;

use videosheet::{Settings, VideoFile, sheet};

fn sample_video_path() -> &'static str {
    "tests/fixtures/sample_video.mp4"
}

fn sample_vertical_path() -> &'static str {
    "tests/fixtures/sample_vertical.mp4"
}

fn fixture_settings() -> Settings {
    // The fixtures are 30 seconds long; the default 10-second skip leaves
    // plenty of material for a 4x3 grid.
    Settings::default()
}

#[test]
fn probe_reports_fixture_facts() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let video = VideoFile::open(path).expect("open");
    let metadata = video.metadata();

    assert_eq!(metadata.width, 640);
    assert_eq!(metadata.height, 360);
    assert!((metadata.duration_seconds - 30.0).abs() < 1.0);
    assert!(metadata.frame_rate > 24.0 && metadata.frame_rate < 26.0);
    assert_eq!(metadata.codec, "h264");
    assert!(metadata.audio.is_some());
}

#[test]
fn decoded_frames_match_stream_dimensions() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut video = VideoFile::open(path).expect("open");
    let frame = video.frame_at(15.0).expect("frame");
    assert_eq!(frame.dimensions(), (640, 360));
}

#[test]
fn rendered_sheet_has_computed_dimensions() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let settings = fixture_settings();
    let sheet = sheet::render_contact_sheet(Path::new(path), &settings).expect("render");

    // 800px request, 4 columns, 2px spacing: cells are 197px wide and the
    // canvas re-derives to 798px. Height is header plus three rows of
    // 197 * 360/640 = 111px cells.
    assert_eq!(sheet.width(), 798);
    assert!(sheet.height() > 3 * 111);
}

#[test]
fn written_sheet_is_a_readable_jpeg() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("sample_video.mp4.jpg");

    let settings = fixture_settings();
    sheet::write_contact_sheet(Path::new(path), &output, &settings).expect("write");

    let reloaded = image::open(&output).expect("reload").to_rgb8();
    assert_eq!(reloaded.width(), 798);
}

#[test]
fn vertical_video_uses_vertical_grid() {
    let path = sample_vertical_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut wide = fixture_settings();
    wide.vertical_columns = Some(6);
    wide.vertical_rows = Some(2);

    let mut narrow = fixture_settings();
    narrow.vertical_columns = Some(2);
    narrow.vertical_rows = Some(6);

    let sheet_wide =
        sheet::render_contact_sheet(Path::new(path), &wide).expect("render wide grid");
    let sheet_narrow =
        sheet::render_contact_sheet(Path::new(path), &narrow).expect("render narrow grid");

    // Same target width; more rows of tall portrait cells makes a taller sheet.
    assert!(sheet_narrow.height() > sheet_wide.height());
}

#[test]
fn too_short_video_is_rejected() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut settings = fixture_settings();
    settings.skip_seconds = 300.0;

    let result = sheet::render_contact_sheet(Path::new(path), &settings);
    assert!(matches!(
        result,
        Err(videosheet::SheetError::TooShort { .. })
    ));
}

#[test]
fn header_can_be_disabled() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let with_header = fixture_settings();
    let mut without_header = fixture_settings();
    without_header.header_enabled = false;

    let tall = sheet::render_contact_sheet(Path::new(path), &with_header).expect("render");
    let short = sheet::render_contact_sheet(Path::new(path), &without_header).expect("render");

    assert!(tall.height() > short.height());
    assert_eq!(tall.width(), short.width());
}
