use std::path::PathBuf;
use std::process::Command;
use std::sync::OnceLock;

use library::loader::video::{self, MediaProbe};
use library::model::media::VideoMedia;

/// Two seconds of ffmpeg's test pattern with a sine tone, written once per
/// test run. Returns `None` when no ffmpeg binary is around, in which case
/// the probe and decode tests skip.
fn fixture_path() -> Option<PathBuf> {
    static FIXTURE: OnceLock<Option<PathBuf>> = OnceLock::new();
    FIXTURE
        .get_or_init(|| {
            let name = format!("loader_fixture_{}.mp4", std::process::id());
            let path = std::env::temp_dir().join(name);
            let ffmpeg = std::env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string());
            let generated = Command::new(&ffmpeg)
                .args([
                    "-y",
                    "-f",
                    "lavfi",
                    "-i",
                    "testsrc=duration=2:size=320x240:rate=30",
                    "-f",
                    "lavfi",
                    "-i",
                    "sine=frequency=440:duration=2",
                    "-c:v",
                    "libx264",
                    "-pix_fmt",
                    "yuv420p",
                    "-c:a",
                    "aac",
                    "-shortest",
                ])
                .arg(&path)
                .output();
            match generated {
                Ok(output) if output.status.success() && path.exists() => Some(path),
                _ => {
                    println!("Could not generate the test video, is ffmpeg installed?");
                    None
                }
            }
        })
        .clone()
}

#[test]
fn test_probe_reads_stream_metadata() {
    let Some(path) = fixture_path() else {
        println!("Skipping: no fixture");
        return;
    };
    let probe = MediaProbe::new(&path).expect("Failed to probe fixture");

    assert!(probe.has_video());
    assert!(probe.has_audio());
    assert_eq!(probe.get_dimensions(), (320, 240));

    let duration = probe.get_duration().expect("fixture has no duration");
    println!("Duration: {duration}");
    assert!((duration - 2.0).abs() < 0.5, "unexpected duration {duration}");

    let fps = probe.get_fps();
    println!("FPS: {fps}");
    assert!((fps - 30.0).abs() < 1.0, "unexpected fps {fps}");
}

#[test]
fn test_decode_first_frame_matches_stream_size() {
    let Some(path) = fixture_path() else {
        println!("Skipping: no fixture");
        return;
    };

    let frame = video::decode_first_frame(&path).expect("Failed to decode first frame");
    assert_eq!(frame.dimensions(), (320, 240));
    // The test pattern is not a flat color.
    let first = frame.get_pixel(0, 0);
    assert!(
        frame.pixels().any(|pixel| pixel != first),
        "decoded frame is a single flat color"
    );
}

#[test]
fn test_video_media_from_file_uses_first_frame_as_thumbnail() {
    let Some(path) = fixture_path() else {
        println!("Skipping: no fixture");
        return;
    };

    let media = VideoMedia::from_file(&path).expect("Failed to load media");
    assert_eq!(media.thumbnail_size(), (320, 240));
    assert_eq!(media.source, path);
}

#[test]
fn test_from_file_rejects_non_video_input() {
    let path = std::env::temp_dir().join("loader_not_a_video.mp4");
    std::fs::write(&path, b"definitely not an mp4").expect("Failed to write stub file");

    assert!(VideoMedia::from_file(&path).is_err());
}

#[test]
fn test_probe_missing_file_is_an_error() {
    let missing = std::env::temp_dir().join("loader_meant_to_be_missing.mp4");
    let _ = std::fs::remove_file(&missing);

    assert!(MediaProbe::new(&missing).is_err());
}
