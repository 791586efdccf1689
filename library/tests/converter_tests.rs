use std::path::Path;
use std::time::Duration;

use library::converter::{build_ffmpeg_args, ConversionJob, VideoConverter};
use library::model::geometry::{Rect, Vec2};
use library::model::options::{ConverterCrop, ConverterOptions, Rotation};

fn args_for(options: &ConverterOptions, source_dimensions: (u32, u32)) -> Vec<String> {
    build_ffmpeg_args(
        Path::new("/videos/input.mov"),
        Path::new("/tmp/output.mp4"),
        options,
        source_dimensions,
    )
}

fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

#[test]
fn test_args_basic_shape() {
    let args = args_for(&ConverterOptions::default(), (1920, 1080));

    assert_eq!(args.first().map(|s| s.as_str()), Some("-y"));
    assert_eq!(value_after(&args, "-i"), Some("/videos/input.mov"));
    assert_eq!(value_after(&args, "-c:v"), Some("libx264"));
    assert_eq!(value_after(&args, "-movflags"), Some("+faststart"));
    assert_eq!(args.last().map(|s| s.as_str()), Some("/tmp/output.mp4"));
    // No options requested, so no filter chain.
    assert!(!args.iter().any(|a| a == "-vf"));
}

#[test]
fn test_args_crop_scaled_to_source_pixels() {
    let options = ConverterOptions {
        crop: Some(ConverterCrop {
            frame: Rect::new(10.0, 20.0, 100.0, 50.0),
            content_size: Vec2::new(200.0, 100.0),
        }),
        ..Default::default()
    };
    let args = args_for(&options, (1000, 500));

    // Content is displayed at 200x100 for a 1000x500 source: 5x in both
    // axes.
    assert_eq!(value_after(&args, "-vf"), Some("crop=500:250:50:100"));
}

#[test]
fn test_args_crop_clamped_and_even() {
    let options = ConverterOptions {
        crop: Some(ConverterCrop {
            frame: Rect::new(-10.0, -10.0, 200.0, 200.0),
            content_size: Vec2::new(100.0, 100.0),
        }),
        ..Default::default()
    };
    let args = args_for(&options, (101, 101));

    assert_eq!(value_after(&args, "-vf"), Some("crop=100:100:0:0"));
}

#[test]
fn test_args_trim_seeks_input_and_limits_duration() {
    let options = ConverterOptions {
        trim_range: Some((1.5, 4.25)),
        ..Default::default()
    };
    let args = args_for(&options, (1280, 720));

    assert_eq!(value_after(&args, "-ss"), Some("1.500"));
    assert_eq!(value_after(&args, "-t"), Some("2.750"));
    // Input seeking: -ss must come before -i.
    let ss = args.iter().position(|a| a == "-ss").expect("missing -ss");
    let input = args.iter().position(|a| a == "-i").expect("missing -i");
    assert!(ss < input, "-ss should precede -i");
}

#[test]
fn test_args_mute_drops_audio() {
    let options = ConverterOptions {
        mute: true,
        ..Default::default()
    };
    let args = args_for(&options, (1280, 720));

    assert!(args.iter().any(|a| a == "-an"));
    assert!(!args.iter().any(|a| a == "aac"));
}

#[test]
fn test_args_audio_reencoded_when_not_muted() {
    let args = args_for(&ConverterOptions::default(), (1280, 720));

    assert_eq!(value_after(&args, "-c:a"), Some("aac"));
    assert!(!args.iter().any(|a| a == "-an"));
}

#[test]
fn test_args_rotation_joins_filter_chain() {
    let options = ConverterOptions {
        crop: Some(ConverterCrop {
            frame: Rect::new(0.0, 0.0, 100.0, 100.0),
            content_size: Vec2::new(100.0, 100.0),
        }),
        rotate: Some(Rotation::Clockwise90),
        ..Default::default()
    };
    let args = args_for(&options, (200, 200));
    assert_eq!(value_after(&args, "-vf"), Some("crop=200:200:0:0,transpose=1"));

    let options = ConverterOptions {
        rotate: Some(Rotation::Clockwise180),
        ..Default::default()
    };
    let args = args_for(&options, (200, 200));
    assert_eq!(value_after(&args, "-vf"), Some("transpose=1,transpose=1"));

    let options = ConverterOptions {
        rotate: Some(Rotation::Clockwise270),
        ..Default::default()
    };
    let args = args_for(&options, (200, 200));
    assert_eq!(value_after(&args, "-vf"), Some("transpose=2"));
}

#[test]
fn test_args_quality_maps_to_crf() {
    let crf = |quality: Option<u32>| {
        let options = ConverterOptions {
            quality,
            ..Default::default()
        };
        let args = args_for(&options, (1280, 720));
        value_after(&args, "-crf").map(|s| s.to_string())
    };

    assert_eq!(crf(None).as_deref(), Some("23"));
    assert_eq!(crf(Some(100)).as_deref(), Some("18"));
    assert_eq!(crf(Some(0)).as_deref(), Some("35"));
    // Out-of-range input saturates instead of wrapping.
    assert_eq!(crf(Some(500)).as_deref(), Some("18"));
}

#[test]
fn test_job_reports_unreadable_source() {
    let missing = std::env::temp_dir().join("converter_job_meant_to_be_missing.mov");
    let _ = std::fs::remove_file(&missing);

    let job = ConversionJob::spawn(VideoConverter::new(&missing), ConverterOptions::default());
    println!("polling job {}", job.id());

    for _ in 0..200 {
        if let Some(result) = job.try_result() {
            assert!(result.is_err(), "conversion of a missing file succeeded?");
            return;
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    panic!("conversion job never reported a result");
}
