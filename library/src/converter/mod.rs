pub mod job;

pub use job::ConversionJob;

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use uuid::Uuid;

use crate::error::LibraryError;
use crate::loader::video::MediaProbe;
use crate::model::options::{ConverterCrop, ConverterOptions, Rotation};

/// Converts one source video by shelling out to ffmpeg. Blocking; run it
/// through [`ConversionJob`] when the UI must stay responsive.
pub struct VideoConverter {
    source: PathBuf,
}

impl VideoConverter {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Runs the conversion and returns the path of the written file. Output
    /// always goes to a fresh mp4 in the system temp directory.
    pub fn convert(&self, options: &ConverterOptions) -> Result<PathBuf, LibraryError> {
        let probe = MediaProbe::new(&self.source)?;
        let dimensions = probe.get_dimensions();
        if dimensions.0 == 0 || dimensions.1 == 0 {
            return Err(LibraryError::Probe(format!(
                "no decodable video stream in {}",
                self.source.display()
            )));
        }

        let output = output_path();
        let args = build_ffmpeg_args(&self.source, &output, options, dimensions);
        let binary = ffmpeg_binary();
        log::info!(
            "converting {} -> {}",
            self.source.display(),
            output.display()
        );
        log::debug!("{} {}", binary.display(), args.join(" "));

        let result = Command::new(&binary)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                LibraryError::Conversion(format!("failed to run {}: {e}", binary.display()))
            })?;
        if !result.status.success() {
            return Err(LibraryError::Conversion(stderr_tail(&result.stderr)));
        }
        Ok(output)
    }
}

/// Full ffmpeg argument list for one conversion. Pure so the mapping from
/// options to flags stays testable without an ffmpeg binary around.
pub fn build_ffmpeg_args(
    source: &Path,
    output: &Path,
    options: &ConverterOptions,
    source_dimensions: (u32, u32),
) -> Vec<String> {
    let mut args: Vec<String> = vec!["-y".into()];

    // -ss before -i seeks on the input, which is much faster on long files.
    if let Some((start, _)) = options.trim_range {
        args.push("-ss".into());
        args.push(format!("{start:.3}"));
    }
    args.push("-i".into());
    args.push(source.to_string_lossy().into_owned());
    if let Some((start, end)) = options.trim_range {
        args.push("-t".into());
        args.push(format!("{:.3}", (end - start).max(0.0)));
    }

    let mut filters: Vec<String> = Vec::new();
    if let Some(crop) = &options.crop {
        filters.push(crop_filter(crop, source_dimensions));
    }
    match options.rotate {
        Some(Rotation::Clockwise90) => filters.push("transpose=1".into()),
        Some(Rotation::Clockwise180) => {
            filters.push("transpose=1".into());
            filters.push("transpose=1".into());
        }
        Some(Rotation::Clockwise270) => filters.push("transpose=2".into()),
        None => {}
    }
    if !filters.is_empty() {
        args.push("-vf".into());
        args.push(filters.join(","));
    }

    args.push("-c:v".into());
    args.push("libx264".into());
    args.push("-preset".into());
    args.push("medium".into());
    args.push("-crf".into());
    args.push(quality_to_crf(options.quality).to_string());
    args.push("-pix_fmt".into());
    args.push("yuv420p".into());

    if options.mute {
        args.push("-an".into());
    } else {
        args.push("-c:a".into());
        args.push("aac".into());
        args.push("-b:a".into());
        args.push("192k".into());
    }

    args.push("-movflags".into());
    args.push("+faststart".into());
    args.push(output.to_string_lossy().into_owned());
    args
}

/// Maps a display-space crop onto source pixels. Offsets and sizes are
/// rounded to even values because yuv420 output cannot carry odd ones.
fn crop_filter(crop: &ConverterCrop, (source_w, source_h): (u32, u32)) -> String {
    let scale_x = if crop.content_size.x > 0.0 {
        source_w as f32 / crop.content_size.x
    } else {
        1.0
    };
    let scale_y = if crop.content_size.y > 0.0 {
        source_h as f32 / crop.content_size.y
    } else {
        1.0
    };

    let source_w = source_w as i64;
    let source_h = source_h as i64;
    let mut x = (crop.frame.min_x() * scale_x).round() as i64;
    let mut y = (crop.frame.min_y() * scale_y).round() as i64;
    let mut w = (crop.frame.width() * scale_x).round() as i64;
    let mut h = (crop.frame.height() * scale_y).round() as i64;

    x = x.clamp(0, (source_w - 2).max(0)) & !1;
    y = y.clamp(0, (source_h - 2).max(0)) & !1;
    w = w.clamp(2, (source_w - x).max(2)) & !1;
    h = h.clamp(2, (source_h - y).max(2)) & !1;

    format!("crop={w}:{h}:{x}:{y}")
}

/// 0..=100 quality to an x264 CRF: 100 is the best we ask for (18), 0 the
/// smallest file (35). `None` keeps the encoder default of 23.
fn quality_to_crf(quality: Option<u32>) -> u32 {
    match quality {
        Some(q) => 35 - (q.min(100) * 17) / 100,
        None => 23,
    }
}

fn ffmpeg_binary() -> PathBuf {
    std::env::var_os("FFMPEG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("ffmpeg"))
}

fn output_path() -> PathBuf {
    std::env::temp_dir().join(format!("cropped-{}.mp4", Uuid::new_v4()))
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let tail = &lines[lines.len().saturating_sub(3)..];
    if tail.is_empty() {
        "ffmpeg exited with an error".to_string()
    } else {
        tail.join("\n")
    }
}
