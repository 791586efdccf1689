use std::path::Path;

use ffmpeg_next as ffmpeg;
use image::RgbaImage;

use crate::error::LibraryError;

/// Stream-level metadata for a media file, read without decoding.
pub struct MediaProbe {
    input_context: ffmpeg::format::context::Input,
}

impl MediaProbe {
    pub fn new(path: &Path) -> Result<Self, LibraryError> {
        ffmpeg::init()?;
        let input_context = ffmpeg::format::input(&path)?;
        Ok(Self { input_context })
    }

    pub fn get_duration(&self) -> Option<f64> {
        if self.input_context.duration() == ffmpeg::ffi::AV_NOPTS_VALUE {
            None
        } else {
            // Duration is in AV_TIME_BASE units (microseconds)
            Some(self.input_context.duration() as f64 / ffmpeg::ffi::AV_TIME_BASE as f64)
        }
    }

    pub fn get_fps(&self) -> f64 {
        if let Some(stream) = self
            .input_context
            .streams()
            .best(ffmpeg::media::Type::Video)
        {
            let avg_frame_rate = stream.avg_frame_rate();
            if avg_frame_rate.denominator() > 0 {
                return avg_frame_rate.numerator() as f64 / avg_frame_rate.denominator() as f64;
            }
        }
        0.0
    }

    pub fn get_dimensions(&self) -> (u32, u32) {
        if let Some(stream) = self
            .input_context
            .streams()
            .best(ffmpeg::media::Type::Video)
        {
            if let Ok(decoder) =
                ffmpeg::codec::context::Context::from_parameters(stream.parameters())
                    .and_then(|c| c.decoder().video())
            {
                return (decoder.width(), decoder.height());
            }
        }
        (0, 0)
    }

    pub fn has_video(&self) -> bool {
        self.input_context
            .streams()
            .best(ffmpeg::media::Type::Video)
            .is_some()
    }

    pub fn has_audio(&self) -> bool {
        self.input_context
            .streams()
            .best(ffmpeg::media::Type::Audio)
            .is_some()
    }
}

/// Decodes the first video frame of `path` into an RGBA image at the
/// stream's native size. Used for thumbnails, so no seeking is involved.
pub fn decode_first_frame(path: &Path) -> Result<RgbaImage, LibraryError> {
    ffmpeg::init()?;

    let mut input_context = ffmpeg::format::input(&path)?;
    let input = input_context
        .streams()
        .best(ffmpeg::media::Type::Video)
        .ok_or_else(|| {
            LibraryError::InvalidMedia(format!("{} has no video stream", path.display()))
        })?;
    let video_stream_index = input.index();

    let context_decoder = ffmpeg::codec::context::Context::from_parameters(input.parameters())?;
    let mut decoder = context_decoder.decoder().video()?;

    let mut decoded_frame = None;
    let mut frame = ffmpeg::util::frame::Video::empty();
    for (stream, packet) in input_context.packets() {
        if stream.index() != video_stream_index {
            continue;
        }
        decoder.send_packet(&packet)?;
        if decoder.receive_frame(&mut frame).is_ok() {
            decoded_frame = Some(frame.clone());
            break;
        }
    }

    // Streams with decode delay may hold the first frame back until EOF.
    if decoded_frame.is_none() {
        decoder.send_eof()?;
        if decoder.receive_frame(&mut frame).is_ok() {
            decoded_frame = Some(frame.clone());
        }
    }

    let frame = decoded_frame.ok_or_else(|| {
        LibraryError::InvalidMedia(format!("could not decode a frame from {}", path.display()))
    })?;

    let mut scaler = ffmpeg::software::scaling::context::Context::get(
        decoder.format(),
        decoder.width(),
        decoder.height(),
        ffmpeg::format::Pixel::RGBA,
        decoder.width(),
        decoder.height(),
        ffmpeg::software::scaling::flag::Flags::BILINEAR,
    )?;
    let mut rgba_frame = ffmpeg::util::frame::Video::empty();
    scaler.run(&frame, &mut rgba_frame)?;

    let width = rgba_frame.width();
    let height = rgba_frame.height();
    let row_bytes = (width * 4) as usize;
    let mut data = Vec::with_capacity(row_bytes * height as usize);
    let stride = rgba_frame.stride(0);
    let plane = rgba_frame.data(0);
    for y in 0..(height as usize) {
        let start = y * stride;
        let end = start + row_bytes;
        data.extend_from_slice(&plane[start..end]);
    }

    RgbaImage::from_raw(width, height, data).ok_or_else(|| {
        LibraryError::InvalidMedia(format!("decoded frame from {} is malformed", path.display()))
    })
}
