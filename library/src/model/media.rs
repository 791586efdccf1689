use std::path::{Path, PathBuf};

use image::RgbaImage;
use log::warn;

use crate::error::LibraryError;
use crate::loader::video::{self, MediaProbe};
use crate::model::geometry::Rect;

/// A picked video together with the still image used to preview it.
#[derive(Debug, Clone)]
pub struct VideoMedia {
    pub thumbnail: RgbaImage,
    pub source: PathBuf,
}

impl VideoMedia {
    pub fn new(thumbnail: RgbaImage, source: impl Into<PathBuf>) -> Self {
        Self {
            thumbnail,
            source: source.into(),
        }
    }

    /// Probes `path` and decodes its first frame as the thumbnail.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LibraryError> {
        let path = path.as_ref();
        let probe = MediaProbe::new(path)?;
        if !probe.has_video() {
            return Err(LibraryError::InvalidMedia(format!(
                "{} has no video stream",
                path.display()
            )));
        }
        let thumbnail = video::decode_first_frame(path)?;
        Ok(Self {
            thumbnail,
            source: path.to_path_buf(),
        })
    }

    pub fn thumbnail_size(&self) -> (u32, u32) {
        self.thumbnail.dimensions()
    }

    /// Cuts `rect` (in thumbnail pixels) out of the thumbnail. The rect is
    /// intersected with the image bounds first, so a rect hanging off any
    /// edge loses the part outside; a rect that leaves no pixels returns
    /// `None`.
    pub fn cropped_thumbnail(&self, rect: Rect) -> Option<RgbaImage> {
        let (width, height) = self.thumbnail.dimensions();
        let x0 = rect.min_x().round().clamp(0.0, width as f32);
        let y0 = rect.min_y().round().clamp(0.0, height as f32);
        let x1 = rect.max_x().round().clamp(0.0, width as f32);
        let y1 = rect.max_y().round().clamp(0.0, height as f32);
        if x1 <= x0 || y1 <= y0 {
            warn!("thumbnail crop {rect:?} leaves no pixels, skipping");
            return None;
        }
        let (x, y) = (x0 as u32, y0 as u32);
        let (w, h) = ((x1 - x0) as u32, (y1 - y0) as u32);
        Some(image::imageops::crop_imm(&self.thumbnail, x, y, w, h).to_image())
    }
}
