use serde::{Deserialize, Serialize};

use crate::model::geometry::{Rect, Vec2};

/// Everything the converter needs to know about one conversion pass.
/// All fields are optional except `mute`; a default value converts the
/// video as-is.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ConverterOptions {
    /// Start and end time in seconds.
    pub trim_range: Option<(f64, f64)>,
    pub crop: Option<ConverterCrop>,
    pub rotate: Option<Rotation>,
    /// 0 (smallest file) to 100 (best quality).
    pub quality: Option<u32>,
    pub mute: bool,
}

/// Crop request in display points. `frame` is expressed relative to the
/// video content rect, whose displayed size is `content_size`; the converter
/// scales both up to source pixels.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ConverterCrop {
    pub frame: Rect,
    pub content_size: Vec2,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise90,
    Clockwise180,
    Clockwise270,
}
