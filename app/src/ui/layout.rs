use eframe::egui::{pos2, vec2, Rect, Vec2};
use library::model::geometry as geo;

pub const TOOLBAR_HEIGHT: f32 = 44.0;
/// Minimum distance kept between the crop area and the container edge:
/// always vertically, horizontally only for portrait ratios.
pub const CURTAIN_PADDING: f32 = 15.0;

/// Placement of the crop screen pieces for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropLayout {
    pub container: Rect,
    pub crop_area: Rect,
    /// Frame of the video surface before any user transform.
    pub video_base: Rect,
    /// Top, bottom, leading, trailing covers around the crop area.
    pub curtains: [Rect; 4],
}

/// Sizes the crop area and the video surface inside `container`.
///
/// The crop area is centered, as wide as the container allows and
/// `1/ratio` times as tall. The video surface is fit so it covers the crop
/// area while keeping the thumbnail's aspect: wider media fill the crop
/// height and overhang to the sides, taller media fill the container width
/// and overhang above and below.
pub fn compute(container: Rect, thumbnail_size: (u32, u32), ratio: f32) -> CropLayout {
    let ratio = if ratio > 0.0 { ratio } else { 1.0 };

    let side_padding = if ratio < 1.0 { CURTAIN_PADDING } else { 0.0 };
    let max_width = (container.width() - 2.0 * side_padding).max(0.0);
    let max_height = (container.height() - 2.0 * CURTAIN_PADDING).max(0.0);
    let crop_width = max_width.min(max_height * ratio);
    let crop_height = crop_width / ratio;
    let crop_area = Rect::from_center_size(container.center(), vec2(crop_width, crop_height));

    let curtains = [
        Rect::from_min_max(container.min, pos2(container.max.x, crop_area.min.y)),
        Rect::from_min_max(pos2(container.min.x, crop_area.max.y), container.max),
        Rect::from_min_max(
            pos2(container.min.x, crop_area.min.y),
            pos2(crop_area.min.x, crop_area.max.y),
        ),
        Rect::from_min_max(
            pos2(crop_area.max.x, crop_area.min.y),
            pos2(container.max.x, crop_area.max.y),
        ),
    ];

    let video_base = if thumbnail_size.0 == 0 || thumbnail_size.1 == 0 {
        crop_area
    } else {
        let image_ratio = thumbnail_size.0 as f32 / thumbnail_size.1 as f32;
        if ratio > image_ratio {
            let width = container.width();
            let height = width / image_ratio;
            Rect::from_center_size(container.center(), vec2(width, height))
        } else if ratio < image_ratio {
            let height = crop_area.height();
            let width = height * image_ratio;
            Rect::from_center_size(container.center(), vec2(width, height))
        } else {
            crop_area
        }
    };

    CropLayout {
        container,
        crop_area,
        video_base,
        curtains,
    }
}

pub fn to_geo(rect: Rect) -> geo::Rect {
    geo::Rect::new(rect.min.x, rect.min.y, rect.width(), rect.height())
}

pub fn from_geo(rect: geo::Rect) -> Rect {
    Rect::from_min_size(
        pos2(rect.min_x(), rect.min_y()),
        vec2(rect.width(), rect.height()),
    )
}

pub fn delta_to_geo(delta: Vec2) -> geo::Vec2 {
    geo::Vec2::new(delta.x, delta.y)
}
