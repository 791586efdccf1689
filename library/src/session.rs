use image::RgbaImage;
use log::warn;

use crate::model::geometry::{Rect, Vec2, VideoTransform};
use crate::model::media::VideoMedia;
use crate::model::options::ConverterCrop;

pub const MIN_SCALE: f32 = 1.0;
pub const MAX_SCALE: f32 = 3.0;
/// Length of the settle animation after a clamp, in seconds.
pub const SETTLE_DURATION: f64 = 0.3;

/// Gesture input to a [`CropSession`]. The caller maps whatever its input
/// layer reports onto these; the session neither reads devices nor assumes
/// a particular toolkit.
///
/// A `Changed` event is only valid between the matching `Began` and `Ended`.
/// Pinch and pan may be active at the same time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    PinchBegan,
    /// Scale factor relative to the previous pinch event, not to the start
    /// of the gesture.
    PinchChanged { factor: f32 },
    PinchEnded,
    PanBegan,
    /// Pointer movement since the previous pan event, in surface points.
    PanChanged { delta: Vec2 },
    PanEnded,
}

#[derive(Debug, Clone, Copy)]
struct Settle {
    from: VideoTransform,
    to: VideoTransform,
    started: f64,
}

/// Result of a confirmed crop: the rect to cut from the source, the already
/// cut thumbnail, and the crop request to hand to the converter.
#[derive(Debug, Clone)]
pub struct ConfirmPlan {
    /// Crop rect in thumbnail pixels.
    pub thumbnail_crop: Rect,
    pub cropped_thumbnail: RgbaImage,
    pub converter_crop: ConverterCrop,
}

/// Pan/zoom state of the video surface inside a fixed crop area.
///
/// All gestures are applied to the committed transform immediately; when a
/// gesture end forces a correction, the corrected value becomes the
/// committed transform right away and [`CropSession::display_transform`]
/// eases the presentation toward it over [`SETTLE_DURATION`]. Everything
/// here runs on the UI thread; timestamps come from the caller's clock.
pub struct CropSession {
    video_base: Rect,
    crop_area: Rect,
    transform: VideoTransform,
    settle: Option<Settle>,
    pinch_active: bool,
    pan_active: bool,
    clamp_feedback: bool,
}

impl CropSession {
    /// `video_base` is the untransformed frame of the video surface and
    /// `crop_area` the fixed window it must keep covered. Both are in the
    /// same coordinate space as pan deltas.
    pub fn new(video_base: Rect, crop_area: Rect) -> Self {
        Self {
            video_base,
            crop_area,
            transform: VideoTransform::IDENTITY,
            settle: None,
            pinch_active: false,
            pan_active: false,
            clamp_feedback: false,
        }
    }

    /// Updates the frames after a relayout. The transform is kept, so the
    /// video stays where the user put it relative to the new geometry.
    pub fn set_frames(&mut self, video_base: Rect, crop_area: Rect) {
        self.video_base = video_base;
        self.crop_area = crop_area;
    }

    pub fn video_base(&self) -> Rect {
        self.video_base
    }

    pub fn crop_area(&self) -> Rect {
        self.crop_area
    }

    /// The committed transform. During a settle this is already the target
    /// value; only the presentation lags behind.
    pub fn transform(&self) -> VideoTransform {
        self.transform
    }

    /// The committed frame of the video surface.
    pub fn video_frame(&self) -> Rect {
        self.transform.applied_to(self.video_base)
    }

    pub fn is_tracking(&self) -> bool {
        self.pinch_active || self.pan_active
    }

    pub fn is_settling(&self) -> bool {
        self.settle.is_some()
    }

    pub fn reset_transform(&mut self) {
        self.transform = VideoTransform::IDENTITY;
        self.settle = None;
    }

    /// True once after a gesture end had to clamp the transform. The UI
    /// uses this for a short acknowledgement flash.
    pub fn take_clamp_feedback(&mut self) -> bool {
        std::mem::take(&mut self.clamp_feedback)
    }

    /// Feeds one gesture event. `now` is the caller's clock in seconds and
    /// is only used to time settle animations.
    pub fn handle_event(&mut self, event: GestureEvent, now: f64) {
        match event {
            GestureEvent::PinchBegan => {
                self.pinch_active = true;
                self.settle = None;
            }
            GestureEvent::PinchChanged { factor } => {
                if !self.pinch_active {
                    warn!("ignoring pinch change without an active pinch");
                    return;
                }
                self.transform.scale *= factor;
            }
            GestureEvent::PinchEnded => {
                self.pinch_active = false;
                self.clamp_scale(now);
            }
            GestureEvent::PanBegan => {
                self.pan_active = true;
                self.settle = None;
            }
            GestureEvent::PanChanged { delta } => {
                if !self.pan_active {
                    warn!("ignoring pan change without an active pan");
                    return;
                }
                self.transform.translation += delta;
            }
            GestureEvent::PanEnded => {
                self.pan_active = false;
                self.contain_video(now);
            }
        }
    }

    /// Ends any gesture still in flight, as if the pointer had lifted.
    /// For callers whose input stream cuts off mid-gesture, e.g. when a
    /// modal takes over; the usual end-of-gesture clamp and containment
    /// still run.
    pub fn release_gestures(&mut self, now: f64) {
        if self.pinch_active {
            self.handle_event(GestureEvent::PinchEnded, now);
        }
        if self.pan_active {
            self.handle_event(GestureEvent::PanEnded, now);
        }
    }

    /// Drops a finished settle. Call once per frame before reading
    /// [`CropSession::display_transform`].
    pub fn tick(&mut self, now: f64) {
        if let Some(settle) = self.settle {
            if now >= settle.started + SETTLE_DURATION {
                self.settle = None;
            }
        }
    }

    /// The transform to draw with this frame: the committed value, or the
    /// eased interpolation toward it while a settle is running.
    pub fn display_transform(&self, now: f64) -> VideoTransform {
        match self.settle {
            Some(settle) => {
                let t = ((now - settle.started) / SETTLE_DURATION).clamp(0.0, 1.0) as f32;
                settle.from.lerp(settle.to, ease_in_out(t))
            }
            None => self.transform,
        }
    }

    /// The frame of the video surface as drawn this frame.
    pub fn display_frame(&self, now: f64) -> Rect {
        self.display_transform(now).applied_to(self.video_base)
    }

    /// Computes the crop for the current transform, or `None` when a
    /// precondition fails (no thumbnail, missing source file, degenerate
    /// crop). Failures are logged; the screen stays as it is.
    pub fn prepare_confirm(&self, media: &VideoMedia) -> Option<ConfirmPlan> {
        let (thumb_width, _) = media.thumbnail.dimensions();
        if thumb_width == 0 {
            warn!("confirm ignored: media has no thumbnail to crop");
            return None;
        }
        if !media.source.exists() {
            warn!(
                "confirm ignored: video asset {} is missing",
                media.source.display()
            );
            return None;
        }

        let video = self.video_frame();
        if video.width() <= 0.0 || video.height() <= 0.0 {
            warn!("confirm ignored: video surface has no size");
            return None;
        }
        let crop = self.crop_area;

        // Crop rect in thumbnail pixels: offset of the crop area inside the
        // displayed video frame, scaled by pixels-per-point of the thumbnail.
        let scale_ratio = thumb_width as f32 / video.width();
        let thumbnail_crop = Rect::new(
            (crop.min_x() - video.min_x()) * scale_ratio,
            (crop.min_y() - video.min_y()) * scale_ratio,
            crop.width() * scale_ratio,
            crop.height() * scale_ratio,
        );
        let cropped_thumbnail = media.cropped_thumbnail(thumbnail_crop)?;

        // The converter wants the crop relative to the unscaled content
        // rect, so divide the zoom back out.
        let scale = self.transform.scale;
        let converter_crop = ConverterCrop {
            frame: Rect::new(
                (crop.min_x() - video.min_x()) / scale,
                (crop.min_y() - video.min_y()) / scale,
                crop.width() / scale,
                crop.height() / scale,
            ),
            content_size: Vec2::new(self.video_base.width(), self.video_base.height()),
        };

        Some(ConfirmPlan {
            thumbnail_crop,
            cropped_thumbnail,
            converter_crop,
        })
    }

    /// Scale clamp at pinch end. Below
    /// [`MIN_SCALE`] the whole transform resets so the video falls back to
    /// its laid-out frame; above [`MAX_SCALE`] only the scale is capped and
    /// the pan offset survives.
    fn clamp_scale(&mut self, now: f64) {
        let before = self.transform;
        let mut target = before;
        let mut clamped = false;
        if target.scale < MIN_SCALE {
            target = VideoTransform::IDENTITY;
            clamped = true;
        }
        if target.scale > MAX_SCALE {
            target.scale = MAX_SCALE;
            clamped = true;
        }
        if clamped {
            self.clamp_feedback = true;
            self.settle_to(target, before, now);
        }
    }

    /// Edge containment at pan end: every crop-area edge must stay covered
    /// by the video. Caps run top, bottom, left, right, each against the
    /// already corrected frame, so an undersized video ends up pinned to
    /// the bottom/right edges.
    fn contain_video(&mut self, now: f64) {
        let before = self.transform;
        let video = before.applied_to(self.video_base);
        let crop = self.crop_area;

        let mut corrected = video;
        if corrected.min_y() > crop.min_y() {
            corrected.min.y = crop.min_y();
        }
        if corrected.max_y() < crop.max_y() {
            corrected.min.y = crop.max_y() - corrected.size.y;
        }
        if corrected.min_x() > crop.min_x() {
            corrected.min.x = crop.min_x();
        }
        if corrected.max_x() < crop.max_x() {
            corrected.min.x = crop.max_x() - corrected.size.x;
        }

        if corrected.min != video.min {
            let mut target = before;
            target.translation = corrected.center() - self.video_base.center();
            self.settle_to(target, before, now);
        }
    }

    fn settle_to(&mut self, target: VideoTransform, from: VideoTransform, now: f64) {
        self.transform = target;
        self.settle = Some(Settle {
            from,
            to: target,
            started: now,
        });
    }
}

fn ease_in_out(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}
