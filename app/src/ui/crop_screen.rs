use std::path::PathBuf;
use std::time::Duration;

use eframe::egui::{self, epaint::StrokeKind, Color32, TextureHandle, TextureOptions};
use image::RgbaImage;
use library::converter::{ConversionJob, VideoConverter};
use library::error::LibraryError;
use library::model::media::VideoMedia;
use library::model::options::ConverterOptions;
use library::session::{CropSession, GestureEvent};
use log::{error, info, warn};

use crate::config::AppConfig;
use crate::ui::layout::{self, CropLayout};
use crate::ui::widgets::alert::Alert;

/// How long a pinch may go quiet before it counts as ended. Trackpads
/// deliver zoom as per-frame deltas without an explicit release.
const PINCH_RELEASE_GRACE: f64 = 0.2;
/// Length of the crop-frame flash acknowledging a clamped gesture.
const FEEDBACK_FLASH: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropScreenEvent {
    Cancelled,
}

/// The crop screen: video preview under a fixed crop window, pan/pinch to
/// frame the shot, cancel or save below. Saving cuts the thumbnail right
/// away and converts the video on a worker; the result lands back here via
/// polling from the event loop.
pub struct CropScreen {
    media: VideoMedia,
    session: CropSession,
    /// What the surface currently shows. Follows `media.thumbnail` except
    /// between confirm and conversion result, when it holds the crop.
    preview: RgbaImage,
    texture: Option<TextureHandle>,
    texture_dirty: bool,
    /// Cropped thumbnail waiting for its conversion to succeed.
    pending_thumbnail: Option<RgbaImage>,
    job: Option<ConversionJob>,
    alert: Option<String>,
    pinch_active: bool,
    last_zoom_input: f64,
    flash_until: f64,
    /// Called once per successful crop with the new media value.
    pub on_finish: Option<Box<dyn FnMut(VideoMedia)>>,
}

impl CropScreen {
    pub fn new(media: VideoMedia) -> Self {
        let preview = media.thumbnail.clone();
        Self {
            media,
            session: CropSession::new(Default::default(), Default::default()),
            preview,
            texture: None,
            texture_dirty: true,
            pending_thumbnail: None,
            job: None,
            alert: None,
            pinch_active: false,
            last_zoom_input: 0.0,
            flash_until: 0.0,
            on_finish: None,
        }
    }

    pub fn media(&self) -> &VideoMedia {
        &self.media
    }

    pub fn is_converting(&self) -> bool {
        self.job.is_some()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, config: &AppConfig) -> Option<CropScreenEvent> {
        let now = ui.input(|i| i.time);
        self.poll_job();

        let mut event = None;

        egui::TopBottomPanel::bottom("crop_toolbar")
            .exact_height(layout::TOOLBAR_HEIGHT)
            .show_inside(ui, |ui| {
                ui.horizontal_centered(|ui| {
                    if ui.button(config.wordings.cancel.as_str()).clicked() {
                        event = Some(CropScreenEvent::Cancelled);
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let converting = self.job.is_some();
                        let save = ui.add_enabled(
                            !converting,
                            egui::Button::new(config.wordings.save.as_str()),
                        );
                        if save.clicked() {
                            self.confirm(now);
                        }
                        if converting {
                            ui.add(egui::Spinner::new().size(18.0));
                            ui.label(config.wordings.processing.as_str());
                        }
                    });
                });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show_inside(ui, |ui| {
                let (rect, response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
                let layout = layout::compute(rect, self.media.thumbnail_size(), config.cropper.ratio());
                self.session.set_frames(
                    layout::to_geo(layout.video_base),
                    layout::to_geo(layout.crop_area),
                );

                if self.alert.is_none() {
                    let zoom_delta = ui.input(|i| i.zoom_delta());
                    self.dispatch_input(&response, zoom_delta, now);
                } else {
                    // The alert eats input, so drag and zoom end edges
                    // never arrive; end in-flight gestures ourselves.
                    self.release_gestures(now);
                }
                self.session.tick(now);
                if self.session.take_clamp_feedback() {
                    self.flash_until = now + FEEDBACK_FLASH;
                }

                self.paint(ui, &layout, config, now);

                if self.session.is_tracking() || self.session.is_settling() || now < self.flash_until
                {
                    ui.ctx().request_repaint();
                } else if self.job.is_some() {
                    ui.ctx().request_repaint_after(Duration::from_millis(100));
                }
            });

        if let Some(message) = self.alert.clone() {
            let acknowledged = Alert::new(config.wordings.error_title.as_str(), message.as_str())
                .ok_label(config.wordings.ok.as_str())
                .show(ui.ctx());
            if acknowledged {
                self.alert = None;
            }
        }

        if let Some(CropScreenEvent::Cancelled) = event {
            if self.job.take().is_some() {
                info!("crop cancelled with a conversion in flight, dropping it");
            }
        }
        event
    }

    /// Maps egui's pointer state onto gesture events. Drags come with
    /// explicit started/stopped edges; zoom is only a per-frame factor, so
    /// a pinch ends once it stays quiet for [`PINCH_RELEASE_GRACE`].
    fn dispatch_input(&mut self, response: &egui::Response, zoom_delta: f32, now: f64) {
        if response.drag_started() {
            self.session.handle_event(GestureEvent::PanBegan, now);
        }
        if response.dragged() {
            let delta = response.drag_delta();
            if delta != egui::Vec2::ZERO {
                self.session.handle_event(
                    GestureEvent::PanChanged {
                        delta: layout::delta_to_geo(delta),
                    },
                    now,
                );
            }
        }
        if response.drag_stopped() {
            self.session.handle_event(GestureEvent::PanEnded, now);
        }

        let zooming = (zoom_delta - 1.0).abs() > 1e-4 && (response.hovered() || response.dragged());
        if zooming {
            if !self.pinch_active {
                self.pinch_active = true;
                self.session.handle_event(GestureEvent::PinchBegan, now);
            }
            self.last_zoom_input = now;
            self.session
                .handle_event(GestureEvent::PinchChanged { factor: zoom_delta }, now);
        } else if self.pinch_active && now - self.last_zoom_input > PINCH_RELEASE_GRACE {
            self.pinch_active = false;
            self.session.handle_event(GestureEvent::PinchEnded, now);
        }
    }

    /// Force-ends whatever gesture is in flight so the end-of-gesture
    /// clamp and containment still run.
    fn release_gestures(&mut self, now: f64) {
        self.pinch_active = false;
        self.session.release_gestures(now);
    }

    fn paint(&mut self, ui: &mut egui::Ui, layout: &CropLayout, config: &AppConfig, now: f64) {
        let painter = ui.painter().with_clip_rect(layout.container);
        painter.rect_filled(layout.container, 0.0, ui.visuals().extreme_bg_color);

        let display_frame = layout::from_geo(self.session.display_frame(now));
        if self.preview.width() > 0 && self.preview.height() > 0 {
            let texture_id = self.ensure_texture(ui.ctx()).map(|t| t.id());
            if let Some(texture_id) = texture_id {
                let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                painter.image(texture_id, display_frame, uv, Color32::WHITE);
            }
        }

        let overlay = color32(config.overlay_color);
        for curtain in layout.curtains {
            if curtain.width() > 0.0 && curtain.height() > 0.0 {
                painter.rect_filled(curtain, 0.0, overlay);
            }
        }

        if config.cropper.is_circle() {
            // Cover the crop-area corners with a thick ring clipped to the
            // crop rect, leaving a circular window.
            let crop_painter = painter.with_clip_rect(layout.crop_area);
            let radius = layout.crop_area.width().min(layout.crop_area.height()) / 2.0;
            crop_painter.circle_stroke(
                layout.crop_area.center(),
                radius * 1.5,
                egui::Stroke::new(radius, overlay),
            );
        }

        if config.show_grid_overlay {
            let grid = painter.with_clip_rect(layout.crop_area);
            let stroke = egui::Stroke::new(0.5, Color32::from_white_alpha(110));
            let rect = layout.crop_area;
            for i in 1..3 {
                let x = rect.min.x + rect.width() * i as f32 / 3.0;
                grid.line_segment([egui::pos2(x, rect.min.y), egui::pos2(x, rect.max.y)], stroke);
                let y = rect.min.y + rect.height() * i as f32 / 3.0;
                grid.line_segment([egui::pos2(rect.min.x, y), egui::pos2(rect.max.x, y)], stroke);
            }
        }

        if now < self.flash_until {
            painter.rect_stroke(
                layout.crop_area,
                0.0,
                egui::Stroke::new(2.0, ui.visuals().warn_fg_color),
                StrokeKind::Middle,
            );
        }
    }

    /// Crops the thumbnail, shows it immediately and hands the video to a
    /// conversion worker. Refused while a previous conversion is running.
    fn confirm(&mut self, now: f64) {
        if self.job.is_some() {
            warn!("confirm ignored: a conversion is already running");
            return;
        }
        // A pinch can still be inside its release grace here; end it so
        // the crop is computed from the clamped transform.
        self.release_gestures(now);
        let Some(plan) = self.session.prepare_confirm(&self.media) else {
            return;
        };

        self.set_preview(plan.cropped_thumbnail.clone());
        self.pending_thumbnail = Some(plan.cropped_thumbnail);

        let options = ConverterOptions {
            trim_range: None,
            crop: Some(plan.converter_crop),
            rotate: None,
            quality: None,
            mute: false,
        };
        let job = ConversionJob::spawn(VideoConverter::new(&self.media.source), options);
        info!(
            "cropping {} as job {}",
            self.media.source.display(),
            job.id()
        );
        self.job = Some(job);
    }

    fn poll_job(&mut self) {
        let Some(job) = &self.job else {
            return;
        };
        let Some(result) = job.try_result() else {
            return;
        };
        info!("conversion job {} finished", job.id());
        self.job = None;
        self.handle_conversion_result(result);
    }

    fn handle_conversion_result(&mut self, result: Result<PathBuf, LibraryError>) {
        match result {
            Ok(output) => {
                let thumbnail = match self.pending_thumbnail.take() {
                    Some(thumbnail) => thumbnail,
                    None => self.preview.clone(),
                };
                let media = VideoMedia::new(thumbnail, output);
                // Fresh first frame of the converted file; if that fails the
                // cropped thumbnail stays up.
                match VideoMedia::from_file(&media.source) {
                    Ok(reloaded) => self.set_preview(reloaded.thumbnail),
                    Err(e) => warn!(
                        "could not reload preview from {}: {e}",
                        media.source.display()
                    ),
                }
                self.media = media.clone();
                self.session.reset_transform();
                if let Some(on_finish) = &mut self.on_finish {
                    on_finish(media);
                }
            }
            Err(e) => {
                error!("conversion failed: {e}");
                self.alert = Some(e.to_string());
                self.pending_thumbnail = None;
                self.set_preview(self.media.thumbnail.clone());
            }
        }
    }

    fn set_preview(&mut self, image: RgbaImage) {
        self.preview = image;
        self.texture_dirty = true;
    }

    fn ensure_texture(&mut self, ctx: &egui::Context) -> Option<&TextureHandle> {
        if self.texture_dirty || self.texture.is_none() {
            let image = color_image(&self.preview);
            if let Some(handle) = &mut self.texture {
                handle.set(image, TextureOptions::LINEAR);
            } else {
                self.texture = Some(ctx.load_texture("crop_preview", image, TextureOptions::LINEAR));
            }
            self.texture_dirty = false;
        }
        self.texture.as_ref()
    }
}

fn color_image(image: &RgbaImage) -> egui::ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw())
}

fn color32([r, g, b, a]: [u8; 4]) -> Color32 {
    Color32::from_rgba_unmultiplied(r, g, b, a)
}
