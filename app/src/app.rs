use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use eframe::egui;
use library::model::media::VideoMedia;
use log::{error, info};

use crate::config::{save_config, AppConfig};
use crate::ui::crop_screen::{CropScreen, CropScreenEvent};
use crate::ui::{fonts, theme};

pub struct CropApp {
    config: AppConfig,
    screen: Option<CropScreen>,
    /// Converted files reported through the crop screen callback, most
    /// recent last. The status bar shows the last entry.
    saved: Rc<RefCell<Vec<PathBuf>>>,
    open_error: Option<String>,
}

impl CropApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        fonts::setup_fonts(&cc.egui_ctx);
        theme::apply_theme(&cc.egui_ctx, &config);

        let mut app = Self {
            config,
            screen: None,
            saved: Rc::new(RefCell::new(Vec::new())),
            open_error: None,
        };
        if let Some(path) = std::env::args().nth(1) {
            app.open_video(PathBuf::from(path));
        }
        app
    }

    fn open_video(&mut self, path: PathBuf) {
        info!("opening {}", path.display());
        match VideoMedia::from_file(&path) {
            Ok(media) => {
                self.open_error = None;
                self.build_screen(media);
            }
            Err(e) => {
                error!("failed to open {}: {e}", path.display());
                self.open_error = Some(e.to_string());
            }
        }
    }

    fn build_screen(&mut self, media: VideoMedia) {
        let mut screen = CropScreen::new(media);
        let saved = self.saved.clone();
        screen.on_finish = Some(Box::new(move |media| {
            info!("saved cropped video to {}", media.source.display());
            saved.borrow_mut().push(media.source.clone());
        }));
        self.screen = Some(screen);
    }

    fn pick_video(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Video", &["mp4", "mov", "m4v", "avi", "mkv", "webm"])
            .pick_file();
        if let Some(path) = picked {
            self.open_video(path);
        }
    }

    fn ui(&mut self, ctx: &egui::Context) {
        // Collect inputs while drawing, apply them after the panels.
        let mut open_clicked = false;
        let mut close_screen = false;

        egui::TopBottomPanel::top("title_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(format!(
                        "{} {}",
                        egui_phosphor::regular::CROP,
                        self.config.wordings.crop
                    ))
                    .strong(),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let converting = self.screen.as_ref().is_some_and(|s| s.is_converting());
                    let open = ui.add_enabled(
                        !converting,
                        egui::Button::new(format!("{} Open", egui_phosphor::regular::FOLDER_OPEN)),
                    );
                    if open.clicked() {
                        open_clicked = true;
                    }

                    let grid = ui.selectable_label(
                        self.config.show_grid_overlay,
                        egui_phosphor::regular::GRID_FOUR,
                    );
                    if grid.clicked() {
                        self.config.show_grid_overlay = !self.config.show_grid_overlay;
                        save_config(&self.config);
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| match self.saved.borrow().last() {
                Some(path) => {
                    ui.label(format!("Saved {}", path.display()));
                }
                None => {
                    ui.label("Ready");
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            match &mut self.screen {
                Some(screen) => {
                    if let Some(CropScreenEvent::Cancelled) = screen.show(ui, &self.config) {
                        close_screen = true;
                    }
                }
                None => {
                    ui.vertical_centered(|ui| {
                        ui.add_space(ui.available_height() * 0.3);
                        ui.label(
                            egui::RichText::new(egui_phosphor::regular::FILM_STRIP).size(48.0),
                        );
                        ui.label("Open a video to crop it.");
                        ui.add_space(8.0);
                        if ui
                            .button(format!(
                                "{} Open Video…",
                                egui_phosphor::regular::FOLDER_OPEN
                            ))
                            .clicked()
                        {
                            open_clicked = true;
                        }
                        if let Some(message) = &self.open_error {
                            ui.add_space(8.0);
                            ui.colored_label(ui.visuals().error_fg_color, message);
                        }
                    });
                }
            }
        });

        if close_screen {
            info!("crop cancelled");
            self.screen = None;
        }
        if open_clicked {
            self.pick_video();
        }
    }
}

impl eframe::App for CropApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui_kittest::kittest::Queryable;
    use egui_kittest::Harness;

    fn test_app(config: AppConfig) -> CropApp {
        CropApp {
            config,
            screen: None,
            saved: Rc::new(RefCell::new(Vec::new())),
            open_error: None,
        }
    }

    #[test]
    fn test_title_bar_shows_configured_crop_wording() {
        let mut config = AppConfig::default();
        config.wordings.crop = "Recadrer".to_string();
        let mut app = test_app(config);

        let harness = Harness::builder()
            .with_size(egui::vec2(640.0, 480.0))
            .build(move |ctx| app.ui(ctx));

        let title = format!("{} Recadrer", egui_phosphor::regular::CROP);
        assert!(harness.query_by_label(title.as_str()).is_some());
        assert!(harness.query_by_label("Ready").is_some());
    }
}
