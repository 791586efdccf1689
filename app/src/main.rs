use eframe::egui;

mod app;
mod config;
mod ui;

fn main() -> eframe::Result<()> {
    env_logger::init();
    let config = config::load_config();
    let title = config.wordings.crop.clone();
    eframe::run_native(
        &title,
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default().with_inner_size([960.0, 720.0]),
            ..Default::default()
        },
        Box::new(move |cc| Ok(Box::new(app::CropApp::new(cc, config)))),
    )
}
