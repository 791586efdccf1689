use egui::Context;

/// Installs the default egui fonts plus the phosphor icon set used by the
/// toolbar and empty state.
pub fn setup_fonts(ctx: &Context) {
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    ctx.set_fonts(fonts);
}
