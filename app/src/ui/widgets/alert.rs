use eframe::egui::{self, Align2, Color32, Context, Id, Order, Vec2};

#[cfg(test)]
mod tests {
    use super::*;
    use egui_kittest::kittest::Queryable;
    use egui_kittest::Harness;

    #[test]
    fn test_alert_shows_title_and_message() {
        let harness = Harness::builder()
            .with_size(egui::vec2(400.0, 300.0))
            .build(|ctx| {
                Alert::new("Uh oh, something went wrong", "Conversion error: boom").show(ctx);
            });
        assert!(harness
            .query_by_label("Uh oh, something went wrong")
            .is_some());
        assert!(harness.query_by_label("Conversion error: boom").is_some());
    }

    #[test]
    fn test_alert_uses_custom_ok_label() {
        let harness = Harness::builder()
            .with_size(egui::vec2(400.0, 300.0))
            .build(|ctx| {
                Alert::new("Error", "details")
                    .ok_label("Got it")
                    .show(ctx);
            });
        assert!(harness.query_by_label("Got it").is_some());
        assert!(harness.query_by_label("Ok").is_none());
    }

    #[test]
    fn test_alert_ok_click_acknowledges() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let acknowledged = Rc::new(RefCell::new(false));
        let a = acknowledged.clone();

        let mut harness = Harness::builder()
            .with_size(egui::vec2(400.0, 300.0))
            .build(move |ctx| {
                if Alert::new("Error", "details").show(ctx) {
                    *a.borrow_mut() = true;
                }
            });

        harness.get_by_label("Ok").click();
        harness.run();

        assert!(*acknowledged.borrow());
    }
}

/// Error dialog over a dimmed, click-eating backdrop: one title, one
/// message, one acknowledge button. [`Alert::show`] returns true on the
/// frame the button is clicked; the caller drops its error state then.
pub struct Alert<'a> {
    title: &'a str,
    message: &'a str,
    ok_label: &'a str,
}

impl<'a> Alert<'a> {
    pub fn new(title: &'a str, message: &'a str) -> Self {
        Self {
            title,
            message,
            ok_label: "Ok",
        }
    }

    pub fn ok_label(mut self, label: &'a str) -> Self {
        self.ok_label = label;
        self
    }

    pub fn show(self, ctx: &Context) -> bool {
        let id = Id::new(("alert", self.title));

        // Blocking backdrop under the window.
        egui::Area::new(id.with("backdrop"))
            .interactable(true)
            .fixed_pos(egui::pos2(0.0, 0.0))
            .order(Order::Middle)
            .show(ctx, |ui| {
                let screen_rect = ctx.input(|i| i.screen_rect());
                ui.allocate_rect(screen_rect, egui::Sense::click());
                ui.painter()
                    .rect_filled(screen_rect, 0.0, Color32::from_black_alpha(100));
            });

        let mut acknowledged = false;
        egui::Window::new(self.title)
            .id(id)
            .resizable(false)
            .collapsible(false)
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .min_width(260.0)
            .order(Order::Foreground)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                ui.label(self.message);
                ui.add_space(12.0);
                ui.vertical_centered(|ui| {
                    if ui.button(self.ok_label).clicked() {
                        acknowledged = true;
                    }
                });
            });
        acknowledged
    }
}
