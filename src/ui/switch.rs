// src/ui/switch.rs

use egui::{self, Pos2, Response, Sense, Ui, Widget};

use crate::theme::palette;

/// Custom on/off switch bound to a boolean.
pub struct ToggleSwitch<'a> {
    on: &'a mut bool,
}

impl<'a> ToggleSwitch<'a> {
    pub fn new(on: &'a mut bool) -> Self {
        Self { on }
    }
}

impl Widget for ToggleSwitch<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let desired_size = ui.spacing().interact_size.y * egui::vec2(2.0, 1.0);
        let (rect, mut response) = ui.allocate_exact_size(desired_size, Sense::click());

        if response.clicked() {
            *self.on = !*self.on;
            response.mark_changed();
        }

        let on = *self.on;
        response.widget_info(|| {
            egui::WidgetInfo::selected(egui::WidgetType::Checkbox, ui.is_enabled(), on, "")
        });

        if ui.is_rect_visible(rect) {
            let how_on = ui.ctx().animate_bool(response.id, on);
            let visuals = ui.style().interact_selectable(&response, on);
            let radius = rect.height() / 2.0;

            let track_color = if on {
                palette(ui.visuals().dark_mode).primary
            } else {
                visuals.bg_fill
            };
            ui.painter().rect(rect, radius, track_color, visuals.bg_stroke);

            let knob_x = egui::lerp((rect.left() + radius)..=(rect.right() - radius), how_on);
            let knob_center = Pos2::new(knob_x, rect.center().y);
            ui.painter()
                .circle(knob_center, radius * 0.75, visuals.fg_stroke.color, visuals.fg_stroke);
        }

        response
    }
}
