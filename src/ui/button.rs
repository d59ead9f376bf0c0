// src/ui/button.rs

use std::f32::consts::TAU;

use egui::{self, Pos2, Response, Sense, Stroke, Ui, Vec2, Widget};

use crate::theme::palette;

pub const THEME_BUTTON_SIZE: f32 = 32.0;

const SUN_RAYS: usize = 8;

/// Round icon button switching the theme: a sun while dark, a moon while light.
#[derive(Clone, Copy, Debug)]
pub struct ThemeButton {
    is_dark: bool,
    size: f32,
}

impl ThemeButton {
    pub fn new(is_dark: bool) -> Self {
        Self {
            is_dark,
            size: THEME_BUTTON_SIZE,
        }
    }
}

fn paint_sun(ui: &Ui, center: Pos2, radius: f32, stroke: Stroke) {
    let painter = ui.painter();
    painter.circle_filled(center, radius * 0.32, stroke.color);
    for ray in 0..SUN_RAYS {
        let direction = Vec2::angled(TAU * ray as f32 / SUN_RAYS as f32);
        painter.line_segment(
            [center + direction * radius * 0.5, center + direction * radius * 0.7],
            stroke,
        );
    }
}

fn paint_moon(ui: &Ui, center: Pos2, radius: f32, stroke: Stroke, background: egui::Color32) {
    let painter = ui.painter();
    let body = radius * 0.55;
    painter.circle_filled(center, body, stroke.color);
    // Carve the crescent with a background-colored disc.
    painter.circle_filled(
        center + Vec2::new(body * 0.45, -body * 0.35),
        body * 0.8,
        background,
    );
}

impl Widget for ThemeButton {
    fn ui(self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(Vec2::splat(self.size), Sense::click());

        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Button, ui.is_enabled(), "Toggle Theme")
        });

        if ui.is_rect_visible(rect) {
            let palette = palette(self.is_dark);
            let center = rect.center();
            let radius = rect.width() / 2.0;
            let mut background = ui.visuals().panel_fill;

            if response.hovered() {
                background = palette.secondary_variant;
                ui.painter().circle_filled(center, radius, background);
            }

            let stroke = Stroke::new(2.0, palette.on_surface);
            if self.is_dark {
                paint_sun(ui, center, radius, stroke);
            } else {
                paint_moon(ui, center, radius, stroke, background);
            }
        }

        response
    }
}
