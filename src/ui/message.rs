// src/ui/message.rs

use egui::{Align, Frame, Layout, Margin, Response, RichText, Ui, Widget};

use crate::{constants::UI_PADDING, sample::Message, theme::palette};

/// Full-width card showing one feed message.
pub struct MessageCard<'a> {
    message: &'a Message,
}

impl<'a> MessageCard<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self { message }
    }
}

impl Widget for MessageCard<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let palette = palette(ui.visuals().dark_mode);
        let color = self.message.color.unwrap_or(palette.on_background);

        Frame::none()
            .fill(palette.surface)
            .inner_margin(Margin::same(UI_PADDING))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.with_layout(Layout::top_down(Align::Center), |ui| {
                    ui.label(RichText::new(self.message.content).color(color));
                });
            })
            .response
    }
}
