// src/ui/combobox.rs

use std::fmt::Display;

use eframe::egui::{self, ComboBox as EguiComboBox, Response, Widget};
use egui::FontId;

use crate::constants::LABEL_FONT_SIZE;

/// A simple wrapper around egui's ComboBox for picking one of a few settings values.
pub struct SettingsComboBox<'a, T> {
    id_salt: &'static str,
    selected: &'a mut T,
    options: Vec<T>,
}

impl<'a, T> SettingsComboBox<'a, T>
where
    T: Copy + PartialEq + Display,
{
    pub fn new(id_salt: &'static str, selected: &'a mut T, options: Vec<T>) -> Self {
        Self {
            id_salt,
            selected,
            options,
        }
    }
}

impl<T> Widget for SettingsComboBox<'_, T>
where
    T: Copy + PartialEq + Display,
{
    fn ui(self, ui: &mut egui::Ui) -> Response {
        let Self {
            id_salt,
            selected,
            options,
        } = self;

        let selected_text = selected.to_string();
        let original = *selected;

        // set the combo box width to the widest option
        let text_width = ui.fonts(|fonts| {
            options
                .iter()
                .map(|option| {
                    fonts
                        .layout_no_wrap(
                            option.to_string(),
                            FontId::proportional(LABEL_FONT_SIZE),
                            egui::Color32::WHITE,
                        )
                        .size()
                        .x
                })
                .fold(0.0, f32::max)
        });

        let mut response = EguiComboBox::from_id_salt(id_salt)
            .selected_text(selected_text)
            .width(text_width + ui.spacing().icon_width)
            .show_ui(ui, |ui| {
                for option in options.iter() {
                    ui.selectable_value(&mut *selected, *option, option.to_string());
                }
            })
            .response;

        if *selected != original {
            response.mark_changed();
        }

        response
    }
}
