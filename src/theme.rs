// src/theme.rs

use egui::{Color32, Rounding, Stroke, Visuals};

/// Colors of one theme variant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub background: Color32,
    pub on_background: Color32,
    pub primary: Color32,
    pub on_primary: Color32,
    pub surface: Color32,
    pub on_surface: Color32,
    pub secondary_variant: Color32,
    pub primary_variant: Color32,
}

pub const LIGHT_PALETTE: Palette = Palette {
    background: Color32::from_rgb(0xF2, 0xF3, 0xF5),
    on_background: Color32::from_rgb(0xAB, 0xB1, 0xB8),
    primary: Color32::from_rgb(0x57, 0x65, 0xF2),
    on_primary: Color32::from_rgb(0xFF, 0xFF, 0xFF),
    surface: Color32::from_rgb(0xFF, 0xFF, 0xFF),
    on_surface: Color32::from_rgb(0x4F, 0x56, 0x60),
    secondary_variant: Color32::from_rgb(0xF2, 0xF3, 0xF5),
    primary_variant: Color32::from_rgb(0x57, 0x58, 0x60),
};

pub const DARK_PALETTE: Palette = Palette {
    background: Color32::from_rgb(0x1F, 0x22, 0x25),
    on_background: Color32::from_rgb(0xAB, 0xB1, 0xB8),
    primary: Color32::from_rgb(0x57, 0x65, 0xF2),
    on_primary: Color32::from_rgb(0xFF, 0xFF, 0xFF),
    surface: Color32::from_rgb(0x1F, 0x22, 0x25),
    on_surface: Color32::from_rgb(0xAB, 0xB1, 0xB8),
    secondary_variant: Color32::from_rgb(0x2C, 0x2F, 0x32),
    primary_variant: Color32::from_rgb(0xDC, 0xDC, 0xDC),
};

pub fn palette(is_dark: bool) -> &'static Palette {
    if is_dark {
        &DARK_PALETTE
    } else {
        &LIGHT_PALETTE
    }
}

/// egui visuals for the given variant, based on egui's own light/dark sets.
pub fn visuals(is_dark: bool) -> Visuals {
    let palette = palette(is_dark);
    let mut visuals = if is_dark {
        Visuals::dark()
    } else {
        Visuals::light()
    };

    visuals.panel_fill = palette.background;
    visuals.window_fill = palette.surface;
    visuals.extreme_bg_color = palette.secondary_variant;
    visuals.faint_bg_color = palette.secondary_variant;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.on_surface);
    visuals.hyperlink_color = palette.primary;
    visuals.selection.bg_fill = palette.primary;
    visuals.selection.stroke = Stroke::new(1.0, palette.on_primary);

    visuals.widgets.inactive.weak_bg_fill = palette.primary;
    visuals.widgets.inactive.bg_fill = palette.primary;
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, palette.on_primary);
    visuals.widgets.inactive.rounding = Rounding::same(4.0);
    visuals.widgets.hovered.weak_bg_fill = palette.primary_variant;
    visuals.widgets.hovered.rounding = Rounding::same(4.0);

    visuals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visuals_follow_variant() {
        assert!(visuals(true).dark_mode);
        assert!(!visuals(false).dark_mode);
        assert_eq!(visuals(true).panel_fill, DARK_PALETTE.background);
        assert_eq!(visuals(false).panel_fill, LIGHT_PALETTE.background);
    }

    #[test]
    fn test_palettes_share_accent() {
        assert_eq!(LIGHT_PALETTE.primary, DARK_PALETTE.primary);
        assert_ne!(LIGHT_PALETTE.surface, DARK_PALETTE.surface);
    }
}
