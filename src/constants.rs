// src/constants.rs

use std::time::Duration;

pub const UI_SPACING: f32 = 10.0; // Spacing between UI elements
pub const UI_PADDING: f32 = 8.0; // Padding inside UI elements

// Initial window size of the sample app.
pub const WINDOW_WIDTH: f32 = 420.0;
pub const WINDOW_HEIGHT: f32 = 720.0;

pub const TOP_BAR_HEIGHT: f32 = 48.0;
pub const SETTINGS_BAR_HEIGHT: f32 = 36.0;

pub const LABEL_FONT_SIZE: f32 = 14.0;
pub const TITLE_FONT_SIZE: f32 = 20.0;

pub const AVATAR_SIZE: f32 = 128.0;

// Animation defaults
pub const DEFAULT_ANIM_DURATION: Duration = Duration::from_millis(1145);
pub const DEFAULT_CAPTURE_TIMEOUT: Duration = Duration::from_millis(500);

/// Height of a platform top bar to leave out of the captured region.
/// The capture uses the viewport's inner rect, which already excludes decorations.
pub const DEFAULT_COVER_MARGIN_BAR: u32 = 0;

/// Circle tessellation bounds for the cover mesh.
pub const MIN_CIRCLE_SEGMENTS: usize = 32;
pub const MAX_CIRCLE_SEGMENTS: usize = 256;

pub const PROJECT_URL: &str = "https://github.com/MultiWolf/themeToggle-like-Telegram";
pub const AUTHOR_NAME: &str = "Fleey";
