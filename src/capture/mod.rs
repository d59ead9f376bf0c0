// src/capture/mod.rs

#[cfg(windows)]
pub mod gdi;
pub mod worker;

use std::sync::Arc;

use egui::{ColorImage, Pos2, Vec2};
use strum_macros::{Display, EnumIter};

use crate::errors::CaptureError;

/// A rectangle of the screen in physical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRegion {
    /// Region covering a window whose top-left corner is `origin` and whose size is
    /// `size`, both in points, minus `margin_bar` points at the top.
    pub fn from_window(
        origin: Pos2,
        size: Vec2,
        margin_bar: u32,
        pixels_per_point: f32,
    ) -> Result<Self, CaptureError> {
        let scale = if pixels_per_point > 0.0 {
            pixels_per_point
        } else {
            1.0
        };
        let margin = margin_bar as f32;
        let width = (size.x * scale).round() as i64;
        let height = ((size.y - margin) * scale).round() as i64;

        if width <= 0 || height <= 0 {
            return Err(CaptureError::EmptyRegion { width, height });
        }

        Ok(Self {
            x: (origin.x * scale).round() as i32,
            y: ((origin.y + margin) * scale).round() as i32,
            width: width as u32,
            height: height as u32,
        })
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// A still image of the window used as the old frame during the transition.
#[derive(Clone, Debug)]
pub struct CapturedFrame {
    image: Arc<ColorImage>,
}

impl CapturedFrame {
    pub fn new(image: Arc<ColorImage>) -> Self {
        Self { image }
    }

    pub fn from_rgba(width: usize, height: usize, rgba: &[u8]) -> Result<Self, CaptureError> {
        check_buffer_len(width, height, rgba.len())?;
        Ok(Self::new(Arc::new(ColorImage::from_rgba_unmultiplied(
            [width, height],
            rgba,
        ))))
    }

    /// Builds a frame from 32-bit BGRA rows as returned by most screen APIs.
    /// The alpha channel is ignored; screen pixels are opaque.
    pub fn from_bgra(width: usize, height: usize, bgra: &[u8]) -> Result<Self, CaptureError> {
        check_buffer_len(width, height, bgra.len())?;
        let mut rgba = Vec::with_capacity(bgra.len());
        for pixel in bgra.chunks_exact(4) {
            rgba.extend_from_slice(&[pixel[2], pixel[1], pixel[0], 255]);
        }
        Self::from_rgba(width, height, &rgba)
    }

    pub fn width(&self) -> usize {
        self.image.size[0]
    }

    pub fn height(&self) -> usize {
        self.image.size[1]
    }

    pub fn image(&self) -> &Arc<ColorImage> {
        &self.image
    }
}

fn check_buffer_len(width: usize, height: usize, len: usize) -> Result<(), CaptureError> {
    if width == 0 || height == 0 {
        return Err(CaptureError::EmptyRegion {
            width: width as i64,
            height: height as i64,
        });
    }
    if width * height * 4 != len {
        return Err(CaptureError::Platform(format!(
            "pixel buffer holds {len} bytes, expected {} for {width}x{height}",
            width * height * 4
        )));
    }
    Ok(())
}

/// A way to grab pixels from the screen.
pub trait ScreenCapture: Send + Sync {
    fn capture(&self, region: &CaptureRegion) -> Result<CapturedFrame, CaptureError>;
}

/// The screen capture backend for the current platform, if there is one.
pub fn default_backend() -> Option<Arc<dyn ScreenCapture>> {
    #[cfg(windows)]
    {
        Some(Arc::new(gdi::GdiCapture))
    }

    #[cfg(not(windows))]
    {
        None
    }
}

/// Where the cover frame comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter)]
pub enum CaptureSource {
    /// Read the window's region back from the screen on a worker thread.
    #[strum(serialize = "Screen")]
    Screen,
    /// Ask the renderer for a screenshot of the viewport.
    #[strum(serialize = "Viewport")]
    Viewport,
}

impl Default for CaptureSource {
    fn default() -> Self {
        if cfg!(windows) {
            CaptureSource::Screen
        } else {
            CaptureSource::Viewport
        }
    }
}
