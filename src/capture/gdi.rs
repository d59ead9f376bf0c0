// src/capture/gdi.rs

use std::{ffi::c_void, mem::size_of};

use windows::Win32::{
    Foundation::HWND,
    Graphics::Gdi::{
        BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDC,
        GetDIBits, ReleaseDC, SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS,
        HBITMAP, HDC, HGDIOBJ, SRCCOPY,
    },
};

use super::{CaptureRegion, CapturedFrame, ScreenCapture};
use crate::errors::CaptureError;

/// Copies a region of the desktop through GDI.
#[derive(Clone, Copy, Debug, Default)]
pub struct GdiCapture;

/// Releases the screen DC, the memory DC and the bitmap in reverse order of creation.
struct GdiGuard {
    screen_dc: HDC,
    memory_dc: HDC,
    bitmap: HBITMAP,
    previous: HGDIOBJ,
}

impl Drop for GdiGuard {
    fn drop(&mut self) {
        unsafe {
            if !self.previous.is_invalid() {
                SelectObject(self.memory_dc, self.previous);
            }
            if !self.bitmap.is_invalid() && !DeleteObject(self.bitmap).as_bool() {
                tracing::warn!("DeleteObject failed for capture bitmap");
            }
            if !self.memory_dc.is_invalid() && !DeleteDC(self.memory_dc).as_bool() {
                tracing::warn!("DeleteDC failed for capture memory DC");
            }
            if ReleaseDC(HWND::default(), self.screen_dc) == 0 {
                tracing::warn!("ReleaseDC failed for screen DC");
            }
        }
    }
}

impl ScreenCapture for GdiCapture {
    fn capture(&self, region: &CaptureRegion) -> Result<CapturedFrame, CaptureError> {
        let width = region.width as i32;
        let height = region.height as i32;
        let mut bgra = vec![0u8; region.pixel_count() * 4];

        unsafe {
            let screen_dc = GetDC(HWND::default());
            if screen_dc.is_invalid() {
                return Err(CaptureError::Platform("GetDC returned no screen DC".into()));
            }

            let mut guard = GdiGuard {
                screen_dc,
                memory_dc: HDC::default(),
                bitmap: HBITMAP::default(),
                previous: HGDIOBJ::default(),
            };

            guard.memory_dc = CreateCompatibleDC(screen_dc);
            if guard.memory_dc.is_invalid() {
                return Err(CaptureError::Platform("CreateCompatibleDC failed".into()));
            }

            guard.bitmap = CreateCompatibleBitmap(screen_dc, width, height);
            if guard.bitmap.is_invalid() {
                return Err(CaptureError::Platform(
                    "CreateCompatibleBitmap failed".into(),
                ));
            }

            guard.previous = SelectObject(guard.memory_dc, guard.bitmap);

            BitBlt(
                guard.memory_dc,
                0,
                0,
                width,
                height,
                screen_dc,
                region.x,
                region.y,
                SRCCOPY,
            )
            .map_err(|e| CaptureError::Platform(format!("BitBlt failed: {}", e)))?;

            let mut info = BITMAPINFO {
                bmiHeader: BITMAPINFOHEADER {
                    biSize: size_of::<BITMAPINFOHEADER>() as u32,
                    biWidth: width,
                    // Negative height gives top-down rows.
                    biHeight: -height,
                    biPlanes: 1,
                    biBitCount: 32,
                    biCompression: BI_RGB.0,
                    ..Default::default()
                },
                ..Default::default()
            };

            let lines = GetDIBits(
                guard.memory_dc,
                guard.bitmap,
                0,
                region.height,
                Some(bgra.as_mut_ptr() as *mut c_void),
                &mut info,
                DIB_RGB_COLORS,
            );
            if lines != height {
                return Err(CaptureError::Platform(format!(
                    "GetDIBits copied {} of {} rows",
                    lines, height
                )));
            }
        }

        tracing::debug!(
            "Captured {}x{} screen region at ({}, {})",
            region.width,
            region.height,
            region.x,
            region.y
        );

        CapturedFrame::from_bgra(region.width as usize, region.height as usize, &bgra)
    }
}
