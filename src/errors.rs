// src/errors.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Capture region is empty: {width}x{height}")]
    EmptyRegion { width: i64, height: i64 },

    #[error("No screen capture backend on this platform")]
    Unsupported,

    #[error("Platform capture call failed: {0}")]
    Platform(String),

    #[error("Capture did not complete in time")]
    Timeout,

    #[error("Capture worker disconnected")]
    WorkerDisconnected,
}
