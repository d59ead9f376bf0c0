// src/capture/worker.rs

use std::{sync::Arc, thread};

use crossbeam::channel;

use super::{CaptureRegion, CapturedFrame, ScreenCapture};
use crate::errors::CaptureError;

/// A capture to run off the UI thread.
#[derive(Clone)]
pub struct CaptureTask {
    /// Generation of the toggle that asked for this capture.
    pub generation: u64,
    pub region: CaptureRegion,
    pub backend: Arc<dyn ScreenCapture>,
}

/// The result of a processed capture task.
#[derive(Debug)]
pub struct CaptureResult {
    pub generation: u64,
    pub frame: Result<CapturedFrame, CaptureError>,
}

/// Runs captures on background threads and hands the frames back to the UI thread.
pub struct CaptureWorker {
    result_receiver: channel::Receiver<CaptureResult>,
    result_sender: channel::Sender<CaptureResult>,
}

impl Default for CaptureWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureWorker {
    pub fn new() -> Self {
        let (result_sender, result_receiver) = channel::unbounded::<CaptureResult>();
        Self {
            result_sender,
            result_receiver,
        }
    }

    /// Submits a capture; its result shows up later in `try_recv_result`.
    pub fn submit_task(&self, task: CaptureTask) -> anyhow::Result<()> {
        let result_sender = self.result_sender.clone();
        thread::Builder::new()
            .name(format!("capture-{}", task.generation))
            .spawn(move || {
                let frame = task.backend.capture(&task.region);
                if let Err(ref e) = frame {
                    tracing::warn!("Capture {} failed: {}", task.generation, e);
                }
                let result = CaptureResult {
                    generation: task.generation,
                    frame,
                };
                if let Err(e) = result_sender.send(result) {
                    tracing::error!("Failed to send capture result: {:?}", e);
                }
            })?;
        Ok(())
    }

    /// Attempts to receive a capture result without blocking.
    pub fn try_recv_result(&self) -> Option<CaptureResult> {
        self.result_receiver.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::capture::tests::{FailingCapture, SolidCapture};

    fn wait_for_result(worker: &CaptureWorker) -> CaptureResult {
        worker
            .result_receiver
            .recv_timeout(Duration::from_secs(5))
            .expect("capture worker produced no result")
    }

    fn region() -> CaptureRegion {
        CaptureRegion {
            x: 0,
            y: 0,
            width: 8,
            height: 6,
        }
    }

    #[test]
    fn test_frame_is_published_back() {
        let worker = CaptureWorker::new();
        worker
            .submit_task(CaptureTask {
                generation: 7,
                region: region(),
                backend: Arc::new(SolidCapture([255, 0, 0, 255])),
            })
            .unwrap();

        let result = wait_for_result(&worker);
        assert_eq!(result.generation, 7);
        let frame = result.frame.unwrap();
        assert_eq!((frame.width(), frame.height()), (8, 6));
    }

    #[test]
    fn test_failure_is_published_back() {
        let worker = CaptureWorker::new();
        worker
            .submit_task(CaptureTask {
                generation: 1,
                region: region(),
                backend: Arc::new(FailingCapture),
            })
            .unwrap();

        let result = wait_for_result(&worker);
        assert!(matches!(result.frame, Err(CaptureError::Platform(_))));
    }

    #[test]
    fn test_try_recv_is_empty_without_tasks() {
        let worker = CaptureWorker::new();
        assert!(worker.try_recv_result().is_none());
    }
}
