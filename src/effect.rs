// src/effect.rs

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use crossbeam::channel;
use egui::{Id, LayerId, Order, Pos2, Shape, TextureHandle, TextureOptions, ViewportCommand};

use crate::{
    capture::{
        default_backend,
        worker::{CaptureTask, CaptureWorker},
        CaptureRegion, CaptureSource, CapturedFrame, ScreenCapture,
    },
    constants::{DEFAULT_CAPTURE_TIMEOUT, DEFAULT_COVER_MARGIN_BAR},
    easing::Easing,
    errors::CaptureError,
    machine::{CaptureTicket, PhaseChange, PhaseKind, ToggleMachine},
    reveal::build_cover_mesh,
    ticker::AnimationSpec,
};

/// Settings of a [`ToggleEffect`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectConfig {
    pub animation: AnimationSpec,
    /// Points at the top of the window left out of the screen capture,
    /// e.g. the height of a title bar included in the window bounds.
    pub cover_margin_bar: u32,
    pub capture_source: CaptureSource,
    /// How long to wait for a cover frame before switching without a transition.
    pub capture_timeout: Duration,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            animation: AnimationSpec::default(),
            cover_margin_bar: DEFAULT_COVER_MARGIN_BAR,
            capture_source: CaptureSource::default(),
            capture_timeout: DEFAULT_CAPTURE_TIMEOUT,
        }
    }
}

impl EffectConfig {
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.animation.duration = duration;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.animation.easing = easing;
        self
    }

    pub fn with_cover_margin_bar(mut self, margin: u32) -> Self {
        self.cover_margin_bar = margin;
        self
    }

    pub fn with_capture_source(mut self, source: CaptureSource) -> Self {
        self.capture_source = source;
        self
    }

    pub fn with_capture_timeout(mut self, timeout: Duration) -> Self {
        self.capture_timeout = timeout;
        self
    }
}

/// Circular reveal played over the window whenever the dark flag flips.
///
/// Call [`ToggleEffect::show`] once per frame with the host's flag and apply the
/// theme it returns. The cover is painted on a foreground layer, above the panels.
pub struct ToggleEffect {
    config: EffectConfig,
    machine: ToggleMachine,
    worker: CaptureWorker,
    backend: Option<Arc<dyn ScreenCapture>>,
    /// Toggle generation waiting on a viewport screenshot.
    pending_screenshot: Option<u64>,
    /// Screenshots requested but not yet delivered. Replies carry no request id,
    /// so only the reply to the latest request is taken as a cover.
    screenshots_in_flight: usize,
    /// Uploaded cover, tagged with the toggle generation it belongs to.
    texture: Option<(u64, TextureHandle)>,
}

impl ToggleEffect {
    pub fn new(is_dark: bool, config: EffectConfig) -> Self {
        let machine = ToggleMachine::new(is_dark)
            .with_spec(config.animation)
            .with_capture_timeout(config.capture_timeout);
        Self {
            config,
            machine,
            worker: CaptureWorker::new(),
            backend: default_backend(),
            pending_screenshot: None,
            screenshots_in_flight: 0,
            texture: None,
        }
    }

    /// Replaces the platform screen capture backend.
    pub fn with_backend(mut self, backend: Arc<dyn ScreenCapture>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    pub fn set_easing(&mut self, easing: Easing) {
        self.config.animation.easing = easing;
        self.machine.set_spec(self.config.animation);
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.config.animation.duration = duration;
        self.machine.set_spec(self.config.animation);
    }

    /// Used from the next toggle on.
    pub fn set_capture_source(&mut self, source: CaptureSource) {
        self.config.capture_source = source;
    }

    pub fn presented_dark(&self) -> bool {
        self.machine.presented_dark()
    }

    pub fn phase(&self) -> PhaseKind {
        self.machine.phase()
    }

    pub fn subscribe(&mut self) -> channel::Receiver<PhaseChange> {
        self.machine.subscribe()
    }

    /// Drives the effect for one frame and returns whether the dark theme
    /// should be presented.
    pub fn show(&mut self, ctx: &egui::Context, is_dark: bool, trigger: Pos2) -> bool {
        let now = Instant::now();

        if let Some(ticket) = self.machine.observe(is_dark, trigger, now) {
            self.dispatch_capture(ctx, ticket, now);
        }
        self.poll_captures(ctx, now);
        self.machine.tick(now);
        self.sync_texture(ctx);
        self.paint(ctx, now);

        if self.machine.is_busy() {
            ctx.request_repaint();
        }

        self.machine.presented_dark()
    }

    fn capture_region(&self, ctx: &egui::Context) -> Result<CaptureRegion, CaptureError> {
        let (inner_rect, pixels_per_point) = ctx.input(|i| {
            (
                i.viewport().inner_rect,
                i.viewport()
                    .native_pixels_per_point
                    .unwrap_or(i.pixels_per_point),
            )
        });
        let rect = inner_rect
            .ok_or_else(|| CaptureError::Platform("window position is unknown".into()))?;
        CaptureRegion::from_window(
            rect.min,
            rect.size(),
            self.config.cover_margin_bar,
            pixels_per_point,
        )
    }

    fn dispatch_capture(&mut self, ctx: &egui::Context, ticket: CaptureTicket, now: Instant) {
        match self.config.capture_source {
            CaptureSource::Viewport => {
                tracing::debug!("Requesting viewport screenshot for toggle {}", ticket.generation);
                self.pending_screenshot = Some(ticket.generation);
                self.screenshots_in_flight += 1;
                ctx.send_viewport_cmd(ViewportCommand::Screenshot);
            }
            CaptureSource::Screen => {
                let submitted = self.submit_screen_capture(ctx, ticket);
                if let Err(error) = submitted {
                    self.machine
                        .complete_capture(ticket.generation, Err(error), now);
                }
            }
        }
    }

    fn submit_screen_capture(
        &self,
        ctx: &egui::Context,
        ticket: CaptureTicket,
    ) -> Result<(), CaptureError> {
        let backend = self.backend.clone().ok_or(CaptureError::Unsupported)?;
        let region = self.capture_region(ctx)?;
        tracing::debug!("Capturing {:?} for toggle {}", region, ticket.generation);
        self.worker
            .submit_task(CaptureTask {
                generation: ticket.generation,
                region,
                backend,
            })
            .map_err(|e| {
                tracing::error!("Failed to submit capture task: {:?}", e);
                CaptureError::WorkerDisconnected
            })
    }

    fn poll_captures(&mut self, ctx: &egui::Context, now: Instant) {
        while let Some(result) = self.worker.try_recv_result() {
            self.machine
                .complete_capture(result.generation, result.frame, now);
        }

        if self.machine.phase() != PhaseKind::Capturing {
            self.pending_screenshot = None;
        }

        let screenshots: Vec<Arc<egui::ColorImage>> = ctx.input(|i| {
            i.raw
                .events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Screenshot { image, .. } => Some(Arc::clone(image)),
                    _ => None,
                })
                .collect()
        });
        for image in screenshots {
            self.screenshots_in_flight = self.screenshots_in_flight.saturating_sub(1);
            if self.screenshots_in_flight > 0 {
                tracing::debug!("Skipping screenshot answering an abandoned toggle");
                continue;
            }
            if let Some(generation) = self.pending_screenshot.take() {
                self.machine
                    .complete_capture(generation, Ok(CapturedFrame::new(image)), now);
            }
        }
    }

    /// Uploads the cover when an animation starts and frees it when it ends.
    fn sync_texture(&mut self, ctx: &egui::Context) {
        match (self.machine.cover_generation(), self.machine.cover()) {
            (Some(generation), Some(frame)) => {
                let current = matches!(&self.texture, Some((tagged, _)) if *tagged == generation);
                if !current {
                    let handle = ctx.load_texture(
                        format!("toggle_effect_cover_{}", generation),
                        Arc::clone(frame.image()),
                        TextureOptions::LINEAR,
                    );
                    self.texture = Some((generation, handle));
                }
            }
            _ => {
                if self.texture.take().is_some() {
                    tracing::debug!("Released cover texture");
                }
            }
        }
    }

    fn paint(&self, ctx: &egui::Context, now: Instant) {
        let Some((_, texture)) = &self.texture else {
            return;
        };
        let rect = ctx.screen_rect();
        let Some(mask) = self.machine.mask(rect.size(), now) else {
            return;
        };

        let mesh = build_cover_mesh(rect, &mask, texture.id());
        if mesh.is_empty() {
            return;
        }

        ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("toggle_effect_cover")))
            .with_clip_rect(rect)
            .add(Shape::mesh(mesh));
    }
}
