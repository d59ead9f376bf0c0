// src/machine.rs

use std::time::{Duration, Instant};

use crossbeam::channel;
use egui::{Pos2, Vec2};

use crate::{
    capture::CapturedFrame,
    constants::DEFAULT_CAPTURE_TIMEOUT,
    errors::CaptureError,
    reveal::RevealMask,
    ticker::{AnimationSpec, Ticker},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseKind {
    Idle,
    Capturing,
    Animating,
}

/// Notifications sent to observers of a [`ToggleMachine`].
#[derive(Clone, Debug, PartialEq)]
pub enum PhaseChange {
    CaptureStarted { generation: u64, entering_dark: bool },
    /// The flag flipped back before the capture finished.
    CaptureCancelled { generation: u64 },
    /// The new theme was presented without a transition.
    CaptureFailed { generation: u64, error: CaptureError },
    AnimationStarted { generation: u64 },
    /// A new toggle arrived mid-animation and replaced it.
    AnimationCancelled { generation: u64 },
    AnimationFinished { generation: u64 },
}

/// Instruction to capture the screen for toggle `generation`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureTicket {
    pub generation: u64,
    pub entering_dark: bool,
}

/// An interrupted animation kept on screen, frozen, until its replacement is captured.
#[derive(Debug)]
struct HeldCover {
    generation: u64,
    entering_dark: bool,
    trigger: Pos2,
    frame: CapturedFrame,
    ticker: Ticker,
    progress: f32,
}

#[derive(Debug)]
enum Phase {
    Idle,
    Capturing {
        generation: u64,
        target_dark: bool,
        requested_at: Instant,
        held: Option<HeldCover>,
    },
    Animating {
        generation: u64,
        entering_dark: bool,
        frame: CapturedFrame,
        ticker: Ticker,
    },
}

/// Idle → Capturing → Animating → Idle.
///
/// While capturing, the old theme stays presented so the captured frame shows it.
/// The captured frame is owned by the `Animating` phase and dropped with it.
///
/// Repeated toggles cancel and restart: a flip during an animation freezes the
/// current cover where it is and captures what is on screen, and the frozen cover
/// stays up until that capture lands. A flip back during a capture abandons it,
/// resuming the frozen animation if there is one.
#[derive(Debug)]
pub struct ToggleMachine {
    presented_dark: bool,
    trigger: Pos2,
    phase: Phase,
    generation: u64,
    spec: AnimationSpec,
    capture_timeout: Duration,
    observers: Vec<channel::Sender<PhaseChange>>,
}

impl ToggleMachine {
    pub fn new(is_dark: bool) -> Self {
        Self {
            presented_dark: is_dark,
            trigger: Pos2::ZERO,
            phase: Phase::Idle,
            generation: 0,
            spec: AnimationSpec::default(),
            capture_timeout: DEFAULT_CAPTURE_TIMEOUT,
            observers: Vec::new(),
        }
    }

    pub fn with_spec(mut self, spec: AnimationSpec) -> Self {
        self.spec = spec;
        self
    }

    pub fn with_capture_timeout(mut self, timeout: Duration) -> Self {
        self.capture_timeout = timeout;
        self
    }

    /// Takes effect from the next animation on.
    pub fn set_spec(&mut self, spec: AnimationSpec) {
        self.spec = spec;
    }

    pub fn spec(&self) -> AnimationSpec {
        self.spec
    }

    /// The theme the host should currently render.
    pub fn presented_dark(&self) -> bool {
        self.presented_dark
    }

    pub fn trigger(&self) -> Pos2 {
        self.trigger
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> PhaseKind {
        match self.phase {
            Phase::Idle => PhaseKind::Idle,
            Phase::Capturing { .. } => PhaseKind::Capturing,
            Phase::Animating { .. } => PhaseKind::Animating,
        }
    }

    pub fn is_busy(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// The frame being revealed away, while animating or while a restart is
    /// being captured.
    pub fn cover(&self) -> Option<&CapturedFrame> {
        match &self.phase {
            Phase::Animating { frame, .. } => Some(frame),
            Phase::Capturing {
                held: Some(held), ..
            } => Some(&held.frame),
            _ => None,
        }
    }

    /// Toggle generation the current [`cover`](Self::cover) was captured for.
    pub fn cover_generation(&self) -> Option<u64> {
        match &self.phase {
            Phase::Animating { generation, .. } => Some(*generation),
            Phase::Capturing {
                held: Some(held), ..
            } => Some(held.generation),
            _ => None,
        }
    }

    pub fn subscribe(&mut self) -> channel::Receiver<PhaseChange> {
        let (sender, receiver) = channel::unbounded();
        self.observers.push(sender);
        receiver
    }

    fn notify(&mut self, change: PhaseChange) {
        tracing::debug!("Toggle effect: {:?}", change);
        self.observers
            .retain(|observer| observer.send(change.clone()).is_ok());
    }

    fn start_capture(
        &mut self,
        target_dark: bool,
        trigger: Pos2,
        held: Option<HeldCover>,
        now: Instant,
    ) -> CaptureTicket {
        self.generation += 1;
        self.trigger = trigger;
        self.phase = Phase::Capturing {
            generation: self.generation,
            target_dark,
            requested_at: now,
            held,
        };
        self.notify(PhaseChange::CaptureStarted {
            generation: self.generation,
            entering_dark: target_dark,
        });
        CaptureTicket {
            generation: self.generation,
            entering_dark: target_dark,
        }
    }

    /// Feeds the host's dark flag. Returns a ticket when a capture has to start.
    pub fn observe(&mut self, is_dark: bool, trigger: Pos2, now: Instant) -> Option<CaptureTicket> {
        match &self.phase {
            Phase::Idle => (is_dark != self.presented_dark)
                .then(|| self.start_capture(is_dark, trigger, None, now)),
            Phase::Capturing { target_dark, .. } if is_dark != *target_dark => {
                let Phase::Capturing {
                    generation, held, ..
                } = std::mem::replace(&mut self.phase, Phase::Idle)
                else {
                    return None;
                };
                if let Some(held) = held {
                    // Back to the theme the interrupted animation was revealing
                    self.trigger = held.trigger;
                    self.phase = Phase::Animating {
                        generation: held.generation,
                        entering_dark: held.entering_dark,
                        frame: held.frame,
                        ticker: held.ticker,
                    };
                }
                self.notify(PhaseChange::CaptureCancelled { generation });
                None
            }
            Phase::Animating { .. } if is_dark != self.presented_dark => {
                let Phase::Animating {
                    generation,
                    entering_dark,
                    frame,
                    ticker,
                } = std::mem::replace(&mut self.phase, Phase::Idle)
                else {
                    return None;
                };
                let held = HeldCover {
                    generation,
                    entering_dark,
                    trigger: self.trigger,
                    frame,
                    ticker,
                    progress: ticker.sample(now),
                };
                self.notify(PhaseChange::AnimationCancelled { generation });
                Some(self.start_capture(is_dark, trigger, Some(held), now))
            }
            _ => None,
        }
    }

    /// Delivers the outcome of the capture for `generation`.
    /// Results for anything but the pending capture are dropped.
    pub fn complete_capture(
        &mut self,
        generation: u64,
        result: Result<CapturedFrame, CaptureError>,
        now: Instant,
    ) {
        let target_dark = match self.phase {
            Phase::Capturing {
                generation: pending,
                target_dark,
                ..
            } if pending == generation => target_dark,
            _ => {
                tracing::debug!("Dropping stale capture result for toggle {}", generation);
                return;
            }
        };

        self.presented_dark = target_dark;
        match result {
            Ok(frame) => {
                self.phase = Phase::Animating {
                    generation,
                    entering_dark: target_dark,
                    frame,
                    ticker: Ticker::start(self.spec, now),
                };
                self.notify(PhaseChange::AnimationStarted { generation });
            }
            Err(error) => {
                tracing::warn!("Skipping toggle animation: {}", error);
                self.phase = Phase::Idle;
                self.notify(PhaseChange::CaptureFailed { generation, error });
            }
        }
    }

    /// Advances time: finishes animations and gives up on captures past their timeout.
    pub fn tick(&mut self, now: Instant) {
        match &self.phase {
            Phase::Capturing {
                generation,
                requested_at,
                ..
            } if now.saturating_duration_since(*requested_at) >= self.capture_timeout => {
                let generation = *generation;
                self.complete_capture(generation, Err(CaptureError::Timeout), now);
            }
            Phase::Animating {
                generation, ticker, ..
            } if ticker.is_finished(now) => {
                let generation = *generation;
                self.phase = Phase::Idle;
                self.notify(PhaseChange::AnimationFinished { generation });
            }
            _ => {}
        }
    }

    /// The reveal mask for a window of `size`, while a cover is up.
    /// A held cover keeps the mask it had when its animation was interrupted.
    pub fn mask(&self, size: Vec2, now: Instant) -> Option<RevealMask> {
        match &self.phase {
            Phase::Animating {
                entering_dark,
                ticker,
                ..
            } => Some(RevealMask::at(
                self.trigger,
                size,
                ticker.sample(now),
                *entering_dark,
            )),
            Phase::Capturing {
                held: Some(held), ..
            } => Some(RevealMask::at(
                held.trigger,
                size,
                held.progress,
                held.entering_dark,
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{easing::Easing, reveal::RevealClip};

    const TRIGGER: Pos2 = Pos2::new(100.0, 100.0);

    fn frame() -> CapturedFrame {
        CapturedFrame::from_rgba(2, 2, &[0; 16]).unwrap()
    }

    fn machine() -> ToggleMachine {
        ToggleMachine::new(false).with_spec(AnimationSpec {
            duration: Duration::from_millis(1000),
            easing: Easing::Linear,
        })
    }

    #[test]
    fn test_same_flag_does_nothing() {
        let mut machine = machine();
        assert!(machine.observe(false, TRIGGER, Instant::now()).is_none());
        assert_eq!(machine.phase(), PhaseKind::Idle);
    }

    #[test]
    fn test_full_cycle() {
        let mut machine = machine();
        let start = Instant::now();

        let ticket = machine.observe(true, TRIGGER, start).unwrap();
        assert!(ticket.entering_dark);
        assert_eq!(machine.phase(), PhaseKind::Capturing);
        // Old theme stays up while the screen is read back.
        assert!(!machine.presented_dark());

        machine.complete_capture(ticket.generation, Ok(frame()), start);
        assert_eq!(machine.phase(), PhaseKind::Animating);
        assert!(machine.presented_dark());
        assert!(machine.cover().is_some());

        machine.tick(start + Duration::from_millis(999));
        assert_eq!(machine.phase(), PhaseKind::Animating);

        machine.tick(start + Duration::from_millis(1000));
        assert_eq!(machine.phase(), PhaseKind::Idle);
        assert!(machine.cover().is_none());
    }

    #[test]
    fn test_mask_scenario_at_half_progress() {
        let mut machine = machine();
        let start = Instant::now();
        let ticket = machine.observe(true, TRIGGER, start).unwrap();
        machine.complete_capture(ticket.generation, Ok(frame()), start);

        let mask = machine
            .mask(Vec2::new(400.0, 600.0), start + Duration::from_millis(500))
            .unwrap();
        assert_eq!(mask.center, TRIGGER);
        assert_eq!(mask.clip, RevealClip::Difference);
        assert!((mask.radius - 360.6).abs() < 0.1, "got {}", mask.radius);
    }

    #[test]
    fn test_frame_is_released_after_animation() {
        let mut machine = machine();
        let start = Instant::now();
        let cover = frame();
        let image = Arc::clone(cover.image());

        let ticket = machine.observe(true, TRIGGER, start).unwrap();
        machine.complete_capture(ticket.generation, Ok(cover), start);
        assert_eq!(Arc::strong_count(&image), 2);

        machine.tick(start + Duration::from_secs(2));
        assert_eq!(Arc::strong_count(&image), 1);
    }

    #[test]
    fn test_capture_failure_presents_new_theme() {
        let mut machine = machine();
        let events = machine.subscribe();
        let start = Instant::now();

        let ticket = machine.observe(true, TRIGGER, start).unwrap();
        machine.complete_capture(ticket.generation, Err(CaptureError::Unsupported), start);

        assert_eq!(machine.phase(), PhaseKind::Idle);
        assert!(machine.presented_dark());
        let changes: Vec<PhaseChange> = events.try_iter().collect();
        assert_eq!(
            changes.last(),
            Some(&PhaseChange::CaptureFailed {
                generation: ticket.generation,
                error: CaptureError::Unsupported,
            })
        );
    }

    #[test]
    fn test_capture_times_out() {
        let mut machine = machine().with_capture_timeout(Duration::from_millis(200));
        let start = Instant::now();
        machine.observe(true, TRIGGER, start);

        machine.tick(start + Duration::from_millis(100));
        assert_eq!(machine.phase(), PhaseKind::Capturing);

        machine.tick(start + Duration::from_millis(200));
        assert_eq!(machine.phase(), PhaseKind::Idle);
        assert!(machine.presented_dark());
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let mut machine = machine();
        let start = Instant::now();

        let first = machine.observe(true, TRIGGER, start).unwrap();
        machine.complete_capture(first.generation + 5, Ok(frame()), start);
        assert_eq!(machine.phase(), PhaseKind::Capturing);
        assert!(!machine.presented_dark());
    }

    #[test]
    fn test_flip_back_while_capturing_cancels() {
        let mut machine = machine();
        let start = Instant::now();

        let ticket = machine.observe(true, TRIGGER, start).unwrap();
        assert!(machine.observe(true, TRIGGER, start).is_none());
        assert!(machine.observe(false, TRIGGER, start).is_none());
        assert_eq!(machine.phase(), PhaseKind::Idle);
        assert!(!machine.presented_dark());

        // The abandoned capture lands afterwards and is ignored.
        machine.complete_capture(ticket.generation, Ok(frame()), start);
        assert_eq!(machine.phase(), PhaseKind::Idle);
    }

    #[test]
    fn test_toggle_mid_animation_restarts() {
        let mut machine = machine();
        let events = machine.subscribe();
        let start = Instant::now();

        let first = machine.observe(true, TRIGGER, start).unwrap();
        machine.complete_capture(first.generation, Ok(frame()), start);

        let later = start + Duration::from_millis(300);
        let second = machine
            .observe(false, Pos2::new(5.0, 5.0), later)
            .unwrap();
        assert!(!second.entering_dark);
        assert!(second.generation > first.generation);
        assert_eq!(machine.phase(), PhaseKind::Capturing);
        assert_eq!(machine.trigger(), Pos2::new(5.0, 5.0));
        // The interrupted cover stays up until the new one is captured.
        assert!(machine.cover().is_some());
        assert_eq!(machine.cover_generation(), Some(first.generation));

        machine.complete_capture(second.generation, Ok(frame()), later);
        assert_eq!(machine.cover_generation(), Some(second.generation));
        let mask = machine.mask(Vec2::new(400.0, 600.0), later).unwrap();
        assert_eq!(mask.clip, RevealClip::Intersect);
        assert!(!machine.presented_dark());

        assert!(events.try_iter().any(|change| change
            == PhaseChange::AnimationCancelled {
                generation: first.generation
            }));
    }

    #[test]
    fn test_held_cover_mask_is_frozen() {
        let mut machine = machine();
        let size = Vec2::new(400.0, 600.0);
        let start = Instant::now();

        let first = machine.observe(true, TRIGGER, start).unwrap();
        machine.complete_capture(first.generation, Ok(frame()), start);
        let interrupted_at = start + Duration::from_millis(500);
        let before = machine.mask(size, interrupted_at).unwrap();

        machine.observe(false, Pos2::new(5.0, 5.0), interrupted_at);
        let held = machine
            .mask(size, start + Duration::from_millis(900))
            .unwrap();
        assert_eq!(held, before);
        assert_eq!(held.center, TRIGGER);
        assert_eq!(held.clip, RevealClip::Difference);
    }

    #[test]
    fn test_flip_back_resumes_held_animation() {
        let mut machine = machine();
        let events = machine.subscribe();
        let start = Instant::now();

        let first = machine.observe(true, TRIGGER, start).unwrap();
        machine.complete_capture(first.generation, Ok(frame()), start);
        let later = start + Duration::from_millis(300);
        let second = machine.observe(false, Pos2::new(5.0, 5.0), later).unwrap();

        assert!(machine.observe(true, Pos2::new(5.0, 5.0), later).is_none());
        assert_eq!(machine.phase(), PhaseKind::Animating);
        assert_eq!(machine.cover_generation(), Some(first.generation));
        assert_eq!(machine.trigger(), TRIGGER);
        assert!(machine.presented_dark());

        // The abandoned restart capture is ignored and the animation ends on time.
        machine.complete_capture(second.generation, Ok(frame()), later);
        assert_eq!(machine.cover_generation(), Some(first.generation));
        machine.tick(start + Duration::from_millis(1000));
        assert_eq!(machine.phase(), PhaseKind::Idle);
        assert!(events.try_iter().any(|change| change
            == PhaseChange::AnimationFinished {
                generation: first.generation
            }));
    }

    #[test]
    fn test_failed_restart_drops_held_cover() {
        let mut machine = machine();
        let start = Instant::now();
        let cover = frame();
        let image = Arc::clone(cover.image());

        let first = machine.observe(true, TRIGGER, start).unwrap();
        machine.complete_capture(first.generation, Ok(cover), start);
        let second = machine.observe(false, TRIGGER, start).unwrap();
        assert_eq!(Arc::strong_count(&image), 2);

        machine.complete_capture(second.generation, Err(CaptureError::Timeout), start);
        assert_eq!(machine.phase(), PhaseKind::Idle);
        assert!(machine.cover().is_none());
        assert!(!machine.presented_dark());
        assert_eq!(Arc::strong_count(&image), 1);
    }

    #[test]
    fn test_dropped_observer_is_pruned() {
        let mut machine = machine();
        drop(machine.subscribe());
        let kept = machine.subscribe();

        machine.observe(true, TRIGGER, Instant::now());
        assert_eq!(machine.observers.len(), 1);
        assert_eq!(kept.try_iter().count(), 1);
    }
}
