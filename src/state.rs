// src/state.rs

use crossbeam::channel;
use egui::Pos2;

/// Sent to subscribers whenever the theme flag flips.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThemeChange {
    pub is_dark: bool,
    pub trigger: Pos2,
}

/// Host-owned theme flag plus the point the next transition should start from.
#[derive(Debug)]
pub struct ThemeState {
    is_dark: bool,
    trigger: Pos2,
    subscribers: Vec<channel::Sender<ThemeChange>>,
}

impl ThemeState {
    pub fn new(is_dark: bool) -> Self {
        Self {
            is_dark,
            trigger: Pos2::ZERO,
            subscribers: Vec::new(),
        }
    }

    pub fn is_dark(&self) -> bool {
        self.is_dark
    }

    pub fn trigger(&self) -> Pos2 {
        self.trigger
    }

    pub fn subscribe(&mut self) -> channel::Receiver<ThemeChange> {
        let (sender, receiver) = channel::unbounded();
        self.subscribers.push(sender);
        receiver
    }

    pub fn set_dark(&mut self, is_dark: bool) {
        if self.is_dark == is_dark {
            return;
        }
        self.is_dark = is_dark;
        let change = ThemeChange {
            is_dark,
            trigger: self.trigger,
        };
        self.subscribers
            .retain(|subscriber| subscriber.send(change).is_ok());
    }

    /// Flips the theme, starting the transition from `at`.
    pub fn toggle(&mut self, at: Pos2) {
        self.trigger = at;
        self.set_dark(!self.is_dark);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_notifies_subscribers() {
        let mut state = ThemeState::new(false);
        let changes = state.subscribe();

        state.toggle(Pos2::new(12.0, 34.0));
        state.toggle(Pos2::new(1.0, 2.0));

        let received: Vec<ThemeChange> = changes.try_iter().collect();
        assert_eq!(
            received,
            vec![
                ThemeChange {
                    is_dark: true,
                    trigger: Pos2::new(12.0, 34.0),
                },
                ThemeChange {
                    is_dark: false,
                    trigger: Pos2::new(1.0, 2.0),
                },
            ]
        );
        assert!(!state.is_dark());
    }

    #[test]
    fn test_setting_same_value_is_silent() {
        let mut state = ThemeState::new(true);
        let changes = state.subscribe();
        state.set_dark(true);
        assert!(changes.try_recv().is_err());
    }
}
