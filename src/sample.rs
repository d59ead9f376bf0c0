// src/sample.rs

use egui::Color32;

/// Toggle count at which the feed is cleared. One more toggle closes the app.
pub const LAST_MESSAGE_TOGGLE: usize = 32;

/// A line in the sample's message feed.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub content: &'static str,
    pub color: Option<Color32>,
}

impl Message {
    const fn plain(content: &'static str) -> Self {
        Self {
            content,
            color: None,
        }
    }

    const fn colored(content: &'static str, color: Color32) -> Self {
        Self {
            content,
            color: Some(color),
        }
    }
}

const MAGENTA: Color32 = Color32::from_rgb(0xFF, 0x00, 0xFF);

/// The message shown after `toggle_count` toggles.
pub fn message_for(toggle_count: usize) -> Message {
    match toggle_count {
        0 => Message::plain("Now, try clicking the icon in the top right corner to see the effect!"),
        1 => Message::colored(
            "God, my eyes!! Look what you've done. Switch back quickly!",
            Color32::BLUE,
        ),
        2 => Message::plain(
            "Oh, that's better. But I'd love to see that cool again, so click it again!",
        ),
        3 => Message::plain("No!! Let's switch back. I can't take it anymore!"),
        4 => Message::plain("That's it. Let's not switch anymore. It's comfortable, isn't it!"),
        5 => Message::colored(
            "You're really enjoying this, aren't you? I'm not sure I can take it anymore.",
            Color32::RED,
        ),
        6 => Message::plain("All right, don't click it anymore. I'm going to close the window."),
        7 => Message::colored("I'm serious. I'm going to close the window.", Color32::RED),
        8 => Message::plain("So, you're not going to stop, are you?"),
        9 => Message::plain("I'm done with you. I'm out of here!"),
        10 => Message::plain("However you click, I won't respond. I'm leaving!"),
        16 => Message::colored("Why are you still here? I've already left!", MAGENTA),
        24 => Message::colored("I'm not here. I'm not here. I'm not here.", Color32::GREEN),
        32 => Message::colored(
            "You're so boring, I'll let the system close the window for you!",
            Color32::RED,
        ),
        _ => Message::plain("Goodbye!"),
    }
}

/// What the host should do after a toggle was counted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedAction {
    Continue,
    Close,
}

/// Message feed driven by the number of toggles, newest message first.
#[derive(Debug, Default)]
pub struct MessageFeed {
    messages: Vec<Message>,
    toggle_count: usize,
}

impl MessageFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn toggle_count(&self) -> usize {
        self.toggle_count
    }

    pub fn record_toggle(&mut self) -> FeedAction {
        if self.toggle_count > LAST_MESSAGE_TOGGLE {
            return FeedAction::Close;
        }
        if self.toggle_count == LAST_MESSAGE_TOGGLE {
            self.messages.clear();
        }
        self.messages.insert(0, message_for(self.toggle_count));
        self.toggle_count += 1;
        FeedAction::Continue
    }
}

/// Opens `url` in the default browser. Failures are logged and otherwise ignored.
pub fn open_in_browser(url: &str) {
    match open::that(url) {
        Ok(_) => tracing::debug!("Opened {} in browser", url),
        Err(e) => tracing::warn!("Failed to open {}: {:?}", url, e),
    }
}
