// src/main.rs
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use crossbeam::channel::Receiver;
use eframe::{egui, App, Frame, NativeOptions};
use egui::{Align, FontId, Layout, RichText, Sense, Vec2};
use strum::IntoEnumIterator;
use theme_toggle::{
    capture::CaptureSource,
    constants::{
        AUTHOR_NAME, AVATAR_SIZE, LABEL_FONT_SIZE, PROJECT_URL, SETTINGS_BAR_HEIGHT,
        TITLE_FONT_SIZE, TOP_BAR_HEIGHT, UI_PADDING, UI_SPACING, WINDOW_HEIGHT, WINDOW_WIDTH,
    },
    easing::Easing,
    effect::{EffectConfig, ToggleEffect},
    machine::PhaseChange,
    sample::{open_in_browser, FeedAction, MessageFeed},
    state::{ThemeChange, ThemeState},
    theme::{palette, visuals},
    ui::{
        button::ThemeButton, combobox::SettingsComboBox, message::MessageCard,
        switch::ToggleSwitch,
    },
};
use tracing::Level;
use tracing_subscriber::{self};

pub struct ThemeToggleApp {
    /// The dark flag and trigger point owned by the app
    pub theme: ThemeState,
    theme_changes: Receiver<ThemeChange>,

    /// Reveal transition drawn over the window on every flip
    pub effect: ToggleEffect,
    effect_changes: Receiver<PhaseChange>,

    pub feed: MessageFeed,

    // Settings bar state
    pub tap_anywhere: bool,
    pub easing: Easing,
    pub capture_source: CaptureSource,
}

impl ThemeToggleApp {
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let app_span = tracing::span!(Level::INFO, "App Initialization");
        let _app_guard = app_span.enter();

        let is_dark = cc.egui_ctx.style().visuals.dark_mode;
        tracing::debug!("Starting in {} mode", if is_dark { "dark" } else { "light" });

        let mut theme = ThemeState::new(is_dark);
        let theme_changes = theme.subscribe();

        let config = EffectConfig::default();
        let mut effect = ToggleEffect::new(is_dark, config);
        let effect_changes = effect.subscribe();

        let mut feed = MessageFeed::new();
        feed.record_toggle();

        Self {
            theme,
            theme_changes,
            effect,
            effect_changes,
            feed,
            tap_anywhere: false,
            easing: config.animation.easing,
            capture_source: config.capture_source,
        }
    }

    fn apply_visuals(&self, ctx: &egui::Context, is_dark: bool) {
        // Reinstall whenever the context drifts, e.g. after a system theme change
        if ctx.style().visuals.panel_fill != palette(is_dark).background {
            ctx.set_visuals(visuals(is_dark));
        }
    }

    /// Drains theme flips and effect phase changes published since the last frame
    fn process_changes(&mut self, ctx: &egui::Context) {
        while let Ok(change) = self.theme_changes.try_recv() {
            tracing::debug!(
                "Theme flipped to {} at {:?}",
                if change.is_dark { "dark" } else { "light" },
                change.trigger
            );
            if self.feed.record_toggle() == FeedAction::Close {
                tracing::info!("Toggled too many times, closing.");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }

        while let Ok(change) = self.effect_changes.try_recv() {
            if let PhaseChange::CaptureFailed { error, .. } = change {
                tracing::warn!("Theme switched without transition: {}", error);
            }
        }
    }

    fn draw_top_bar(&mut self, ctx: &egui::Context) {
        // Follows the theme on screen, which lags the flag while a capture is pending
        let is_dark = self.effect.presented_dark();
        let title = if is_dark { "Dark Mode" } else { "Light Mode" };

        egui::TopBottomPanel::top("top_bar")
            .exact_height(TOP_BAR_HEIGHT)
            .resizable(false)
            .show_separator_line(false)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.add_space(UI_PADDING);
                    ui.label(RichText::new(title).font(FontId::proportional(TITLE_FONT_SIZE)));

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.add_space(UI_PADDING);
                        let response = ui.add(ThemeButton::new(is_dark));
                        if response.clicked() {
                            // The reveal starts from the center of the button
                            self.theme.toggle(response.rect.center());
                        }
                    });
                });
            });
    }

    fn draw_settings_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("settings_bar")
            .exact_height(SETTINGS_BAR_HEIGHT)
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    let easing_options: Vec<Easing> =
                        Easing::iter().filter(|easing| !easing.is_custom()).collect();
                    let response = ui.add(SettingsComboBox::new(
                        "easing",
                        &mut self.easing,
                        easing_options,
                    ));
                    if response.changed() {
                        tracing::debug!("Easing set to {}", self.easing);
                        self.effect.set_easing(self.easing);
                    }

                    let response = ui.add(SettingsComboBox::new(
                        "capture_source",
                        &mut self.capture_source,
                        CaptureSource::iter().collect(),
                    ));
                    if response.changed() {
                        tracing::debug!("Capture source set to {}", self.capture_source);
                        self.effect.set_capture_source(self.capture_source);
                    }

                    ui.separator();
                    ui.add(ToggleSwitch::new(&mut self.tap_anywhere));
                    ui.label(
                        RichText::new("Tap anywhere").font(FontId::proportional(LABEL_FONT_SIZE)),
                    );
                });
            });
    }

    fn draw_profile_card(&mut self, ui: &mut egui::Ui) {
        let palette = palette(ui.visuals().dark_mode);

        egui::Frame::none()
            .fill(palette.surface)
            .inner_margin(egui::Margin::same(16.0))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    let (rect, _) =
                        ui.allocate_exact_size(Vec2::splat(AVATAR_SIZE), Sense::hover());
                    ui.painter()
                        .circle_filled(rect.center(), AVATAR_SIZE / 2.0, palette.primary);
                    ui.painter().text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        &AUTHOR_NAME[..1],
                        FontId::proportional(AVATAR_SIZE / 2.0),
                        palette.on_primary,
                    );

                    ui.add_space(12.0);
                    ui.label(RichText::new(AUTHOR_NAME).font(FontId::proportional(24.0)));
                    ui.add_space(12.0);

                    if ui
                        .add(
                            egui::Button::new(
                                RichText::new("Check it on GitHub").color(palette.on_primary),
                            )
                            .fill(palette.primary)
                            .min_size(Vec2::new(0.0, 36.0)),
                        )
                        .clicked()
                    {
                        open_in_browser(PROJECT_URL);
                    }
                });
            });
    }

    fn draw_content(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            // Registered before the content so widgets on top keep their clicks
            let background = ui.interact(
                ui.max_rect(),
                ui.id().with("tap_anywhere"),
                Sense::click(),
            );
            if self.tap_anywhere && background.clicked() {
                if let Some(position) = background.interact_pointer_pos() {
                    self.theme.toggle(position);
                }
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    self.draw_profile_card(ui);
                    ui.add_space(UI_SPACING * 2.4);

                    ui.spacing_mut().item_spacing.y = 3.0;
                    for message in self.feed.messages() {
                        ui.add(MessageCard::new(message));
                    }
                });
        });
    }
}

impl App for ThemeToggleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let presented_dark = self
            .effect
            .show(ctx, self.theme.is_dark(), self.theme.trigger());
        self.apply_visuals(ctx, presented_dark);

        self.process_changes(ctx);

        self.draw_top_bar(ctx);
        self.draw_settings_bar(ctx);
        self.draw_content(ctx);
    }
}

fn main() -> eframe::Result<()> {
    // Initialize logging based on build mode
    #[cfg(debug_assertions)]
    {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_target(false)
            .init();
    }

    #[cfg(not(debug_assertions))]
    {
        // In release mode, set up a no-op subscriber to disable logging
        use tracing_subscriber::Registry;
        let noop_subscriber = Registry::default();
        tracing::subscriber::set_global_default(noop_subscriber)
            .expect("Failed to set global subscriber.");
    }

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Theme Toggle")
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_min_inner_size([WINDOW_WIDTH / 2.0, WINDOW_HEIGHT / 2.0]),
        ..Default::default()
    };

    let run_span = tracing::span!(Level::INFO, "Run Native");
    run_span.in_scope(|| {
        eframe::run_native(
            "Theme Toggle",
            options,
            Box::new(|cc| Ok(Box::new(ThemeToggleApp::new(cc)))),
        )
    })
}
