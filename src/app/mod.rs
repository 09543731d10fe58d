// Central coordinator: owns the engine, its raster and the components.
// Runs the event loop (key → Action → handle_action → engine/components → draw).

mod input;

use std::time::Instant;

use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::info;

use crate::action::Action;
use crate::components::status_bar::{StatusBar, StatusInfo};
use crate::components::visualizer_panel::{raster_size, VisualizerPanel};
use crate::components::Component;
use crate::config::Config;
use crate::engine::surface::Raster;
use crate::engine::Engine;
use crate::theme::Theme;
use crate::tui::{Tui, TuiEvent};
use crate::ui;

/// Intensity change per `+` / `-` press.
pub const INTENSITY_STEP: f32 = 0.25;

/// Top-level coordinator: owns the rendering engine and every component.
/// The tick interval paces engine frames; everything else is an Action.
pub struct App {
    running: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,

    // Components
    pub(crate) visualizer: VisualizerPanel,
    pub(crate) status_bar: StatusBar,

    // State
    pub engine: Engine<Raster>,
    pub(crate) config: Config,
    pub theme: Theme,
    pub show_help: bool,
    started: Instant,
}

impl App {
    /// Build the app without touching the terminal. The raster starts at a
    /// nominal size and is resized to the panel on the first draw.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let theme = Theme::from_name(&config.visualizer.theme);

        let mut visualizer = VisualizerPanel::new(config.general.supersample());
        let mut status_bar = StatusBar::new();

        let (width, height) = raster_size(Rect::new(0, 0, 80, 20), visualizer.supersample());
        let mut options = config.visualizer.engine_options();
        options.background = theme.background;
        let engine = Engine::new(Raster::new(width, height), options);
        visualizer.set_enabled(engine.is_enabled());
        status_bar.set_status(StatusInfo::from_engine(&engine));

        info!(
            mode = engine.active_kind().label(),
            family = engine.family().label(),
            theme = theme.name,
            "app started"
        );

        Ok(Self {
            running: true,
            action_tx,
            action_rx,
            visualizer,
            status_bar,
            engine,
            config,
            theme,
            show_help: false,
            started: Instant::now(),
        })
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut tui = Tui::new(self.config.general.frame_rate)?;
        tui.enter()?;

        let area = tui.area()?;
        self.action_tx.send(Action::Resize(area.width, area.height))?;

        while self.running {
            let state = ui::DrawState {
                visualizer: &self.visualizer,
                status_bar: &self.status_bar,
                theme: &self.theme,
                show_help: self.show_help,
            };
            tui.draw(|frame| ui::draw(frame, &state))?;

            tokio::select! {
                Some(event) = tui.event_rx.recv() => {
                    match event {
                        TuiEvent::Key(key) => self.handle_key(key)?,
                        TuiEvent::Resize(cols, rows) => { self.action_tx.send(Action::Resize(cols, rows))?; }
                        TuiEvent::Tick => { self.action_tx.send(Action::Tick)?; }
                    }
                }
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action)?;
                }
            }
        }

        self.engine.destroy();
        tui.exit()?;
        Ok(())
    }

    pub fn handle_action(&mut self, action: Action) -> anyhow::Result<()> {
        match action {
            // Lifecycle
            Action::Quit => self.running = false,
            Action::Tick => {
                self.render_frame();
                self.status_bar.update(&Action::Tick)?;
            }

            // Engine requests, applied at the next frame boundary
            Action::SelectMode(index) => self.engine.request_mode(index),
            Action::NextMode => self.engine.step_mode(true),
            Action::PrevMode => self.engine.step_mode(false),
            Action::CycleFamily => {
                let next = self.engine.family().next();
                self.engine.request_family(next);
            }
            Action::ToggleEnabled => self.engine.toggle_enabled(),
            Action::AdjustIntensity(delta) => {
                let target = (self.engine.pending_intensity() + delta).clamp(0.25, 3.0);
                self.engine.request_intensity(target);
            }
            Action::ToggleTheme => {
                self.theme = self.theme.toggled();
                self.engine.request_background(self.theme.background);
                info!(theme = self.theme.name, "theme changed");
            }
            Action::Resize(cols, rows) => {
                let area = ui::visualizer_area(Rect::new(0, 0, cols, rows));
                let (width, height) = raster_size(area, self.visualizer.supersample());
                self.engine.request_resize(width, height);
            }

            // Overlays
            Action::ShowHelp => self.show_help = true,
            Action::HideHelp => self.show_help = false,
        }
        Ok(())
    }

    /// Advance the engine one frame and refresh the component snapshots.
    fn render_frame(&mut self) {
        let now_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        self.engine.frame(now_ms);
        self.visualizer.set_enabled(self.engine.is_enabled());
        if self.engine.is_enabled() {
            self.visualizer.capture(self.engine.surface());
        }
        self.status_bar.set_status(StatusInfo::from_engine(&self.engine));
    }

    pub fn visualizer(&self) -> &VisualizerPanel {
        &self.visualizer
    }

    pub fn status_bar(&self) -> &StatusBar {
        &self.status_bar
    }

    /// Drain and handle every queued action.
    pub fn flush_actions(&mut self) -> anyhow::Result<()> {
        while let Ok(action) = self.action_rx.try_recv() {
            self.handle_action(action)?;
        }
        Ok(())
    }
}
