// Bottom status bar: active mode, render health, and keybinding hints.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::action::Action;
use crate::components::Component;
use crate::engine::modes::{Family, ModeKind, MODES_PER_FAMILY};
use crate::engine::surface::Surface;
use crate::engine::Engine;
use crate::theme::Theme;

/// Snapshot of what the bar displays, taken from the engine after each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusInfo {
    pub mode: ModeKind,
    pub family: Family,
    pub enabled: bool,
    pub quality: f32,
    pub fps: f64,
    pub intensity: f32,
    pub faults: u64,
}

impl StatusInfo {
    pub fn from_engine<S: Surface>(engine: &Engine<S>) -> Self {
        let perf = engine.performance();
        Self {
            mode: engine.active_kind(),
            family: engine.family(),
            enabled: engine.is_enabled(),
            quality: perf.quality,
            fps: perf.fps,
            intensity: engine.pending_intensity(),
            faults: engine.stats().faults,
        }
    }
}

#[derive(Default)]
pub struct StatusBar {
    info: Option<StatusInfo>,
    frame_count: u64,
}

impl StatusBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, info: StatusInfo) {
        self.info = Some(info);
    }

    pub fn status(&self) -> Option<&StatusInfo> {
        self.info.as_ref()
    }
}

impl Component for StatusBar {
    fn update(&mut self, action: &Action) -> anyhow::Result<Vec<Action>> {
        if let Action::Tick = action {
            self.frame_count = self.frame_count.wrapping_add(1);
        }
        Ok(vec![])
    }

    fn draw(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let div = Span::styled(" │ ", Style::default().fg(theme.border));
        let key_style = Style::default().fg(theme.text);
        let desc_style = Style::default().fg(theme.text_dim);

        let mut line1_spans = Vec::new();
        let border_color = match &self.info {
            Some(info) => {
                let (status, status_color) = if !info.enabled {
                    ("■", theme.text_dim)
                } else if self.frame_count % 30 < 15 {
                    ("◆", theme.healthy)
                } else {
                    ("◇", theme.healthy)
                };
                let quality_color = if info.quality < 0.99 {
                    theme.degraded
                } else {
                    theme.text_dim
                };
                line1_spans.extend([
                    Span::styled(
                        format!(" {} ", status),
                        Style::default()
                            .fg(status_color)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(info.mode.label(), Style::default().fg(theme.primary)),
                    Span::styled(
                        format!("  {} {}/{}", info.family.label(), info.mode.index() + 1, MODES_PER_FAMILY),
                        Style::default().fg(theme.secondary),
                    ),
                    div.clone(),
                    Span::styled(format!("{:>3.0} fps", info.fps), desc_style),
                    div.clone(),
                    Span::styled(format!("quality {:.2}", info.quality), Style::default().fg(quality_color)),
                    div.clone(),
                    Span::styled(format!("⚡ {:.2}x", info.intensity), Style::default().fg(theme.accent)),
                ]);
                if info.faults > 0 {
                    line1_spans.push(div.clone());
                    line1_spans.push(Span::styled(
                        format!("{} faults", info.faults),
                        Style::default().fg(theme.fault),
                    ));
                }
                if info.enabled {
                    theme.primary
                } else {
                    theme.border
                }
            }
            None => {
                line1_spans.push(Span::styled(" starting…", desc_style));
                theme.border
            }
        };

        let line2 = Line::from(vec![
            Span::raw("   "),
            Span::styled("n/p", key_style),
            Span::styled(" Mode", desc_style),
            div.clone(),
            Span::styled("1-8", key_style),
            Span::styled(" Select", desc_style),
            div.clone(),
            Span::styled("f", key_style),
            Span::styled(" Family", desc_style),
            div.clone(),
            Span::styled("Space", key_style),
            Span::styled(" On/Off", desc_style),
            div.clone(),
            Span::styled("+/-", key_style),
            Span::styled(" Intensity", desc_style),
            div.clone(),
            Span::styled("t", key_style),
            Span::styled(" Theme", desc_style),
            div.clone(),
            Span::styled("?", key_style),
            Span::styled(" Help", desc_style),
            div.clone(),
            Span::styled("q", key_style),
            Span::styled(" Quit", desc_style),
        ]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));

        let paragraph = Paragraph::new(vec![Line::from(line1_spans), line2]).block(block);
        frame.render_widget(paragraph, area);
    }
}
