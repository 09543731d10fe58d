// Layout and rendering: the visualizer fills the terminal above a two-line
// status bar, with the help overlay composited on top.

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::components::status_bar::StatusBar;
use crate::components::visualizer_panel::VisualizerPanel;
use crate::components::Component;
use crate::theme::Theme;

const STATUS_HEIGHT: u16 = 4;

pub struct DrawState<'a> {
    pub visualizer: &'a VisualizerPanel,
    pub status_bar: &'a StatusBar,
    pub theme: &'a Theme,
    pub show_help: bool,
}

/// Split the terminal into the visualizer area and the status bar.
pub fn layout(area: Rect) -> (Rect, Rect) {
    let outer = Layout::vertical([Constraint::Min(0), Constraint::Length(STATUS_HEIGHT)]).split(area);
    (outer[0], outer[1])
}

/// Area the visualizer raster is presented in.
pub fn visualizer_area(area: Rect) -> Rect {
    layout(area).0
}

pub fn draw(frame: &mut Frame, state: &DrawState) {
    let (visual, status) = layout(frame.area());
    state.visualizer.draw(frame, visual, state.theme);
    state.status_bar.draw(frame, status, state.theme);

    if state.show_help {
        draw_help_overlay(frame, state.theme);
    }
}

fn draw_help_overlay(frame: &mut Frame, theme: &Theme) {
    let area = frame.area();
    let overlay_width = 50u16;
    let overlay_height = 18u16;
    let x = area.width.saturating_sub(overlay_width) / 2;
    let y = area.height.saturating_sub(overlay_height) / 2;
    let overlay_area = Rect::new(
        x,
        y,
        overlay_width.min(area.width),
        overlay_height.min(area.height),
    );

    frame.render_widget(Clear, overlay_area);

    let keybindings = [
        ("q", "Quit"),
        ("n / Right", "Next mode"),
        ("p / Left", "Previous mode"),
        ("1-8", "Select mode"),
        ("f", "Switch family"),
        ("Space", "Toggle visualizer"),
        ("+ / -", "Lightning intensity"),
        ("t", "Toggle theme"),
        ("?", "Toggle this help overlay"),
    ];

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            " Keybindings ",
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for (key, desc) in &keybindings {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:12}", key), Style::default().fg(theme.accent)),
            Span::raw(*desc),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press any key to close",
        Style::default().fg(theme.text_dim),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .title_alignment(Alignment::Center);
    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, overlay_area);
}
