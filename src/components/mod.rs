// UI components: the visualizer panel and the status bar. Each one keeps its
// own snapshot of engine state and renders it on demand.

pub mod status_bar;
pub mod visualizer_panel;

use ratatui::layout::Rect;
use ratatui::Frame;

use crate::action::Action;
use crate::theme::Theme;

pub trait Component {
    /// Handle an action dispatched by App. Return optional follow-up actions.
    fn update(&mut self, action: &Action) -> anyhow::Result<Vec<Action>> {
        let _ = action;
        Ok(vec![])
    }

    /// Render into `area` with the current theme's colors.
    fn draw(&self, frame: &mut Frame, area: Rect, theme: &Theme);
}
