// Key event handling: maps key presses to actions.

use crate::action::Action;
use crate::app::{App, INTENSITY_STEP};
use crossterm::event::{KeyCode, KeyEvent};

impl App {
    pub fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
        use KeyCode::{Char, Left, Right};

        // The help overlay consumes all keys
        if self.show_help {
            self.action_tx.send(Action::HideHelp)?;
            return Ok(());
        }

        match key.code {
            Char('q') => self.action_tx.send(Action::Quit)?,
            Char('?') => self.action_tx.send(Action::ShowHelp)?,
            Char('n') | Right => self.action_tx.send(Action::NextMode)?,
            Char('p') | Left => self.action_tx.send(Action::PrevMode)?,
            Char('f') => self.action_tx.send(Action::CycleFamily)?,
            Char(' ') => self.action_tx.send(Action::ToggleEnabled)?,
            Char('+') | Char('=') => self.action_tx.send(Action::AdjustIntensity(INTENSITY_STEP))?,
            Char('-') => self.action_tx.send(Action::AdjustIntensity(-INTENSITY_STEP))?,
            Char('t') => self.action_tx.send(Action::ToggleTheme)?,
            Char(c) if c.is_ascii_digit() => {
                let idx = c.to_digit(10).unwrap_or(0) as usize;
                if (1..=8).contains(&idx) {
                    self.action_tx.send(Action::SelectMode(idx - 1))?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}
