// Terminal host for the engine: raw mode and the alternate screen, plus a
// background task that turns crossterm input and a frame clock into
// `TuiEvent`s. Each `Tick` is one engine frame.

use std::io::Stderr;
use std::time::Duration;

use crossterm::{
    event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

#[derive(Debug)]
pub enum TuiEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Time for the next engine frame.
    Tick,
}

pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stderr>>,
    pub event_rx: mpsc::UnboundedReceiver<TuiEvent>,
    event_tx: mpsc::UnboundedSender<TuiEvent>,
    frame_interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl Tui {
    pub fn new(frame_rate: f64) -> anyhow::Result<Self> {
        let terminal = Terminal::new(CrosstermBackend::new(std::io::stderr()))?;
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Ok(Self {
            terminal,
            event_rx,
            event_tx,
            frame_interval: Duration::from_secs_f64(1.0 / frame_rate.clamp(1.0, 240.0)),
            task: None,
        })
    }

    pub fn enter(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(std::io::stderr(), EnterAlternateScreen)?;
        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        self.task = Some(self.spawn_event_task());
        Ok(())
    }

    pub fn exit(&mut self) -> anyhow::Result<()> {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        terminal::disable_raw_mode()?;
        execute!(std::io::stderr(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    fn spawn_event_task(&self) -> JoinHandle<()> {
        let tx = self.event_tx.clone();
        let frame_interval = self.frame_interval;

        tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut frames = tokio::time::interval(frame_interval);
            // A slow frame should lower the frame rate, not queue a burst of ticks.
            frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                let event = tokio::select! {
                    input = reader.next() => match input {
                        Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                            TuiEvent::Key(key)
                        }
                        Some(Ok(CrosstermEvent::Resize(cols, rows))) => TuiEvent::Resize(cols, rows),
                        Some(Ok(_)) => continue,
                        Some(Err(err)) => {
                            debug!(error = %err, "terminal event stream failed");
                            break;
                        }
                        None => break,
                    },
                    _ = frames.tick() => TuiEvent::Tick,
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        })
    }

    pub fn area(&self) -> anyhow::Result<Rect> {
        let size = self.terminal.size()?;
        Ok(Rect::new(0, 0, size.width, size.height))
    }

    pub fn draw<F>(&mut self, f: F) -> anyhow::Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // Restore the terminal if the app bailed out with an error.
        if self.task.is_some() {
            let _ = self.exit();
        }
    }
}
