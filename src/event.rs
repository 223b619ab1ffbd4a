use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{debug, trace};

use crate::app::{App, AppEvent};
use crate::clock::Clock;
use crate::service::Storage;

/// Redraw cadence; the live duration of a running task advances at this rate.
const TICK_RATE: Duration = Duration::from_millis(250);

/// Polls for crossterm events and maps them to `AppEvent`s.
pub fn poll(timeout: Duration) -> Result<Option<AppEvent>> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                return Ok(None);
            }
            trace!(key = ?key.code, "Key pressed");
            return Ok(Some(AppEvent::KeyPress(key.code)));
        }
        return Ok(None);
    }
    Ok(Some(AppEvent::Tick))
}

/// Runs the main event loop until the app stops running.
pub fn run<S: Storage, C: Clock>(app: &mut App<S, C>, terminal: &mut crate::tui::Terminal) -> Result<()> {
    debug!("Entering event loop");
    while app.running {
        terminal.draw(|frame| crate::ui::draw(frame, app))?;

        if let Some(event) = poll(TICK_RATE)? {
            app.update(event);
        }
    }
    debug!("Event loop finished");
    Ok(())
}
