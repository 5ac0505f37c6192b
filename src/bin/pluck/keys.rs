//! Keyboard input for piano mode

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal,
};
use pluck_dsp::playback::{InputEvent, InputPoller};
use std::{io, time::Duration};

/// How long a single poll may wait for a key (~60 polls per second)
const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Raw-mode terminal reader. Restores the terminal when dropped.
pub struct TerminalKeys {
    _private: (),
}

impl TerminalKeys {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalKeys {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl InputPoller for TerminalKeys {
    type Error = io::Error;

    fn poll(&mut self) -> io::Result<Option<InputEvent>> {
        if !event::poll(POLL_INTERVAL)? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let interrupt = matches!(key.code, KeyCode::Esc | KeyCode::Char('q'))
                    || (key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL));
                Ok(Some(if interrupt {
                    InputEvent::Interrupt
                } else {
                    InputEvent::KeyPress
                }))
            }
            _ => Ok(None),
        }
    }
}
