//! Terminal selection prompt: raw-mode line input on a TTY, plain line
//! reads otherwise. Everything is drawn on stderr so stdout stays free for
//! the resolved path.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use crossterm::tty::IsTty;
use std::io::{self, BufRead, Write};

use crate::error::{Result, ToxError};
use crate::render::format_menu;
use crate::resolve::{Chooser, Selection};

/// RAII guard that leaves raw mode on drop (even on panic).
struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(RawModeGuard { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Prompts on the controlling terminal.
pub struct TerminalChooser {
    use_color: bool,
}

impl TerminalChooser {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    /// Read one line in raw mode. Esc, Ctrl-C and Ctrl-D cancel.
    fn read_raw_line(&self) -> io::Result<Option<String>> {
        let _guard = RawModeGuard::new()?;
        let mut err = io::stderr();
        let mut line = String::new();

        loop {
            let Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) = event::read()?
            else {
                continue;
            };
            if kind == KeyEventKind::Release {
                continue;
            }
            match code {
                KeyCode::Char('c') | KeyCode::Char('d')
                    if modifiers.contains(KeyModifiers::CONTROL) =>
                {
                    write!(err, "\r\n")?;
                    return Ok(None);
                }
                KeyCode::Esc => {
                    write!(err, "\r\n")?;
                    return Ok(None);
                }
                KeyCode::Enter => {
                    write!(err, "\r\n")?;
                    return Ok(Some(line));
                }
                KeyCode::Backspace => {
                    if line.pop().is_some() {
                        write!(err, "\u{8} \u{8}")?;
                    }
                }
                KeyCode::Char(c) => {
                    line.push(c);
                    write!(err, "{c}")?;
                }
                _ => {}
            }
            err.flush()?;
        }
    }

    /// Read one line from a non-interactive stdin. EOF cancels.
    fn read_plain_line(&self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

impl Chooser for TerminalChooser {
    fn present(&mut self, matches: &[String]) -> Result<()> {
        let mut err = io::stderr();
        for line in format_menu(matches, self.use_color) {
            writeln!(err, "{line}").map_err(|e| ToxError::fs("<stderr>", e))?;
        }
        Ok(())
    }

    fn request(&mut self, count: usize) -> Result<Selection> {
        let mut err = io::stderr();
        write!(err, "select 1-{count} (q to quit): ")
            .and_then(|_| err.flush())
            .map_err(|e| ToxError::fs("<stderr>", e))?;

        let line = if io::stdin().is_tty() {
            self.read_raw_line()
        } else {
            self.read_plain_line()
        }
        .map_err(|e| ToxError::fs("<stdin>", e))?;

        Ok(match line {
            Some(text) => Selection::parse(&text),
            None => Selection::Cancel,
        })
    }

    fn reject(&mut self, input: &str, count: usize) {
        eprintln!("'{input}' is not a number between 1 and {count}");
    }
}
