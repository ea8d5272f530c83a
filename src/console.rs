//! Colored console output for human-facing status lines.
//!
//! Separate from the reporter: these lines are presentation only and never
//! part of the sample stream.

use std::io::{stdout, Write};

use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::QueueableCommand;

/// Writes status lines to the terminal in a given color.
#[derive(Debug, Default)]
pub struct ConsoleWriter;

impl ConsoleWriter {
    pub fn new() -> Self {
        Self
    }

    /// Writes one line in `color`, resetting afterwards. Falls back to plain
    /// output if the terminal rejects the styling commands.
    pub fn write_line(&self, message: &str, color: Color) {
        let mut out = stdout();
        let styled = out
            .queue(SetForegroundColor(color))
            .and_then(|o| o.queue(Print(message)))
            .and_then(|o| o.queue(ResetColor))
            .and_then(|o| o.queue(Print("\r\n")))
            .is_ok();
        if styled {
            let _ = out.flush();
        } else {
            println!("{}", message);
        }
    }
}
