//! Terminal rendering for markdown panels and simulated command output.
//!
//! Panels (steps, status, listings) are markdown rendered through termimad.
//! Command output is printed verbatim so it looks like a real terminal.

use std::io::{self, Write};

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

/// Terminal renderer that can switch between rich and plain text output
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();

        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.code_block.set_bg(Color::AnsiValue(238));
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Render markdown text to terminal
    pub fn render(&self, markdown: &str) -> Result<()> {
        if self.rich_enabled {
            // Headers keep their hash marks
            for line in markdown.lines() {
                if line.starts_with('#') {
                    println!("\x1b[34m{line}\x1b[0m");
                } else {
                    self.skin.print_inline(line);
                    println!();
                }
            }
        } else {
            print!("{markdown}");
            if !markdown.ends_with('\n') {
                println!();
            }
        }
        Ok(())
    }

    /// Prints simulated command output as-is.
    pub fn output(&self, text: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{text}")?;
        stdout.flush()?;
        Ok(())
    }

    /// Prints a one-line status message, colored by outcome when rich.
    pub fn status(&self, message: &str, success: bool) -> Result<()> {
        if self.rich_enabled {
            let color = if success { 32 } else { 31 };
            println!("\x1b[{color}m{message}\x1b[0m");
        } else {
            println!("{message}");
        }
        Ok(())
    }

    pub fn prompt(&self) -> Result<()> {
        let mut stdout = io::stdout().lock();
        if self.rich_enabled {
            write!(stdout, "\x1b[32mstudent@labsim\x1b[0m:\x1b[34m~\x1b[0m$ ")?;
        } else {
            write!(stdout, "student@labsim:~$ ")?;
        }
        stdout.flush()?;
        Ok(())
    }

    /// Wipes the visible terminal. Plain mode prints nothing.
    pub fn clear_screen(&self) -> Result<()> {
        if self.rich_enabled {
            let mut stdout = io::stdout().lock();
            write!(stdout, "\x1b[2J\x1b[H")?;
            stdout.flush()?;
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer() {
        let renderer = TerminalRenderer::new(false);
        assert!(!renderer.rich_enabled);
    }

    #[test]
    fn test_default_is_rich() {
        let renderer = TerminalRenderer::default();
        assert!(renderer.rich_enabled);
    }
}
