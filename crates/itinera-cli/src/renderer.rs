//! Terminal output for the markdown produced by `itinera_core::display`.
//!
//! Rich mode styles headings, bold activity names and italic justifications
//! with termimad; plain mode prints the markdown untouched, which is what
//! tests and pipes see.

use std::fmt::Display;

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Cyan);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::DarkGrey);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Print any displayable value through the renderer.
    pub fn show(&self, value: &impl Display) -> Result<()> {
        self.render(&value.to_string())
    }

    pub fn render(&self, markdown: &str) -> Result<()> {
        if !self.rich_enabled {
            print!("{markdown}");
            return Ok(());
        }

        for line in markdown.lines() {
            if line.starts_with('#') {
                // Keep the hashes so IDs in headings stay readable.
                println!("\x1b[36m{line}\x1b[0m");
            } else {
                self.skin.print_inline(line);
                println!();
            }
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}
