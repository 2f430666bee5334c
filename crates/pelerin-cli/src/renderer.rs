//! Markdown output for the terminal.
//!
//! Core display types produce markdown; with color enabled it goes through
//! a termimad skin, otherwise it is printed unchanged so it can be piped.

use std::fmt::Write as _;

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

const HEADER_COLOR: &str = "\x1b[34m";
const RESET: &str = "\x1b[0m";

pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::DarkGrey);
        skin.inline_code.set_fg(Color::Cyan);
        skin.inline_code.set_bg(Color::AnsiValue(236));

        Self { rich_enabled, skin }
    }

    /// Markdown as it will appear on the terminal.
    pub fn format(&self, markdown: &str) -> String {
        if !self.rich_enabled {
            return markdown.to_string();
        }
        let mut out = String::with_capacity(markdown.len());
        for line in markdown.lines() {
            // Headers keep their hashes so page and section levels stay visible.
            if line.starts_with('#') {
                let _ = writeln!(out, "{HEADER_COLOR}{line}{RESET}");
            } else {
                let _ = writeln!(out, "{}", self.skin.inline(line));
            }
        }
        out
    }

    pub fn render(&self, markdown: &str) -> Result<()> {
        print!("{}", self.format(markdown));
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}
