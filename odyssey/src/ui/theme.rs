//! Color theme and styling for the journey TUI.

use ratatui::style::{Color, Modifier, Style};

/// Journey UI color theme.
#[derive(Debug, Clone)]
pub struct JourneyTheme {
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,

    pub accent: Color,
    pub highlight: Color,
    pub reveal: Color,
    pub error: Color,
    pub dim: Color,
}

impl Default for JourneyTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,

            accent: Color::Blue,
            highlight: Color::LightBlue,
            reveal: Color::Yellow,
            error: Color::Red,
            dim: Color::DarkGray,
        }
    }
}

impl JourneyTheme {
    /// Style for large titles.
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for normal text.
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.foreground)
    }

    /// Style for key hints and secondary text.
    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.dim)
    }

    /// Style for highlighted or selected content.
    pub fn highlight_style(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for milestone reveals and the finish screen.
    pub fn reveal_style(&self) -> Style {
        Style::default()
            .fg(self.reveal)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for error banners.
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    /// One progress pip in the milestone track.
    pub fn pip_style(&self, revealed: bool) -> Style {
        if revealed {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(self.dim)
        }
    }

    /// Border style for panels and inputs.
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }
}
