//! Centralized theme module for TUI color constants and styles

use ratatui::prelude::*;

use crate::config::ThemeMode;
use crate::grading::Status;

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Status colors
    pub status_excellent: Color,
    pub status_good: Color,
    pub status_warning: Color,
    pub status_danger: Color,

    // Average bar
    pub bar_empty: Color,

    // Table colors
    pub row_alt_bg: Color,
    pub index_color: Color,
    pub absent_mark: Color,

    // Styles
    pub header_style: Style,
    pub row_selected: Style,

    // General colors
    pub muted: Color,
    pub title_color: Color,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popup overlay colors
    pub popup_border: Color,
    pub popup_title: Style,
    pub popup_bg: Color,
    pub field_focus: Style,
    pub form_error: Color,
}

impl ThemeColors {
    /// Dark theme palette
    pub fn dark() -> Self {
        Self {
            status_excellent: Color::LightGreen,
            status_good: Color::Green,
            status_warning: Color::Yellow,
            status_danger: Color::Red,
            bar_empty: Color::DarkGray,
            row_alt_bg: Color::Indexed(235),
            index_color: Color::DarkGray,
            absent_mark: Color::DarkGray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Gray,
            title_color: Color::Cyan,
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
            popup_bg: Color::Indexed(234),
            field_focus: Style::new().fg(Color::Cyan).bold(),
            form_error: Color::Red,
        }
    }

    /// Light theme palette
    pub fn light() -> Self {
        Self {
            status_excellent: Color::Rgb(0, 110, 0),
            status_good: Color::Green,
            status_warning: Color::Rgb(160, 100, 0),
            status_danger: Color::Red,
            bar_empty: Color::Gray,
            row_alt_bg: Color::Indexed(254),
            index_color: Color::Gray,
            absent_mark: Color::Gray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::DarkGray,
            title_color: Color::Blue,
            status_bar_bg: Color::Indexed(253),
            status_key_color: Color::Blue,
            flash_success: Color::Rgb(0, 110, 0),
            flash_error: Color::Red,
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
            popup_bg: Color::Indexed(255),
            field_focus: Style::new().fg(Color::Blue).bold(),
            form_error: Color::Red,
        }
    }

    /// Color for an average's status band
    pub fn status_color(&self, status: Status) -> Color {
        match status {
            Status::Excellent => self.status_excellent,
            Status::Good => self.status_good,
            Status::Warning => self.status_warning,
            Status::Danger => self.status_danger,
        }
    }
}

/// Pick the palette for the configured mode.
/// `auto` asks the terminal for its background luminance and falls back to dark.
pub fn resolve_theme(mode: ThemeMode) -> ThemeColors {
    match mode {
        ThemeMode::Dark => ThemeColors::dark(),
        ThemeMode::Light => ThemeColors::light(),
        ThemeMode::Auto => match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => ThemeColors::light(),
            _ => ThemeColors::dark(),
        },
    }
}
