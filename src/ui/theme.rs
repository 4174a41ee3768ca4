use crate::state::app_settings::Theme;
use tui::style::Color;

/// Resolved widget colors for the active theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub border: Color,
    pub win: Color,
    pub draw: Color,
    pub loss: Color,
    pub goals_for: Color,
    pub goals_against: Color,
}

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            text: Color::White,
            dim: Color::DarkGray,
            accent: Color::Yellow,
            border: Color::White,
            win: Color::Green,
            draw: Color::Yellow,
            loss: Color::Red,
            goals_for: Color::Blue,
            goals_against: Color::Magenta,
        },
        Theme::Light => Palette {
            text: Color::Black,
            dim: Color::Gray,
            accent: Color::Blue,
            border: Color::Black,
            win: Color::Green,
            draw: Color::Magenta,
            loss: Color::Red,
            goals_for: Color::Blue,
            goals_against: Color::Red,
        },
    }
}
