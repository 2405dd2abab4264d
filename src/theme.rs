use crossterm::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy)]
pub struct ColorScheme {
    pub line_number_fg: Color,
    pub text_fg: Color,
    pub changed_fg: Color,
    pub removed_fg: Color,
}

impl Theme {
    pub fn colors(&self) -> ColorScheme {
        match self {
            Theme::Dark => ColorScheme {
                line_number_fg: Color::DarkGrey,
                text_fg: Color::White,
                changed_fg: Color::Rgb { r: 80, g: 200, b: 120 },
                removed_fg: Color::Rgb { r: 230, g: 80, b: 80 },
            },
            Theme::Light => ColorScheme {
                line_number_fg: Color::Grey,
                text_fg: Color::Black,
                changed_fg: Color::Rgb { r: 20, g: 140, b: 60 },
                removed_fg: Color::Rgb { r: 190, g: 30, b: 30 },
            },
        }
    }
}
