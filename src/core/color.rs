//! Console color names

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The sixteen console colors a host line can be displayed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Color {
    Black,
    DarkBlue,
    DarkGreen,
    DarkCyan,
    DarkRed,
    DarkMagenta,
    DarkYellow,
    Gray,
    DarkGray,
    Blue,
    Green,
    Cyan,
    Red,
    Magenta,
    Yellow,
    White,
}

impl Color {
    pub const ALL: [Color; 16] = [
        Color::Black,
        Color::DarkBlue,
        Color::DarkGreen,
        Color::DarkCyan,
        Color::DarkRed,
        Color::DarkMagenta,
        Color::DarkYellow,
        Color::Gray,
        Color::DarkGray,
        Color::Blue,
        Color::Green,
        Color::Cyan,
        Color::Red,
        Color::Magenta,
        Color::Yellow,
        Color::White,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Color::Black => "Black",
            Color::DarkBlue => "DarkBlue",
            Color::DarkGreen => "DarkGreen",
            Color::DarkCyan => "DarkCyan",
            Color::DarkRed => "DarkRed",
            Color::DarkMagenta => "DarkMagenta",
            Color::DarkYellow => "DarkYellow",
            Color::Gray => "Gray",
            Color::DarkGray => "DarkGray",
            Color::Blue => "Blue",
            Color::Green => "Green",
            Color::Cyan => "Cyan",
            Color::Red => "Red",
            Color::Magenta => "Magenta",
            Color::Yellow => "Yellow",
            Color::White => "White",
        }
    }

    /// Terminal color used by the console sink
    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color as C;
        match self {
            Color::Black => C::Black,
            Color::DarkBlue => C::Blue,
            Color::DarkGreen => C::Green,
            Color::DarkCyan => C::Cyan,
            Color::DarkRed => C::Red,
            Color::DarkMagenta => C::Magenta,
            Color::DarkYellow => C::Yellow,
            Color::Gray => C::White,
            Color::DarkGray => C::BrightBlack,
            Color::Blue => C::BrightBlue,
            Color::Green => C::BrightGreen,
            Color::Cyan => C::BrightCyan,
            Color::Red => C::BrightRed,
            Color::Magenta => C::BrightMagenta,
            Color::Yellow => C::BrightYellow,
            Color::White => C::BrightWhite,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Color {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Color::ALL
            .iter()
            .copied()
            .find(|color| color.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| LoggerError::invalid_color(s))
    }
}

impl TryFrom<String> for Color {
    type Error = LoggerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_name() {
        for color in Color::ALL {
            assert_eq!(color.name().parse::<Color>().unwrap(), color);
            assert_eq!(color.name().to_lowercase().parse::<Color>().unwrap(), color);
        }
    }

    #[test]
    fn test_invalid_name() {
        let err = "Purple".parse::<Color>().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidColor { ref value } if value == "Purple"));
        assert!("".parse::<Color>().is_err());
    }

    #[test]
    fn test_serde_round_trip_by_name() {
        assert_eq!(serde_json::to_string(&Color::DarkYellow).unwrap(), "\"DarkYellow\"");
        let parsed: Color = serde_json::from_str("\"darkyellow\"").unwrap();
        assert_eq!(parsed, Color::DarkYellow);
    }
}
