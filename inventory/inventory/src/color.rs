use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

/// An RGBA color, written and parsed in CSS notation.
///
/// Accepted forms: `#rrggbb`, `#rgb`, `rgb(r,g,b)`, `rgba(r,g,b,a)` and a handful of names.
#[derive(Debug, Copy, Clone, PartialEq, SerializeDisplay, DeserializeFromStr)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// 0.0 = transparent, 1.0 = opaque
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r,
            g,
            b,
            a: 1.0,
        }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r,
            g,
            b,
            a,
        }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const VIOLET: Color = Color::rgb(238, 130, 238);

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// `#rrggbb`, ignoring alpha.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn from_name(name: &str) -> Option<Self> {
        let color = match name {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::RED,
            "green" => Self::GREEN,
            "gray" | "grey" => Self::GRAY,
            "violet" => Self::VIOLET,
            _ => return None,
        };
        Some(color)
    }

    fn from_hex(digits: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::InvalidHex(digits.to_string());

        let expanded: String = match digits.len() {
            3 => digits
                .chars()
                .flat_map(|c| [c, c])
                .collect(),
            6 => digits.to_string(),
            _ => return Err(invalid()),
        };

        let component = |index: usize| {
            expanded
                .get(index..index + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(invalid)
        };

        Ok(Self::rgb(component(0)?, component(2)?, component(4)?))
    }

    fn from_function(name: &str, arguments: &str) -> Result<Self, ColorError> {
        let values: Vec<&str> = arguments
            .split(',')
            .map(str::trim)
            .collect();

        let expected = match name {
            "rgb" => 3,
            "rgba" => 4,
            _ => return Err(ColorError::Unknown(format!("{}({})", name, arguments))),
        };
        if values.len() != expected {
            return Err(ColorError::ComponentCount {
                function: name.to_string(),
                expected,
                found: values.len(),
            });
        }

        let channel = |value: &str| {
            value
                .parse::<u8>()
                .map_err(|_| ColorError::InvalidComponent(value.to_string()))
        };
        let r = channel(values[0])?;
        let g = channel(values[1])?;
        let b = channel(values[2])?;

        let a = match values.get(3) {
            Some(alpha) => {
                let alpha = alpha
                    .parse::<f32>()
                    .map_err(|_| ColorError::InvalidComponent(alpha.to_string()))?;
                if !(0.0..=1.0).contains(&alpha) {
                    return Err(ColorError::InvalidComponent(alpha.to_string()));
                }
                alpha
            }
            None => 1.0,
        };

        Ok(Self::rgba(r, g, b, a))
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if let Some(digits) = value.strip_prefix('#') {
            return Self::from_hex(digits);
        }

        if let Some((name, rest)) = value.split_once('(') {
            let arguments = rest
                .strip_suffix(')')
                .ok_or_else(|| ColorError::Unknown(value.to_string()))?;
            return Self::from_function(name.trim(), arguments);
        }

        Self::from_name(&value.to_ascii_lowercase()).ok_or_else(|| ColorError::Unknown(value.to_string()))
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_opaque() {
            write!(f, "{}", self.to_hex())
        } else {
            write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ColorError {
    #[error("Unknown color. value: '{0}'")]
    Unknown(String),
    #[error("Invalid hex color. digits: '{0}'")]
    InvalidHex(String),
    #[error("Invalid color component. value: '{0}'")]
    InvalidComponent(String),
    #[error("Invalid component count. function: {function}, expected: {expected}, found: {found}")]
    ComponentCount {
        function: String,
        expected: usize,
        found: usize,
    },
}
