//! Typed setting keys and values.
//!
//! Every key carries a fixed [`SettingKind`]. Raw strings typed by the user are
//! coerced through [`SettingKey::coerce`], which is the only way a new value is
//! produced, so a stored value can never change type.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKind {
    Int,
    Float,
    Text,
    Bool,
}

impl SettingKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "string",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl SettingValue {
    #[must_use]
    pub const fn kind(&self) -> SettingKind {
        match self {
            Self::Int(_) => SettingKind::Int,
            Self::Float(_) => SettingKind::Float,
            Self::Text(_) => SettingKind::Text,
            Self::Bool(_) => SettingKind::Bool,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    #[default]
    Block,
    Underline,
    Ibeam,
}

impl CursorShape {
    pub const ALL: [Self; 3] = [Self::Block, Self::Underline, Self::Ibeam];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Underline => "underline",
            Self::Ibeam => "ibeam",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingError {
    #[error("unknown setting: {0}")]
    UnknownKey(String),
    #[error("invalid value '{value}' for {key}: expected {expected}")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: String,
    },
}

/// The fixed set of setting keys, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SettingKey {
    FontSize,
    FontColor,
    BackgroundColor,
    Transparency,
    TransparencyLevel,
    FontFamily,
    CursorShape,
    CursorBlink,
    ScrollSpeed,
    TextAntialiasing,
    Padding,
    Margin,
}

impl SettingKey {
    pub const ALL: [Self; 12] = [
        Self::FontSize,
        Self::FontColor,
        Self::BackgroundColor,
        Self::Transparency,
        Self::TransparencyLevel,
        Self::FontFamily,
        Self::CursorShape,
        Self::CursorBlink,
        Self::ScrollSpeed,
        Self::TextAntialiasing,
        Self::Padding,
        Self::Margin,
    ];

    /// Position in [`SettingKey::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FontSize => "font_size",
            Self::FontColor => "font_color",
            Self::BackgroundColor => "background_color",
            Self::Transparency => "transparency",
            Self::TransparencyLevel => "transparency_level",
            Self::FontFamily => "font_family",
            Self::CursorShape => "cursor_shape",
            Self::CursorBlink => "cursor_blink",
            Self::ScrollSpeed => "scroll_speed",
            Self::TextAntialiasing => "text_antialiasing",
            Self::Padding => "padding",
            Self::Margin => "margin",
        }
    }

    #[must_use]
    pub const fn kind(self) -> SettingKind {
        match self {
            Self::FontSize | Self::Padding | Self::Margin => SettingKind::Int,
            Self::TransparencyLevel | Self::ScrollSpeed => SettingKind::Float,
            Self::FontColor | Self::BackgroundColor | Self::FontFamily | Self::CursorShape => {
                SettingKind::Text
            }
            Self::Transparency | Self::CursorBlink | Self::TextAntialiasing => SettingKind::Bool,
        }
    }

    #[must_use]
    pub fn default_value(self) -> SettingValue {
        match self {
            Self::FontSize => SettingValue::Int(12),
            Self::FontColor => SettingValue::Text("white".to_string()),
            Self::BackgroundColor => SettingValue::Text("black".to_string()),
            Self::Transparency | Self::CursorBlink | Self::TextAntialiasing => {
                SettingValue::Bool(true)
            }
            Self::TransparencyLevel => SettingValue::Float(0.8),
            Self::FontFamily => SettingValue::Text("Consolas".to_string()),
            Self::CursorShape => SettingValue::Text(CursorShape::Block.as_str().to_string()),
            Self::ScrollSpeed => SettingValue::Float(1.0),
            Self::Padding => SettingValue::Int(10),
            Self::Margin => SettingValue::Int(5),
        }
    }

    /// Coerce a raw user string into a value of this key's kind.
    ///
    /// Booleans accept only `true`/`false` (any case). Numeric keys are range
    /// checked; `cursor_shape` must name one of the known shapes.
    pub fn coerce(self, raw: &str) -> Result<SettingValue, SettingError> {
        let trimmed = raw.trim();
        let invalid = |expected: &str| SettingError::InvalidValue {
            key: self.as_str(),
            value: raw.to_string(),
            expected: expected.to_string(),
        };

        match self.kind() {
            SettingKind::Int => {
                let value: i64 = trimmed.parse().map_err(|_| invalid("an integer"))?;
                let (min, max) = match self {
                    Self::FontSize => (1, 400),
                    _ => (0, 1000),
                };
                if (min..=max).contains(&value) {
                    Ok(SettingValue::Int(value))
                } else {
                    Err(invalid(&format!("an integer between {min} and {max}")))
                }
            }
            SettingKind::Float => {
                let value: f64 = trimmed
                    .parse()
                    .ok()
                    .filter(|v: &f64| v.is_finite())
                    .ok_or_else(|| invalid("a number"))?;
                match self {
                    Self::TransparencyLevel if !(0.0..=1.0).contains(&value) => {
                        Err(invalid("a number between 0.0 and 1.0"))
                    }
                    Self::ScrollSpeed if value <= 0.0 => Err(invalid("a positive number")),
                    _ => Ok(SettingValue::Float(value)),
                }
            }
            SettingKind::Bool => {
                if trimmed.eq_ignore_ascii_case("true") {
                    Ok(SettingValue::Bool(true))
                } else if trimmed.eq_ignore_ascii_case("false") {
                    Ok(SettingValue::Bool(false))
                } else {
                    Err(invalid("true or false"))
                }
            }
            SettingKind::Text => {
                if trimmed.is_empty() {
                    return Err(invalid("a non-empty string"));
                }
                if self == Self::CursorShape {
                    let shape = CursorShape::parse(trimmed)
                        .ok_or_else(|| invalid("one of block, underline, ibeam"))?;
                    return Ok(SettingValue::Text(shape.as_str().to_string()));
                }
                Ok(SettingValue::Text(trimmed.to_string()))
            }
        }
    }
}

impl FromStr for SettingKey {
    type Err = SettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| SettingError::UnknownKey(s.to_string()))
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
