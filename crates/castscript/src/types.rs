//! Common types shared by both recording formats.

use std::fmt;

/// Direction of a recorded event.
///
/// Asciicast encodes direction as the event code `"o"` / `"i"`; the
/// advanced script timing format uses the record prefix `'O'` / `'I'`.
/// Codes outside these two are carried through the codecs untouched but
/// have no direction, and the converter drops them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Output from the session.
    Output,
    /// Input to the session.
    Input,
}

impl Direction {
    /// Map an asciicast event code.
    #[must_use]
    pub fn from_cast_code(code: &str) -> Option<Self> {
        match code {
            "o" => Some(Self::Output),
            "i" => Some(Self::Input),
            _ => None,
        }
    }

    /// Map a script advanced timing code.
    #[must_use]
    pub const fn from_script_code(code: char) -> Option<Self> {
        match code {
            'O' => Some(Self::Output),
            'I' => Some(Self::Input),
            _ => None,
        }
    }

    /// The asciicast event code for this direction.
    #[must_use]
    pub const fn cast_code(self) -> &'static str {
        match self {
            Self::Output => "o",
            Self::Input => "i",
        }
    }

    /// The script timing code for this direction.
    #[must_use]
    pub const fn script_code(self) -> char {
        match self {
            Self::Output => 'O',
            Self::Input => 'I',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Output => write!(f, "output"),
            Self::Input => write!(f, "input"),
        }
    }
}
