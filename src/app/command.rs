//! Angle command parsing.
//!
//! The host sends one decimal angle per line (`"90\n"`). Conversion
//! follows the microcontroller `toInt()` rules:
//!
//! - leading ASCII whitespace is skipped,
//! - one optional `+` / `-` sign is accepted,
//! - decimal digits are consumed up to the first non-digit,
//! - anything after that (`"90abc"`, `"90\r"`, `"90,45"`) is ignored,
//! - a line with no leading digits coerces to **0**.
//!
//! The last rule means `"hello"` and `{"pan": 90}` are indistinguishable
//! from an explicit `"0"` and are accepted as a move to 0°.

use core::fmt;

use serde::Serialize;

use crate::error::ParseError;

/// Lowest accepted angle (degrees).
pub const ANGLE_MIN: u8 = 0;
/// Highest accepted angle (degrees).
pub const ANGLE_MAX: u8 = 180;

/// A validated servo angle in `[0, 180]` degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Angle(u8);

impl Angle {
    /// Centre of travel.
    pub const CENTRE: Self = Self(90);

    /// Returns `None` if `degrees` is outside the servo's travel.
    pub const fn new(degrees: u8) -> Option<Self> {
        if degrees <= ANGLE_MAX {
            Some(Self(degrees))
        } else {
            None
        }
    }

    pub const fn degrees(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

impl TryFrom<i64> for Angle {
    type Error = ParseError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or(ParseError::OutOfRange(value))
    }
}

/// Turn one command line (terminator already stripped) into an angle.
pub fn parse(line: &str) -> Result<Angle, ParseError> {
    Angle::try_from(coerce_int(line))
}

/// Lenient integer conversion: leading whitespace, optional sign, digits.
/// Overflow saturates, which always lands out of range.
pub fn coerce_int(line: &str) -> i64 {
    let mut bytes = line
        .bytes()
        .skip_while(u8::is_ascii_whitespace)
        .peekable();

    let negative = match bytes.peek() {
        Some(b'-') => {
            bytes.next();
            true
        }
        Some(b'+') => {
            bytes.next();
            false
        }
        _ => false,
    };

    let magnitude = bytes
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, b| {
            acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
        });

    if negative { -magnitude } else { magnitude }
}
