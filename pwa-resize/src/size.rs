use serde::Deserialize;

use std::fmt;
use std::str::FromStr;

/// Target dimensions in pixels. Both sides are always non-zero.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RawSize")]
pub struct Size {
    width: u32,
    height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Result<Self, ParseError> {
        if width == 0 || height == 0 {
            return Err(ParseError::Zero { width, height });
        }
        Ok(Size { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

// Printed as a tuple, e.g. `(1080, 1920)`.
impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.width, self.height)
    }
}

impl FromStr for Size {
    type Err = ParseError;

    /// Parses `WIDTHxHEIGHT`, e.g. `1080x1920`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| ParseError::Malformed(s.to_string()))?;

        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| ParseError::Malformed(s.to_string()))
        };

        Size::new(parse(w)?, parse(h)?)
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSize {
    width: u32,
    height: u32,
}

impl TryFrom<RawSize> for Size {
    type Error = ParseError;

    fn try_from(raw: RawSize) -> Result<Self, Self::Error> {
        Size::new(raw.width, raw.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Malformed(String),
    Zero { width: u32, height: u32 },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::Malformed(s) => write!(f, "Invalid size `{s}`, expected WIDTHxHEIGHT"),
            ParseError::Zero { width, height } => {
                write!(f, "Invalid size {width}x{height}, dimensions must be positive")
            }
        }
    }
}

impl std::error::Error for ParseError {}
