//! RGB colour values and process-boundary channel validation.
//!
//! Channels arrive as text.  Each must be a whole integer (optional sign,
//! leading whitespace tolerated) with nothing after it, and must lie in
//! 0..=255.  Validation happens here, once, before any bus is opened; the
//! register client writes whatever bytes it is handed.

use core::fmt;

use serde::{Deserialize, Serialize};

/// One colour: three 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Validate three raw channel arguments in R, G, B order.
    ///
    /// Stops at the first bad channel.
    pub fn from_args(args: [&str; 3]) -> Result<Self, ChannelError> {
        let red = parse_channel(args[0])?;
        let green = parse_channel(args[1])?;
        let blue = parse_channel(args[2])?;
        Ok(Self { red, green, blue })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

/// Why a channel argument was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    /// No integer at the start of the argument.
    Invalid,
    /// An integer was followed by other characters.
    Trailing,
    /// Parsed, but outside 0..=255.
    OutOfRange(i64),
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid => write!(f, "invalid number"),
            Self::Trailing => write!(f, "trailing characters after number"),
            Self::OutOfRange(v) => write!(f, "value {} out of range (0-255)", v),
        }
    }
}

impl std::error::Error for ChannelError {}

/// Parse a single channel value.
pub fn parse_channel(raw: &str) -> Result<u8, ChannelError> {
    let s = raw.trim_start();
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign_len..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Err(ChannelError::Invalid);
    }

    let (number, rest) = s.split_at(sign_len + digits);
    if !rest.is_empty() {
        return Err(ChannelError::Trailing);
    }

    // Anything too long for i64 is certainly out of range too.
    let value: i64 = number.parse().map_err(|_| ChannelError::Invalid)?;
    u8::try_from(value).map_err(|_| ChannelError::OutOfRange(value))
}
