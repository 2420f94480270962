use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HexError {
    #[error("odd number of hex digits")]
    OddLength,
    #[error("invalid hex digit {digit:?} at offset {offset}")]
    InvalidDigit { digit: char, offset: usize },
}

/// Parses hex bytes. Whitespace, `:` and `-` separators and a leading `0x`
/// are accepted.
pub fn parse_hex(input: &str) -> Result<Vec<u8>, HexError> {
    let input = input.trim();
    let input = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);

    let mut digits = Vec::with_capacity(input.len());
    for (offset, c) in input.char_indices() {
        if c.is_ascii_whitespace() || c == ':' || c == '-' {
            continue;
        }
        let value = c
            .to_digit(16)
            .ok_or(HexError::InvalidDigit { digit: c, offset })?;
        digits.push(value as u8);
    }
    if digits.len() % 2 != 0 {
        return Err(HexError::OddLength);
    }
    Ok(digits
        .chunks_exact(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect())
}

/// Space-separated upper-case hex, as printed by the tools.
pub struct Hex<'a>(pub &'a [u8]);

impl fmt::Display for Hex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}
