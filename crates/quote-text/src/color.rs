//! Hex colour strings

use crate::{Result, TextError};

/// Parse `#rrggbb` or `#rgb` (leading `#` optional) into RGB bytes
pub fn parse_hex_color(value: &str) -> Result<(u8, u8, u8)> {
    let digits = value.trim().trim_start_matches('#');
    let invalid = || TextError::InvalidColor(value.to_string());

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

    match digits.len() {
        6 => Ok((
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        3 => {
            let short = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
            Ok((short(0)?, short(1)?, short(2)?))
        }
        _ => Err(invalid()),
    }
}
