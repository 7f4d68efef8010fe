//! Open Location Code (Plus Code) support.
//!
//! Codes are built on an integer grid: every coordinate is first scaled to the
//! finest resolution a 15 digit code can express, so encode and decode never
//! accumulate floating point error across digits.

mod area;
mod codec;

pub use area::CodeArea;
pub use codec::{decode, encode};

/// Digit alphabet, ordered by value.
pub(crate) const CODE_ALPHABET: &[u8; 20] = b"23456789CFGHJMPQRVWX";
pub const SEPARATOR: char = '+';
pub const SEPARATOR_POSITION: usize = 8;
pub const PADDING: char = '0';

pub(crate) const ENCODING_BASE: i64 = 20;
pub(crate) const PAIR_CODE_LENGTH: usize = 10;
pub(crate) const GRID_CODE_LENGTH: usize = 5;
pub(crate) const GRID_COLUMNS: i64 = 4;
pub(crate) const GRID_ROWS: i64 = 5;

pub const MIN_CODE_LENGTH: usize = 2;
pub const MAX_CODE_LENGTH: usize = PAIR_CODE_LENGTH + GRID_CODE_LENGTH;

/// Ten digits, roughly a 14m x 14m cell.
pub const DEFAULT_CODE_LENGTH: usize = PAIR_CODE_LENGTH;

pub(crate) const LATITUDE_MAX: i64 = 90;
pub(crate) const LONGITUDE_MAX: i64 = 180;

/// Integer steps per degree at full (15 digit) precision.
pub(crate) const FINAL_LAT_PRECISION: i64 = 8000 * 3125; // 20^3 * 5^5
pub(crate) const FINAL_LNG_PRECISION: i64 = 8000 * 1024; // 20^3 * 4^5

/// Value of a digit position in the alphabet, case-insensitive.
pub(crate) fn digit_value(c: char) -> Option<i64> {
    let upper = c.to_ascii_uppercase();
    CODE_ALPHABET
        .iter()
        .position(|&d| d as char == upper)
        .map(|i| i as i64)
}

/// Check that a string is a syntactically valid full or short code.
pub fn is_valid(code: &str) -> bool {
    if code.len() < 2 || !code.is_ascii() {
        return false;
    }

    let sep = match code.find(SEPARATOR) {
        Some(i) => i,
        None => return false,
    };
    if code.matches(SEPARATOR).count() != 1 {
        return false;
    }
    if sep > SEPARATOR_POSITION || sep % 2 == 1 {
        return false;
    }

    if let Some(pad) = code.find(PADDING) {
        // Short codes can't be padded, and padding can't start a code
        if sep < SEPARATOR_POSITION || pad == 0 {
            return false;
        }
        let run = &code[pad..sep];
        if !run.chars().all(|c| c == PADDING) || run.len() % 2 == 1 {
            return false;
        }
        if code.len() != sep + 1 {
            return false;
        }
    }

    // A single digit after the separator is never valid
    if code.len() - sep - 1 == 1 {
        return false;
    }

    code.chars()
        .filter(|&c| c != SEPARATOR && c != PADDING)
        .all(|c| digit_value(c).is_some())
}

/// A valid code that omits its leading digits and needs a reference location.
pub fn is_short(code: &str) -> bool {
    is_valid(code) && code.find(SEPARATOR).map_or(false, |i| i < SEPARATOR_POSITION)
}

/// A valid code that fully identifies an area on its own.
pub fn is_full(code: &str) -> bool {
    if !is_valid(code) || is_short(code) {
        return false;
    }

    let mut chars = code.chars();
    let lat_ok = chars
        .next()
        .and_then(digit_value)
        .map_or(false, |v| v * ENCODING_BASE < 2 * LATITUDE_MAX);
    let lng_ok = chars
        .next()
        .and_then(digit_value)
        .map_or(true, |v| v * ENCODING_BASE < 2 * LONGITUDE_MAX);

    lat_ok && lng_ok
}
