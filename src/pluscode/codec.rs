use super::{
    digit_value, is_full, CodeArea, CODE_ALPHABET, ENCODING_BASE, FINAL_LAT_PRECISION,
    FINAL_LNG_PRECISION, GRID_CODE_LENGTH, GRID_COLUMNS, GRID_ROWS, LATITUDE_MAX, LONGITUDE_MAX,
    MAX_CODE_LENGTH, MIN_CODE_LENGTH, PADDING, PAIR_CODE_LENGTH, SEPARATOR, SEPARATOR_POSITION,
};
use crate::error::{LocateError, Result};
use crate::models::GeoPoint;

/// Place value one step above the first pair digit, in final-precision units.
const LAT_PAIR_TOP: i64 = ENCODING_BASE * ENCODING_BASE * FINAL_LAT_PRECISION;
const LNG_PAIR_TOP: i64 = ENCODING_BASE * ENCODING_BASE * FINAL_LNG_PRECISION;

/// Encode a point as a Plus Code with `code_length` significant digits.
///
/// Lengths above 15 are clamped. Latitude 90 lands in the topmost cell and
/// longitude 180 wraps to -180.
pub fn encode(point: GeoPoint, code_length: usize) -> Result<String> {
    let point = point.validate()?;
    let code_length = normalize_code_length(code_length)?;
    let (lat_val, lng_val) = to_integers(point);

    let mut digits = String::with_capacity(MAX_CODE_LENGTH);
    let mut lat_place = LAT_PAIR_TOP;
    let mut lng_place = LNG_PAIR_TOP;

    for _ in 0..PAIR_CODE_LENGTH / 2 {
        lat_place /= ENCODING_BASE;
        lng_place /= ENCODING_BASE;
        digits.push(alphabet((lat_val / lat_place) % ENCODING_BASE));
        digits.push(alphabet((lng_val / lng_place) % ENCODING_BASE));
    }

    for _ in 0..GRID_CODE_LENGTH {
        lat_place /= GRID_ROWS;
        lng_place /= GRID_COLUMNS;
        let row = (lat_val / lat_place) % GRID_ROWS;
        let col = (lng_val / lng_place) % GRID_COLUMNS;
        digits.push(alphabet(row * GRID_COLUMNS + col));
    }

    digits.truncate(code_length);
    Ok(insert_separator(digits))
}

/// Decode a full Plus Code into the cell it covers.
pub fn decode(code: &str) -> Result<CodeArea> {
    if !is_full(code) {
        return Err(LocateError::InvalidCode(code.to_string()));
    }

    let digits: Vec<i64> = code
        .chars()
        .filter(|&c| c != SEPARATOR && c != PADDING)
        .take(MAX_CODE_LENGTH)
        .filter_map(digit_value)
        .collect();

    let mut lat_val = 0i64;
    let mut lng_val = 0i64;
    let mut lat_place = LAT_PAIR_TOP;
    let mut lng_place = LNG_PAIR_TOP;

    let pair_len = digits.len().min(PAIR_CODE_LENGTH);
    for pair in digits[..pair_len].chunks_exact(2) {
        lat_place /= ENCODING_BASE;
        lng_place /= ENCODING_BASE;
        lat_val += pair[0] * lat_place;
        lng_val += pair[1] * lng_place;
    }

    for &d in &digits[pair_len..] {
        lat_place /= GRID_ROWS;
        lng_place /= GRID_COLUMNS;
        lat_val += (d / GRID_COLUMNS) * lat_place;
        lng_val += (d % GRID_COLUMNS) * lng_place;
    }

    let lat_offset = LATITUDE_MAX * FINAL_LAT_PRECISION;
    let lng_offset = LONGITUDE_MAX * FINAL_LNG_PRECISION;
    let lat_scale = FINAL_LAT_PRECISION as f64;
    let lng_scale = FINAL_LNG_PRECISION as f64;

    Ok(CodeArea {
        south: (lat_val - lat_offset) as f64 / lat_scale,
        west: (lng_val - lng_offset) as f64 / lng_scale,
        north: (lat_val + lat_place - lat_offset) as f64 / lat_scale,
        east: (lng_val + lng_place - lng_offset) as f64 / lng_scale,
        code_length: digits.len(),
    })
}

fn normalize_code_length(code_length: usize) -> Result<usize> {
    let clamped = code_length.min(MAX_CODE_LENGTH);
    if clamped < MIN_CODE_LENGTH || (clamped < PAIR_CODE_LENGTH && clamped % 2 == 1) {
        return Err(LocateError::InvalidCodeLength(code_length));
    }
    Ok(clamped)
}

/// Scale a validated point to non-negative integer grid positions.
///
/// The offset is added before scaling and the product is rounded to six
/// decimals before flooring, so values a hair under a cell edge snap onto it
/// the same way every other Open Location Code encoder does.
fn to_integers(point: GeoPoint) -> (i64, i64) {
    let lat_val = snap_floor((point.lat + LATITUDE_MAX as f64) * FINAL_LAT_PRECISION as f64)
        .clamp(0, 2 * LATITUDE_MAX * FINAL_LAT_PRECISION - 1);
    let lng_val = snap_floor((point.lon + LONGITUDE_MAX as f64) * FINAL_LNG_PRECISION as f64)
        .rem_euclid(2 * LONGITUDE_MAX * FINAL_LNG_PRECISION);

    (lat_val, lng_val)
}

/// `floor(round(value, 6))` for a non-negative value.
fn snap_floor(value: f64) -> i64 {
    (value * 1e6).round() as i64 / 1_000_000
}

fn alphabet(value: i64) -> char {
    CODE_ALPHABET[value as usize] as char
}

fn insert_separator(mut digits: String) -> String {
    if digits.len() < SEPARATOR_POSITION {
        let pad = SEPARATOR_POSITION - digits.len();
        digits.extend(std::iter::repeat(PADDING).take(pad));
        digits.push(SEPARATOR);
    } else {
        digits.insert(SEPARATOR_POSITION, SEPARATOR);
    }
    digits
}
