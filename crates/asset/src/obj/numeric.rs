//! Allocation-free ASCII number parsing over record buffers.
//!
//! Both parsers take a byte buffer and a cursor, skip leading blanks and
//! return the value together with the cursor just past the token. Digits are
//! combined through a precomputed `digit * 10^n` table, so the result never
//! depends on the process locale and no intermediate string is built.

use crate::error::NumericError;

const MIN_POW10: i32 = -16;
const MAX_POW10: i32 = 16;
const NUM_POW10: usize = (MAX_POW10 - MIN_POW10 + 1) as usize;

/// `DIGIT_POW10[d][e]` = `d * 10^(e + MIN_POW10)`.
static DIGIT_POW10: [[f64; NUM_POW10]; 10] = digit_pow10_table();

const fn digit_pow10_table() -> [[f64; NUM_POW10]; 10] {
    let mut table = [[0.0; NUM_POW10]; 10];
    let mut e = 0;
    while e < NUM_POW10 {
        let exp = e as i32 + MIN_POW10;
        let mut pow = 1.0f64;
        let mut k = 0;
        while k < exp.unsigned_abs() {
            pow *= 10.0;
            k += 1;
        }
        if exp < 0 {
            pow = 1.0 / pow;
        }
        let mut d = 0;
        while d < 10 {
            table[d][e] = d as f64 * pow;
            d += 1;
        }
        e += 1;
    }
    table
}

#[inline]
fn digit_term(digit: u8, exp: i32) -> f64 {
    DIGIT_POW10[(digit - b'0') as usize][(exp - MIN_POW10) as usize]
}

#[inline]
pub fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

#[inline]
pub fn skip_blanks(buf: &[u8], mut cursor: usize) -> usize {
    while cursor < buf.len() && is_blank(buf[cursor]) {
        cursor += 1;
    }
    cursor
}

#[inline]
fn skip_digits(buf: &[u8], mut cursor: usize) -> usize {
    while cursor < buf.len() && buf[cursor].is_ascii_digit() {
        cursor += 1;
    }
    cursor
}

#[inline]
fn skip_token(buf: &[u8], mut cursor: usize) -> usize {
    while cursor < buf.len() && !is_blank(buf[cursor]) {
        cursor += 1;
    }
    cursor
}

/// Parse a decimal float: `[-+]digits[.digits][e-DD]`.
///
/// Only the two-digit negative exponent form is understood. A broken `e-`
/// suffix is tolerated and yields `0.0`; any other exponent form is an error.
pub fn parse_float(buf: &[u8], cursor: usize) -> Result<(f32, usize), NumericError> {
    let start = skip_blanks(buf, cursor);
    let mut pos = start;

    let negative = match buf.get(pos) {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    // Leading zeros carry no weight and would only eat table range.
    while pos + 1 < buf.len() && buf[pos] == b'0' && buf[pos + 1].is_ascii_digit() {
        pos += 1;
    }

    let int_start = pos;
    pos = skip_digits(buf, pos);
    let int_end = pos;

    let (frac_start, frac_end) = if buf.get(pos) == Some(&b'.') {
        let s = pos + 1;
        pos = skip_digits(buf, s);
        (s, pos)
    } else {
        (pos, pos)
    };

    if int_start == int_end && frac_start == frac_end {
        return Err(NumericError::Malformed { at: start });
    }

    let int_len = (int_end - int_start) as i32;
    if int_len - 1 > MAX_POW10 {
        return Err(NumericError::OutOfRange { at: start });
    }

    let mut value = 0.0f64;
    for (i, &d) in buf[int_start..int_end].iter().enumerate() {
        value += digit_term(d, int_len - 1 - i as i32);
    }
    // Fraction digits past 10^-16 are below f32 resolution.
    for (i, &d) in buf[frac_start..frac_end]
        .iter()
        .take(MIN_POW10.unsigned_abs() as usize)
        .enumerate()
    {
        value += digit_term(d, -(i as i32) - 1);
    }

    if matches!(buf.get(pos), Some(b'e' | b'E')) {
        let exp_at = pos;
        if buf.get(pos + 1) != Some(&b'-') {
            return Err(NumericError::UnsupportedExponent { at: exp_at });
        }
        let digits = buf.get(pos + 2..pos + 4);
        let terminated = buf.get(pos + 4).is_none_or(|b| !b.is_ascii_digit());
        match digits {
            Some(&[hi, lo]) if hi.is_ascii_digit() && lo.is_ascii_digit() && terminated => {
                let mut exp = ((hi - b'0') * 10 + (lo - b'0')) as i32;
                while exp > MAX_POW10 {
                    value *= DIGIT_POW10[1][0];
                    exp -= MAX_POW10;
                }
                value *= digit_term(b'1', -exp);
                pos += 4;
            }
            _ => {
                log::warn!(
                    "Non-numeric exponent at byte {}, treating the value as 0",
                    exp_at
                );
                return Ok((0.0, skip_token(buf, pos)));
            }
        }
    }

    let value = if negative { -value } else { value };
    Ok((value as f32, pos))
}

/// Parse a decimal integer: `[-+]digits`.
pub fn parse_int(buf: &[u8], cursor: usize) -> Result<(i32, usize), NumericError> {
    let start = skip_blanks(buf, cursor);
    let mut pos = start;

    let negative = match buf.get(pos) {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let digits_start = pos;
    let mut value: i64 = 0;
    while let Some(&b) = buf.get(pos) {
        if !b.is_ascii_digit() {
            break;
        }
        value = value * 10 + (b - b'0') as i64;
        if value > i32::MAX as i64 + 1 {
            return Err(NumericError::OutOfRange { at: start });
        }
        pos += 1;
    }

    if pos == digits_start {
        return Err(NumericError::Malformed { at: start });
    }

    let value = if negative { -value } else { value };
    let value = i32::try_from(value).map_err(|_| NumericError::OutOfRange { at: start })?;
    Ok((value, pos))
}
