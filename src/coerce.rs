//! Validate-filter style coercion of untyped values to primitive kinds.
//!
//! Every function returns `None` when the value has no unambiguous
//! representation in the target kind. Arrays and maps never coerce.

use crate::value::ParamValue;

/// Characters stripped from both ends of a string before validation.
fn trim(s: &str) -> &str {
    s.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B'))
}

/// Coerces to an integer.
///
/// Accepts `[+-]?(0|[1-9][0-9]*)` strings within `i64` range, integers,
/// integral floats, and `true` (as `1`).
pub fn to_int(value: &ParamValue) -> Option<i64> {
    match value {
        ParamValue::Int(i) => Some(*i),
        ParamValue::Bool(true) => Some(1),
        ParamValue::Bool(false) => None,
        ParamValue::Float(f) => float_to_int(*f),
        ParamValue::String(s) => parse_int(s),
        ParamValue::Null | ParamValue::Array(_) | ParamValue::Map(_) => None,
    }
}

/// Coerces to a float.
///
/// Accepts decimal and exponent notation strings, integers, floats,
/// and `true` (as `1.0`). Non-finite results are rejected.
pub fn to_float(value: &ParamValue) -> Option<f64> {
    match value {
        ParamValue::Float(f) if f.is_finite() => Some(*f),
        ParamValue::Float(_) => None,
        ParamValue::Int(i) => Some(*i as f64),
        ParamValue::Bool(true) => Some(1.0),
        ParamValue::Bool(false) => None,
        ParamValue::String(s) => parse_float(s),
        ParamValue::Null | ParamValue::Array(_) | ParamValue::Map(_) => None,
    }
}

/// Coerces to a boolean.
///
/// True tokens: `1`, `true`, `on`, `yes`. False tokens: `0`, `false`, `off`, `no`.
/// String matching is case-insensitive. Numbers other than 0 and 1 are rejected.
pub fn to_bool(value: &ParamValue) -> Option<bool> {
    match value {
        ParamValue::Bool(b) => Some(*b),
        ParamValue::Int(1) => Some(true),
        ParamValue::Int(0) => Some(false),
        ParamValue::Int(_) => None,
        ParamValue::Float(f) if *f == 1.0 => Some(true),
        ParamValue::Float(f) if *f == 0.0 => Some(false),
        ParamValue::Float(_) => None,
        ParamValue::String(s) => parse_bool(s),
        ParamValue::Null | ParamValue::Array(_) | ParamValue::Map(_) => None,
    }
}

/// Converts a scalar to its canonical string form.
///
/// `true` becomes `"1"`, `false` becomes `""`, numbers use their shortest
/// round-trip digits. Floats at or above `1e14` or below `1e-4` in magnitude
/// switch to exponent form (`1.0E+20`). Non-scalars return `None`.
pub fn to_string(value: &ParamValue) -> Option<String> {
    match value {
        ParamValue::String(s) => Some(s.clone()),
        ParamValue::Bool(true) => Some("1".to_string()),
        ParamValue::Bool(false) => Some(String::new()),
        ParamValue::Int(i) => Some(i.to_string()),
        ParamValue::Float(f) => Some(format_float(*f)),
        ParamValue::Null | ParamValue::Array(_) | ParamValue::Map(_) => None,
    }
}

fn float_to_int(f: f64) -> Option<i64> {
    // 2^63 is exactly representable; anything at or above it overflows
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.is_finite() && f.fract() == 0.0 && f >= -LIMIT && f < LIMIT {
        Some(f as i64)
    } else {
        None
    }
}

fn parse_int(raw: &str) -> Option<i64> {
    let s = trim(raw);
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }

    // i64::from_str handles the sign and reports overflow
    s.parse::<i64>().ok()
}

fn parse_float(raw: &str) -> Option<f64> {
    let s = trim(raw);
    if !is_decimal_literal(s) {
        return None;
    }
    s.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Matches `[+-]?(D+(\.D*)?|\.D+)([eE][+-]?D+)?`.
fn is_decimal_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;

    let mut frac_digits = 0;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        frac_digits = i - frac_start;
    }

    if int_digits == 0 && frac_digits == 0 {
        return false;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

fn parse_bool(raw: &str) -> Option<bool> {
    let s = trim(raw);
    if s.eq_ignore_ascii_case("1")
        || s.eq_ignore_ascii_case("true")
        || s.eq_ignore_ascii_case("on")
        || s.eq_ignore_ascii_case("yes")
    {
        Some(true)
    } else if s.eq_ignore_ascii_case("0")
        || s.eq_ignore_ascii_case("false")
        || s.eq_ignore_ascii_case("off")
        || s.eq_ignore_ascii_case("no")
    {
        Some(false)
    } else {
        None
    }
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NAN".to_string()
    } else if f.is_infinite() {
        let text = if f > 0.0 { "INF" } else { "-INF" };
        text.to_string()
    } else if f == 0.0 {
        // drop the sign of negative zero
        "0".to_string()
    } else {
        let sci = format!("{:e}", f);
        let Some((mantissa, exp)) = sci.split_once('e') else {
            return f.to_string();
        };
        let exp: i32 = exp.parse().unwrap_or(0);
        if (-4..14).contains(&exp) {
            return f.to_string();
        }
        // large and tiny magnitudes use the `1.0E+20` form
        let sign = if exp < 0 { '-' } else { '+' };
        if mantissa.contains('.') {
            format!("{}E{}{}", mantissa, sign, exp.abs())
        } else {
            format!("{}.0E{}{}", mantissa, sign, exp.abs())
        }
    }
}
