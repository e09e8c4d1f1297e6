//! Lenient coercions between value kinds.
//!
//! Every accessor here is total except [`Value::as_time`]: a value of the
//! wrong kind, or a string that does not parse, degrades to `""`, `0`,
//! `0.0` or `false`. Callers rely on treating "absent" and "wrong kind" the
//! same way, so these must not become errors.

use crate::error::{JsonError, Result};
use crate::value::Value;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// Floats within this distance of zero read as `false`.
pub const BOOL_EPSILON: f64 = 0.000_001;

/// Layout used when a timestamp is rendered as a string.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATE_FORMAT: &str = "%Y-%m-%d";

impl Value {
    /// Text form of a scalar; `""` for null, arrays and objects.
    pub fn as_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Int(i) => i.to_string(),
            Value::Uint(u) => u.to_string(),
            // Display for f64 is the shortest round-trip form and never
            // switches to exponent notation.
            Value::Float(f) => f.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Timestamp(ts) => ts.format(TIMESTAMP_FORMAT).to_string(),
            Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
        }
    }

    /// Signed integer view. Floats truncate toward zero (saturating),
    /// unsigned values wrap. A verbatim `Number` reads like the float it
    /// parses to.
    pub fn as_i64(&self) -> i64 {
        match self {
            Value::String(s) => parse_i64(s).unwrap_or(0),
            Value::Int(i) => *i,
            Value::Uint(u) => *u as i64,
            Value::Float(f) => *f as i64,
            Value::Number(n) => number_f64(n) as i64,
            Value::Bool(b) => i64::from(*b),
            Value::Null | Value::Timestamp(_) | Value::Array(_) | Value::Object(_) => 0,
        }
    }

    /// Unsigned integer view. Negative integers wrap, negative floats
    /// saturate to zero.
    pub fn as_u64(&self) -> u64 {
        match self {
            Value::String(s) => parse_u64(s).unwrap_or(0),
            Value::Int(i) => *i as u64,
            Value::Uint(u) => *u,
            Value::Float(f) => *f as u64,
            Value::Number(n) => number_f64(n) as u64,
            Value::Bool(b) => u64::from(*b),
            Value::Null | Value::Timestamp(_) | Value::Array(_) | Value::Object(_) => 0,
        }
    }

    /// Float view. Strings whose magnitude overflows `f64` read as `0.0`,
    /// like any other unparsable string.
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::String(s) => parse_f64(s).unwrap_or(0.0),
            Value::Int(i) => *i as f64,
            Value::Uint(u) => *u as f64,
            Value::Float(f) => *f,
            Value::Number(n) => number_f64(n),
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Null | Value::Timestamp(_) | Value::Array(_) | Value::Object(_) => 0.0,
        }
    }

    /// Truthiness. Floats are `false` only within [`BOOL_EPSILON`] of zero,
    /// so `-2.0` and `NaN` are both `true`.
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::String(s) => parse_bool(s).unwrap_or(false),
            Value::Int(i) => *i != 0,
            Value::Uint(u) => *u != 0,
            Value::Float(f) => float_truth(*f),
            Value::Number(n) => float_truth(number_f64(n)),
            Value::Null | Value::Timestamp(_) | Value::Array(_) | Value::Object(_) => false,
        }
    }

    /// Timestamp view, interpreting zone-less layouts in the local zone.
    ///
    /// See [`Value::as_time_in`].
    pub fn as_time(&self) -> Result<DateTime<FixedOffset>> {
        self.as_time_in(&Local)
    }

    /// Timestamp view.
    ///
    /// A `Timestamp` is returned as-is. Anything else is rendered with
    /// [`Value::as_string`] and tried against, in order:
    ///
    /// 1. `YYYY-MM-DD` (midnight in `tz`)
    /// 2. `YYYY-MM-DD HH:MM:SS` (in `tz`)
    /// 3. RFC 3339 with an explicit offset
    ///
    /// # Errors
    ///
    /// [`JsonError::TimeParse`] with the RFC 3339 parse error when no layout
    /// matches.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use jsonnode::Value;
    ///
    /// let ts = Value::from("2024-01-05 10:00:00").as_time_in(&Utc).unwrap();
    /// assert_eq!(ts.to_rfc3339(), "2024-01-05T10:00:00+00:00");
    /// ```
    pub fn as_time_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<DateTime<FixedOffset>> {
        if let Value::Timestamp(ts) = self {
            return Ok(*ts);
        }
        let text = self.as_string();
        if let Ok(date) = NaiveDate::parse_from_str(&text, DATE_FORMAT) {
            return Ok(localize(tz, date.and_time(NaiveTime::MIN)));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(&text, TIMESTAMP_FORMAT) {
            return Ok(localize(tz, naive));
        }
        DateTime::parse_from_rfc3339(&text)
            .map_err(|source| JsonError::TimeParse { input: text, source })
    }
}

/// Attach `tz` to a wall-clock time. A time skipped by a DST gap is read as
/// UTC wall-clock time so the conversion stays total.
fn localize<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<FixedOffset> {
    match tz.from_local_datetime(&naive).earliest() {
        Some(ts) => ts.fixed_offset(),
        None => tz.from_utc_datetime(&naive).fixed_offset(),
    }
}

fn float_truth(f: f64) -> bool {
    !(f <= BOOL_EPSILON && f >= -BOOL_EPSILON)
}

/// A verbatim number out of `f64` range reads as `0.0`.
fn number_f64(n: &serde_json::Number) -> f64 {
    parse_f64(&n.to_string()).unwrap_or(0.0)
}

/// Float literal parsing. A finite literal that overflows to infinity is a
/// range error; only the spelled-out `inf`/`infinity` forms give infinity.
pub(crate) fn parse_f64(s: &str) -> Option<f64> {
    let f: f64 = s.parse().ok()?;
    if f.is_infinite() {
        let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
        let spelled =
            unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity");
        if !spelled {
            return None;
        }
    }
    Some(f)
}

/// Boolean literals accepted in strings.
pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

pub(crate) fn parse_i64(s: &str) -> Option<i64> {
    let (negative, rest) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    let magnitude = parse_magnitude(rest)?;
    if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    }
}

pub(crate) fn parse_u64(s: &str) -> Option<u64> {
    parse_magnitude(s)
}

/// Parse an unsigned integer literal, picking the base from its prefix:
/// `0x` hex, `0o` octal, `0b` binary, a bare leading `0` octal, otherwise
/// decimal. Underscores may separate digits; see [`underscores_ok`].
fn parse_magnitude(s: &str) -> Option<u64> {
    let lower = s.get(..2).map(str::to_ascii_lowercase);
    let (radix, digits) = match lower.as_deref() {
        Some("0x") => (16, &s[2..]),
        Some("0o") => (8, &s[2..]),
        Some("0b") => (2, &s[2..]),
        _ if s.len() > 1 && s.starts_with('0') => (8, &s[1..]),
        _ => (10, s),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return None;
    }
    if digits.contains('_') {
        if !underscores_ok(s) {
            return None;
        }
        return u64::from_str_radix(&digits.replace('_', ""), radix).ok();
    }
    u64::from_str_radix(digits, radix).ok()
}

/// Every `_` in an unsigned literal must sit between two digits, where a
/// `0x`/`0o`/`0b` prefix counts as a digit: `1_000` and `0x_ff` are fine,
/// `_1`, `1_`, `1__0` and `0x_` are not.
fn underscores_ok(s: &str) -> bool {
    let bytes = s.as_bytes();
    let prefixed = bytes.len() >= 2
        && bytes[0] == b'0'
        && matches!(bytes[1].to_ascii_lowercase(), b'b' | b'o' | b'x');
    let (mut last_digit, mut after_underscore, rest) = if prefixed {
        (true, false, &bytes[2..])
    } else {
        (false, false, bytes)
    };
    for &b in rest {
        if b == b'_' {
            if !last_digit {
                return false;
            }
            last_digit = false;
            after_underscore = true;
        } else {
            last_digit = true;
            after_underscore = false;
        }
    }
    !after_underscore
}
