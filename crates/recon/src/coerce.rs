//! Total conversions from loosely typed JSON into the merged field types.
//!
//! Nothing here returns an error: a value that cannot be read as an integer
//! becomes `0`.

use serde_json::Value;

use crate::model::Movement;

/// Read a JSON value as an integer, falling back to `0`.
///
/// Integers pass through, floats truncate toward zero, booleans map to
/// `1`/`0`, and strings are parsed as decimal integer literals (surrounding
/// whitespace, a leading sign and `_` digit separators are accepted).
/// Everything else, including out-of-range numbers, yields `0`.
pub fn coerce_int(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                i
            } else if let Some(f) = n.as_f64() {
                truncate_float(f).unwrap_or(0)
            } else {
                0
            }
        }
        Some(Value::Bool(b)) => i64::from(*b),
        Some(Value::String(s)) => parse_int_literal(s).unwrap_or(0),
        _ => 0,
    }
}

/// Build a [`Movement`] from the `movement` value of a per-item file.
/// Anything but an object gives `{walk: 0, jump: 0}`.
pub fn clean_movement(value: Option<&Value>) -> Movement {
    match value {
        Some(Value::Object(m)) => Movement {
            walk: coerce_int(m.get("walk")),
            jump: coerce_int(m.get("jump")),
        },
        _ => Movement::default(),
    }
}

fn truncate_float(f: f64) -> Option<i64> {
    // u64-range integers land here too; i64::MAX as f64 rounds up, hence `<`.
    if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f.trunc() as i64)
    } else {
        None
    }
}

fn parse_int_literal(s: &str) -> Option<i64> {
    let s = s.trim();
    let (negative, digits) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
    {
        return None;
    }

    // Accumulate on the sign's side so i64::MIN parses.
    let mut n: i64 = 0;
    for b in digits.bytes() {
        let d = match b {
            b'0'..=b'9' => i64::from(b - b'0'),
            b'_' => continue,
            _ => return None,
        };
        n = n.checked_mul(10)?;
        n = if negative { n.checked_sub(d)? } else { n.checked_add(d)? };
    }
    Some(n)
}
