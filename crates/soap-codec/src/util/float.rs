//! Deterministic scientific notation for floating point payloads.
//!
//! `f32` renders with 8 significant digits and `f64` with 17. A given binary
//! value always produces the same text; `f64` text also parses back to the
//! same value, while `f32` text is only exact to the rendered digits. The
//! exponent always carries a sign and at least two digits (`1.5000000e+02`).

/// Formats an `f32` as `d.ddddddde±XX`.
pub fn format_f32(v: f32) -> String {
    if !v.is_finite() {
        return format_non_finite(v as f64);
    }
    normalize_exponent(&format!("{:.7e}", v))
}

/// Formats an `f64` as `d.dddddddddddddddde±XX`.
pub fn format_f64(v: f64) -> String {
    if !v.is_finite() {
        return format_non_finite(v);
    }
    normalize_exponent(&format!("{:.16e}", v))
}

/// Parses a float payload at 32-bit precision.
///
/// Finite text that overflows `f32` is rejected rather than saturated.
pub fn parse_f32(text: &str) -> Option<f32> {
    let v: f32 = text.parse().ok()?;
    if v.is_infinite() && !names_infinity(text) {
        return None;
    }
    Some(v)
}

/// Parses a float payload at 64-bit precision.
pub fn parse_f64(text: &str) -> Option<f64> {
    let v: f64 = text.parse().ok()?;
    if v.is_infinite() && !names_infinity(text) {
        return None;
    }
    Some(v)
}

fn names_infinity(text: &str) -> bool {
    text.trim_start_matches(['+', '-'])
        .to_ascii_lowercase()
        .starts_with("inf")
}

fn format_non_finite(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v > 0.0 {
        "+Inf".to_string()
    } else {
        "-Inf".to_string()
    }
}

/// Rewrites Rust's `1.5e2` exponent into `1.5e+02`.
fn normalize_exponent(s: &str) -> String {
    let Some((mantissa, exp)) = s.split_once('e') else {
        return s.to_string();
    };
    let (sign, digits) = match exp.strip_prefix('-') {
        Some(d) => ('-', d),
        None => ('+', exp),
    };
    format!("{}e{}{:0>2}", mantissa, sign, digits)
}
