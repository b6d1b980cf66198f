//! Number formatting for the statistics counters
//!
//! All formatters are pure: the same input always yields the same text.

/// Thousands separator for headline counters (right single quotation mark)
pub const GROUP_SEPARATOR: char = '\u{2019}';

/// Shown instead of a number that cannot be formatted
pub const INVALID_PLACEHOLDER: &str = "\u{2013}";

const BYTES_PER_TERABYTE: f64 = 1_000_000_000_000.0;

/// Whole number with `’` grouping: `1234567.4 → "1’234’567"`
pub fn format_grouped(x: f64) -> String {
    if !x.is_finite() {
        return INVALID_PLACEHOLDER.to_string();
    }
    let rounded = x.round();
    with_sign(rounded < 0.0, group_digits(&format!("{:.0}", rounded.abs()), GROUP_SEPARATOR))
}

/// Byte count as terabytes with at most two decimals: `1.5e12 → "1.5 TB"`
pub fn format_terabytes(bytes: f64) -> String {
    if !bytes.is_finite() {
        return INVALID_PLACEHOLDER.to_string();
    }
    let terabytes = bytes / BYTES_PER_TERABYTE;
    let fixed = format!("{:.2}", terabytes.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut text = group_digits(whole, ',');
    if !fraction.is_empty() {
        text.push('.');
        text.push_str(fraction);
    }
    format!("{} TB", with_sign(terabytes < 0.0, text))
}

/// Plain number as the host received it: `37.0 → "37"`
pub fn format_plain(x: f64) -> String {
    if !x.is_finite() {
        return INVALID_PLACEHOLDER.to_string();
    }
    format!("{x}")
}

fn with_sign(negative: bool, digits: String) -> String {
    // "-0" after rounding reads as zero
    if negative && digits.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        format!("-{digits}")
    } else {
        digits
    }
}

/// Insert `separator` every three digits from the right
fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len_utf8());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}
