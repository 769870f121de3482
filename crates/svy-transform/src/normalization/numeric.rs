//! Numeric textual-form tests.
//!
//! Classification never goes through `f64::from_str`, which accepts forms
//! the target format has no storage for ("inf", "NaN"). The tests here are
//! explicit over the character forms the type ladder distinguishes.

/// Integer textual form: optional leading sign, then digits only.
pub fn is_integer_form(value: &str) -> bool {
    let digits = value.strip_prefix(['-', '+']).unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Decimal textual form: optional sign, digits with exactly one period and
/// at least one digit somewhere.
pub fn is_decimal_form(value: &str) -> bool {
    let body = value.strip_prefix(['-', '+']).unwrap_or(value);
    let Some((whole, frac)) = body.split_once('.') else {
        return false;
    };
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    (!whole.is_empty() || !frac.is_empty()) && all_digits(whole) && all_digits(frac)
}

/// Scientific textual form: a mantissa in integer or decimal form followed
/// by an exponent (`e`/`E`, optional sign, digits).
pub fn is_scientific_form(value: &str) -> bool {
    let Some(split) = value.find(['e', 'E']) else {
        return false;
    };
    let (mantissa, exponent) = value.split_at(split);
    let exponent = &exponent[1..];
    (is_integer_form(mantissa) || is_decimal_form(mantissa)) && is_integer_form(exponent)
}

/// True for any value the type ladder can store numerically.
pub fn is_numeric(value: &str) -> bool {
    is_integer_form(value) || is_decimal_form(value) || is_scientific_form(value)
}

/// Comma-decimal rewrite: when the configured separator is comma, a cell
/// like "3,5" means 3.5. Returns the rewritten cell only when the result is
/// numeric, leaving thousands-grouped text and ordinary prose untouched.
pub fn normalize_decimal_comma(value: &str) -> Option<String> {
    if !value.contains(',') {
        return None;
    }
    let rewritten = value.replace(',', ".");
    if is_numeric(&rewritten) {
        Some(rewritten)
    } else {
        None
    }
}
