/// Number of significant digits kept when rendering a value.
pub const SIGNIFICANT_DIGITS: usize = 12;

/// Formats a number for display.
///
/// Values are rounded to [`SIGNIFICANT_DIGITS`] significant digits so that
/// floating-point noise such as `15.000000000000002` renders as `15`.
/// Integral values have no decimal point, and the output never uses
/// exponent notation, so it can be fed back into the parser.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Also covers -0.0
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, value)
        .parse::<f64>()
        .unwrap_or(value);
    rounded.to_string()
}
