//! Number and time formatting for meter displays.
//!
//! Renderers format every value through this module so the CLI and any
//! overlay show identical strings.

/// Format an integer with thousands separators.
///
/// # Examples
/// ```
/// use dpsmeter_types::formatting::format_thousands;
/// assert_eq!(format_thousands(0), "0");
/// assert_eq!(format_thousands(999), "999");
/// assert_eq!(format_thousands(1_500), "1,500");
/// assert_eq!(format_thousands(-1_234_567), "-1,234,567");
/// ```
pub fn format_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        result.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Format a rate, dropping the fractional part.
///
/// # Examples
/// ```
/// use dpsmeter_types::formatting::format_rate;
/// assert_eq!(format_rate(1234.9), "1,234");
/// assert_eq!(format_rate(0.0), "0");
/// ```
pub fn format_rate(n: f64) -> String {
    format_thousands(n.floor() as i64)
}

/// Format a percentage with one decimal.
///
/// # Examples
/// ```
/// use dpsmeter_types::formatting::format_percent;
/// assert_eq!(format_percent(42.75), "42.8%");
/// assert_eq!(format_percent(100.0), "100.0%");
/// ```
pub fn format_percent(n: f64) -> String {
    format!("{:.1}%", n)
}

/// Format elapsed seconds as a `MM:SS` clock. Negative input clamps to zero.
///
/// # Examples
/// ```
/// use dpsmeter_types::formatting::format_clock;
/// assert_eq!(format_clock(0.0), "00:00");
/// assert_eq!(format_clock(65.9), "01:05");
/// assert_eq!(format_clock(3_600.0), "60:00");
/// ```
pub fn format_clock(elapsed_secs: f64) -> String {
    let secs = elapsed_secs.max(0.0).floor() as u64;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(1), "1");
        assert_eq!(format_thousands(12), "12");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(12_345), "12,345");
        assert_eq!(format_thousands(123_456), "123,456");
        assert_eq!(format_thousands(1_000_000), "1,000,000");
        assert_eq!(format_thousands(-999), "-999");
        assert_eq!(format_thousands(i64::MIN), "-9,223,372,036,854,775,808");
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(-3.0), "00:00");
        assert_eq!(format_clock(59.999), "00:59");
        assert_eq!(format_clock(60.0), "01:00");
        assert_eq!(format_clock(754.2), "12:34");
    }

    #[test]
    fn test_format_rate_floors() {
        assert_eq!(format_rate(999.99), "999");
        assert_eq!(format_rate(1_000.5), "1,000");
    }
}
