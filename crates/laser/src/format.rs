/// Render a reading the way the device prints it: three decimals with the
/// trailing zero padding removed (`75.5`, `100`, `0.125`).
pub fn format_decimal(value: f64) -> String {
    let fixed = format!("{value:.3}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(75.5), "75.5");
        assert_eq!(format_decimal(100.0), "100");
        assert_eq!(format_decimal(50.1), "50.1");
        assert_eq!(format_decimal(0.0), "0");
        assert_eq!(format_decimal(1.25), "1.25");
        assert_eq!(format_decimal(0.125), "0.125");
        assert_eq!(format_decimal(100.1), "100.1");
        assert_eq!(format_decimal(-0.0001), "0");
    }
}
