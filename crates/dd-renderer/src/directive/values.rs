//! Coercion of raw option values.
//!
//! Every function returns `None` for malformed input; callers store that as
//! an absent option instead of failing.

use dd_deck::Color;

/// Parse `#rrggbb`.
pub(crate) fn parse_color(value: &str) -> Option<Color> {
    Color::from_hex(value.trim().strip_prefix('#')?)
}

/// Parse a font size in points.
pub(crate) fn parse_font_size(value: &str) -> Option<f64> {
    parse_float(value).filter(|size| *size > 0.0)
}

/// Parse a finite float.
pub(crate) fn parse_float(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a non-empty string.
pub(crate) fn parse_string(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

/// Parse a comma-separated list of non-negative integers: `1,2,1`.
pub(crate) fn parse_int_list(value: &str) -> Option<Vec<u32>> {
    let list = value
        .split(',')
        .map(|item| item.trim().parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()?;
    (!list.is_empty()).then_some(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#ff0000"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(parse_color("ff0000"), None);
        assert_eq!(parse_color("#ff00"), None);
        assert_eq!(parse_color("#zz0000"), None);
    }

    #[test]
    fn test_parse_font_size() {
        assert_eq!(parse_font_size("24"), Some(24.0));
        assert_eq!(parse_font_size("10.5"), Some(10.5));
        assert_eq!(parse_font_size("0"), None);
        assert_eq!(parse_font_size("big"), None);
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float("-15"), Some(-15.0));
        assert_eq!(parse_float("0.25"), Some(0.25));
        assert_eq!(parse_float("NaN"), None);
        assert_eq!(parse_float(""), None);
    }

    #[test]
    fn test_parse_string() {
        assert_eq!(parse_string(" Title Only "), Some("Title Only".to_owned()));
        assert_eq!(parse_string("  "), None);
    }

    #[test]
    fn test_parse_int_list() {
        assert_eq!(parse_int_list("1,2,1"), Some(vec![1, 2, 1]));
        assert_eq!(parse_int_list(" 3 , 1 "), Some(vec![3, 1]));
        assert_eq!(parse_int_list("1,x"), None);
        assert_eq!(parse_int_list("1,-2"), None);
        assert_eq!(parse_int_list(""), None);
    }
}
