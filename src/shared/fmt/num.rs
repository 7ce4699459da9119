//! Number formatting for quote text.
//!
//! Everything funnels through [`group_thousands`], which inserts comma separators
//! into the integer part of an already-rendered number.

/// Insert thousands separators into a rendered number (`-1234.5` → `-1,234.5`).
pub fn group_thousands(rendered: &str) -> String {
    let (sign, unsigned) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let digits = int_part.len();
    let mut grouped = String::with_capacity(digits + digits / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Drop trailing fractional zeros (`1.50` → `1.5`, `2.00` → `2`).
fn trim_fraction(rendered: String) -> String {
    if !rendered.contains('.') {
        return rendered;
    }
    rendered
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Round to `decimals` places, trim trailing zeros, group thousands.
///
/// Mirrors how the API's pre-rounded floats read when printed verbatim.
pub fn display_with_decimals(amount: &f64, decimals: usize) -> String {
    let mut trimmed = trim_fraction(format!("{:.1$}", amount, decimals));
    if trimmed == "-0" {
        trimmed = "0".to_string();
    }
    group_thousands(&trimmed)
}

/// [`display_with_decimals`] at cent precision.
pub fn display(amount: &f64) -> String {
    display_with_decimals(amount, 2)
}

/// Integer with thousands separators (share volumes).
pub fn grouped_integer(value: u64) -> String {
    group_thousands(&value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("123456"), "123,456");
        assert_eq!(group_thousands("-1234.56"), "-1,234.56");
    }

    #[test]
    fn test_display_trims_zeros() {
        assert_eq!(display(&187.30), "187.3");
        assert_eq!(display(&100.0), "100");
        assert_eq!(display(&1.235), "1.24");
        assert_eq!(display(&-0.001), "0");
    }

    #[test]
    fn test_display_with_decimals_large_numbers() {
        assert_eq!(display_with_decimals(&1234567.89, 2), "1,234,567.89");
        assert_eq!(display_with_decimals(&1234567.0, 0), "1,234,567");
    }

    #[test]
    fn test_grouped_integer() {
        assert_eq!(grouped_integer(0), "0");
        assert_eq!(grouped_integer(52_340_118), "52,340,118");
    }
}
