/// Renders a count with `,` thousands separators (`1234567` -> `"1,234,567"`).
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, "0")]
    #[test_case(7, "7")]
    #[test_case(999, "999")]
    #[test_case(1_000, "1,000")]
    #[test_case(50_000, "50,000")]
    #[test_case(1_000_000, "1,000,000")]
    #[test_case(12_345_678, "12,345,678")]
    fn test_format_count(n: usize, expected: &str) {
        assert_eq!(format_count(n), expected);
    }

    proptest::proptest! {
        #[test]
        fn prop_grouping_preserves_digits(n in proptest::prelude::any::<usize>()) {
            let rendered = format_count(n);
            proptest::prop_assert_eq!(rendered.replace(',', ""), n.to_string());
            for group in rendered.split(',').skip(1) {
                proptest::prop_assert_eq!(group.len(), 3);
            }
        }
    }
}
