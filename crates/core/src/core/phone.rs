/// Format a North American number as `(XXX) XXX-XXXX`.
///
/// Non-digits are stripped first; if exactly ten digits remain the formatted
/// form is returned, otherwise the input comes back unchanged.
pub fn format_phone_number(input: &str) -> String {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 10 {
        return input.to_string();
    }
    format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_ten_digits() {
        assert_eq!(format_phone_number("5551234567"), "(555) 123-4567");
        assert_eq!(format_phone_number("555.123.4567"), "(555) 123-4567");
        assert_eq!(format_phone_number(" (555) 123 4567 "), "(555) 123-4567");
    }

    #[test]
    fn leaves_other_lengths_alone() {
        assert_eq!(format_phone_number("123"), "123");
        assert_eq!(format_phone_number("+1 555 123 4567"), "+1 555 123 4567");
        assert_eq!(format_phone_number(""), "");
    }
}
