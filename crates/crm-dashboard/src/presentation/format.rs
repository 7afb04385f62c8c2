/// Formats an amount as US dollars with thousands separators, e.g. `$30,700.50`.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use super::format_currency;

    #[test]
    fn groups_thousands_and_pads_cents() {
        assert_eq!(format_currency(30700.5), "$30,700.50");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(999.0), "$999.00");
    }

    #[test]
    fn zero_and_negative_amounts() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(-1500.25), "-$1,500.25");
        assert_eq!(format_currency(-0.001), "$0.00");
    }
}
