/// Render a Euro value the way the `de-DE` locale does
///
/// `.` groups thousands, `,` separates two fractional digits, and the sign
/// follows after a no-break space: `1.234,50 €`.
///
/// Returns `None` for values too large to have a cent representation,
/// including infinities and NaN.
pub fn format_euro(value: f64) -> Option<String> {
    let cents = (value.abs() * 100.0).round();
    if !cents.is_finite() {
        return None;
    }
    // whole f64 values print every digit, no exponent
    let digits = format!("{:03.0}", cents);
    let (whole, fraction) = digits.split_at(digits.len() - 2);
    let sign = if value < 0.0 && cents > 0.0 { "-" } else { "" };
    Some(format!("{sign}{},{fraction}\u{00A0}€", group_thousands(whole)))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(digit);
    }
    out
}
