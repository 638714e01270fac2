/// Group an integer by thousands: `1234567` -> `"1,234,567"`.
pub fn format_grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format an axis tick, showing as many decimals as the tick step needs.
pub fn format_tick(value: f32, step: f32) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "NaN".to_string()
        } else if value.is_sign_positive() {
            "Inf".to_string()
        } else {
            "-Inf".to_string()
        };
    }
    let decimals = tick_decimals(step);
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = f64::from(value.abs());
    if decimals == 0 {
        return format!("{sign}{}", format_grouped(abs.round() as u64));
    }
    let fixed = format!("{abs:.decimals$}");
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let int: u64 = int.parse().unwrap_or(0);
    format!("{sign}{}.{frac}", format_grouped(int))
}

fn tick_decimals(step: f32) -> usize {
    if !(step.is_finite() && step > 0.0) || step >= 1.0 {
        return 0;
    }
    // Nudge so exact powers of ten (0.1, 0.01) do not round down a decade.
    (-(step.log10() + 1e-6).floor()).max(0.0) as usize
}
