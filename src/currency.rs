use crate::config::CurrencyConfig;

/// Format an amount as a currency string, e.g. `R$ 1.234,56`.
///
/// NaN is formatted as zero. Rounds half away from zero.
pub fn format_currency(amount: f64, cfg: &CurrencyConfig) -> String {
    let amount = if amount.is_nan() { 0.0 } else { amount };
    let space = if cfg.space_after_symbol { " " } else { "" };

    let decimals = cfg.decimals as usize;
    let units = (amount.abs() * 10f64.powi(cfg.decimals as i32)).round();

    // Scaling may overflow amounts that are themselves finite.
    if units.is_infinite() {
        let sign = if amount < 0.0 { "-" } else { "" };
        return format!("{sign}{}{space}∞", cfg.symbol);
    }
    let sign = if amount < 0.0 && units > 0.0 { "-" } else { "" };

    let digits = format!("{units:0>width$.0}", width = decimals + 1);
    let (int_part, frac_part) = digits.split_at(digits.len() - decimals);

    let mut out = format!("{sign}{}{space}", cfg.symbol);
    out.push_str(&group_thousands(int_part, &cfg.thousands_separator));
    if decimals > 0 {
        out.push_str(&cfg.decimal_separator);
        out.push_str(frac_part);
    }
    out
}

fn group_thousands(digits: &str, sep: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * sep.len());
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push_str(sep);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brl() -> CurrencyConfig {
        CurrencyConfig::default()
    }

    #[test]
    fn formats_default_currency() {
        assert_eq!(format_currency(1234.5, &brl()), "R$ 1.234,50");
        assert_eq!(format_currency(22174.1664, &brl()), "R$ 22.174,17");
        assert_eq!(format_currency(1_000_000.0, &brl()), "R$ 1.000.000,00");
        assert_eq!(format_currency(373.7838, &brl()), "R$ 373,78");
        assert_eq!(format_currency(0.0, &brl()), "R$ 0,00");
        assert_eq!(format_currency(0.07, &brl()), "R$ 0,07");
    }

    #[test]
    fn nan_is_zero() {
        assert_eq!(format_currency(f64::NAN, &brl()), "R$ 0,00");
    }

    #[test]
    fn negative_and_infinite_amounts() {
        assert_eq!(format_currency(-1.0, &brl()), "-R$ 1,00");
        assert_eq!(format_currency(-0.001, &brl()), "R$ 0,00");
        assert_eq!(format_currency(f64::INFINITY, &brl()), "R$ ∞");
        assert_eq!(format_currency(f64::NEG_INFINITY, &brl()), "-R$ ∞");
    }

    #[test]
    fn overflowing_scale_is_infinite() {
        let fine = CurrencyConfig {
            decimals: 6,
            ..brl()
        };
        assert_eq!(format_currency(1e307, &fine), "R$ ∞");
        assert_eq!(format_currency(-1e307, &fine), "-R$ ∞");
    }

    #[test]
    fn custom_settings() {
        let usd = CurrencyConfig {
            symbol: "$".to_string(),
            space_after_symbol: false,
            decimal_separator: ".".to_string(),
            thousands_separator: ",".to_string(),
            decimals: 0,
        };
        assert_eq!(format_currency(1234567.6, &usd), "$1,234,568");
        assert_eq!(format_currency(999.4, &usd), "$999");
    }
}
