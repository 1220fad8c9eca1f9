use crate::model::{Extremum, InvalidInput, Series, Summary};
use serde_json::Value;

struct Accumulator {
    n_vals: usize,
    n_positive: usize,
    total: f64,
    max: Extremum,
    min_positive: Extremum,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            n_vals: 0,
            n_positive: 0,
            total: 0.0,
            max: Extremum::lowest(),
            min_positive: Extremum::undefined(),
        }
    }

    fn add(&mut self, day: u32, val: f64) {
        self.n_vals += 1;
        self.total += val;

        // Strict comparisons keep the earliest day on ties.
        if val > self.max.value {
            self.max = Extremum { value: val, day };
        }

        if val > 0.0 {
            self.n_positive += 1;
            if val < self.min_positive.value {
                self.min_positive = Extremum { value: val, day };
            }
        }
    }

    fn report(&self, source_name: &str) -> Summary {
        Summary {
            source_name: source_name.to_string(),
            total: self.total,
            average: if self.n_positive > 0 {
                self.total / self.n_positive as f64
            } else {
                0.0
            },
            max: self.max,
            min_positive: self.min_positive,
            zero_days: self.n_vals - self.n_positive,
            positive_days: self.n_positive,
        }
    }
}

/// Compute the [`Summary`] of a series in a single pass.
///
/// Values that cannot be read as numbers count as zero.
///
/// # Errors
/// Returns [`InvalidInput::Empty`] if the series has no observations.
pub fn summarize(series: &Series) -> Result<Summary, InvalidInput> {
    if series.is_empty() {
        return Err(InvalidInput::Empty);
    }

    let mut acc = Accumulator::new();
    for obs in &series.obs {
        acc.add(obs.day, parse_numeric_or_zero(&obs.value));
    }

    Ok(acc.report(&series.name))
}

/// Read a raw value as a float, falling back to zero.
///
/// Strings are read up to the end of their leading numeric prefix,
/// so `"12.5 BRL"` is `12.5`. NaN and non-numeric values are zero.
pub fn parse_numeric_or_zero(value: &Value) -> f64 {
    let val = match value {
        Value::Number(num) => num.as_f64().unwrap_or(0.0),
        Value::String(text) => parse_float_prefix(text),
        _ => 0.0,
    };
    if val.is_nan() { 0.0 } else { val }
}

fn parse_float_prefix(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if text[end..].starts_with("Infinity") {
        return if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let n_int = count_digits(&bytes[end..]);
    end += n_int;

    let mut n_frac = 0;
    if bytes.get(end) == Some(&b'.') {
        n_frac = count_digits(&bytes[end + 1..]);
        if n_int + n_frac > 0 {
            end += 1 + n_frac;
        }
    }
    if n_int + n_frac == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let n_exp = count_digits(&bytes[exp_end..]);
        if n_exp > 0 {
            end = exp_end + n_exp;
        }
    }

    text[..end].parse().unwrap_or(f64::NAN)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Observation;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn series(vals: &[Value]) -> Series {
        let obs = vals
            .iter()
            .enumerate()
            .map(|(idx, val)| Observation {
                day: idx as u32 + 1,
                value: val.clone(),
            })
            .collect();
        Series::new("test", obs)
    }

    #[test]
    fn mixed_series() {
        let summary = summarize(&series(&[json!(10), json!(0), json!(5)])).unwrap();

        assert_eq!(summary.source_name, "test");
        assert_relative_eq!(summary.total, 15.0);
        assert_relative_eq!(summary.average, 7.5);
        assert_eq!(summary.max, Extremum { value: 10.0, day: 1 });
        assert_eq!(summary.min_positive, Extremum { value: 5.0, day: 3 });
        assert_eq!(summary.zero_days, 1);
        assert_eq!(summary.positive_days, 2);
    }

    #[test]
    fn all_zero_series() {
        let summary = summarize(&series(&[json!(0), json!(0.0)])).unwrap();

        assert_eq!(summary.total, 0.0);
        assert_eq!(summary.average, 0.0);
        assert_eq!(summary.max, Extremum { value: 0.0, day: 1 });
        assert!(summary.min_positive.is_undefined());
        assert_eq!(summary.zero_days, 2);
    }

    #[test]
    fn unparseable_value_counts_as_zero() {
        let summary = summarize(&series(&[json!("abc")])).unwrap();

        assert_eq!(summary.total, 0.0);
        assert_eq!(summary.average, 0.0);
        assert_eq!(summary.max, Extremum { value: 0.0, day: 1 });
        assert!(summary.min_positive.is_undefined());
        assert_eq!(summary.zero_days, 1);
    }

    #[test]
    fn ties_keep_first_day() {
        let summary = summarize(&series(&[json!(10), json!(10), json!(3), json!(3)])).unwrap();

        assert_eq!(summary.max.day, 1);
        assert_eq!(summary.min_positive.day, 3);
    }

    #[test]
    fn empty_series_fails() {
        assert!(matches!(
            summarize(&Series::new("empty", Vec::new())),
            Err(InvalidInput::Empty)
        ));
    }

    #[test]
    fn counts_partition_series() {
        let vals = [
            json!(3.5),
            json!(0),
            json!(null),
            json!("12"),
            json!(-4.0),
            json!(true),
            json!(""),
            json!(0.25),
        ];
        let summary = summarize(&series(&vals)).unwrap();

        assert_eq!(summary.positive_days, 3);
        assert_eq!(summary.zero_days + summary.positive_days, vals.len());
        assert_relative_eq!(summary.total, 3.5 + 12.0 - 4.0 + 0.25);
        assert_relative_eq!(summary.average, summary.total / 3.0);
        assert_eq!(summary.min_positive, Extremum { value: 0.25, day: 8 });
        assert_eq!(summary.max, Extremum { value: 12.0, day: 4 });
    }

    #[test]
    fn summarize_is_repeatable() {
        let series = series(&[json!(1.1), json!(0), json!("2.2"), json!(3.3)]);
        assert_eq!(summarize(&series).unwrap(), summarize(&series).unwrap());
    }

    #[test]
    fn parse_numbers() {
        assert_eq!(parse_numeric_or_zero(&json!(42)), 42.0);
        assert_eq!(parse_numeric_or_zero(&json!(-1.5)), -1.5);
        assert_eq!(parse_numeric_or_zero(&json!(0.0)), 0.0);
    }

    #[test]
    fn parse_strings() {
        assert_eq!(parse_numeric_or_zero(&json!("12.5")), 12.5);
        assert_eq!(parse_numeric_or_zero(&json!("  7")), 7.0);
        assert_eq!(parse_numeric_or_zero(&json!("12.5abc")), 12.5);
        assert_eq!(parse_numeric_or_zero(&json!("-.5")), -0.5);
        assert_eq!(parse_numeric_or_zero(&json!("5.")), 5.0);
        assert_eq!(parse_numeric_or_zero(&json!("1e3")), 1000.0);
        assert_eq!(parse_numeric_or_zero(&json!("2e")), 2.0);
        assert_eq!(parse_numeric_or_zero(&json!("3.5e+1x")), 35.0);
        assert_eq!(parse_numeric_or_zero(&json!("Infinity")), f64::INFINITY);
        assert_eq!(parse_numeric_or_zero(&json!("-Infinity")), f64::NEG_INFINITY);
    }

    #[test]
    fn parse_fallbacks() {
        assert_eq!(parse_numeric_or_zero(&json!("abc")), 0.0);
        assert_eq!(parse_numeric_or_zero(&json!("")), 0.0);
        assert_eq!(parse_numeric_or_zero(&json!(".")), 0.0);
        assert_eq!(parse_numeric_or_zero(&json!("-")), 0.0);
        assert_eq!(parse_numeric_or_zero(&json!("NaN")), 0.0);
        assert_eq!(parse_numeric_or_zero(&json!(null)), 0.0);
        assert_eq!(parse_numeric_or_zero(&json!(true)), 0.0);
        assert_eq!(parse_numeric_or_zero(&json!([1])), 0.0);
        assert_eq!(parse_numeric_or_zero(&json!({ "value": 1 })), 0.0);
    }
}
