//! Presentation formatting shared by pins and list cards.

use chrono::{DateTime, Utc};
use devmap_types::MetricValue;

/// Shown when a device has no value for the configured key.
pub const MISSING_VALUE: &str = "N/A";

/// Decimal places for non-integral readings. Pins are narrower than cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Precision {
    Pin,
    List,
}

impl Precision {
    pub const fn decimals(self) -> usize {
        match self {
            Precision::Pin => 1,
            Precision::List => 2,
        }
    }
}

/// Display text for a payload value.
///
/// Integral numbers print without decimals, other numbers with the
/// precision's decimal count; text passes through untouched.
pub fn round_off(value: Option<&MetricValue>, precision: Precision) -> String {
    match value {
        None | Some(MetricValue::Null) => MISSING_VALUE.to_string(),
        Some(MetricValue::Number(n)) => round_number(*n, precision),
        Some(MetricValue::Text(s)) => s.clone(),
        Some(MetricValue::Flag(b)) => b.to_string(),
        Some(MetricValue::Json(v)) => v.to_string(),
    }
}

pub fn round_number(n: f64, precision: Precision) -> String {
    if n.is_infinite() {
        return if n > 0.0 { "Infinity".into() } else { "-Infinity".into() };
    }
    if n == 0.0 {
        return "0".into();
    }
    if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        to_fixed(n, precision.decimals())
    }
}

/// Fixed-point text with exact ties rounded away from zero.
///
/// `2.25` gives `2.3` here where `format!` would give `2.2`.
fn to_fixed(n: f64, decimals: usize) -> String {
    let sign = if n < 0.0 { "-" } else { "" };
    let magnitude = n.abs();
    // Every finite f64 has a terminating expansion within 1074 fractional digits.
    let exact = format!("{magnitude:.1074}");
    let (whole, frac) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let tail = frac.get(decimals..).unwrap_or("");
    let is_tie = tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0');
    if !is_tie {
        return format!("{sign}{magnitude:.decimals$}");
    }

    let mut digits: Vec<u8> = whole.bytes().chain(frac.bytes().take(decimals)).collect();
    let mut carry = true;
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            carry = false;
            break;
        }
    }
    if carry {
        digits.insert(0, b'1');
    }
    let split = digits.len() - decimals;
    let text = String::from_utf8_lossy(&digits);
    if decimals == 0 {
        format!("{sign}{text}")
    } else {
        format!("{sign}{}.{}", &text[..split], &text[split..])
    }
}

/// Alert badge text; counts above 99 are capped.
pub fn badge_text(alert_count: u32) -> Option<String> {
    match alert_count {
        0 => None,
        1..=99 => Some(alert_count.to_string()),
        _ => Some("99+".to_string()),
    }
}

/// "Last updated" text: minutes under an hour, hours up to six hours,
/// then the absolute UTC time.
pub fn relative_time(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed_ms = (now - ts).num_milliseconds().max(0) as f64;
    let hours = elapsed_ms / 3_600_000.0;
    if hours <= 6.0 {
        if hours < 1.0 {
            let minutes = (elapsed_ms / 60_000.0).round();
            return format!("{minutes} minutes ago");
        }
        return format!("{} hours ago", hours.round());
    }
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn num(n: f64) -> MetricValue {
        MetricValue::Number(n)
    }

    #[test]
    fn rounding_by_context() {
        assert_eq!(round_off(Some(&num(12.0)), Precision::Pin), "12");
        assert_eq!(round_off(Some(&num(12.345)), Precision::Pin), "12.3");
        assert_eq!(round_off(Some(&num(12.345)), Precision::List), "12.35");
        assert_eq!(round_off(Some(&num(-3.0)), Precision::List), "-3");
        assert_eq!(round_off(Some(&num(-0.0)), Precision::Pin), "0");
        assert_eq!(round_off(Some(&num(1e21)), Precision::Pin), "1000000000000000000000");
    }

    #[test]
    fn exact_ties_round_away_from_zero() {
        assert_eq!(round_number(2.25, Precision::Pin), "2.3");
        assert_eq!(round_number(12.75, Precision::Pin), "12.8");
        assert_eq!(round_number(0.125, Precision::List), "0.13");
        assert_eq!(round_number(0.625, Precision::List), "0.63");
        assert_eq!(round_number(-2.25, Precision::Pin), "-2.3");
        assert_eq!(round_number(9.875, Precision::List), "9.88");
        // Not ties once stored as binary.
        assert_eq!(round_number(2.675, Precision::List), "2.67");
        assert_eq!(round_number(12.345, Precision::List), "12.35");
        assert_eq!(round_number(9.95, Precision::Pin), "9.9");
        assert_eq!(round_number(-0.001, Precision::List), "-0.00");
    }

    #[test]
    fn non_numbers_pass_through() {
        assert_eq!(round_off(Some(&MetricValue::Text("12.345".into())), Precision::Pin), "12.345");
        assert_eq!(round_off(Some(&MetricValue::Flag(false)), Precision::Pin), "false");
        assert_eq!(round_off(Some(&MetricValue::Null), Precision::Pin), MISSING_VALUE);
        assert_eq!(round_off(None, Precision::List), MISSING_VALUE);
    }

    #[test]
    fn badge_caps_at_99() {
        assert_eq!(badge_text(0), None);
        assert_eq!(badge_text(1).as_deref(), Some("1"));
        assert_eq!(badge_text(99).as_deref(), Some("99"));
        assert_eq!(badge_text(100).as_deref(), Some("99+"));
        assert_eq!(badge_text(u32::MAX).as_deref(), Some("99+"));
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(relative_time(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(relative_time(now - Duration::seconds(90), now), "2 minutes ago");
        assert_eq!(relative_time(now - Duration::minutes(150), now), "3 hours ago");
        assert_eq!(relative_time(now - Duration::hours(6), now), "6 hours ago");
        assert_eq!(relative_time(now - Duration::hours(7), now), "2024-05-01 05:00:00");
        assert_eq!(relative_time(now + Duration::minutes(3), now), "0 minutes ago");
    }
}
