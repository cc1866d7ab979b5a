//! Human-readable time-to-live values such as `"30 min"` or `"2 days"`.

use anyhow::{Context, Result, bail};

const UNITS: &[(u64, &[&str])] = &[
    (1, &["ms", "millisecond", "milliseconds"]),
    (1_000, &["s", "sec", "second", "seconds"]),
    (60 * 1_000, &["m", "min", "minute", "minutes"]),
    (60 * 60 * 1_000, &["h", "hour", "hours"]),
    (24 * 60 * 60 * 1_000, &["d", "day", "days"]),
];

/// Parses `"<number> <unit>"` into milliseconds.
///
/// A bare integer is taken as milliseconds. Fractional values are allowed
/// (`"1.5 h"`) and rounded down to whole milliseconds.
pub fn parse_ttl(input: &str) -> Result<u64> {
    let input = input.trim();
    if let Ok(millis) = input.parse::<u64>() {
        return Ok(millis);
    }

    let mut parts = input.split_whitespace();
    let value = parts.next().context("Missing value")?;
    let unit = parts.next().context("Missing unit")?;
    if parts.next().is_some() {
        bail!("unexpected trailing input in ttl '{input}'");
    }

    let value: f64 = value
        .parse()
        .with_context(|| format!("Not a valid number: {value}"))?;
    if !value.is_finite() || value < 0.0 {
        bail!("ttl must be a non-negative number");
    }

    let Some((scale, _)) = UNITS.iter().find(|(_, names)| names.contains(&unit)) else {
        bail!("Not a valid unit {unit}");
    };

    Ok((value * *scale as f64) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_number_is_milliseconds() {
        assert_eq!(parse_ttl("200").unwrap(), 200);
    }

    #[test]
    fn every_unit_alias_is_accepted() {
        for (scale, names) in UNITS {
            for name in *names {
                assert_eq!(parse_ttl(&format!("2 {name}")).unwrap(), 2 * scale);
            }
        }
    }

    #[test]
    fn fractions_are_scaled() {
        assert_eq!(parse_ttl("1.5 s").unwrap(), 1_500);
        assert_eq!(parse_ttl("0.5 h").unwrap(), 30 * 60 * 1_000);
    }

    #[test]
    fn extra_whitespace_is_tolerated() {
        assert_eq!(parse_ttl("  30   min ").unwrap(), 30 * 60 * 1_000);
    }

    #[test]
    fn invalid_inputs_fail() {
        assert!(parse_ttl("").is_err());
        assert!(parse_ttl("ten min").is_err());
        assert!(parse_ttl("10 fortnights").is_err());
        assert!(parse_ttl("10 min extra").is_err());
        assert!(parse_ttl("-1 min").is_err());
    }
}
