//! Serde adapter storing a [`Duration`] as a `[d.]hh:mm:ss[.fffffff]` string.
//!
//! This is the layout .NET writes for `TimeSpan`, which is what settings files
//! from earlier editor releases contain. Negative spans deserialize as zero so
//! validation can reset them.

use serde::{Deserialize, Deserializer, Serializer, de};
use std::time::Duration;

const TICKS_PER_SECOND: u64 = 10_000_000;
const NANOS_PER_TICK: u32 = 100;

pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(*duration))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(de::Error::custom)
}

/// Format a duration the way `TimeSpan.ToString()` does.
pub fn format(duration: Duration) -> String {
    let total = duration.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    let ticks = duration.subsec_nanos() / NANOS_PER_TICK;

    let mut out = if days > 0 {
        format!("{days}.{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    };
    if ticks > 0 {
        out.push_str(&format!(".{ticks:07}"));
    }
    out
}

/// Parse a `TimeSpan` string.
pub fn parse(raw: &str) -> Result<Duration, String> {
    let raw = raw.trim();
    if let Some(rest) = raw.strip_prefix('-') {
        parse(rest)?;
        return Ok(Duration::ZERO);
    }

    let invalid = || format!("invalid time span '{raw}', expected [d.]hh:mm:ss");

    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() != 3 {
        return Err(invalid());
    }

    let (days, hours) = match parts[0].split_once('.') {
        Some((d, h)) => (d, h),
        None => ("0", parts[0]),
    };
    let (seconds, fraction) = match parts[2].split_once('.') {
        Some((s, f)) => (s, Some(f)),
        None => (parts[2], None),
    };

    let number = |s: &str| s.parse::<u64>().map_err(|_| invalid());
    let days = number(days)?;
    let hours = number(hours)?;
    let minutes = number(parts[1])?;
    let seconds = number(seconds)?;
    if hours > 23 || minutes > 59 || seconds > 59 {
        return Err(invalid());
    }

    let nanos = match fraction {
        Some(f) if !f.is_empty() && f.len() <= 7 && f.bytes().all(|b| b.is_ascii_digit()) => {
            let padded = format!("{f:0<7}");
            let ticks = number(&padded)?;
            (ticks % TICKS_PER_SECOND) as u32 * NANOS_PER_TICK
        }
        Some(_) => return Err(invalid()),
        None => 0,
    };

    let secs = days
        .checked_mul(86_400)
        .and_then(|s| s.checked_add(hours * 3600 + minutes * 60 + seconds))
        .ok_or_else(invalid)?;
    Ok(Duration::new(secs, nanos))
}
