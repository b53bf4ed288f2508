//! Serde helpers for human-readable durations in config files.
//!
//! Accepts `"500ms"`, `"60s"`, `"5m"`, `"2h"`, `"7d"` or a bare number of
//! seconds. Serializes as whole seconds, or milliseconds when sub-second.

use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if duration.subsec_millis() == 0 {
        serializer.serialize_str(&format!("{}s", duration.as_secs()))
    } else {
        serializer.serialize_str(&format!("{}ms", duration.as_millis()))
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_duration(&s).map_err(serde::de::Error::custom)
}

/// Parse a duration string. `ms` is checked before `s` and `m`.
pub fn parse_duration(s: &str) -> Result<Duration, &'static str> {
    let s = s.trim();
    let parse = |n: &str| n.trim().parse::<u64>();

    if let Some(ms) = s.strip_suffix("ms") {
        parse(ms)
            .map(Duration::from_millis)
            .map_err(|_| "invalid milliseconds")
    } else if let Some(secs) = s.strip_suffix('s') {
        parse(secs)
            .map(Duration::from_secs)
            .map_err(|_| "invalid seconds")
    } else if let Some(mins) = s.strip_suffix('m') {
        scaled(parse(mins).map_err(|_| "invalid minutes")?, 60)
    } else if let Some(hours) = s.strip_suffix('h') {
        scaled(parse(hours).map_err(|_| "invalid hours")?, 3600)
    } else if let Some(days) = s.strip_suffix('d') {
        scaled(parse(days).map_err(|_| "invalid days")?, 86_400)
    } else {
        parse(s)
            .map(Duration::from_secs)
            .map_err(|_| "invalid duration format")
    }
}

fn scaled(count: u64, unit_secs: u64) -> Result<Duration, &'static str> {
    count
        .checked_mul(unit_secs)
        .map(Duration::from_secs)
        .ok_or("duration too large")
}
