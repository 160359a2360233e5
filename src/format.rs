//! Human-readable formatting and argument parsing for the CLI

use chrono::NaiveDate;

use crate::error::AnalysisError;
use crate::models::METERS_PER_MILE;

/// Pace as `M:SS /mi`, or `N/A` without a positive distance and duration.
///
/// Seconds are rounded, carrying into the minute at 60.
pub fn format_pace(duration_seconds: f64, distance_meters: f64) -> String {
  if duration_seconds <= 0.0 || distance_meters <= 0.0 {
    return "N/A".to_string();
  }

  let seconds_per_mile = duration_seconds / (distance_meters / METERS_PER_MILE);
  let mut minutes = (seconds_per_mile / 60.0).floor() as i64;
  let mut seconds = (seconds_per_mile % 60.0).round() as i64;
  if seconds == 60 {
    minutes += 1;
    seconds = 0;
  }
  format!("{}:{:02} /mi", minutes, seconds)
}

/// Truncating `M:SS` for a pace already in seconds per mile
pub fn format_pace_clock(seconds_per_mile: f64) -> String {
  let minutes = (seconds_per_mile / 60.0).floor() as i64;
  let seconds = (seconds_per_mile % 60.0).floor() as i64;
  format!("{}:{:02}", minutes, seconds)
}

/// `H:MM:SS` when at least an hour, otherwise `M:SS`
pub fn format_duration(seconds: f64) -> String {
  if seconds <= 0.0 {
    return "0:00".to_string();
  }

  let hours = (seconds / 3600.0).floor() as i64;
  let minutes = ((seconds % 3600.0) / 60.0).floor() as i64;
  let secs = (seconds % 60.0).floor() as i64;
  if hours > 0 {
    format!("{}:{:02}:{:02}", hours, minutes, secs)
  } else {
    format!("{}:{:02}", minutes, secs)
  }
}

/// Parse `HH:MM:SS`, `MM:SS` or a plain number of seconds
pub fn parse_time(value: &str) -> Result<f64, AnalysisError> {
  let invalid = || {
    AnalysisError::InvalidParameter(format!(
      "Invalid time: {}. Use HH:MM:SS, MM:SS or seconds.",
      value
    ))
  };

  let parts: Vec<&str> = value.trim().split(':').collect();
  let whole = |part: &str| part.trim().parse::<u32>().map_err(|_| invalid());

  let seconds = match parts.as_slice() {
    [h, m, s] => whole(h)? as f64 * 3600.0 + whole(m)? as f64 * 60.0 + whole(s)? as f64,
    [m, s] => whole(m)? as f64 * 60.0 + whole(s)? as f64,
    [raw] => raw.trim().parse::<f64>().map_err(|_| invalid())?,
    _ => return Err(invalid()),
  };

  if !seconds.is_finite() || seconds < 0.0 {
    return Err(invalid());
  }
  Ok(seconds)
}

/// Parse a `YYYY-MM-DD` argument, defaulting to `today` when absent
pub fn parse_date_arg(value: Option<&str>, today: NaiveDate) -> Result<NaiveDate, AnalysisError> {
  match value {
    None => Ok(today),
    Some(raw) if raw.trim().is_empty() => Ok(today),
    Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
      AnalysisError::InvalidParameter(format!("Invalid date format: {}. Use YYYY-MM-DD.", raw))
    }),
  }
}
