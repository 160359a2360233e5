//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - A fixed "today" so windowed analytics are deterministic
//! - Mock data factories for activities and recovery records
//! - Helper assertions

use chrono::{Duration, NaiveDate};

use crate::models::{Activity, HrvMetrics, RecoverySnapshot, SleepMetrics, METERS_PER_MILE};

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// Saturday, 2026-02-14. The current Monday-anchored week starts 2026-02-09.
pub fn test_today() -> NaiveDate {
  NaiveDate::from_ymd_opt(2026, 2, 14).expect("valid date")
}

pub fn days_ago(today: NaiveDate, days: i64) -> NaiveDate {
  today - Duration::days(days)
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Create an activity with raw units (meters, seconds)
pub fn mock_activity(
  activity_type: &str,
  date: &str,
  distance_meters: f64,
  duration_seconds: f64,
  avg_hr: Option<f64>,
) -> Activity {
  Activity {
    id: 1,
    name: "Test Activity".to_string(),
    activity_type: activity_type.to_string(),
    date: date.to_string(),
    distance: distance_meters,
    duration: duration_seconds,
    avg_hr,
    max_hr: avg_hr.map(|hr| hr + 15.0),
  }
}

/// Create a run `days` before `today` with distance in miles and duration in minutes
pub fn mock_run(today: NaiveDate, days: i64, miles: f64, minutes: f64, avg_hr: f64) -> Activity {
  Activity {
    id: days,
    name: "Test Run".to_string(),
    activity_type: "running".to_string(),
    date: days_ago(today, days).format("%Y-%m-%d").to_string(),
    distance: miles * METERS_PER_MILE,
    duration: minutes * 60.0,
    avg_hr: Some(avg_hr),
    max_hr: None,
  }
}

pub fn mock_sleep(date: NaiveDate, score: f64) -> SleepMetrics {
  SleepMetrics {
    date,
    score: Some(score),
    duration_seconds: Some(7.5 * 3600.0),
  }
}

pub fn mock_hrv(date: NaiveDate, last_night: f64, weekly_avg: f64) -> HrvMetrics {
  HrvMetrics {
    date,
    last_night: Some(last_night),
    weekly_avg: Some(weekly_avg),
    status: Some("BALANCED".to_string()),
  }
}

/// A well-recovered day: sleep 85, HRV at baseline, battery 80
pub fn mock_recovery(date: NaiveDate) -> RecoverySnapshot {
  let mut snapshot = RecoverySnapshot::empty(date);
  snapshot.sleep = mock_sleep(date, 85.0);
  snapshot.hrv = mock_hrv(date, 55.0, 55.0);
  snapshot.body_battery.current = Some(80.0);
  snapshot.body_battery.highest = Some(92.0);
  snapshot.body_battery.lowest = Some(25.0);
  snapshot.stress.avg_stress = Some(28.0);
  snapshot.stress.max_stress = Some(75.0);
  snapshot
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff: f64 = (($left) - ($right)).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_mock_run_units() {
    let run = mock_run(test_today(), 3, 5.0, 40.0, 145.0);
    assert_eq!(run.date, "2026-02-11");
    assert!(run.is_run());
    assert_approx_eq!(run.distance_miles(), 5.0, 1e-9);
    assert_eq!(run.duration, 2400.0);
  }

  #[test]
  fn test_recovery_factory_has_all_signals() {
    let snapshot = mock_recovery(test_today());
    assert!(snapshot.sleep.score.is_some());
    assert!(snapshot.hrv.last_night.is_some());
    assert!(snapshot.body_battery.current.is_some());
  }
}
