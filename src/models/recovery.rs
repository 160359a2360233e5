use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Nightly sleep summary. `score` is the 0-100 sleep score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepMetrics {
  pub date: NaiveDate,
  pub score: Option<f64>,
  pub duration_seconds: Option<f64>,
}

/// Heart-rate variability in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HrvMetrics {
  pub date: NaiveDate,
  pub last_night: Option<f64>,
  pub weekly_avg: Option<f64>,
  pub status: Option<String>,
}

/// Body battery (0-100) for a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyBattery {
  pub date: NaiveDate,
  pub current: Option<f64>,
  pub highest: Option<f64>,
  pub lowest: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressMetrics {
  pub date: NaiveDate,
  pub avg_stress: Option<f64>,
  pub max_stress: Option<f64>,
}

impl SleepMetrics {
  pub fn empty(date: NaiveDate) -> Self {
    Self { date, score: None, duration_seconds: None }
  }
}

impl HrvMetrics {
  pub fn empty(date: NaiveDate) -> Self {
    Self { date, last_night: None, weekly_avg: None, status: None }
  }
}

impl BodyBattery {
  pub fn empty(date: NaiveDate) -> Self {
    Self { date, current: None, highest: None, lowest: None }
  }

  /// Build from the day's `(timestamp, level)` samples: current is the last
  /// sample, high and low are the extremes.
  pub fn from_samples(date: NaiveDate, levels: &[f64]) -> Self {
    if levels.is_empty() {
      return Self::empty(date);
    }
    Self {
      date,
      current: levels.last().copied(),
      highest: levels.iter().copied().reduce(f64::max),
      lowest: levels.iter().copied().reduce(f64::min),
    }
  }
}

impl StressMetrics {
  pub fn empty(date: NaiveDate) -> Self {
    Self { date, avg_stress: None, max_stress: None }
  }
}

/// Everything recovery-related for a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoverySnapshot {
  pub sleep: SleepMetrics,
  pub hrv: HrvMetrics,
  pub body_battery: BodyBattery,
  pub stress: StressMetrics,
}

impl RecoverySnapshot {
  pub fn empty(date: NaiveDate) -> Self {
    Self {
      sleep: SleepMetrics::empty(date),
      hrv: HrvMetrics::empty(date),
      body_battery: BodyBattery::empty(date),
      stress: StressMetrics::empty(date),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_body_battery_from_samples() {
    let date = NaiveDate::from_ymd_opt(2026, 2, 14).unwrap();
    let bb = BodyBattery::from_samples(date, &[40.0, 85.0, 62.0, 55.0]);
    assert_eq!(bb.current, Some(55.0));
    assert_eq!(bb.highest, Some(85.0));
    assert_eq!(bb.lowest, Some(40.0));
  }

  #[test]
  fn test_body_battery_without_samples_is_empty() {
    let date = NaiveDate::from_ymd_opt(2026, 2, 14).unwrap();
    assert_eq!(BodyBattery::from_samples(date, &[]), BodyBattery::empty(date));
  }
}
