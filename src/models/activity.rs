use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const METERS_PER_MILE: f64 = 1609.344;

/// A normalized activity as handed to the analytics layer.
///
/// `date` keeps the raw `YYYY-MM-DD` string from the source so that records
/// with an unparseable date can be dropped where they are consumed instead of
/// failing the whole fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
  pub id: i64,
  pub name: String,
  #[serde(rename = "type")]
  pub activity_type: String,
  pub date: String,
  /// Meters
  pub distance: f64,
  /// Seconds
  pub duration: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub avg_hr: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub max_hr: Option<f64>,
}

impl Activity {
  /// Any activity type containing "run" counts (running, trail_running, treadmill_running...)
  pub fn is_run(&self) -> bool {
    self.activity_type.to_lowercase().contains("run")
  }

  /// Calendar date of the activity, `None` when the stored date is malformed
  pub fn parsed_date(&self) -> Option<NaiveDate> {
    parse_iso_date(&self.date)
  }

  pub fn distance_miles(&self) -> f64 {
    self.distance / METERS_PER_MILE
  }

  /// Seconds per mile, only when both distance and duration are positive
  pub fn pace_seconds_per_mile(&self) -> Option<f64> {
    if self.distance > 0.0 && self.duration > 0.0 {
      Some(self.duration / self.distance_miles())
    } else {
      None
    }
  }

  /// Average HR, treating 0 as "no data"
  pub fn heart_rate(&self) -> Option<f64> {
    self.avg_hr.filter(|hr| *hr > 0.0)
  }
}

/// Parse the first 10 characters of an ISO 8601 date or timestamp.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
  let day = value.get(..10).unwrap_or(value);
  NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Per-activity summary shown alongside lap splits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
  pub name: String,
  pub distance: f64,
  pub duration: f64,
  pub avg_hr: Option<f64>,
  pub max_hr: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
  pub lap: u32,
  pub distance: f64,
  pub duration: f64,
  pub avg_hr: Option<f64>,
  pub max_hr: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityDetails {
  pub summary: Option<ActivitySummary>,
  pub splits: Vec<Split>,
}
