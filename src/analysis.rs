//! Deterministic training-load analysis
//!
//! Weekly mileage aggregation, week-over-week load trend (10% rule) and
//! 80/20 polarization. Everything here is a pure function of the activity
//! list and an explicit `today`, so results are reproducible in tests.

use chrono::{Datelike, Days, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::models::Activity;

/// Easy/hard boundary when the platform doesn't provide zones: ~80% of an
/// assumed 190 bpm max, i.e. top of Zone 2.
pub const DEFAULT_ZONE_BOUNDARY_HR: f64 = 152.0;

/// Week-over-week increase above which a week is flagged (10% rule)
pub const OVERLOAD_THRESHOLD_PCT: f64 = 10.0;

pub const DEFAULT_SUMMARY_WEEKS: u32 = 8;
pub const DEFAULT_POLARIZATION_WEEKS: u32 = 4;

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
  let factor = 10f64.powi(decimals);
  (value * factor).round() / factor
}

/// Monday of the week containing `day`
pub fn week_start(day: NaiveDate) -> NaiveDate {
  day - Duration::days(day.weekday().num_days_from_monday() as i64)
}

/// The day `weeks` whole weeks before `day`
pub(crate) fn weeks_before(day: NaiveDate, weeks: u32) -> Result<NaiveDate, AnalysisError> {
  day
    .checked_sub_days(Days::new(u64::from(weeks) * 7))
    .ok_or_else(|| AnalysisError::out_of_range("weeks"))
}

fn in_range(activity: &Activity, start: NaiveDate, end: NaiveDate) -> bool {
  activity
    .parsed_date()
    .is_some_and(|d| d >= start && d <= end)
}

/// ---------------------------------------------------------------------------
/// Effort Classification
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effort {
  /// Zone 1-2
  Easy,
  /// Zone 3+
  Hard,
}

impl Effort {
  pub fn from_hr(avg_hr: f64, zone_boundary_hr: f64) -> Self {
    if avg_hr < zone_boundary_hr {
      Effort::Easy
    } else {
      Effort::Hard
    }
  }
}

/// ---------------------------------------------------------------------------
/// Weekly Summaries
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
  pub week_start: NaiveDate,
  pub week_end: NaiveDate,
  pub total_miles: f64,
  pub total_time_seconds: f64,
  pub run_count: u32,
}

/// Group runs into Monday-anchored weeks.
///
/// Always returns exactly `weeks` entries, current week first, including
/// weeks without any runs.
pub fn weekly_summary(
  activities: &[Activity],
  weeks: u32,
  today: NaiveDate,
) -> Result<Vec<WeeklySummary>, AnalysisError> {
  if weeks == 0 {
    return Err(AnalysisError::non_positive("weeks"));
  }

  let current_monday = week_start(today);
  weeks_before(current_monday, weeks - 1)?;

  let summaries = (0..weeks)
    .map(|w| {
      let start = current_monday - Duration::weeks(w as i64);
      let end = start + Duration::days(6);

      let mut summary = WeeklySummary {
        week_start: start,
        week_end: end,
        total_miles: 0.0,
        total_time_seconds: 0.0,
        run_count: 0,
      };

      for a in activities.iter().filter(|a| a.is_run() && in_range(a, start, end)) {
        summary.total_miles += a.distance_miles();
        summary.total_time_seconds += a.duration;
        summary.run_count += 1;
      }

      summary
    })
    .collect();

  Ok(summaries)
}

/// ---------------------------------------------------------------------------
/// Training Load Trend
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTrend {
  #[serde(flatten)]
  pub week: WeeklySummary,
  pub mileage_increase_pct: f64,
  pub overload_flag: bool,
}

/// Annotate most-recent-first summaries with the change against the week
/// before. The oldest week, or any week following a zero-mileage week, has
/// no basis and reports 0% / no overload.
pub fn training_load_trend(summaries: &[WeeklySummary]) -> Vec<WeeklyTrend> {
  summaries
    .iter()
    .enumerate()
    .map(|(i, week)| {
      let previous = summaries.get(i + 1).filter(|prev| prev.total_miles > 0.0);

      let (mileage_increase_pct, overload_flag) = match previous {
        Some(prev) => {
          let increase = (week.total_miles - prev.total_miles) * 100.0 / prev.total_miles;
          (round_to(increase, 1), increase > OVERLOAD_THRESHOLD_PCT)
        }
        None => (0.0, false),
      };

      WeeklyTrend {
        week: week.clone(),
        mileage_increase_pct,
        overload_flag,
      }
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Polarization (80/20)
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolarizationStatus {
  NoHeartRateData,
  WellPolarized,
  SlightlyTooIntense,
  TooIntense,
}

impl PolarizationStatus {
  fn from_easy_pct(easy_pct: f64) -> Self {
    if easy_pct >= 75.0 {
      PolarizationStatus::WellPolarized
    } else if easy_pct >= 60.0 {
      PolarizationStatus::SlightlyTooIntense
    } else {
      PolarizationStatus::TooIntense
    }
  }

  pub fn recommendation(&self) -> &'static str {
    match self {
      PolarizationStatus::NoHeartRateData => "No heart rate data available for analysis.",
      PolarizationStatus::WellPolarized => "Good polarization! Keep maintaining ~80% easy effort.",
      PolarizationStatus::SlightlyTooIntense => {
        "Slightly too much intensity. Try slowing down on easy days."
      }
      PolarizationStatus::TooIntense => {
        "Too much hard running. Risk of overtraining — add more easy miles."
      }
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolarizationReport {
  pub weeks_analyzed: u32,
  pub easy_pct: f64,
  pub hard_pct: f64,
  pub status: PolarizationStatus,
  pub recommendation: String,
}

/// Split run time over the last `weeks` into easy and hard by average HR.
///
/// Runs without HR or without a duration are left out of both sides.
pub fn polarization_analysis(
  activities: &[Activity],
  weeks: u32,
  zone_boundary_hr: f64,
  today: NaiveDate,
) -> Result<PolarizationReport, AnalysisError> {
  if weeks == 0 {
    return Err(AnalysisError::non_positive("weeks"));
  }

  let cutoff = weeks_before(today, weeks)?;

  let mut easy_time = 0.0;
  let mut hard_time = 0.0;

  for a in activities.iter().filter(|a| a.is_run() && in_range(a, cutoff, today)) {
    let avg_hr = match a.heart_rate() {
      Some(hr) if a.duration > 0.0 => hr,
      _ => continue,
    };

    match Effort::from_hr(avg_hr, zone_boundary_hr) {
      Effort::Easy => easy_time += a.duration,
      Effort::Hard => hard_time += a.duration,
    }
  }

  let total = easy_time + hard_time;
  if total <= 0.0 {
    let status = PolarizationStatus::NoHeartRateData;
    return Ok(PolarizationReport {
      weeks_analyzed: weeks,
      easy_pct: 0.0,
      hard_pct: 0.0,
      status,
      recommendation: status.recommendation().to_string(),
    });
  }

  let easy_pct = round_to(easy_time / total * 100.0, 1);
  // Derived from easy_pct so the pair always sums to 100
  let hard_pct = round_to(100.0 - easy_pct, 1);
  let status = PolarizationStatus::from_easy_pct(easy_pct);

  Ok(PolarizationReport {
    weeks_analyzed: weeks,
    easy_pct,
    hard_pct,
    status,
    recommendation: status.recommendation().to_string(),
  })
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
