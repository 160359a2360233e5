//! Pattern detection over recent runs and recovery data
//!
//! Each detector looks at one angle (day of week, distance, sleep, HRV, pace
//! drift) and contributes zero or more plain-English insights. The report
//! runs them in a fixed order and caps the result.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::analysis::weeks_before;
use crate::error::AnalysisError;
use crate::format::format_pace_clock;
use crate::models::{Activity, HrvMetrics, SleepMetrics};

pub const DEFAULT_PATTERN_WEEKS: u32 = 8;
pub const MAX_INSIGHTS: usize = 7;

pub const NO_RUNS_MESSAGE: &str = "Not enough running data for pattern analysis.";
pub const NO_PATTERNS_MESSAGE: &str = "Not enough data to detect clear patterns yet. Keep training!";

const LONG_RUN_MILES: f64 = 8.0;
const GOOD_SLEEP_SCORE: f64 = 70.0;
const HRV_LOW_RATIO: f64 = 0.8;
const PACE_DRIFT_RATIO: f64 = 1.05;

/// A run inside the analysis window with its parsed date
struct Run<'a> {
  activity: &'a Activity,
  date: NaiveDate,
}

fn day_name(day: Weekday) -> &'static str {
  match day {
    Weekday::Mon => "Monday",
    Weekday::Tue => "Tuesday",
    Weekday::Wed => "Wednesday",
    Weekday::Thu => "Thursday",
    Weekday::Fri => "Friday",
    Weekday::Sat => "Saturday",
    Weekday::Sun => "Sunday",
  }
}

fn mean(values: &[f64]) -> f64 {
  values.iter().sum::<f64>() / values.len() as f64
}

/// Generate actionable insights from the last `weeks` of running.
///
/// Empty `sleep` / `hrv` slices skip the corresponding detectors.
pub fn weekly_pattern_report(
  activities: &[Activity],
  sleep: &[SleepMetrics],
  hrv: &[HrvMetrics],
  weeks: u32,
  today: NaiveDate,
) -> Result<Vec<String>, AnalysisError> {
  if weeks == 0 {
    return Err(AnalysisError::non_positive("weeks"));
  }

  let runs = recent_runs(activities, weeks_before(today, weeks)?);
  if runs.is_empty() {
    return Ok(vec![NO_RUNS_MESSAGE.to_string()]);
  }

  let mut insights = Vec::new();
  insights.extend(day_of_week_patterns(&runs));
  insights.extend(long_run_patterns(&runs));
  if !sleep.is_empty() {
    insights.extend(sleep_performance_correlation(&runs, sleep));
  }
  if !hrv.is_empty() {
    insights.extend(hrv_recovery_patterns(hrv));
  }
  insights.extend(pace_drift_signals(&runs));

  if insights.is_empty() {
    insights.push(NO_PATTERNS_MESSAGE.to_string());
  }

  insights.truncate(MAX_INSIGHTS);
  Ok(insights)
}

fn recent_runs(activities: &[Activity], cutoff: NaiveDate) -> Vec<Run<'_>> {
  activities
    .iter()
    .filter(|a| a.is_run())
    .filter_map(|a| a.parsed_date().map(|date| Run { activity: a, date }))
    .filter(|r| r.date >= cutoff)
    .collect()
}

/// ---------------------------------------------------------------------------
/// Day of Week
/// ---------------------------------------------------------------------------

fn day_of_week_patterns(runs: &[Run<'_>]) -> Vec<String> {
  let mut insights = Vec::new();

  // Vecs keep first-seen order so ties resolve to the earliest day seen
  let mut day_counts: Vec<(Weekday, u32)> = Vec::new();
  let mut day_paces: Vec<(Weekday, Vec<f64>)> = Vec::new();

  for run in runs {
    let day = run.date.weekday();

    match day_counts.iter_mut().find(|(d, _)| *d == day) {
      Some((_, count)) => *count += 1,
      None => day_counts.push((day, 1)),
    }

    if let Some(pace) = run.activity.pace_seconds_per_mile() {
      match day_paces.iter_mut().find(|(d, _)| *d == day) {
        Some((_, paces)) => paces.push(pace),
        None => day_paces.push((day, vec![pace])),
      }
    }
  }

  let favorite = day_counts
    .iter()
    .fold(None::<(Weekday, u32)>, |best, &(day, count)| match best {
      Some((_, best_count)) if best_count >= count => best,
      _ => Some((day, count)),
    });
  if let Some((day, count)) = favorite.filter(|(_, count)| *count >= 3) {
    insights.push(format!("You run most often on {}s ({} runs).", day_name(day), count));
  }

  let fastest = day_paces
    .iter()
    .filter(|(_, paces)| paces.len() >= 2)
    .map(|(day, paces)| (*day, mean(paces)))
    .fold(None::<(Weekday, f64)>, |best, (day, avg)| match best {
      Some((_, best_avg)) if best_avg <= avg => best,
      _ => Some((day, avg)),
    });
  if let Some((day, avg)) = fastest {
    insights.push(format!(
      "Your fastest runs tend to happen on {}s (avg {}/mi).",
      day_name(day),
      format_pace_clock(avg)
    ));
  }

  insights
}

/// ---------------------------------------------------------------------------
/// Distance
/// ---------------------------------------------------------------------------

fn long_run_patterns(runs: &[Run<'_>]) -> Vec<String> {
  let long_runs = runs
    .iter()
    .filter(|r| r.activity.distance_miles() >= LONG_RUN_MILES)
    .count();

  if long_runs >= 2 {
    vec![format!(
      "You've done {} long runs (8+ miles) recently — great half marathon prep.",
      long_runs
    )]
  } else {
    Vec::new()
  }
}

/// ---------------------------------------------------------------------------
/// Sleep vs Pace
/// ---------------------------------------------------------------------------

fn sleep_performance_correlation(runs: &[Run<'_>], sleep: &[SleepMetrics]) -> Vec<String> {
  let sleep_by_date: HashMap<NaiveDate, &SleepMetrics> = sleep.iter().map(|s| (s.date, s)).collect();

  let mut good_sleep_paces = Vec::new();
  let mut poor_sleep_paces = Vec::new();

  for run in runs {
    let Some(night) = sleep_by_date.get(&run.date) else {
      continue;
    };
    let Some(pace) = run.activity.pace_seconds_per_mile() else {
      continue;
    };

    let score = night.score.unwrap_or(0.0);
    if score >= GOOD_SLEEP_SCORE {
      good_sleep_paces.push(pace);
    } else if score > 0.0 {
      poor_sleep_paces.push(pace);
    }
  }

  if good_sleep_paces.len() < 2 || poor_sleep_paces.len() < 2 {
    return Vec::new();
  }

  let avg_good = mean(&good_sleep_paces);
  let avg_poor = mean(&poor_sleep_paces);
  if avg_good < avg_poor {
    let diff_secs = (avg_poor - avg_good).trunc() as i64;
    vec![format!(
      "Your runs after good sleep (70+ score) are ~{}s/mi faster.",
      diff_secs
    )]
  } else {
    Vec::new()
  }
}

/// ---------------------------------------------------------------------------
/// HRV
/// ---------------------------------------------------------------------------

fn hrv_recovery_patterns(hrv: &[HrvMetrics]) -> Vec<String> {
  if hrv.len() < 3 {
    return Vec::new();
  }

  // Nights without a reading lean on the weekly average for the baseline
  let baseline_values: Vec<f64> = hrv
    .iter()
    .map(|h| {
      h.last_night
        .filter(|v| *v > 0.0)
        .or(h.weekly_avg)
        .unwrap_or(0.0)
    })
    .collect();
  let avg_hrv = mean(&baseline_values);
  if avg_hrv <= 0.0 {
    return Vec::new();
  }

  let low_count = hrv
    .iter()
    .filter_map(|h| h.last_night.filter(|v| *v > 0.0))
    .filter(|v| *v < avg_hrv * HRV_LOW_RATIO)
    .count();

  if low_count >= 3 {
    vec![format!(
      "HRV has been below baseline on {} days — monitor for overreaching.",
      low_count
    )]
  } else {
    Vec::new()
  }
}

/// ---------------------------------------------------------------------------
/// Overtraining
/// ---------------------------------------------------------------------------

fn pace_drift_signals(runs: &[Run<'_>]) -> Vec<String> {
  let mut chronological: Vec<&Run<'_>> = runs.iter().collect();
  chronological.sort_by_key(|r| r.date);

  let skip = chronological.len().saturating_sub(10);
  let recent_paces: Vec<f64> = chronological[skip..]
    .iter()
    .filter_map(|r| r.activity.pace_seconds_per_mile())
    .collect();

  if recent_paces.len() < 6 {
    return Vec::new();
  }

  let first = mean(&recent_paces[..3]);
  let last = mean(&recent_paces[recent_paces.len() - 3..]);
  if last > first * PACE_DRIFT_RATIO {
    vec!["Recent pace is trending slower — could indicate fatigue accumulation.".to_string()]
  } else {
    Vec::new()
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
