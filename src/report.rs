//! Daily coaching report
//!
//! Pulls every analysis together for one day: readiness, today's workout,
//! recovery signals, recent load, pattern insights and an optional race
//! countdown. Everything is computed from inputs the caller already fetched,
//! so building a report never touches the network.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analysis::{
  polarization_analysis, round_to, training_load_trend, weekly_summary, PolarizationReport,
  WeeklySummary, WeeklyTrend, DEFAULT_POLARIZATION_WEEKS, DEFAULT_SUMMARY_WEEKS,
};
use crate::coaching::{
  days_since_hard_effort, race_readiness, suggest_workout, RaceReadiness, ReadinessScore,
  WorkoutSuggestion,
};
use crate::error::AnalysisError;
use crate::models::{Activity, HrvMetrics, RecoverySnapshot, SleepMetrics};
use crate::patterns::weekly_pattern_report;

/// Weeks of trend shown in the report
const TREND_WEEKS: usize = 4;

/// Pattern window for the daily report
const INSIGHT_WEEKS: u32 = 4;

/// ---------------------------------------------------------------------------
/// Shared Helpers
/// ---------------------------------------------------------------------------

/// Current week's miles and the mean over all given weeks (0 for none)
pub fn recent_load(summaries: &[WeeklySummary]) -> (f64, f64) {
  let current = summaries.first().map(|s| s.total_miles).unwrap_or(0.0);
  let avg = if summaries.is_empty() {
    0.0
  } else {
    summaries.iter().map(|s| s.total_miles).sum::<f64>() / summaries.len() as f64
  };
  (current, avg)
}

/// Readiness from a day's recovery snapshot; missing signals count as 0
pub fn readiness_for(recovery: &RecoverySnapshot, current_miles: f64, avg_miles: f64) -> ReadinessScore {
  ReadinessScore::compute(
    recovery.sleep.score.unwrap_or(0.0),
    recovery.hrv.last_night.unwrap_or(0.0),
    recovery.hrv.weekly_avg.unwrap_or(0.0),
    recovery.body_battery.current.unwrap_or(0.0),
    current_miles,
    avg_miles,
  )
}

/// ---------------------------------------------------------------------------
/// Report
/// ---------------------------------------------------------------------------

/// Everything the report needs, already fetched
#[derive(Debug, Clone)]
pub struct ReportInputs<'a> {
  pub activities: &'a [Activity],
  pub recovery: RecoverySnapshot,
  /// Recent nights for pattern correlation
  pub recent_sleep: &'a [SleepMetrics],
  pub recent_hrv: &'a [HrvMetrics],
  pub race_date: Option<NaiveDate>,
  pub zone_boundary_hr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSummary {
  pub current_week_miles: f64,
  pub avg_weekly_miles: f64,
  pub trend: Vec<WeeklyTrend>,
  pub polarization: PolarizationReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
  pub date: NaiveDate,
  pub readiness: ReadinessScore,
  pub todays_suggestion: WorkoutSuggestion,
  pub recovery: RecoverySnapshot,
  pub recent_load_summary: LoadSummary,
  pub pattern_insights: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub race_countdown: Option<RaceReadiness>,
}

impl DailyReport {
  pub fn build(inputs: ReportInputs<'_>, today: NaiveDate) -> Result<Self, AnalysisError> {
    let activities = inputs.activities;

    let summaries = weekly_summary(activities, DEFAULT_SUMMARY_WEEKS, today)?;
    let (current_miles, avg_miles) = recent_load(&summaries);

    let readiness = readiness_for(&inputs.recovery, current_miles, avg_miles);
    let days_since_hard = days_since_hard_effort(activities, inputs.zone_boundary_hr, today);

    let days_until_race = inputs.race_date.map(|race| (race - today).num_days());
    let race_countdown = inputs
      .race_date
      .map(|race| race_readiness(activities, race, None, today));

    let todays_suggestion = suggest_workout(
      readiness.score,
      days_since_hard,
      days_until_race,
      current_miles,
    );

    let trend_weeks = summaries.len().min(TREND_WEEKS);
    let trend = training_load_trend(&summaries[..trend_weeks]);
    let polarization = polarization_analysis(
      activities,
      DEFAULT_POLARIZATION_WEEKS,
      inputs.zone_boundary_hr,
      today,
    )?;

    let pattern_insights = weekly_pattern_report(
      activities,
      inputs.recent_sleep,
      inputs.recent_hrv,
      INSIGHT_WEEKS,
      today,
    )?;

    tracing::debug!(
      score = readiness.score,
      workout = todays_suggestion.kind.as_str(),
      insights = pattern_insights.len(),
      "Built daily report"
    );

    Ok(Self {
      date: today,
      readiness,
      todays_suggestion,
      recovery: inputs.recovery,
      recent_load_summary: LoadSummary {
        current_week_miles: round_to(current_miles, 1),
        avg_weekly_miles: round_to(avg_miles, 1),
        trend,
        polarization,
      },
      pattern_insights,
      race_countdown,
    })
  }

  pub fn to_json(&self) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(self)
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
