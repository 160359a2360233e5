//! Command-line interface
//!
//! Each subcommand fetches what it needs from Garmin Connect, runs the
//! analytics with an explicit `today`, and prints a plain-text view. The
//! `render_*` functions are pure so output can be tested without a network.

use chrono::{Duration, NaiveDate};
use clap::{Parser, Subcommand};

use crate::analysis::{
  polarization_analysis, training_load_trend, weekly_summary, PolarizationReport, WeeklyTrend,
  DEFAULT_POLARIZATION_WEEKS, DEFAULT_SUMMARY_WEEKS,
};
use crate::coaching::{
  days_since_hard_effort, race_readiness, suggest_workout, RaceReadiness, ReadinessScore,
  WorkoutSuggestion,
};
use crate::config::CoachSettings;
use crate::error::AnalysisError;
use crate::format::{format_duration, format_pace, parse_date_arg, parse_time};
use crate::garmin::{GarminClient, GarminError, DEFAULT_ACTIVITY_DAYS};
use crate::models::{Activity, ActivityDetails, HrvMetrics, RecoverySnapshot, SleepMetrics, METERS_PER_MILE};
use crate::patterns::{weekly_pattern_report, DEFAULT_PATTERN_WEEKS};
use crate::report::{readiness_for, recent_load, DailyReport, ReportInputs};

/// Days of activities fetched for readiness and race views
const TODAY_LOOKBACK_DAYS: u32 = 56;
const RACE_LOOKBACK_DAYS: u32 = 60;

/// Weeks averaged for the `today` load ratio
const TODAY_LOAD_WEEKS: u32 = 4;

/// Nights of sleep/HRV fetched for pattern correlation
const PATTERN_RECOVERY_DAYS: u32 = 14;
const REPORT_RECOVERY_DAYS: u32 = 7;

/// Insights shown in the text daily report
const REPORT_TEXT_INSIGHTS: usize = 5;

/// ---------------------------------------------------------------------------
/// Arguments
/// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(
  name = "zoidberg-coach",
  version,
  about = "Analyze Garmin training data and get half marathon coaching suggestions.",
  arg_required_else_help = true
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// List recent Garmin activities with distance and pace
  Activities {
    /// Number of trailing days to fetch
    #[arg(short, long, default_value_t = DEFAULT_ACTIVITY_DAYS, value_parser = clap::value_parser!(u32).range(1..))]
    days: u32,
  },

  /// Show lap-by-lap breakdown with pace and HR for an activity
  Activity {
    /// Garmin activity ID
    activity_id: i64,
  },

  /// Show sleep score, HRV, body battery, and stress for a date
  Recovery {
    /// Date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<String>,
  },

  /// Show weekly mileage progression with trend indicators
  Summary {
    /// Number of weeks to summarize
    #[arg(short, long, default_value_t = DEFAULT_SUMMARY_WEEKS, value_parser = clap::value_parser!(u32).range(1..))]
    weeks: u32,
  },

  /// Show % easy vs % hard with a recommendation if the ratio is off
  Polarization {
    /// Weeks to analyze
    #[arg(short, long, default_value_t = DEFAULT_POLARIZATION_WEEKS, value_parser = clap::value_parser!(u32).range(1..))]
    weeks: u32,
  },

  /// Show today's readiness and workout suggestion
  Today {
    /// Race date (YYYY-MM-DD)
    #[arg(long)]
    race_date: Option<String>,
  },

  /// Show race readiness assessment with recommendations
  RacePrep {
    /// Race date (YYYY-MM-DD)
    #[arg(long)]
    date: String,
    /// Goal time (HH:MM:SS)
    #[arg(long)]
    goal: Option<String>,
  },

  /// Show actionable insights based on historical data
  Patterns {
    /// Weeks to analyze
    #[arg(short, long, default_value_t = DEFAULT_PATTERN_WEEKS, value_parser = clap::value_parser!(u32).range(1..))]
    weeks: u32,
  },

  /// Generate a complete daily coaching report
  DailyReport {
    /// Race date (YYYY-MM-DD)
    #[arg(long)]
    race_date: Option<String>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },
}

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CliError {
  #[error(transparent)]
  Garmin(#[from] GarminError),

  #[error(transparent)]
  Analysis(#[from] AnalysisError),

  #[error("Failed to serialize report: {0}")]
  Json(#[from] serde_json::Error),
}

/// ---------------------------------------------------------------------------
/// Dispatch
/// ---------------------------------------------------------------------------

/// Trailing days needed to cover `weeks` Monday-anchored weeks
fn days_for_weeks(weeks: u32) -> u32 {
  weeks.saturating_mul(7).saturating_add(7)
}

async fn recent_recovery_series(
  client: &GarminClient,
  days: u32,
  today: NaiveDate,
) -> Result<(Vec<SleepMetrics>, Vec<HrvMetrics>), GarminError> {
  let mut sleep = Vec::new();
  let mut hrv = Vec::new();
  for offset in 0..days {
    let day = today - Duration::days(offset as i64);
    sleep.push(client.get_sleep(day).await?);
    hrv.push(client.get_hrv(day).await?);
  }
  Ok((sleep, hrv))
}

pub async fn execute(cli: Cli, today: NaiveDate) -> Result<(), CliError> {
  let settings = CoachSettings::from_env();
  let zone_boundary = settings.effective_zone_boundary();
  tracing::debug!(command = ?cli.command, zone_boundary, %today, "Running command");

  match cli.command {
    Command::Activities { days } => {
      let client = GarminClient::from_env()?;
      let activities = client.get_activities(days, today).await?;
      println!("{}", render_activities(&activities, days));
    }

    Command::Activity { activity_id } => {
      let client = GarminClient::from_env()?;
      let details = client.get_activity_details(activity_id).await?;
      println!("{}", render_activity_details(activity_id, &details));
    }

    Command::Recovery { date } => {
      let day = parse_date_arg(date.as_deref(), today)?;
      let client = GarminClient::from_env()?;
      let snapshot = client.get_recovery(day).await?;
      println!("{}", render_recovery(&snapshot));
    }

    Command::Summary { weeks } => {
      let client = GarminClient::from_env()?;
      let activities = client.get_activities(days_for_weeks(weeks), today).await?;
      let trend = training_load_trend(&weekly_summary(&activities, weeks, today)?);
      println!("{}", render_summary(&trend, weeks));
    }

    Command::Polarization { weeks } => {
      let client = GarminClient::from_env()?;
      let activities = client.get_activities(days_for_weeks(weeks), today).await?;
      let report = polarization_analysis(&activities, weeks, zone_boundary, today)?;
      println!("{}", render_polarization(&report));
    }

    Command::Today { race_date } => {
      let race = race_date
        .as_deref()
        .map(|raw| parse_date_arg(Some(raw), today))
        .transpose()?;
      let client = GarminClient::from_env()?;

      let recovery = client.get_recovery(today).await?;
      let activities = client.get_activities(TODAY_LOOKBACK_DAYS, today).await?;
      let summaries = weekly_summary(&activities, TODAY_LOAD_WEEKS, today)?;
      let (current_miles, avg_miles) = recent_load(&summaries);

      let readiness = readiness_for(&recovery, current_miles, avg_miles);
      let days_since_hard = days_since_hard_effort(&activities, zone_boundary, today);
      let days_until_race = race.map(|r| (r - today).num_days());
      let workout = suggest_workout(readiness.score, days_since_hard, days_until_race, current_miles);

      println!("{}", render_today(&readiness, &workout, days_until_race));
    }

    Command::RacePrep { date, goal } => {
      let target = parse_date_arg(Some(date.as_str()), today)?;
      let goal_seconds = goal.as_deref().map(parse_time).transpose()?;
      let client = GarminClient::from_env()?;

      let activities = client.get_activities(RACE_LOOKBACK_DAYS, today).await?;
      let result = race_readiness(&activities, target, goal_seconds, today);
      println!("{}", render_race_readiness(&result));
    }

    Command::Patterns { weeks } => {
      let client = GarminClient::from_env()?;
      let activities = client.get_activities(days_for_weeks(weeks), today).await?;
      let recovery_days = PATTERN_RECOVERY_DAYS.min(weeks.saturating_mul(7));
      let (sleep, hrv) = recent_recovery_series(&client, recovery_days, today).await?;

      let insights = weekly_pattern_report(&activities, &sleep, &hrv, weeks, today)?;
      println!("{}", render_patterns(&insights, weeks));
    }

    Command::DailyReport { race_date, json } => {
      let race = race_date
        .as_deref()
        .map(|raw| parse_date_arg(Some(raw), today))
        .transpose()?;
      let client = GarminClient::from_env()?;

      let recovery = client.get_recovery(today).await?;
      let activities = client.get_activities(RACE_LOOKBACK_DAYS, today).await?;
      let (sleep, hrv) = recent_recovery_series(&client, REPORT_RECOVERY_DAYS, today).await?;

      let report = DailyReport::build(
        ReportInputs {
          activities: &activities,
          recovery,
          recent_sleep: &sleep,
          recent_hrv: &hrv,
          race_date: race,
          zone_boundary_hr: zone_boundary,
        },
        today,
      )?;

      if json {
        println!("{}", report.to_json()?);
      } else {
        println!("{}", render_daily_report(&report));
      }
    }
  }

  Ok(())
}

/// ---------------------------------------------------------------------------
/// Rendering
/// ---------------------------------------------------------------------------

fn whole(value: Option<f64>) -> String {
  value.map(|v| format!("{:.0}", v)).unwrap_or_else(|| "--".to_string())
}

pub fn render_activities(activities: &[Activity], days: u32) -> String {
  if activities.is_empty() {
    return "No activities found for the selected period.".to_string();
  }

  let mut lines = vec![
    format!("Activities (last {} days)", days),
    format!(
      "{:<10}  {:<18}  {:<30}  {:>9}  {:>10}",
      "Date", "Type", "Name", "Distance", "Pace"
    ),
  ];
  for a in activities {
    lines.push(format!(
      "{:<10}  {:<18}  {:<30}  {:>6.2} mi  {:>10}",
      a.date,
      a.activity_type,
      a.name,
      a.distance_miles(),
      format_pace(a.duration, a.distance)
    ));
  }
  lines.join("\n")
}

pub fn render_activity_details(activity_id: i64, details: &ActivityDetails) -> String {
  let mut lines = Vec::new();

  if let Some(summary) = &details.summary {
    lines.push(format!("Activity {}: {}", activity_id, summary.name));
    lines.push(format!("Distance: {:.2} mi", summary.distance / METERS_PER_MILE));
    lines.push(format!("Duration: {}", format_duration(summary.duration)));
    lines.push(format!(
      "Avg HR: {} bpm | Max HR: {} bpm",
      whole(summary.avg_hr),
      whole(summary.max_hr)
    ));
    lines.push(String::new());
  }

  if details.splits.is_empty() {
    lines.push("No split data available for this activity.".to_string());
    return lines.join("\n");
  }

  lines.push("Splits".to_string());
  lines.push(format!(
    "{:>3}  {:>9}  {:>8}  {:>10}  {:>6}  {:>6}",
    "Lap", "Distance", "Duration", "Pace", "Avg HR", "Max HR"
  ));
  for split in &details.splits {
    lines.push(format!(
      "{:>3}  {:>6.2} mi  {:>8}  {:>10}  {:>6}  {:>6}",
      split.lap,
      split.distance / METERS_PER_MILE,
      format_duration(split.duration),
      format_pace(split.duration, split.distance),
      whole(split.avg_hr),
      whole(split.max_hr)
    ));
  }
  lines.join("\n")
}

pub fn render_recovery(snapshot: &RecoverySnapshot) -> String {
  let battery = &snapshot.body_battery;
  [
    format!("Recovery Metrics for {}", snapshot.sleep.date),
    format!("Sleep Score:       {}", whole(snapshot.sleep.score)),
    format!(
      "Sleep Duration:    {}",
      format_duration(snapshot.sleep.duration_seconds.unwrap_or(0.0))
    ),
    format!("HRV (last night):  {} ms", whole(snapshot.hrv.last_night)),
    format!("HRV (weekly avg):  {} ms", whole(snapshot.hrv.weekly_avg)),
    format!(
      "HRV Status:        {}",
      snapshot.hrv.status.as_deref().unwrap_or("unknown")
    ),
    format!(
      "Body Battery:      {} (low: {}, high: {})",
      whole(battery.current),
      whole(battery.lowest),
      whole(battery.highest)
    ),
    format!("Avg Stress:        {}", whole(snapshot.stress.avg_stress)),
    format!("Max Stress:        {}", whole(snapshot.stress.max_stress)),
  ]
  .join("\n")
}

pub fn render_summary(trend: &[WeeklyTrend], weeks: u32) -> String {
  let mut lines = vec![
    format!("Weekly Summary (last {} weeks)", weeks),
    format!(
      "{:<10}  {:>4}  {:>6}  {:>8}  {:>7}  {}",
      "Week", "Runs", "Miles", "Time", "Change", "Status"
    ),
  ];

  for w in trend {
    let change = w.mileage_increase_pct;
    let (change_str, status) = if w.overload_flag {
      (format!("+{:.0}%", change), "OVERLOAD")
    } else if change > 0.0 {
      (format!("+{:.0}%", change), "OK")
    } else if change < 0.0 {
      (format!("{:.0}%", change), "down")
    } else {
      ("--".to_string(), "")
    };

    lines.push(
      format!(
        "{:<10}  {:>4}  {:>6.1}  {:>8}  {:>7}  {}",
        w.week.week_start,
        w.week.run_count,
        w.week.total_miles,
        format_duration(w.week.total_time_seconds),
        change_str,
        status
      )
      .trim_end()
      .to_string(),
    );
  }
  lines.join("\n")
}

pub fn render_polarization(report: &PolarizationReport) -> String {
  [
    format!("Polarization Analysis ({} weeks)", report.weeks_analyzed),
    String::new(),
    format!("Easy (Zone 1-2): {:.0}%", report.easy_pct),
    format!("Hard (Zone 3+):  {:.0}%", report.hard_pct),
    String::new(),
    "Target: 80% easy / 20% hard".to_string(),
    String::new(),
    report.recommendation.clone(),
  ]
  .join("\n")
}

fn render_workout(workout: &WorkoutSuggestion) -> Vec<String> {
  vec![
    format!("Today's Workout: {}", workout.kind.title()),
    workout.description.clone(),
    format!(
      "Duration: {} min | Intensity: {}",
      workout.duration_minutes,
      workout.intensity.as_str()
    ),
  ]
}

pub fn render_today(
  readiness: &ReadinessScore,
  workout: &WorkoutSuggestion,
  days_until_race: Option<i64>,
) -> String {
  let c = &readiness.components;
  let mut lines = vec![
    format!("Readiness: {} / 100", readiness.score),
    readiness.interpretation.clone(),
    String::new(),
    format!(
      "Components: Sleep {:.0} | HRV {:.0} | Battery {:.0} | Fatigue {:.0}",
      c.sleep, c.hrv, c.body_battery, c.fatigue
    ),
    String::new(),
  ];
  lines.extend(render_workout(workout));

  if let Some(days) = days_until_race {
    lines.push(String::new());
    lines.push(format!("Race in {} days", days));
  }
  lines.join("\n")
}

pub fn render_race_readiness(result: &RaceReadiness) -> String {
  let mut lines = vec![
    format!("Race Readiness: {} / 100", result.readiness_score),
    format!("Days until race: {}", result.days_until_race),
    String::new(),
    format!("Longest run: {:.1} mi", result.longest_run_miles),
    format!("Avg weekly mileage: {:.1} mi", result.avg_weekly_miles),
    format!("Total runs (8 wk): {}", result.total_runs_8wk),
  ];

  if let Some(predicted) = result.predicted_finish_seconds {
    lines.push(format!("Predicted finish: {}", format_duration(predicted as f64)));
  }
  if let Some(goal) = result.goal_time_seconds {
    lines.push(format!("Goal time: {}", format_duration(goal)));
  }

  if !result.gaps.is_empty() {
    lines.push(String::new());
    lines.push("Gaps to address:".to_string());
    lines.extend(result.gaps.iter().map(|gap| format!("  - {}", gap)));
  }
  lines.join("\n")
}

pub fn render_patterns(insights: &[String], weeks: u32) -> String {
  let mut lines = vec![format!("Training Patterns ({} weeks)", weeks), String::new()];
  lines.extend(insights.iter().map(|insight| format!("  - {}", insight)));
  lines.join("\n")
}

pub fn render_daily_report(report: &DailyReport) -> String {
  let rs = &report.readiness;
  let rec = &report.recovery;
  let load = &report.recent_load_summary;

  let mut lines = vec![
    format!("Daily Coaching Report: {}", report.date),
    String::new(),
    format!("Readiness: {} / 100 ({})", rs.score, rs.interpretation),
    format!(
      "Sleep: {} | HRV: {} ms | Battery: {} | Stress: {}",
      whole(rec.sleep.score),
      whole(rec.hrv.last_night),
      whole(rec.body_battery.current),
      whole(rec.stress.avg_stress)
    ),
    String::new(),
  ];
  lines.extend(render_workout(&report.todays_suggestion));
  lines.push(String::new());
  lines.push(format!(
    "This Week: {:.1} mi (avg: {:.1} mi/wk)",
    load.current_week_miles, load.avg_weekly_miles
  ));
  lines.push(format!(
    "Polarization: {:.0}% easy / {:.0}% hard",
    load.polarization.easy_pct, load.polarization.hard_pct
  ));

  if let Some(race) = &report.race_countdown {
    lines.push(String::new());
    lines.push(format!("Race in {} days", race.days_until_race));
    lines.push(format!(
      "  Readiness: {}/100 | Longest: {:.1} mi | Predicted: {}",
      race.readiness_score,
      race.longest_run_miles,
      format_duration(race.predicted_finish_seconds.unwrap_or(0) as f64)
    ));
    lines.extend(race.gaps.iter().map(|gap| format!("  - {}", gap)));
  }

  if !report.pattern_insights.is_empty() {
    lines.push(String::new());
    lines.push("Insights:".to_string());
    lines.extend(
      report
        .pattern_insights
        .iter()
        .take(REPORT_TEXT_INSIGHTS)
        .map(|insight| format!("  - {}", insight)),
    );
  }
  lines.join("\n")
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::coaching::{suggest_workout, WorkoutKind};
  use crate::models::{ActivitySummary, Split};
  use crate::test_utils::{mock_recovery, mock_run, test_today};
  use clap::CommandFactory;

  #[test]
  fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_parse_defaults() {
    let cli = Cli::try_parse_from(["zoidberg-coach", "activities"]).unwrap();
    assert!(matches!(cli.command, Command::Activities { days: 30 }));

    let cli = Cli::try_parse_from(["zoidberg-coach", "summary"]).unwrap();
    assert!(matches!(cli.command, Command::Summary { weeks: 8 }));

    let cli = Cli::try_parse_from(["zoidberg-coach", "polarization"]).unwrap();
    assert!(matches!(cli.command, Command::Polarization { weeks: 4 }));
  }

  #[test]
  fn test_parse_race_prep_and_report_flags() {
    let cli = Cli::try_parse_from([
      "zoidberg-coach",
      "race-prep",
      "--date",
      "2026-04-12",
      "--goal",
      "1:55:00",
    ])
    .unwrap();
    match cli.command {
      Command::RacePrep { date, goal } => {
        assert_eq!(date, "2026-04-12");
        assert_eq!(goal.as_deref(), Some("1:55:00"));
      }
      other => panic!("unexpected command: {:?}", other),
    }

    let cli = Cli::try_parse_from(["zoidberg-coach", "daily-report", "--json"]).unwrap();
    assert!(matches!(
      cli.command,
      Command::DailyReport { race_date: None, json: true }
    ));
  }

  #[test]
  fn test_counts_must_be_positive() {
    assert!(Cli::try_parse_from(["zoidberg-coach", "activities", "--days", "0"]).is_err());
    assert!(Cli::try_parse_from(["zoidberg-coach", "patterns", "-w", "0"]).is_err());
    assert!(Cli::try_parse_from(["zoidberg-coach", "race-prep"]).is_err());
  }

  #[test]
  fn test_days_for_weeks() {
    assert_eq!(days_for_weeks(8), 63);
    assert_eq!(days_for_weeks(u32::MAX), u32::MAX);
  }

  #[test]
  fn test_render_activities() {
    assert_eq!(
      render_activities(&[], 30),
      "No activities found for the selected period."
    );

    let out = render_activities(&[mock_run(test_today(), 1, 5.0, 40.0, 140.0)], 7);
    assert!(out.starts_with("Activities (last 7 days)"));
    assert!(out.contains("2026-02-13"));
    assert!(out.contains("5.00 mi"));
    assert!(out.contains("8:00 /mi"));
  }

  #[test]
  fn test_render_activity_details() {
    let details = ActivityDetails {
      summary: Some(ActivitySummary {
        name: "Long Run".to_string(),
        distance: 10.0 * METERS_PER_MILE,
        duration: 5400.0,
        avg_hr: Some(141.4),
        max_hr: None,
      }),
      splits: vec![Split {
        lap: 1,
        distance: METERS_PER_MILE,
        duration: 540.0,
        avg_hr: Some(139.0),
        max_hr: Some(150.0),
      }],
    };

    let out = render_activity_details(42, &details);
    assert!(out.contains("Activity 42: Long Run"));
    assert!(out.contains("Duration: 1:30:00"));
    assert!(out.contains("Avg HR: 141 bpm | Max HR: -- bpm"));
    assert!(out.contains("9:00 /mi"));

    let empty = render_activity_details(7, &ActivityDetails::default());
    assert_eq!(empty, "No split data available for this activity.");
  }

  #[test]
  fn test_render_recovery() {
    let out = render_recovery(&mock_recovery(test_today()));
    assert!(out.contains("Recovery Metrics for 2026-02-14"));
    assert!(out.contains("Sleep Score:       85"));
    assert!(out.contains("Sleep Duration:    7:30:00"));
    assert!(out.contains("Body Battery:      80 (low: 25, high: 92)"));

    let empty = render_recovery(&RecoverySnapshot::empty(test_today()));
    assert!(empty.contains("HRV Status:        unknown"));
    assert!(empty.contains("Sleep Duration:    0:00"));
  }

  #[test]
  fn test_render_summary_statuses() {
    let today = test_today();
    let activities = vec![
      mock_run(today, 0, 12.0, 120.0, 140.0),
      mock_run(today, 7, 10.0, 100.0, 140.0),
      mock_run(today, 14, 11.0, 110.0, 140.0),
    ];
    let trend = training_load_trend(&weekly_summary(&activities, 4, today).unwrap());
    let out = render_summary(&trend, 4);

    let rows: Vec<&str> = out.lines().skip(2).collect();
    assert_eq!(rows.len(), 4);
    assert!(rows[0].ends_with("+20%  OVERLOAD"));
    assert!(rows[1].ends_with("-9%  down"));
    assert!(rows[3].ends_with("--"));
  }

  #[test]
  fn test_render_today_with_race() {
    let readiness = ReadinessScore::compute(85.0, 55.0, 55.0, 80.0, 10.0, 20.0);
    let workout = suggest_workout(readiness.score, 4, Some(2), 10.0);
    assert_eq!(workout.kind, WorkoutKind::Shakeout);

    let out = render_today(&readiness, &workout, Some(2));
    assert!(out.contains("Today's Workout: Shakeout"));
    assert!(out.contains("Duration: 20 min | Intensity: easy"));
    assert!(out.ends_with("Race in 2 days"));
  }

  #[test]
  fn test_render_race_readiness_gaps() {
    let race = test_today() + Duration::days(30);
    let result = race_readiness(&[], race, Some(6900.0), test_today());
    let out = render_race_readiness(&result);

    assert!(out.contains("Days until race: 30"));
    assert!(out.contains("Goal time: 1:55:00"));
    assert!(!out.contains("Predicted finish"));
    assert!(out.contains("Gaps to address:"));
  }

  #[test]
  fn test_render_daily_report() {
    let today = test_today();
    let report = DailyReport::build(
      ReportInputs {
        activities: &[],
        recovery: mock_recovery(today),
        recent_sleep: &[],
        recent_hrv: &[],
        race_date: None,
        zone_boundary_hr: 152.0,
      },
      today,
    )
    .unwrap();

    let out = render_daily_report(&report);
    assert!(out.starts_with("Daily Coaching Report: 2026-02-14"));
    assert!(out.contains("Sleep: 85 | HRV: 55 ms | Battery: 80 | Stress: 28"));
    assert!(out.contains("This Week: 0.0 mi (avg: 0.0 mi/wk)"));
    assert!(!out.contains("Race in"));
  }
}
