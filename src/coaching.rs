//! Coaching logic: readiness scoring, workout suggestions, race readiness
//!
//! Recovery signals and recent load are reduced to a single readiness score,
//! which then drives a small decision table for today's workout. Race
//! readiness checks the last 8 weeks against half marathon benchmarks.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::analysis::round_to;
use crate::models::Activity;

pub const HALF_MARATHON_MILES: f64 = 13.1;
pub const RIEGEL_EXPONENT: f64 = 1.06;

/// Shortest run trusted as a basis for a race prediction
const MIN_PREDICTION_MILES: f64 = 3.0;

const RACE_LOOKBACK_WEEKS: i64 = 8;

/// Assumed when no hard run shows up in the history
const DEFAULT_DAYS_SINCE_HARD: i64 = 7;

/// ---------------------------------------------------------------------------
/// Readiness Score
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessLevel {
  Rest,
  EasyOnly,
  Normal,
  Ready,
}

impl ReadinessLevel {
  pub fn from_score(score: u8) -> Self {
    match score {
      s if s < 50 => ReadinessLevel::Rest,
      s if s < 70 => ReadinessLevel::EasyOnly,
      s if s < 85 => ReadinessLevel::Normal,
      _ => ReadinessLevel::Ready,
    }
  }

  pub fn interpretation(&self) -> &'static str {
    match self {
      ReadinessLevel::Rest => "Rest day recommended",
      ReadinessLevel::EasyOnly => "Easy effort only",
      ReadinessLevel::Normal => "Normal training",
      ReadinessLevel::Ready => "Ready for hard effort",
    }
  }
}

/// Weighted points per signal: sleep and HRV out of 30, body battery and
/// fatigue out of 20.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessComponents {
  pub sleep: f64,
  pub hrv: f64,
  pub body_battery: f64,
  pub fatigue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessScore {
  pub score: u8,
  pub level: ReadinessLevel,
  pub interpretation: String,
  pub components: ReadinessComponents,
}

impl ReadinessScore {
  /// Combine recovery signals and the recent load ratio into a 0-100 score.
  ///
  /// Missing baselines fall back to neutral values instead of failing: no
  /// weekly HRV average gives half of the HRV points, no mileage history
  /// gives a fatigue score of 50.
  pub fn compute(
    sleep_score: f64,
    hrv_last_night: f64,
    hrv_weekly_avg: f64,
    body_battery: f64,
    recent_load_miles: f64,
    avg_weekly_miles: f64,
  ) -> Self {
    let sleep = sleep_score.clamp(0.0, 100.0) * 0.30;

    let hrv = if hrv_weekly_avg > 0.0 {
      let ratio = (hrv_last_night / hrv_weekly_avg).clamp(0.0, 1.5);
      ratio / 1.5 * 100.0 * 0.30
    } else {
      15.0
    };

    let battery = body_battery.clamp(0.0, 100.0) * 0.20;

    let fatigue_score = if avg_weekly_miles > 0.0 {
      let load_ratio = recent_load_miles.max(0.0) / avg_weekly_miles;
      ((2.0 - load_ratio) / 2.0 * 100.0).clamp(0.0, 100.0)
    } else {
      50.0
    };
    let fatigue = fatigue_score * 0.20;

    let total = (sleep + hrv + battery + fatigue).round().clamp(0.0, 100.0);
    let score = total as u8;
    let level = ReadinessLevel::from_score(score);

    Self {
      score,
      level,
      interpretation: level.interpretation().to_string(),
      components: ReadinessComponents {
        sleep: round_to(sleep, 1),
        hrv: round_to(hrv, 1),
        body_battery: round_to(battery, 1),
        fatigue: round_to(fatigue, 1),
      },
    }
  }
}

/// ---------------------------------------------------------------------------
/// Workout Suggestion
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutKind {
  Rest,
  EasyRun,
  Tempo,
  Shakeout,
}

impl WorkoutKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      WorkoutKind::Rest => "rest",
      WorkoutKind::EasyRun => "easy_run",
      WorkoutKind::Tempo => "tempo",
      WorkoutKind::Shakeout => "shakeout",
    }
  }

  /// "Easy Run", "Tempo", ...
  pub fn title(&self) -> &'static str {
    match self {
      WorkoutKind::Rest => "Rest",
      WorkoutKind::EasyRun => "Easy Run",
      WorkoutKind::Tempo => "Tempo",
      WorkoutKind::Shakeout => "Shakeout",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intensity {
  #[serde(rename = "none")]
  None,
  #[serde(rename = "easy")]
  Easy,
  #[serde(rename = "moderate-hard")]
  ModerateHard,
}

impl Intensity {
  pub fn as_str(&self) -> &'static str {
    match self {
      Intensity::None => "none",
      Intensity::Easy => "easy",
      Intensity::ModerateHard => "moderate-hard",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSuggestion {
  #[serde(rename = "type")]
  pub kind: WorkoutKind,
  pub description: String,
  pub duration_minutes: u32,
  pub intensity: Intensity,
}

impl WorkoutSuggestion {
  fn new(kind: WorkoutKind, description: &str, duration_minutes: f64, intensity: Intensity) -> Self {
    Self {
      kind,
      description: description.to_string(),
      duration_minutes: duration_minutes.round().max(0.0) as u32,
      intensity,
    }
  }
}

/// Pick today's workout. Rules are checked in order and the first match wins:
/// low readiness, race taper, a due quality session, then a normal easy day.
pub fn suggest_workout(
  readiness: u8,
  days_since_hard: i64,
  days_until_race: Option<i64>,
  weekly_mileage: f64,
) -> WorkoutSuggestion {
  if readiness < 50 {
    return WorkoutSuggestion::new(
      WorkoutKind::Rest,
      "Rest day — your body needs recovery.",
      0.0,
      Intensity::None,
    );
  }

  if readiness < 70 {
    return WorkoutSuggestion::new(
      WorkoutKind::EasyRun,
      "Easy recovery run. Keep heart rate in Zone 1-2.",
      (weekly_mileage * 2.0).clamp(20.0, 45.0),
      Intensity::Easy,
    );
  }

  // Taper
  if let Some(days) = days_until_race.filter(|d| *d <= 14) {
    if days <= 3 {
      return WorkoutSuggestion::new(
        WorkoutKind::Shakeout,
        "Short shakeout run. Stay loose for race day.",
        20.0,
        Intensity::Easy,
      );
    }
    return WorkoutSuggestion::new(
      WorkoutKind::EasyRun,
      "Taper period — easy effort, reduced volume.",
      30.0,
      Intensity::Easy,
    );
  }

  if days_since_hard >= 3 {
    return WorkoutSuggestion::new(
      WorkoutKind::Tempo,
      "Tempo run or intervals. Push into Zone 3-4 for the main set.",
      (weekly_mileage * 2.5).clamp(30.0, 60.0),
      Intensity::ModerateHard,
    );
  }

  WorkoutSuggestion::new(
    WorkoutKind::EasyRun,
    "Standard easy run. Build aerobic base.",
    (weekly_mileage * 2.0).clamp(30.0, 50.0),
    Intensity::Easy,
  )
}

/// Days since the most recent run with average HR at or above the threshold.
/// Falls back to 7 when no such run exists.
pub fn days_since_hard_effort(activities: &[Activity], hr_threshold: f64, today: NaiveDate) -> i64 {
  activities
    .iter()
    .filter(|a| a.is_run())
    .filter(|a| a.heart_rate().is_some_and(|hr| hr >= hr_threshold))
    .filter_map(|a| a.parsed_date())
    .max()
    .map(|last_hard| (today - last_hard).num_days())
    .unwrap_or(DEFAULT_DAYS_SINCE_HARD)
}

/// ---------------------------------------------------------------------------
/// Race Readiness (half marathon)
/// ---------------------------------------------------------------------------

/// Riegel: T2 = T1 * (D2 / D1)^1.06
pub fn riegel_prediction(known_seconds: f64, known_miles: f64, target_miles: f64) -> f64 {
  known_seconds * (target_miles / known_miles).powf(RIEGEL_EXPONENT)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceReadiness {
  pub target_date: NaiveDate,
  pub days_until_race: i64,
  pub longest_run_miles: f64,
  pub avg_weekly_miles: f64,
  pub total_runs_8wk: u32,
  pub predicted_finish_seconds: Option<i64>,
  pub readiness_score: u8,
  pub gaps: Vec<String>,
  pub goal_time_seconds: Option<f64>,
}

/// Assess half marathon readiness from the trailing 8 weeks of runs.
pub fn race_readiness(
  activities: &[Activity],
  target_date: NaiveDate,
  goal_time_seconds: Option<f64>,
  today: NaiveDate,
) -> RaceReadiness {
  let days_until_race = (target_date - today).num_days();
  let cutoff = today - Duration::weeks(RACE_LOOKBACK_WEEKS);

  let runs: Vec<(&Activity, NaiveDate)> = activities
    .iter()
    .filter(|a| a.is_run())
    .filter_map(|a| a.parsed_date().map(|d| (a, d)))
    .filter(|(_, d)| *d >= cutoff)
    .collect();

  let longest_miles = runs
    .iter()
    .map(|(a, _)| a.distance_miles())
    .fold(0.0, f64::max);

  // Last 4 full 7-day blocks ending yesterday
  let weekly_miles: Vec<f64> = (0..4)
    .map(|w| {
      let start = today - Duration::weeks(w + 1);
      let end = start + Duration::days(6);
      runs
        .iter()
        .filter(|(_, d)| *d >= start && *d <= end)
        .map(|(a, _)| a.distance_miles())
        .sum()
    })
    .collect();
  let avg_weekly = weekly_miles.iter().sum::<f64>() / weekly_miles.len() as f64;

  // Best pace over a meaningful distance is the prediction basis
  let mut best: Option<(f64, f64, f64)> = None; // (pace, miles, seconds)
  for (a, _) in &runs {
    let miles = a.distance_miles();
    if miles < MIN_PREDICTION_MILES || a.duration <= 0.0 {
      continue;
    }
    let pace = a.duration / miles;
    if best.map_or(true, |(best_pace, _, _)| pace < best_pace) {
      best = Some((pace, miles, a.duration));
    }
  }
  let predicted_finish_seconds = best
    .map(|(_, miles, seconds)| riegel_prediction(seconds, miles, HALF_MARATHON_MILES).round() as i64);

  let run_count = runs.len() as u32;

  let mut gaps = Vec::new();
  if longest_miles < 10.0 {
    gaps.push(format!(
      "Need more long runs (longest: {:.1} mi, target: 10+ mi)",
      longest_miles
    ));
  }
  if avg_weekly < 15.0 {
    gaps.push(format!(
      "Weekly mileage too low (avg: {:.1} mi, target: 15+ mi)",
      avg_weekly
    ));
  }
  if run_count < 12 {
    gaps.push(format!("Inconsistent training (only {} runs in 8 weeks)", run_count));
  }

  let mut score: u32 = 0;
  score += match longest_miles {
    m if m >= 10.0 => 35,
    m if m >= 8.0 => 20,
    _ => 0,
  };
  score += match avg_weekly {
    m if m >= 20.0 => 35,
    m if m >= 15.0 => 20,
    _ => 0,
  };
  score += match run_count {
    n if n >= 20 => 30,
    n if n >= 12 => 15,
    _ => 0,
  };

  RaceReadiness {
    target_date,
    days_until_race,
    longest_run_miles: round_to(longest_miles, 1),
    avg_weekly_miles: round_to(avg_weekly, 1),
    total_runs_8wk: run_count,
    predicted_finish_seconds,
    readiness_score: score.min(100) as u8,
    gaps,
    goal_time_seconds,
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
