//! Athlete settings read from the environment

use std::env;

use crate::analysis::DEFAULT_ZONE_BOUNDARY_HR;

const MAX_HR_VAR: &str = "COACH_MAX_HR";
const ZONE_BOUNDARY_VAR: &str = "COACH_ZONE_BOUNDARY_HR";

/// Fraction of max HR used as the easy/hard boundary when none is set
const BOUNDARY_FRACTION_OF_MAX: f64 = 0.8;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoachSettings {
  pub max_hr: Option<f64>,
  pub zone_boundary_hr: Option<f64>,
}

impl CoachSettings {
  /// Read settings from the environment. Unset variables stay `None`;
  /// values that are not positive numbers are logged and ignored.
  pub fn from_env() -> Self {
    Self {
      max_hr: read_heart_rate(MAX_HR_VAR),
      zone_boundary_hr: read_heart_rate(ZONE_BOUNDARY_VAR),
    }
  }

  /// Easy/hard boundary, falling back to 80% of max HR, then the 152 bpm default
  pub fn effective_zone_boundary(&self) -> f64 {
    self
      .zone_boundary_hr
      .or_else(|| self.max_hr.map(|m| m * BOUNDARY_FRACTION_OF_MAX))
      .unwrap_or(DEFAULT_ZONE_BOUNDARY_HR)
  }
}

fn read_heart_rate(name: &str) -> Option<f64> {
  let raw = env::var(name).ok()?;
  match raw.trim().parse::<f64>() {
    Ok(value) if value.is_finite() && value > 0.0 => Some(value),
    _ => {
      tracing::warn!(variable = name, value = %raw, "Ignoring invalid heart rate setting");
      None
    }
  }
}
