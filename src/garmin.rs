//! Garmin Connect integration
//!
//! Reads a saved garth session (the OAuth2 bearer token), fetches raw
//! activity and wellness payloads from the Connect API and normalizes them
//! into the typed records in `models`. Missing wellness data for a day comes
//! back as an all-`None` record rather than an error.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{Days, NaiveDate, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::OnceCell;
use url::Url;

use crate::models::{
  Activity, ActivityDetails, ActivitySummary, BodyBattery, HrvMetrics, RecoverySnapshot,
  SleepMetrics, Split, StressMetrics,
};

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const DEFAULT_DOMAIN: &str = "garmin.com";
const DEFAULT_TOKEN_DIR: &str = ".garth";
const OAUTH2_TOKEN_FILE: &str = "oauth2_token.json";
const USER_AGENT: &str = "GCM-iOS-5.7.2.1";

const ACTIVITY_SEARCH_ENDPOINT: &str = "/activitylist-service/activities/search/activities";
const ACTIVITY_PAGE_LIMIT: u32 = 200;

pub const DEFAULT_ACTIVITY_DAYS: u32 = 30;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum GarminError {
  #[error(
    "Unable to authenticate with Garmin Connect. Run `garth login` or set GARTH_TOKEN. Details: {0}"
  )]
  Authentication(String),

  #[error("HTTP request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("Garmin API error: {0}")]
  Api(String),

  #[error("Failed to parse Garmin response: {0}")]
  Parse(String),

  #[error("Invalid parameter: {0}")]
  InvalidParameter(String),
}

/// ---------------------------------------------------------------------------
/// Session / Token Loading
/// ---------------------------------------------------------------------------

/// The part of a garth OAuth2 token we need
#[derive(Debug, Clone, Deserialize)]
struct OAuth2Token {
  access_token: String,
  /// Unix seconds
  #[serde(default)]
  expires_at: Option<i64>,
}

impl OAuth2Token {
  fn is_expired(&self) -> bool {
    self
      .expires_at
      .map(|at| at <= Utc::now().timestamp())
      .unwrap_or(false)
  }
}

#[derive(Debug, Clone)]
pub struct GarminConfig {
  pub access_token: String,
  pub api_base: String,
}

impl GarminConfig {
  /// Resolve credentials and the API host.
  ///
  /// `GARTH_TOKEN` (base64 garth session) wins over the token directory
  /// (`GARTH_HOME`, default `~/.garth`). `GARMIN_API_BASE` overrides the host
  /// derived from `GARMIN_DOMAIN`.
  pub fn from_env() -> Result<Self, GarminError> {
    let token = match env::var("GARTH_TOKEN") {
      Ok(encoded) if !encoded.trim().is_empty() => {
        tracing::debug!("Using Garmin session from GARTH_TOKEN");
        parse_session_token(&encoded)?
      }
      _ => {
        let dir = token_dir()?;
        tracing::debug!(path = %dir.display(), "Using Garmin session from token directory");
        load_token_dir(&dir)?
      }
    };

    if token.is_expired() {
      return Err(GarminError::Authentication(
        "saved OAuth2 token has expired".into(),
      ));
    }

    Ok(Self {
      access_token: token.access_token,
      api_base: api_base_from_env()?,
    })
  }
}

fn api_base_from_env() -> Result<String, GarminError> {
  let base = match env::var("GARMIN_API_BASE") {
    Ok(base) if !base.trim().is_empty() => base.trim().trim_end_matches('/').to_string(),
    _ => {
      let domain = env::var("GARMIN_DOMAIN").unwrap_or_else(|_| DEFAULT_DOMAIN.to_string());
      format!("https://connectapi.{}", domain.trim())
    }
  };

  Url::parse(&base)
    .map_err(|e| GarminError::InvalidParameter(format!("invalid Garmin API base {}: {}", base, e)))?;
  Ok(base)
}

fn token_dir() -> Result<PathBuf, GarminError> {
  if let Ok(home) = env::var("GARTH_HOME") {
    if !home.trim().is_empty() {
      return Ok(PathBuf::from(home.trim()));
    }
  }
  dirs::home_dir()
    .map(|home| home.join(DEFAULT_TOKEN_DIR))
    .ok_or_else(|| GarminError::Authentication("could not locate home directory".into()))
}

/// Decode a garth session string: base64 of `[oauth1, oauth2]` JSON
fn parse_session_token(encoded: &str) -> Result<OAuth2Token, GarminError> {
  let bytes = STANDARD
    .decode(encoded.trim())
    .map_err(|e| GarminError::Authentication(format!("GARTH_TOKEN is not valid base64: {}", e)))?;

  let session: Vec<Value> = serde_json::from_slice(&bytes)
    .map_err(|e| GarminError::Authentication(format!("GARTH_TOKEN is not a garth session: {}", e)))?;

  let oauth2 = session
    .into_iter()
    .nth(1)
    .ok_or_else(|| GarminError::Authentication("GARTH_TOKEN has no OAuth2 token".into()))?;

  serde_json::from_value(oauth2)
    .map_err(|e| GarminError::Authentication(format!("GARTH_TOKEN OAuth2 token is invalid: {}", e)))
}

fn load_token_dir(dir: &Path) -> Result<OAuth2Token, GarminError> {
  let path = dir.join(OAUTH2_TOKEN_FILE);
  let raw = fs::read_to_string(&path)
    .map_err(|e| GarminError::Authentication(format!("{}: {}", path.display(), e)))?;

  serde_json::from_str(&raw)
    .map_err(|e| GarminError::Authentication(format!("{}: {}", path.display(), e)))
}

/// ---------------------------------------------------------------------------
/// Raw API Payloads
/// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GarminActivity {
  #[serde(default)]
  activity_id: Option<i64>,
  #[serde(default)]
  activity_name: Option<String>,
  /// Normally `{"typeKey": ...}`; anything else maps to "unknown"
  #[serde(default)]
  activity_type: Option<Value>,
  #[serde(default)]
  start_time_local: Option<String>,
  #[serde(default)]
  distance: Option<f64>,
  #[serde(default)]
  duration: Option<f64>,
  #[serde(rename = "averageHR", default)]
  average_hr: Option<f64>,
  #[serde(rename = "maxHR", default)]
  max_hr: Option<f64>,
}

impl GarminActivity {
  /// `None` when the start time is missing or not a date
  fn normalize(self) -> Option<Activity> {
    let start = self.start_time_local?;
    let date = start.get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;

    Some(Activity {
      id: self.activity_id.unwrap_or(0),
      name: self
        .activity_name
        .unwrap_or_else(|| "Unnamed Activity".to_string()),
      activity_type: self
        .activity_type
        .as_ref()
        .and_then(|t| t.get("typeKey"))
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string(),
      date: date.to_string(),
      distance: self.distance.unwrap_or(0.0),
      duration: self.duration.unwrap_or(0.0),
      avg_hr: self.average_hr,
      max_hr: self.max_hr,
    })
  }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GarminLap {
  #[serde(default)]
  distance: Option<f64>,
  #[serde(default)]
  duration: Option<f64>,
  #[serde(rename = "averageHR", default)]
  average_hr: Option<f64>,
  #[serde(rename = "maxHR", default)]
  max_hr: Option<f64>,
}

fn number_at(value: &Value, pointer: &str) -> Option<f64> {
  value.pointer(pointer).and_then(Value::as_f64)
}

/// ---------------------------------------------------------------------------
/// Client
/// ---------------------------------------------------------------------------

pub struct GarminClient {
  client: Client,
  config: GarminConfig,
  display_name: OnceCell<String>,
}

impl GarminClient {
  pub fn new(config: GarminConfig) -> Self {
    Self {
      client: Client::new(),
      config,
      display_name: OnceCell::new(),
    }
  }

  pub fn from_env() -> Result<Self, GarminError> {
    Ok(Self::new(GarminConfig::from_env()?))
  }

  /// GET a Connect API path. `Ok(None)` means "no data" (204, 404 or an empty body).
  async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Option<Value>, GarminError> {
    let url = format!("{}{}", self.config.api_base, path);
    tracing::debug!(%url, "Garmin request");

    let response = self
      .client
      .get(&url)
      .query(query)
      .header("Authorization", format!("Bearer {}", self.config.access_token))
      .header("User-Agent", USER_AGENT)
      .send()
      .await?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
      return Err(GarminError::Authentication(format!(
        "Garmin rejected the token ({})",
        status
      )));
    }

    if status == StatusCode::NO_CONTENT || status == StatusCode::NOT_FOUND {
      tracing::debug!(path, %status, "No data");
      return Ok(None);
    }

    if !status.is_success() {
      let error_text = response.text().await.unwrap_or_default();
      return Err(GarminError::Api(format!(
        "{} returned {}: {}",
        path,
        status,
        error_text.chars().take(200).collect::<String>()
      )));
    }

    let body = response.text().await?;
    if body.trim().is_empty() {
      return Ok(None);
    }

    serde_json::from_str(&body).map(Some).map_err(|e| {
      tracing::warn!(
        path,
        error = %e,
        "Unparseable Garmin response (first 500 chars): {}",
        body.chars().take(500).collect::<String>()
      );
      GarminError::Parse(format!("{}: {}", path, e))
    })
  }

  /// ---------------------------------------------------------------------------
  /// Activities
  /// ---------------------------------------------------------------------------

  /// Fetch the latest activities and keep those dated within the trailing `days`.
  pub async fn get_activities(&self, days: u32, today: NaiveDate) -> Result<Vec<Activity>, GarminError> {
    if days == 0 {
      return Err(GarminError::InvalidParameter(
        "days must be a positive integer".into(),
      ));
    }
    let cutoff = today
      .checked_sub_days(Days::new(u64::from(days)))
      .ok_or_else(|| {
        GarminError::InvalidParameter("days reaches past the earliest supported date".into())
      })?;

    let response = self
      .get_json(
        ACTIVITY_SEARCH_ENDPOINT,
        &[
          ("limit", ACTIVITY_PAGE_LIMIT.to_string()),
          ("start", "0".to_string()),
        ],
      )
      .await?;

    let entries = match response {
      None => return Ok(Vec::new()),
      Some(Value::Array(entries)) => entries,
      Some(_) => {
        return Err(GarminError::Parse(
          "Garmin activity response was not a list".into(),
        ))
      }
    };

    let total = entries.len();

    let activities: Vec<Activity> = entries
      .into_iter()
      .filter_map(|entry| match serde_json::from_value::<GarminActivity>(entry) {
        Ok(raw) => raw.normalize(),
        Err(e) => {
          tracing::debug!(error = %e, "Skipping malformed activity");
          None
        }
      })
      .filter(|a| a.parsed_date().map(|d| d >= cutoff).unwrap_or(false))
      .collect();

    tracing::info!(
      fetched = total,
      kept = activities.len(),
      days,
      "Loaded Garmin activities"
    );
    Ok(activities)
  }

  /// Summary and lap splits for one activity
  pub async fn get_activity_details(&self, activity_id: i64) -> Result<ActivityDetails, GarminError> {
    let summary = self
      .get_json(&format!("/activity-service/activity/{}", activity_id), &[])
      .await?
      .map(|value| ActivitySummary {
        name: value
          .get("activityName")
          .and_then(Value::as_str)
          .unwrap_or("Activity")
          .to_string(),
        distance: number_at(&value, "/summaryDTO/distance").unwrap_or(0.0),
        duration: number_at(&value, "/summaryDTO/duration").unwrap_or(0.0),
        avg_hr: number_at(&value, "/summaryDTO/averageHR"),
        max_hr: number_at(&value, "/summaryDTO/maxHR"),
      });

    let splits = self
      .get_json(&format!("/activity-service/activity/{}/splits", activity_id), &[])
      .await?
      .and_then(|value| value.get("lapDTOs").cloned())
      .and_then(|laps| laps.as_array().cloned())
      .unwrap_or_default()
      .into_iter()
      .enumerate()
      .map(|(i, lap)| {
        let lap: GarminLap = serde_json::from_value(lap).unwrap_or_default();
        Split {
          lap: i as u32 + 1,
          distance: lap.distance.unwrap_or(0.0),
          duration: lap.duration.unwrap_or(0.0),
          avg_hr: lap.average_hr,
          max_hr: lap.max_hr,
        }
      })
      .collect();

    Ok(ActivityDetails { summary, splits })
  }

  /// ---------------------------------------------------------------------------
  /// Wellness
  /// ---------------------------------------------------------------------------

  async fn display_name(&self) -> Result<&str, GarminError> {
    let name = self
      .display_name
      .get_or_try_init(|| async {
        let profile = self
          .get_json("/userprofile-service/socialProfile", &[])
          .await?
          .ok_or_else(|| GarminError::Api("social profile not found".into()))?;

        profile
          .get("displayName")
          .and_then(Value::as_str)
          .map(str::to_string)
          .ok_or_else(|| GarminError::Parse("social profile has no displayName".into()))
      })
      .await?;
    Ok(name.as_str())
  }

  pub async fn get_sleep(&self, date: NaiveDate) -> Result<SleepMetrics, GarminError> {
    let display_name = self.display_name().await?.to_string();
    let payload = self
      .get_json(
        &format!("/wellness-service/wellness/dailySleepData/{}", display_name),
        &[
          ("date", date.to_string()),
          ("nonSleepBufferMinutes", "60".to_string()),
        ],
      )
      .await?;

    Ok(match payload {
      Some(value) => SleepMetrics {
        date,
        score: number_at(&value, "/dailySleepDTO/sleepScores/overall/value"),
        duration_seconds: number_at(&value, "/dailySleepDTO/sleepTimeSeconds"),
      },
      None => SleepMetrics::empty(date),
    })
  }

  pub async fn get_hrv(&self, date: NaiveDate) -> Result<HrvMetrics, GarminError> {
    let payload = self
      .get_json(&format!("/hrv-service/hrv/{}", date), &[])
      .await?;

    Ok(match payload {
      Some(value) => HrvMetrics {
        date,
        last_night: number_at(&value, "/hrvSummary/lastNightAvg"),
        weekly_avg: number_at(&value, "/hrvSummary/weeklyAvg"),
        status: value
          .pointer("/hrvSummary/status")
          .and_then(Value::as_str)
          .map(str::to_string),
      },
      None => HrvMetrics::empty(date),
    })
  }

  pub async fn get_body_battery(&self, date: NaiveDate) -> Result<BodyBattery, GarminError> {
    let payload = self
      .get_json(
        "/wellness-service/wellness/bodyBattery/reports/daily",
        &[("startDate", date.to_string()), ("endDate", date.to_string())],
      )
      .await?;

    // [[timestamp, level], ...]; levels can be null for gaps
    let levels: Vec<f64> = payload
      .as_ref()
      .and_then(|value| value.pointer("/0/bodyBatteryValuesArray"))
      .and_then(Value::as_array)
      .map(|samples| {
        samples
          .iter()
          .filter_map(|sample| sample.get(1).and_then(Value::as_f64))
          .collect()
      })
      .unwrap_or_default();

    Ok(BodyBattery::from_samples(date, &levels))
  }

  pub async fn get_stress(&self, date: NaiveDate) -> Result<StressMetrics, GarminError> {
    let payload = self
      .get_json(&format!("/wellness-service/wellness/dailyStress/{}", date), &[])
      .await?;

    // Negative levels are Garmin's "not enough data" markers
    let level = |value: &Value, key: &str| {
      value
        .get(key)
        .and_then(Value::as_f64)
        .filter(|v| *v >= 0.0)
    };

    Ok(match payload {
      Some(value) => StressMetrics {
        date,
        avg_stress: level(&value, "avgStressLevel"),
        max_stress: level(&value, "maxStressLevel"),
      },
      None => StressMetrics::empty(date),
    })
  }

  /// All recovery signals for one day
  pub async fn get_recovery(&self, date: NaiveDate) -> Result<RecoverySnapshot, GarminError> {
    Ok(RecoverySnapshot {
      sleep: self.get_sleep(date).await?,
      hrv: self.get_hrv(date).await?,
      body_battery: self.get_body_battery(date).await?,
      stress: self.get_stress(date).await?,
    })
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::test_today;
  use mockito::Matcher;
  use serial_test::serial;

  const TOKEN: &str = "test-access-token";

  fn test_client(server: &mockito::Server) -> GarminClient {
    GarminClient::new(GarminConfig {
      access_token: TOKEN.to_string(),
      api_base: server.url(),
    })
  }

  fn session_token(expires_at: i64) -> String {
    let session = serde_json::json!([
      { "oauth_token": "oauth1", "oauth_token_secret": "secret" },
      { "access_token": "from-session", "token_type": "Bearer", "expires_at": expires_at }
    ]);
    STANDARD.encode(session.to_string())
  }

  /// ---------------------------------------------------------------------------
  /// Config
  /// ---------------------------------------------------------------------------

  #[test]
  #[serial]
  fn test_config_from_session_token() {
    temp_env::with_vars(
      [
        ("GARTH_TOKEN", Some(session_token(4_102_444_800).as_str())),
        ("GARMIN_DOMAIN", None),
        ("GARMIN_API_BASE", None),
      ],
      || {
        let config = GarminConfig::from_env().unwrap();
        assert_eq!(config.access_token, "from-session");
        assert_eq!(config.api_base, "https://connectapi.garmin.com");
      },
    );
  }

  #[test]
  #[serial]
  fn test_config_domain_and_base_override() {
    let token = session_token(4_102_444_800);
    temp_env::with_vars(
      [
        ("GARTH_TOKEN", Some(token.as_str())),
        ("GARMIN_DOMAIN", Some("garmin.cn")),
        ("GARMIN_API_BASE", None),
      ],
      || {
        assert_eq!(GarminConfig::from_env().unwrap().api_base, "https://connectapi.garmin.cn");
      },
    );
    temp_env::with_vars(
      [
        ("GARTH_TOKEN", Some(token.as_str())),
        ("GARMIN_API_BASE", Some("http://127.0.0.1:9999/")),
      ],
      || {
        assert_eq!(GarminConfig::from_env().unwrap().api_base, "http://127.0.0.1:9999");
      },
    );
  }

  #[test]
  #[serial]
  fn test_config_rejects_invalid_api_base() {
    temp_env::with_vars(
      [
        ("GARTH_TOKEN", Some(session_token(4_102_444_800).as_str())),
        ("GARMIN_API_BASE", Some("not a url")),
      ],
      || {
        assert!(matches!(
          GarminConfig::from_env(),
          Err(GarminError::InvalidParameter(_))
        ));
      },
    );
  }

  #[test]
  #[serial]
  fn test_config_rejects_expired_session() {
    temp_env::with_var("GARTH_TOKEN", Some(session_token(1_000_000_000)), || {
      let err = GarminConfig::from_env().unwrap_err();
      assert!(matches!(err, GarminError::Authentication(_)));
    });
  }

  #[test]
  #[serial]
  fn test_config_rejects_garbage_session() {
    temp_env::with_var("GARTH_TOKEN", Some("not base64!!"), || {
      assert!(matches!(
        GarminConfig::from_env(),
        Err(GarminError::Authentication(_))
      ));
    });
  }

  #[test]
  #[serial]
  fn test_config_from_token_directory() {
    let dir = env::temp_dir().join(format!("zoidberg-garth-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    fs::write(
      dir.join(OAUTH2_TOKEN_FILE),
      r#"{"access_token": "from-file", "expires_at": 4102444800}"#,
    )
    .unwrap();

    temp_env::with_vars(
      [
        ("GARTH_TOKEN", None),
        ("GARTH_HOME", Some(dir.to_str().unwrap())),
        ("GARMIN_API_BASE", None),
      ],
      || {
        assert_eq!(GarminConfig::from_env().unwrap().access_token, "from-file");
      },
    );

    fs::remove_dir_all(&dir).ok();
  }

  #[test]
  #[serial]
  fn test_config_missing_token_directory() {
    temp_env::with_vars(
      [
        ("GARTH_TOKEN", None),
        ("GARTH_HOME", Some("/nonexistent/zoidberg-garth")),
      ],
      || {
        assert!(matches!(
          GarminConfig::from_env(),
          Err(GarminError::Authentication(_))
        ));
      },
    );
  }

  /// ---------------------------------------------------------------------------
  /// Activities
  /// ---------------------------------------------------------------------------

  #[tokio::test]
  async fn test_get_activities_normalizes_and_filters() {
    let mut server = mockito::Server::new_async().await;
    let body = serde_json::json!([
      {
        "activityId": 101,
        "activityName": "Morning Run",
        "activityType": { "typeKey": "running" },
        "startTimeLocal": "2026-02-13 06:30:00",
        "distance": 8046.72,
        "duration": 2400.0,
        "averageHR": 142.0,
        "maxHR": 160.0
      },
      {
        "activityId": 102,
        "activityType": "not-an-object",
        "startTimeLocal": "2026-02-12 07:00:00"
      },
      {
        "activityId": 103,
        "activityName": "No start"
      },
      {
        "activityId": 104,
        "activityName": "Ancient",
        "activityType": { "typeKey": "running" },
        "startTimeLocal": "2025-06-01 07:00:00",
        "distance": 5000.0,
        "duration": 1500.0
      },
      {
        "activityId": 105,
        "startTimeLocal": "2026-02-10 18:00:00",
        "distance": 20000.0,
        "duration": 3600.0
      }
    ]);

    let mock = server
      .mock("GET", ACTIVITY_SEARCH_ENDPOINT)
      .match_query(Matcher::AllOf(vec![
        Matcher::UrlEncoded("limit".into(), "200".into()),
        Matcher::UrlEncoded("start".into(), "0".into()),
      ]))
      .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(body.to_string())
      .create_async()
      .await;

    let activities = test_client(&server)
      .get_activities(30, test_today())
      .await
      .unwrap();

    mock.assert_async().await;
    let ids: Vec<i64> = activities.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![101, 102, 105]);

    let run = &activities[0];
    assert_eq!(run.name, "Morning Run");
    assert_eq!(run.activity_type, "running");
    assert_eq!(run.date, "2026-02-13");
    assert_eq!(run.avg_hr, Some(142.0));

    assert_eq!(activities[1].activity_type, "unknown");
    assert_eq!(activities[1].distance, 0.0);

    let unnamed = &activities[2];
    assert_eq!(unnamed.name, "Unnamed Activity");
    assert_eq!(unnamed.activity_type, "unknown");
    assert_eq!(unnamed.avg_hr, None);
  }

  #[tokio::test]
  async fn test_get_activities_rejects_zero_days() {
    let server = mockito::Server::new_async().await;
    let result = test_client(&server).get_activities(0, test_today()).await;
    assert!(matches!(result, Err(GarminError::InvalidParameter(_))));
  }

  #[tokio::test]
  async fn test_get_activities_rejects_window_past_calendar() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("GET", ACTIVITY_SEARCH_ENDPOINT)
      .match_query(mockito::Matcher::Any)
      .with_status(200)
      .with_body("[]")
      .expect(0)
      .create_async()
      .await;

    let result = test_client(&server).get_activities(u32::MAX, test_today()).await;

    assert!(matches!(result, Err(GarminError::InvalidParameter(_))));
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_get_activities_unauthorized() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", ACTIVITY_SEARCH_ENDPOINT)
      .match_query(Matcher::Any)
      .with_status(401)
      .create_async()
      .await;

    let result = test_client(&server).get_activities(30, test_today()).await;
    assert!(matches!(result, Err(GarminError::Authentication(_))));
  }

  #[tokio::test]
  async fn test_get_activities_server_error() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", ACTIVITY_SEARCH_ENDPOINT)
      .match_query(Matcher::Any)
      .with_status(500)
      .with_body("boom")
      .create_async()
      .await;

    let result = test_client(&server).get_activities(30, test_today()).await;
    assert!(matches!(result, Err(GarminError::Api(_))));
  }

  #[tokio::test]
  async fn test_get_activities_non_list_payload() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", ACTIVITY_SEARCH_ENDPOINT)
      .match_query(Matcher::Any)
      .with_status(200)
      .with_body(r#"{"error": "unexpected"}"#)
      .create_async()
      .await;

    let result = test_client(&server).get_activities(30, test_today()).await;
    assert!(matches!(result, Err(GarminError::Parse(_))));
  }

  #[tokio::test]
  async fn test_get_activity_details() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/activity-service/activity/42")
      .with_status(200)
      .with_body(
        serde_json::json!({
          "activityName": "Tempo Tuesday",
          "summaryDTO": { "distance": 8046.72, "duration": 2520.0, "averageHR": 158.0, "maxHR": 171.0 }
        })
        .to_string(),
      )
      .create_async()
      .await;
    server
      .mock("GET", "/activity-service/activity/42/splits")
      .with_status(200)
      .with_body(
        serde_json::json!({
          "lapDTOs": [
            { "distance": 1609.344, "duration": 510.0, "averageHR": 150.0, "maxHR": 160.0 },
            { "distance": 1609.344, "duration": 495.0, "averageHR": 161.0 }
          ]
        })
        .to_string(),
      )
      .create_async()
      .await;

    let details = test_client(&server).get_activity_details(42).await.unwrap();

    let summary = details.summary.unwrap();
    assert_eq!(summary.name, "Tempo Tuesday");
    assert_eq!(summary.duration, 2520.0);
    assert_eq!(summary.avg_hr, Some(158.0));

    assert_eq!(details.splits.len(), 2);
    assert_eq!(details.splits[0].lap, 1);
    assert_eq!(details.splits[1].lap, 2);
    assert_eq!(details.splits[1].max_hr, None);
  }

  /// ---------------------------------------------------------------------------
  /// Wellness
  /// ---------------------------------------------------------------------------

  #[tokio::test]
  async fn test_get_sleep_uses_display_name() {
    let mut server = mockito::Server::new_async().await;
    let profile = server
      .mock("GET", "/userprofile-service/socialProfile")
      .with_status(200)
      .with_body(r#"{"displayName": "runner42"}"#)
      .expect(1)
      .create_async()
      .await;
    server
      .mock("GET", "/wellness-service/wellness/dailySleepData/runner42")
      .match_query(Matcher::UrlEncoded("date".into(), "2026-02-14".into()))
      .with_status(200)
      .with_body(
        serde_json::json!({
          "dailySleepDTO": {
            "sleepTimeSeconds": 27000,
            "sleepScores": { "overall": { "value": 82 } }
          }
        })
        .to_string(),
      )
      .expect(2)
      .create_async()
      .await;

    let client = test_client(&server);
    let sleep = client.get_sleep(test_today()).await.unwrap();
    client.get_sleep(test_today()).await.unwrap();

    // Profile is looked up once per client
    profile.assert_async().await;
    assert_eq!(sleep.score, Some(82.0));
    assert_eq!(sleep.duration_seconds, Some(27000.0));
  }

  #[tokio::test]
  async fn test_get_hrv() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/hrv-service/hrv/2026-02-14")
      .with_status(200)
      .with_body(
        r#"{"hrvSummary": {"lastNightAvg": 48, "weeklyAvg": 52, "status": "BALANCED"}}"#,
      )
      .create_async()
      .await;

    let hrv = test_client(&server).get_hrv(test_today()).await.unwrap();
    assert_eq!(hrv.last_night, Some(48.0));
    assert_eq!(hrv.weekly_avg, Some(52.0));
    assert_eq!(hrv.status.as_deref(), Some("BALANCED"));
  }

  #[tokio::test]
  async fn test_missing_hrv_is_empty_record() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/hrv-service/hrv/2026-02-14")
      .with_status(204)
      .create_async()
      .await;

    let hrv = test_client(&server).get_hrv(test_today()).await.unwrap();
    assert_eq!(hrv, HrvMetrics::empty(test_today()));
  }

  #[tokio::test]
  async fn test_get_body_battery() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/wellness-service/wellness/bodyBattery/reports/daily")
      .match_query(Matcher::AllOf(vec![
        Matcher::UrlEncoded("startDate".into(), "2026-02-14".into()),
        Matcher::UrlEncoded("endDate".into(), "2026-02-14".into()),
      ]))
      .with_status(200)
      .with_body(
        r#"[{"date": "2026-02-14", "bodyBatteryValuesArray": [[1, 35], [2, 90], [3, null], [4, 72]]}]"#,
      )
      .create_async()
      .await;

    let battery = test_client(&server).get_body_battery(test_today()).await.unwrap();
    assert_eq!(battery.current, Some(72.0));
    assert_eq!(battery.highest, Some(90.0));
    assert_eq!(battery.lowest, Some(35.0));
  }

  #[tokio::test]
  async fn test_get_stress_ignores_no_data_markers() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/wellness-service/wellness/dailyStress/2026-02-14")
      .with_status(200)
      .with_body(r#"{"avgStressLevel": 31, "maxStressLevel": -1}"#)
      .create_async()
      .await;

    let stress = test_client(&server).get_stress(test_today()).await.unwrap();
    assert_eq!(stress.avg_stress, Some(31.0));
    assert_eq!(stress.max_stress, None);
  }

  #[tokio::test]
  async fn test_get_recovery_with_no_data() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/userprofile-service/socialProfile")
      .with_status(200)
      .with_body(r#"{"displayName": "runner42"}"#)
      .create_async()
      .await;
    server
      .mock("GET", Matcher::Regex("^/(wellness|hrv)-service/".into()))
      .match_query(Matcher::Any)
      .with_status(404)
      .create_async()
      .await;

    let snapshot = test_client(&server).get_recovery(test_today()).await.unwrap();
    assert_eq!(snapshot, RecoverySnapshot::empty(test_today()));
  }
}
