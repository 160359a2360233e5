pub mod activity;
pub mod recovery;

pub use activity::{parse_iso_date, Activity, ActivityDetails, ActivitySummary, Split, METERS_PER_MILE};
pub use recovery::{BodyBattery, HrvMetrics, RecoverySnapshot, SleepMetrics, StressMetrics};
