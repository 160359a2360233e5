/// Rejections for structurally invalid caller parameters.
///
/// Bad individual records never end up here: they are skipped or defaulted
/// by the analytics functions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
  #[error("Invalid parameter: {0}")]
  InvalidParameter(String),
}

impl AnalysisError {
  pub fn non_positive(name: &str) -> Self {
    AnalysisError::InvalidParameter(format!("{} must be a positive integer", name))
  }

  pub fn out_of_range(name: &str) -> Self {
    AnalysisError::InvalidParameter(format!("{} reaches past the earliest supported date", name))
  }
}
