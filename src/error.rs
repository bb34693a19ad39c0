#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
  #[error("operation cancelled")]
  Cancelled,
  #[error("malformed payload: {reason}")]
  Decode { reason: String },
  #[error("item ids must be positive")]
  InvalidItemId,
  #[error("failed to fetch item {id} after {attempts} attempts")]
  ItemNotFound { id: u64, attempts: u32 },
  #[error("update feed ended by server: {reason}")]
  Stream { reason: String },
  #[error("update feed connection closed")]
  StreamClosed,
  #[error("request failed: {reason}")]
  Transport { reason: String },
  #[error("unsupported api version `{version}`")]
  UnsupportedVersion { version: String },
}

impl From<serde_json::Error> for Error {
  fn from(error: serde_json::Error) -> Self {
    Self::Decode {
      reason: error.to_string(),
    }
  }
}

impl From<reqwest::Error> for Error {
  fn from(error: reqwest::Error) -> Self {
    Self::Transport {
      reason: error.to_string(),
    }
  }
}
