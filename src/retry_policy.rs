use super::*;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RetryPolicy {
  pub(crate) attempts: NonZeroU32,
  #[serde(deserialize_with = "deserialize_seconds")]
  pub(crate) interval: Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      attempts: Self::DEFAULT_ATTEMPTS,
      interval: Self::DEFAULT_INTERVAL,
    }
  }
}

impl RetryPolicy {
  const DEFAULT_ATTEMPTS: NonZeroU32 = NonZeroU32::new(5).unwrap();

  const DEFAULT_INTERVAL: Duration = Duration::from_secs(3);
}
