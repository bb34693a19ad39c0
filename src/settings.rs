use super::*;

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
  pub(crate) api_version: String,
  pub(crate) fan_out: usize,
  #[serde(deserialize_with = "deserialize_seconds")]
  pub(crate) idle_timeout: Duration,
  pub(crate) log_level: String,
  #[serde(deserialize_with = "deserialize_seconds")]
  pub(crate) reconnect_interval: Duration,
  #[serde(deserialize_with = "deserialize_seconds")]
  pub(crate) request_timeout: Duration,
  pub(crate) retry: RetryPolicy,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      api_version: ApiVersion::V0.to_string(),
      fan_out: Client::<HttpTransport>::MAX_FAN_OUT,
      idle_timeout: Subscriber::<HttpTransport>::IDLE_TIMEOUT,
      log_level: "info".into(),
      reconnect_interval: Duration::from_secs(5),
      request_timeout: Duration::from_secs(10),
      retry: RetryPolicy::default(),
    }
  }
}

impl Settings {
  const SEARCH_PATHS: &[&str] = &[
    "config.toml",
    "etc/hn-feed/config.toml",
    "/etc/hn-feed/config.toml",
  ];

  /// Loads settings from `path`, or from the first configuration file found,
  /// or falls back to defaults. Returns the file that was read, if any.
  pub(crate) fn load(path: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
    let Some(path) = path.map(Path::to_path_buf).or_else(Self::locate) else {
      return Ok((Self::default(), None));
    };

    let contents = fs::read_to_string(&path).with_context(|| {
      format!("failed to read configuration file `{}`", path.display())
    })?;

    let settings = Self::parse(&contents).with_context(|| {
      format!("invalid configuration file `{}`", path.display())
    })?;

    Ok((settings, Some(path)))
  }

  fn locate() -> Option<PathBuf> {
    if let Ok(path) = env::var("HN_FEED_CONFIG") {
      return Some(PathBuf::from(path));
    }

    Self::SEARCH_PATHS
      .iter()
      .map(PathBuf::from)
      .find(|path| path.exists())
  }

  fn parse(contents: &str) -> Result<Self> {
    Ok(toml::from_str(contents)?)
  }
}
