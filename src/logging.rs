use {super::*, tracing_subscriber::EnvFilter};

/// Installs the global subscriber. `RUST_LOG` takes precedence over `level`.
/// Logs go to stderr so they never mix with rendered output on stdout.
pub(crate) fn init(level: &str) -> Result {
  let filter = match EnvFilter::try_from_default_env() {
    Ok(filter) => filter,
    Err(_) => EnvFilter::try_new(level)
      .with_context(|| format!("invalid log level `{level}`"))?,
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .with_ansi(io::stderr().is_terminal())
    .try_init()
    .map_err(|error| anyhow!("failed to initialize logging: {error}"))
}
