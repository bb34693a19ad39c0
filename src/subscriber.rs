use {
  super::*,
  std::sync::atomic::{AtomicU64, Ordering},
  tokio::time::timeout,
};

/// Follows the live max-item feed and hands each new id to a callback.
///
/// The last dispatched id outlives a single [`Subscriber::on_news`] call, so
/// the value the feed replays on every reconnect is not dispatched twice.
pub(crate) struct Subscriber<T = HttpTransport> {
  idle_timeout: Duration,
  last: AtomicU64,
  transport: T,
  version: ApiVersion,
}

impl<T> Subscriber<T> {
  /// The origin sends a keep-alive about every 30 seconds.
  pub(crate) const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

  pub(crate) fn new(version: &str, transport: T) -> Result<Self, Error> {
    Ok(Self {
      idle_timeout: Self::IDLE_TIMEOUT,
      last: AtomicU64::new(0),
      transport,
      version: version.parse()?,
    })
  }

  pub(crate) fn with_idle_timeout(self, idle_timeout: Duration) -> Self {
    Self {
      idle_timeout,
      ..self
    }
  }
}

impl<T: Transport> Subscriber<T> {
  fn decode(data: &str) -> Option<u64> {
    let value = serde_json::from_str::<Value>(data).ok()?;

    let id = value.get("data")?;

    id.as_u64()
      .or_else(|| id.as_str()?.trim().parse().ok())
      .filter(|id| *id > 0)
  }

  /// Runs until cancelled or until the feed fails.
  ///
  /// Events are handled in arrival order and `callback` is awaited before the
  /// next event is read. Events without an item id are logged and skipped.
  /// A feed that stays silent for longer than the idle timeout counts as
  /// closed. The connection is not reopened here: stream failures are
  /// returned and restarting is up to the caller.
  pub(crate) async fn on_news<F, Fut>(
    &self,
    cancel: &CancellationToken,
    mut callback: F,
  ) -> Result<Infallible, Error>
  where
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = ()>,
  {
    let url = self.version.max_item_url();

    info!(%url, "subscribing to updates");

    let mut events = tokio::select! {
      biased;
      () = cancel.cancelled() => return Err(Error::Cancelled),
      events = self.transport.subscribe(&url) => events?,
    };

    loop {
      let event = tokio::select! {
        biased;
        () = cancel.cancelled() => return Err(Error::Cancelled),
        event = timeout(self.idle_timeout, events.next()) => {
          let Ok(event) = event else {
            warn!(idle = ?self.idle_timeout, "update feed went silent");
            return Err(Error::StreamClosed);
          };

          event.ok_or(Error::StreamClosed)??
        }
      };

      match event.event.as_str() {
        "keep-alive" => {
          trace!("received keep-alive");
          continue;
        }
        "auth_revoked" | "cancel" => {
          return Err(Error::Stream {
            reason: format!("{}: {}", event.event, event.data),
          });
        }
        _ => {}
      }

      let Some(id) = Self::decode(&event.data) else {
        warn!(data = %event.data, "received update without an item id");
        continue;
      };

      if self.last.swap(id, Ordering::Relaxed) == id {
        debug!(id, "skipping repeated update");
        continue;
      }

      debug!(id, "dispatching update");

      tokio::select! {
        biased;
        () = cancel.cancelled() => return Err(Error::Cancelled),
        () = callback(id) => {}
      }
    }
  }
}
