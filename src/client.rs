use super::*;

/// Request and retry engine for the item store.
///
/// Holds no mutable state, so one client can serve any number of concurrent
/// fetches. Each call owns its request for exactly as long as it runs.
#[derive(Clone)]
pub(crate) struct Client<T = HttpTransport> {
  fan_out: usize,
  retry: RetryPolicy,
  transport: T,
  version: ApiVersion,
}

impl<T> Client<T> {
  /// Upper bound on concurrent requests issued by [`Client::get_items`].
  /// The origin throttles well before this matters.
  pub(crate) const MAX_FAN_OUT: usize = 16;

  /// Fails before touching the transport if `version` is not served.
  pub(crate) fn new(version: &str, transport: T) -> Result<Self, Error> {
    let version = version.parse::<ApiVersion>()?;

    Ok(Self {
      fan_out: Self::MAX_FAN_OUT,
      retry: RetryPolicy::default(),
      transport,
      version,
    })
  }

  pub(crate) fn version(&self) -> ApiVersion {
    self.version
  }

  pub(crate) fn with_fan_out(self, fan_out: usize) -> Self {
    Self {
      fan_out: fan_out.max(1),
      ..self
    }
  }

  pub(crate) fn with_retry(self, retry: RetryPolicy) -> Self {
    Self { retry, ..self }
  }
}

impl<T: Transport> Client<T> {
  pub(crate) async fn get_item(&self, id: u64) -> Result<Item, Error> {
    self.get_item_with(id, self.retry).await
  }

  /// Fetches `id`, retrying empty bodies, bad statuses and transient request
  /// failures until `policy.attempts` is spent. Fatal failures and malformed
  /// payloads return at once without using the remaining attempts.
  pub(crate) async fn get_item_with(
    &self,
    id: u64,
    policy: RetryPolicy,
  ) -> Result<Item, Error> {
    if id == 0 {
      return Err(Error::InvalidItemId);
    }

    let url = self.version.item_url(id);

    let attempts = policy.attempts.get();

    for attempt in 1..=attempts {
      match self.transport.get(&url).await {
        Outcome::Success(body) => {
          if let Some(item) = Item::from_body(&body)? {
            debug!(id, attempt, "received item");
            return Ok(item);
          }

          warn!(id, attempt, "received empty item");
        }
        Outcome::Transient(reason) => {
          debug!(id, attempt, %reason, "item request failed");
        }
        Outcome::Fatal(reason) => return Err(Error::Transport { reason }),
      }

      if attempt < attempts {
        debug!(id, interval = ?policy.interval, "retrying item request");
        sleep(policy.interval).await;
      }
    }

    Err(Error::ItemNotFound { id, attempts })
  }

  /// Fetches every id in `ids` with at most `fan_out` requests in flight.
  /// Results line up with `ids`, whatever order the requests finish in.
  pub(crate) async fn get_items(
    &self,
    ids: &[u64],
    cancel: &CancellationToken,
  ) -> Result<Vec<Result<Item, Error>>, Error> {
    let fetches = stream::iter(ids.iter().map(|&id| self.get_item(id)))
      .buffered(self.fan_out)
      .collect::<Vec<_>>();

    tokio::select! {
      biased;
      () = cancel.cancelled() => Err(Error::Cancelled),
      items = fetches => Ok(items),
    }
  }

  pub(crate) async fn get_top_stories(&self) -> Result<Vec<u64>, Error> {
    let body = match self.transport.get(&self.version.top_stories_url()).await
    {
      Outcome::Success(body) => body,
      Outcome::Transient(reason) | Outcome::Fatal(reason) => {
        return Err(Error::Transport { reason });
      }
    };

    let ids = if body.trim().is_empty() {
      Vec::new()
    } else {
      serde_json::from_str::<Option<Vec<u64>>>(&body)?.unwrap_or_default()
    };

    if ids.is_empty() {
      warn!("received empty top stories list");
    } else {
      debug!(count = ids.len(), "received top stories");
    }

    Ok(ids)
  }
}
