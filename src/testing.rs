use {
  super::*,
  std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
  },
  tokio::time::Instant,
  tracing_subscriber::fmt::MakeWriter,
};

/// Replays scripted outcomes and records every request it sees. Once the
/// script runs out every further request fails transiently, and every further
/// subscription is refused.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
  connections: Mutex<VecDeque<Vec<Result<SseEvent, Error>>>>,
  hold_open: bool,
  outcomes: Mutex<VecDeque<Outcome>>,
  requests: Mutex<Vec<(String, Instant)>>,
}

impl ScriptedTransport {
  pub(crate) fn failing() -> Self {
    Self::default()
  }

  pub(crate) fn feed(events: Vec<Result<SseEvent, Error>>) -> Self {
    Self::reconnecting(vec![events])
  }

  pub(crate) fn feed_held_open(events: Vec<Result<SseEvent, Error>>) -> Self {
    Self {
      hold_open: true,
      ..Self::feed(events)
    }
  }

  /// One scripted event list per successive subscription.
  pub(crate) fn reconnecting(
    connections: Vec<Vec<Result<SseEvent, Error>>>,
  ) -> Self {
    Self {
      connections: Mutex::new(connections.into()),
      ..Self::default()
    }
  }

  pub(crate) fn request_count(&self) -> usize {
    self.requests.lock().unwrap().len()
  }

  pub(crate) fn request_times(&self) -> Vec<Instant> {
    self
      .requests
      .lock()
      .unwrap()
      .iter()
      .map(|(_, at)| *at)
      .collect()
  }

  pub(crate) fn requested_urls(&self) -> Vec<String> {
    self
      .requests
      .lock()
      .unwrap()
      .iter()
      .map(|(url, _)| url.clone())
      .collect()
  }

  pub(crate) fn with_outcomes(
    outcomes: impl IntoIterator<Item = Outcome>,
  ) -> Self {
    Self {
      outcomes: Mutex::new(outcomes.into_iter().collect()),
      ..Self::default()
    }
  }
}

impl Transport for ScriptedTransport {
  async fn get(&self, url: &str) -> Outcome {
    self
      .requests
      .lock()
      .unwrap()
      .push((url.to_string(), Instant::now()));

    self
      .outcomes
      .lock()
      .unwrap()
      .pop_front()
      .unwrap_or_else(|| Outcome::Transient("unexpected status 503".into()))
  }

  async fn subscribe(&self, url: &str) -> Result<EventStream, Error> {
    self
      .requests
      .lock()
      .unwrap()
      .push((url.to_string(), Instant::now()));

    let Some(events) = self.connections.lock().unwrap().pop_front() else {
      return Err(Error::Transport {
        reason: "connection refused".into(),
      });
    };

    let events = stream::iter(events);

    Ok(if self.hold_open {
      events.chain(stream::pending()).boxed()
    } else {
      events.boxed()
    })
  }
}

/// Serves item bodies keyed by the id in the request URL, plus an optional
/// top stories list.
pub(crate) struct ItemServer {
  delays: Vec<(u64, Duration)>,
  items: Vec<(u64, Outcome)>,
  top_stories: Option<String>,
}

impl ItemServer {
  pub(crate) fn new(items: Vec<(u64, Outcome)>) -> Self {
    Self {
      delays: Vec::new(),
      items,
      top_stories: None,
    }
  }

  pub(crate) fn with_delay(mut self, id: u64, delay: Duration) -> Self {
    self.delays.push((id, delay));
    self
  }

  pub(crate) fn with_top_stories(mut self, body: &str) -> Self {
    self.top_stories = Some(body.into());
    self
  }
}

impl Transport for ItemServer {
  async fn get(&self, url: &str) -> Outcome {
    if url.ends_with("/topstories.json") {
      return Outcome::Success(
        self.top_stories.clone().unwrap_or_else(|| "null".into()),
      );
    }

    let id = url
      .rsplit('/')
      .next()
      .and_then(|file| file.strip_suffix(".json"))
      .and_then(|id| id.parse::<u64>().ok());

    if let Some((_, delay)) =
      self.delays.iter().find(|(delayed, _)| Some(*delayed) == id)
    {
      sleep(*delay).await;
    }

    match self.items.iter().find(|(served, _)| Some(*served) == id) {
      Some((_, Outcome::Success(body))) => Outcome::Success(body.clone()),
      Some((_, Outcome::Fatal(reason))) => Outcome::Fatal(reason.clone()),
      Some((_, Outcome::Transient(reason))) => {
        Outcome::Transient(reason.clone())
      }
      None => Outcome::Success("null".into()),
    }
  }

  async fn subscribe(&self, _url: &str) -> Result<EventStream, Error> {
    Ok(stream::empty().boxed())
  }
}

/// Collects formatted log output so tests can assert on warnings.
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
  pub(crate) fn contents(&self) -> String {
    String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
  }

  pub(crate) fn install(&self) -> tracing::subscriber::DefaultGuard {
    tracing::subscriber::set_default(
      tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .with_writer(self.clone())
        .finish(),
    )
  }
}

impl io::Write for CapturedLogs {
  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }

  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.0.lock().unwrap().extend_from_slice(buf);
    Ok(buf.len())
  }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
  type Writer = Self;

  fn make_writer(&'a self) -> Self::Writer {
    self.clone()
  }
}

pub(crate) fn event(data: &str) -> Result<SseEvent, Error> {
  Ok(SseEvent {
    data: data.into(),
    event: "put".into(),
  })
}

pub(crate) fn success(body: &str) -> Outcome {
  Outcome::Success(body.into())
}
