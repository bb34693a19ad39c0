use {super::*, reqwest::header::ACCEPT};

pub(crate) type EventStream = BoxStream<'static, Result<SseEvent, Error>>;

/// The result of a single request, classified so retry logic never has to
/// look at transport specific error types.
#[derive(Debug)]
pub(crate) enum Outcome {
  Fatal(String),
  Success(String),
  Transient(String),
}

pub(crate) trait Transport: Send + Sync {
  fn get(&self, url: &str) -> impl Future<Output = Outcome> + Send;

  fn subscribe(
    &self,
    url: &str,
  ) -> impl Future<Output = Result<EventStream, Error>> + Send;
}

#[derive(Clone)]
pub(crate) struct HttpTransport {
  client: reqwest::Client,
  timeout: Duration,
}

impl HttpTransport {
  const USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

  fn classify(error: &reqwest::Error) -> Outcome {
    if error.is_builder() || error.is_redirect() {
      Outcome::Fatal(error.to_string())
    } else {
      Outcome::Transient(error.to_string())
    }
  }

  /// `timeout` bounds connecting and every plain request. The update feed
  /// body is unbounded.
  pub(crate) fn new(timeout: Duration) -> Result<Self, Error> {
    let client = reqwest::Client::builder()
      .user_agent(Self::USER_AGENT)
      .connect_timeout(timeout)
      .build()?;

    Ok(Self { client, timeout })
  }
}

impl Transport for HttpTransport {
  async fn get(&self, url: &str) -> Outcome {
    let response =
      match self.client.get(url).timeout(self.timeout).send().await {
        Ok(response) => response,
        Err(error) => return Self::classify(&error),
      };

    let status = response.status();

    if !status.is_success() {
      return Outcome::Transient(format!("unexpected status {status}"));
    }

    match response.text().await {
      Ok(body) => Outcome::Success(body),
      Err(error) => Self::classify(&error),
    }
  }

  async fn subscribe(&self, url: &str) -> Result<EventStream, Error> {
    let response = self
      .client
      .get(url)
      .header(ACCEPT, "text/event-stream")
      .send()
      .await?;

    let status = response.status();

    if !status.is_success() {
      return Err(Error::Transport {
        reason: format!("unexpected status {status}"),
      });
    }

    let mut parser = EventParser::default();

    Ok(
      response
        .bytes_stream()
        .map(move |chunk| {
          chunk
            .map_err(Error::from)
            .and_then(|chunk| parser.feed(&chunk))
        })
        .map_ok(|events| {
          stream::iter(events.into_iter().map(Ok::<_, Error>))
        })
        .try_flatten()
        .boxed(),
    )
  }
}

impl<T: Transport> Transport for &T {
  fn get(&self, url: &str) -> impl Future<Output = Outcome> + Send {
    (**self).get(url)
  }

  fn subscribe(
    &self,
    url: &str,
  ) -> impl Future<Output = Result<EventStream, Error>> + Send {
    (**self).subscribe(url)
  }
}
