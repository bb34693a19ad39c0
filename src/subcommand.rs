use super::*;

#[derive(Debug, clap::Subcommand)]
pub(crate) enum Subcommand {
  #[command(about = "Show a single story")]
  Item {
    #[arg(
      value_parser = clap::value_parser!(u64).range(1..),
      help = "Positive item id"
    )]
    id: u64,
  },
  #[command(about = "Show the current top stories in ranking order")]
  Top {
    #[arg(long, default_value_t = 30, help = "Number of stories to show")]
    limit: usize,
  },
  #[command(about = "Print new items as they are published")]
  Watch,
}

impl Subcommand {
  async fn item<T: Transport>(
    client: &Client<T>,
    id: u64,
    cancel: &CancellationToken,
  ) -> Result {
    let result = tokio::select! {
      biased;
      () = cancel.cancelled() => return Err(Error::Cancelled.into()),
      result = client.get_item(id) => result,
    };

    match result {
      Ok(item) if item.is_story() => println!("{}", Story::new(&item)),
      Ok(_) => println!("The provided ID is not a story."),
      Err(Error::ItemNotFound { .. }) => {
        println!("Item with ID {id} not found.");
      }
      Err(error) => {
        return Err(error).context(format!("failed to fetch item {id}"));
      }
    }

    Ok(())
  }

  pub(crate) async fn run<T: Transport>(
    self,
    client: &Client<T>,
    subscriber: &Subscriber<T>,
    settings: &Settings,
    cancel: &CancellationToken,
  ) -> Result {
    match self {
      Self::Item { id } => Self::item(client, id, cancel).await,
      Self::Top { limit } => Self::top(client, limit, cancel).await,
      Self::Watch => {
        Self::watch(client, subscriber, settings.reconnect_interval, cancel)
          .await
      }
    }
  }

  async fn top<T: Transport>(
    client: &Client<T>,
    limit: usize,
    cancel: &CancellationToken,
  ) -> Result {
    let ids = tokio::select! {
      biased;
      () = cancel.cancelled() => return Err(Error::Cancelled.into()),
      ids = client.get_top_stories() => {
        ids.context("failed to fetch top stories")?
      }
    };

    if ids.is_empty() {
      println!("No top stories available at the moment.");
      return Ok(());
    }

    let ids = ids.into_iter().take(limit).collect::<Vec<_>>();

    info!(count = ids.len(), "fetching top stories");

    let stories = client.get_items(&ids, cancel).await?;

    for (id, story) in ids.iter().zip(stories) {
      match story {
        Ok(item) => println!("{}\n", Story::new(&item)),
        Err(Error::ItemNotFound { .. }) => {
          println!("Item with ID {id} not found.\n");
        }
        Err(error) => {
          error!(id, %error, "failed to fetch story");
          println!("Failed to fetch item {id}.\n");
        }
      }
    }

    Ok(())
  }

  async fn watch<T: Transport>(
    client: &Client<T>,
    subscriber: &Subscriber<T>,
    reconnect_interval: Duration,
    cancel: &CancellationToken,
  ) -> Result {
    loop {
      let result = subscriber
        .on_news(cancel, |id| async move {
          debug!(id, "new item announced");

          match client.get_item(id).await {
            Ok(item) => println!("{}", Story::new(&item).headline()),
            Err(error) => error!(id, %error, "failed to fetch new item"),
          }
        })
        .await;

      let error = match result {
        Ok(never) => match never {},
        Err(Error::Cancelled) => return Err(Error::Cancelled.into()),
        Err(error) => error,
      };

      warn!(
        %error,
        retry_in = ?reconnect_interval,
        "update feed failed, reconnecting"
      );

      tokio::select! {
        biased;
        () = cancel.cancelled() => return Err(Error::Cancelled.into()),
        () = sleep(reconnect_interval) => {}
      }
    }
  }
}
