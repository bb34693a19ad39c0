use {
  anyhow::{Context, anyhow},
  api_version::ApiVersion,
  arguments::Arguments,
  clap::Parser,
  client::Client,
  crossterm::style::Stylize,
  error::Error,
  futures::{
    TryStreamExt,
    stream::{self, BoxStream, StreamExt},
  },
  item::Item,
  retry_policy::RetryPolicy,
  serde::{
    Deserialize, Deserializer,
    de::{self, Unexpected},
  },
  serde_json::{Map, Value},
  settings::Settings,
  sse::{EventParser, SseEvent},
  std::{
    backtrace::BacktraceStatus,
    convert::Infallible,
    env,
    fmt::{self, Display, Formatter},
    fs,
    io::{self, IsTerminal},
    num::NonZeroU32,
    path::{Path, PathBuf},
    process,
    str::FromStr,
    time::Duration,
  },
  story::Story,
  subcommand::Subcommand,
  subscriber::Subscriber,
  tokio::time::sleep,
  tokio_util::sync::CancellationToken,
  tracing::{debug, error, info, trace, warn},
  transport::{EventStream, HttpTransport, Outcome, Transport},
  utils::{
    deserialize_seconds, format_points, sanitize_text, truncate, wrap_text,
  },
};

mod api_version;
mod arguments;
mod client;
mod error;
mod item;
mod logging;
mod retry_policy;
mod settings;
mod sse;
mod story;
mod subcommand;
mod subscriber;
#[cfg(test)]
mod testing;
mod transport;
mod utils;

const WRAP_WIDTH: usize = 80;

type Result<T = (), E = anyhow::Error> = std::result::Result<T, E>;

fn interrupt_on_ctrl_c(cancel: CancellationToken) {
  tokio::spawn(async move {
    match tokio::signal::ctrl_c().await {
      Ok(()) => {
        info!("received interrupt, shutting down");
        cancel.cancel();
      }
      Err(error) => warn!(%error, "failed to listen for interrupts"),
    }
  });
}

async fn run() -> Result {
  let arguments = Arguments::parse();

  let (settings, path) = Settings::load(arguments.config.as_deref())?;

  logging::init(&settings.log_level)?;

  match &path {
    Some(path) => info!(path = %path.display(), "loaded configuration"),
    None => info!("no configuration file found, using defaults"),
  }

  let transport = HttpTransport::new(settings.request_timeout)?;

  let client = Client::new(&settings.api_version, transport.clone())
    .context("invalid configuration")?
    .with_fan_out(settings.fan_out)
    .with_retry(settings.retry);

  let subscriber = Subscriber::new(&settings.api_version, transport)
    .context("invalid configuration")?
    .with_idle_timeout(settings.idle_timeout);

  info!(version = %client.version(), "client initialized");

  let cancel = CancellationToken::new();

  interrupt_on_ctrl_c(cancel.clone());

  match arguments
    .subcommand
    .run(&client, &subscriber, &settings, &cancel)
    .await
  {
    Err(error)
      if matches!(error.downcast_ref::<Error>(), Some(Error::Cancelled)) =>
    {
      info!("stopped");
      Ok(())
    }
    result => result,
  }
}

#[tokio::main]
async fn main() {
  if let Err(error) = run().await {
    let use_color = io::stderr().is_terminal();

    if use_color {
      eprintln!("{} {error}", "error:".bold().red());
    } else {
      eprintln!("error: {error}");
    }

    for (i, error) in error.chain().skip(1).enumerate() {
      if i == 0 {
        eprintln!();

        if use_color {
          eprintln!("{}", "because:".bold().red());
        } else {
          eprintln!("because:");
        }
      }

      if use_color {
        eprintln!("{} {error}", "-".bold().red());
      } else {
        eprintln!("- {error}");
      }
    }

    let backtrace = error.backtrace();

    if backtrace.status() == BacktraceStatus::Captured {
      if use_color {
        eprintln!("{}", "backtrace:".bold().red());
      } else {
        eprintln!("backtrace:");
      }

      eprintln!("{backtrace}");
    }

    process::exit(1);
  }
}
