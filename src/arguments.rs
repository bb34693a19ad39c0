use super::*;

#[derive(Debug, Parser)]
#[command(
  version,
  about = "Read Hacker News stories and follow new items as they appear"
)]
pub(crate) struct Arguments {
  #[arg(long, value_name = "PATH", help = "Path to the configuration file")]
  pub(crate) config: Option<PathBuf>,
  #[command(subcommand)]
  pub(crate) subcommand: Subcommand,
}
