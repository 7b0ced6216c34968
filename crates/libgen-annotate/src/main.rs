#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::ui::{Cli, Colors, Commands, ListCommands, colors};

mod annotator;
mod model;
mod ui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.log_filter());
  let colors = Colors::new(colors::colors_enabled(cli.color), colors::detect_theme(cli.theme));

  match cli.command {
    Commands::List { list_command } => match list_command {
      ListCommands::Services { input } => ui::commands::list_services(&input, &colors).await?,
      ListCommands::Methods { input } => ui::commands::list_methods(&input, &colors).await?,
    },
    Commands::Annotate(command) => {
      let config = ui::commands::AnnotateConfig::from_command(command)?;
      ui::commands::annotate_model(config, &colors).await?;
    }
  }

  Ok(())
}

/// `RUST_LOG` wins over the verbosity flags.
fn init_tracing(default_filter: &str) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}
