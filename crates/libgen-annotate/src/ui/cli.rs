use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::colors::{ColorMode, ThemeMode};

#[derive(Parser, Debug)]
#[command(name = "libgen-annotate")]
#[command(author, version, about = "Annotates API models with Rust naming, routing, and feature-gate data")]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

impl Cli {
  /// Tracing filter used when `RUST_LOG` is unset.
  pub fn log_filter(&self) -> &'static str {
    match &self.command {
      Commands::Annotate(command) if command.verbose => "libgen_annotate=debug",
      Commands::Annotate(command) if command.quiet => "error",
      _ => "warn",
    }
  }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information from an API model
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Annotate an API model and write the annotated model as JSON
  Annotate(AnnotateCommand),
}

#[derive(Args, Debug, Clone)]
pub struct AnnotateCommand {
  /// Path to the API model JSON file
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// Path where the annotated model will be written
  #[arg(short, long, value_name = "FILE")]
  pub output: PathBuf,

  /// Codec option as KEY=VALUE (repeatable), e.g. per-service-features=true
  #[arg(short = 'O', long = "option", value_name = "KEY=VALUE")]
  pub options: Vec<String>,

  /// Enable verbose output with detailed progress information
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false, conflicts_with = "verbose")]
  pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List the services of an API model
  Services {
    /// Path to the API model JSON file
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
  /// List the methods of an API model with their HTTP bindings
  Methods {
    /// Path to the API model JSON file
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
}
