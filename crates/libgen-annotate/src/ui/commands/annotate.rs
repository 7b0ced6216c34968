use std::path::PathBuf;

use chrono::{Local, Timelike};
use crossterm::style::Stylize;

use super::load_api;
use crate::{
  annotator::{
    config::CodecOptions,
    metrics::{AnnotationStats, AnnotationWarning},
    orchestrator::{AnnotationOutput, Annotator},
  },
  ui::{AnnotateCommand, Colors},
};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

#[derive(Debug, Clone)]
pub struct AnnotateConfig {
  pub input: PathBuf,
  pub output: PathBuf,
  pub options: Vec<(String, String)>,
  pub verbose: bool,
  pub quiet: bool,
}

impl AnnotateConfig {
  pub fn from_command(command: AnnotateCommand) -> anyhow::Result<Self> {
    let AnnotateCommand {
      input,
      output,
      options,
      verbose,
      quiet,
    } = command;

    Ok(Self {
      input,
      output,
      options: parse_options(&options)?,
      verbose,
      quiet,
    })
  }

  fn codec_options(&self) -> anyhow::Result<CodecOptions> {
    let pairs = self.options.iter().map(|(key, value)| (key.as_str(), value.as_str()));
    Ok(CodecOptions::from_options(pairs)?)
  }

  /// Advisories are always reported; model warnings only with `--verbose`.
  fn reported_warnings<'s>(&self, stats: &'s AnnotationStats) -> impl Iterator<Item = &'s AnnotationWarning> {
    let (verbose, quiet) = (self.verbose, self.quiet);
    stats
      .warnings
      .iter()
      .filter(move |warning| !quiet && (verbose || warning.is_advisory()))
  }

  async fn write_output(&self, output: &AnnotationOutput) -> anyhow::Result<()> {
    if let Some(parent) = self.output.parent() {
      tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(&output.model)?;
    tokio::fs::write(&self.output, json).await?;
    Ok(())
  }
}

/// Splits `KEY=VALUE` entries at the first `=`.
fn parse_options(entries: &[String]) -> anyhow::Result<Vec<(String, String)>> {
  entries
    .iter()
    .map(|entry| {
      let (key, value) = entry.split_once('=').ok_or_else(|| {
        anyhow::anyhow!("Invalid option format '{entry}': expected KEY=VALUE (e.g., per-service-features=true)")
      })?;
      Ok((key.trim().to_string(), value.trim().to_string()))
    })
    .collect()
}

struct AnnotateLogger<'a> {
  config: &'a AnnotateConfig,
  colors: &'a Colors,
}

impl<'a> AnnotateLogger<'a> {
  fn new(config: &'a AnnotateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_loading(&self) {
    self.info(
      &format!("Loading API model from: {}", self.config.input.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_annotating(&self) {
    self.info(&"Annotating model...".with(self.colors.primary()).to_string());
  }

  fn print_statistics(&self, stats: &AnnotationStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Messages annotated:", stats.messages_annotated.to_string());
    self.stat("Enums annotated:", stats.enums_annotated.to_string());
    self.stat("External types:", stats.external_types_annotated.to_string());
    self.stat("Services annotated:", stats.services_annotated.to_string());
    self.stat("Methods annotated:", stats.methods_annotated.to_string());
    if stats.methods_skipped > 0 {
      self.stat("", format!("{} gRPC-only skipped", stats.methods_skipped));
    }
    if stats.features_generated > 0 {
      self.stat("Features:", stats.features_generated.to_string());
    }
    if !stats.warnings.is_empty() {
      self.stat("Warnings:", stats.warnings.len().to_string());
    }
    self.print_warnings(stats);
  }

  fn print_warnings(&self, stats: &AnnotationStats) {
    let mut printed_header = false;
    for warning in self.config.reported_warnings(stats) {
      if !printed_header {
        eprintln!();
        printed_header = true;
      }

      let label = if warning.is_advisory() { "Advisory:" } else { "Warning:" };
      eprintln!(
        "{} {}",
        label.with(self.colors.accent()),
        format!("{warning}").with(self.colors.primary())
      );
    }
  }

  fn log_writing(&self) {
    self.info(
      &format!("Writing to: {}", self.config.output.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_success(&self) {
    if !self.config.quiet {
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        "Successfully annotated model".with(self.colors.success())
      );
    }
  }
}

pub async fn annotate_model(config: AnnotateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = AnnotateLogger::new(&config, colors);
  let options = config.codec_options()?;

  logger.log_loading();
  let api = load_api(&config.input).await?;

  logger.log_annotating();
  let output = Annotator::new(&api, options).annotate()?;
  logger.print_statistics(&output.stats);

  logger.log_writing();
  config.write_output(&output).await?;

  logger.log_success();
  Ok(())
}

#[cfg(test)]
mod tests {
  use serde_json::{Value, json};

  use super::*;
  use crate::ui::colors::Theme;

  fn config(input: PathBuf, output: PathBuf, options: &[&str]) -> AnnotateConfig {
    AnnotateConfig {
      input,
      output,
      options: parse_options(&options.iter().map(ToString::to_string).collect::<Vec<_>>()).unwrap(),
      verbose: false,
      quiet: true,
    }
  }

  fn library_model() -> Value {
    json!({
      "name": "library",
      "packageName": "test.library.v1",
      "title": "Library API",
      "messages": [{
        "id": ".test.library.v1.Book",
        "name": "Book",
        "package": "test.library.v1",
        "fields": [
          { "id": ".test.library.v1.Book.name", "name": "name", "typez": "string" },
          { "id": ".test.library.v1.Book.page_count", "name": "page_count", "typez": "int64" }
        ]
      }]
    })
  }

  #[test]
  fn test_parse_options() {
    let cases = [
      (vec![], vec![]),
      (vec!["version=1.2.3"], vec![("version", "1.2.3")]),
      (
        vec!["package:wkt=package=google-cloud-wkt,source=google.protobuf"],
        vec![("package:wkt", "package=google-cloud-wkt,source=google.protobuf")],
      ),
      (vec![" module-path = crate::api "], vec![("module-path", "crate::api")]),
    ];
    for (input, expected) in cases {
      let entries = input.iter().map(ToString::to_string).collect::<Vec<_>>();
      let actual = parse_options(&entries).unwrap();
      let expected = expected
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect::<Vec<_>>();
      assert_eq!(actual, expected, "failed for input {input:?}");
    }
  }

  #[test]
  fn test_parse_options_rejects_missing_equals() {
    let err = parse_options(&["per-service-features".to_string()]).unwrap_err();
    assert!(err.to_string().contains("Invalid option format"));
  }

  #[test]
  fn test_reported_warnings() {
    let mut stats = AnnotationStats::default();
    stats.record_warning(AnnotationWarning::MissingType {
      id: ".test.library.v1.Ghost".to_string(),
      referenced_by: ".test.library.v1.Book.ghost".to_string(),
    });
    stats.record_warning(AnnotationWarning::ServiceCountAdvisory {
      count: 16,
      threshold: 15,
    });

    let cases = [
      (false, false, vec!["Advisory"]),
      (true, false, vec!["MissingType", "Advisory"]),
      (false, true, vec![]),
    ];
    for (verbose, quiet, expected) in cases {
      let config = AnnotateConfig {
        verbose,
        quiet,
        ..config(PathBuf::new(), PathBuf::new(), &[])
      };
      let reported = config
        .reported_warnings(&stats)
        .map(|warning| if warning.is_advisory() { "Advisory" } else { "MissingType" })
        .collect::<Vec<_>>();
      assert_eq!(reported, expected, "failed for input {:?}", (verbose, quiet));
    }
  }

  #[tokio::test]
  async fn test_annotate_model_writes_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("library.json");
    let output = dir.path().join("out").join("annotated.json");
    tokio::fs::write(&input, library_model().to_string()).await.unwrap();

    let colors = Colors::new(false, Theme::Dark);
    annotate_model(config(input, output.clone(), &["version=0.1.0"]), &colors)
      .await
      .unwrap();

    let written: Value = serde_json::from_str(&tokio::fs::read_to_string(&output).await.unwrap()).unwrap();
    assert_eq!(written["crate"]["crateName"], "test-library-v1");
    assert_eq!(written["crate"]["version"], "0.1.0");
    assert_eq!(
      written["messages"][".test.library.v1.Book"]["qualifiedName"],
      "crate::model::Book"
    );
    assert_eq!(
      written["fields"][".test.library.v1.Book.page_count"]["serdeAs"],
      "wkt::internal::I64"
    );
  }

  #[tokio::test]
  async fn test_annotate_model_rejects_unknown_option() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("library.json");
    tokio::fs::write(&input, library_model().to_string()).await.unwrap();

    let colors = Colors::new(false, Theme::Dark);
    let err = annotate_model(config(input, dir.path().join("out.json"), &["no-such-option=1"]), &colors)
      .await
      .unwrap_err();
    assert!(err.to_string().contains("unknown codec option"));
    assert!(!dir.path().join("out.json").exists());
  }
}
