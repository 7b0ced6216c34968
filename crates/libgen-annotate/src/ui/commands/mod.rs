pub mod annotate;
pub mod list;

use std::path::Path;

pub use annotate::{AnnotateConfig, annotate_model};
pub use list::{list_methods, list_services};

use crate::model::Api;

/// Reads a linked API model from its JSON form.
pub async fn load_api(path: &Path) -> anyhow::Result<Api> {
  let bytes = tokio::fs::read(path).await?;
  let api = serde_json::from_slice(&bytes)
    .map_err(|err| anyhow::anyhow!("Invalid API model '{}': {err}", path.display()))?;
  Ok(api)
}
