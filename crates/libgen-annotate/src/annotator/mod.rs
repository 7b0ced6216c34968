pub(crate) mod accessors;
pub mod annotations;
pub mod config;
pub(crate) mod dependencies;
pub(crate) mod enums;
pub mod errors;
pub(crate) mod features;
pub(crate) mod messages;
pub(crate) mod methods;
pub mod metrics;
pub(crate) mod naming;
pub(crate) mod oneof;
pub mod orchestrator;
pub(crate) mod qualify;
pub(crate) mod resource_names;
pub(crate) mod routing;
pub(crate) mod serde_as;
pub(crate) mod types;

#[cfg(test)]
mod tests;

use crate::model::ApiIndex;

use self::{config::CodecOptions, dependencies::TypeGraph, qualify::Qualifier};

/// Read-only state shared by every annotation phase.
pub(crate) struct AnnotationContext<'a> {
  pub index: &'a ApiIndex<'a>,
  pub options: &'a CodecOptions,
  pub qualifier: Qualifier<'a>,
  pub types: TypeGraph<'a>,
}

impl<'a> AnnotationContext<'a> {
  pub fn new(index: &'a ApiIndex<'a>, options: &'a CodecOptions, crate_namespace: String) -> Self {
    Self {
      index,
      options,
      qualifier: Qualifier::new(index, options, crate_namespace),
      types: TypeGraph::build(index.api()),
    }
  }
}

/// Splits a comment block into the lines emitted as doc comments.
pub(crate) fn doc_lines(documentation: &str) -> Vec<String> {
  documentation.lines().map(|line| line.trim_end().to_string()).collect()
}
