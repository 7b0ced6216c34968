//! The annotated model handed to rendering.
//!
//! Annotations are stored in per-kind side tables keyed by entity ID. Every
//! type here is plain data (strings, booleans, numbers, lists, maps) so a
//! renderer can use it directly as a template context.

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use serde::Serialize;
use strum::Display;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedModel {
  #[serde(rename = "crate")]
  pub crate_info: CrateAnnotation,
  pub messages: BTreeMap<String, MessageAnnotation>,
  pub fields: BTreeMap<String, FieldAnnotation>,
  pub oneofs: BTreeMap<String, OneOfAnnotation>,
  pub enums: BTreeMap<String, EnumAnnotation>,
  pub enum_values: BTreeMap<String, EnumValueAnnotation>,
  pub services: BTreeMap<String, ServiceAnnotation>,
  pub methods: BTreeMap<String, MethodAnnotation>,
}

impl AnnotatedModel {
  /// Qualified Rust name of an already annotated message or enum.
  pub fn type_qualified_name(&self, id: &str) -> Option<&str> {
    self
      .messages
      .get(id)
      .map(|m| m.qualified_name.as_str())
      .or_else(|| self.enums.get(id).map(|e| e.qualified_name.as_str()))
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrateAnnotation {
  pub crate_name: String,
  pub crate_namespace: String,
  pub module_path: String,
  pub title: String,
  pub per_service_features: bool,
  pub all_features: Vec<String>,
  pub default_features: Vec<String>,
  pub generate_setter_samples: bool,
  pub generate_rpc_samples: bool,
  pub template_override: Option<String>,
  pub version: Option<String>,
  pub copyright_year: Option<String>,
  pub extern_packages: Vec<ExternPackageAnnotation>,
  /// Services with at least one generated method, in declaration order.
  pub services: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternPackageAnnotation {
  pub alias: String,
  pub crate_name: String,
  pub sources: Vec<String>,
  pub feature: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GateOperator {
  /// Compiles if any listed feature is enabled.
  #[default]
  Any,
  /// Compiles only if every listed feature is enabled.
  All,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureGates {
  pub features: BTreeSet<String>,
  pub operator: GateOperator,
}

impl FeatureGates {
  pub fn add(&mut self, feature: &str) {
    self.features.insert(feature.to_string());
  }

  pub fn is_empty(&self) -> bool {
    self.features.is_empty()
  }

  /// The `cfg` predicate for the gates, or `None` when ungated.
  #[must_use]
  pub fn cfg_predicate(&self) -> Option<String> {
    if self.features.is_empty() {
      return None;
    }
    let features = self.features.iter().map(|f| format!("feature = \"{f}\"")).join(", ");
    Some(format!("{}({features})", self.operator))
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageAnnotation {
  pub name: String,
  /// Module holding this message's nested types.
  pub module_name: String,
  /// Module the message itself is declared in.
  pub module_path: String,
  pub qualified_name: String,
  pub relative_name: String,
  pub example_name: String,
  pub alias: Option<String>,
  pub feature_gates: FeatureGates,
  pub internal: bool,
  pub deprecated: bool,
  pub docs: Vec<String>,
  /// External entities only carry naming data.
  pub basic: bool,
  pub has_nested_types: bool,
  pub fields: Vec<String>,
  pub oneofs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldAnnotation {
  pub field_name: String,
  pub setter_name: String,
  /// Variant name inside the oneof enum.
  pub branch_name: Option<String>,
  pub field_type: String,
  /// Type of a single element, without `Option`/`Vec`/`Box` wrappers.
  pub primitive_field_type: String,
  pub serde_as: Option<String>,
  pub skip_if_is_default: bool,
  pub is_boxed: bool,
  pub alias: Option<String>,
  pub docs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OneOfAnnotation {
  pub enum_name: String,
  pub field_name: String,
  pub qualified_name: String,
  pub relative_name: String,
  pub alias: Option<String>,
  /// Field ID of the representative member used in samples.
  pub example_field: Option<String>,
  pub branches: Vec<String>,
  pub docs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumAnnotation {
  pub name: String,
  pub module_path: String,
  pub qualified_name: String,
  pub relative_name: String,
  pub example_name: String,
  pub alias: Option<String>,
  /// Value IDs after merging names that collide case-insensitively.
  pub unique_values: Vec<String>,
  pub examples: Vec<EnumExample>,
  pub feature_gates: FeatureGates,
  pub internal: bool,
  pub deprecated: bool,
  pub docs: Vec<String>,
  pub basic: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumExample {
  pub value_id: String,
  pub expression: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValueAnnotation {
  pub variant_name: String,
  pub constant_name: String,
  pub number: i32,
  pub docs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAnnotation {
  pub name: String,
  pub module_name: String,
  pub feature_name: String,
  pub default_host: String,
  /// Generated method IDs, in declaration order.
  pub methods: Vec<String>,
  pub docs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodAnnotation {
  pub name: String,
  pub builder_name: String,
  pub service_name: String,
  pub input_type: String,
  pub return_type: String,
  pub resource_names: Vec<ResourceNameCandidate>,
  pub path_bindings: Vec<PathBindingAnnotation>,
  pub is_idempotent: bool,
  pub docs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceNameCandidate {
  pub field_path: Vec<String>,
  /// Expression yielding `Option<&str>` from `req`.
  pub accessor: String,
  pub is_nested: bool,
  pub is_path_parameter: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathBindingAnnotation {
  pub verb: String,
  /// Path with variables replaced by `{}`, like `/v1/{}/secrets`.
  pub path_fmt: String,
  pub substitutions: Vec<BindingSubstitution>,
  pub query_params: Vec<QueryParameter>,
  pub has_body: bool,
  pub query_params_can_fail: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingSubstitution {
  pub field_path: String,
  pub field_accessor: String,
  pub template: Vec<TemplateSegment>,
  /// The template as a Rust slice expression.
  pub template_expr: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TemplateSegment {
  Literal(String),
  SingleWildcard,
  MultiWildcard,
  TrailingMultiWildcard,
}

impl TemplateSegment {
  #[must_use]
  pub fn to_rust(&self) -> String {
    match self {
      Self::Literal(lit) => format!("Segment::Literal({lit:?})"),
      Self::SingleWildcard => "Segment::SingleWildcard".to_string(),
      Self::MultiWildcard => "Segment::MultiWildcard".to_string(),
      Self::TrailingMultiWildcard => "Segment::TrailingMultiWildcard".to_string(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParameter {
  pub name: String,
  pub field_name: String,
  pub is_optional: bool,
  pub is_repeated: bool,
  pub is_structured: bool,
}
