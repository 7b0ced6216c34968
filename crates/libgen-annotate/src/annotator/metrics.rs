use strum::Display;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnnotationStats {
  pub messages_annotated: usize,
  pub enums_annotated: usize,
  pub external_types_annotated: usize,
  pub services_annotated: usize,
  pub methods_annotated: usize,
  pub methods_skipped: usize,
  pub features_generated: usize,
  pub warnings: Vec<AnnotationWarning>,
}

impl AnnotationStats {
  pub fn record_message(&mut self) {
    self.messages_annotated += 1;
  }

  pub fn record_enum(&mut self) {
    self.enums_annotated += 1;
  }

  pub fn record_external_type(&mut self) {
    self.external_types_annotated += 1;
  }

  pub fn record_service(&mut self) {
    self.services_annotated += 1;
  }

  pub fn record_method(&mut self) {
    self.methods_annotated += 1;
  }

  pub fn record_skipped_method(&mut self) {
    self.methods_skipped += 1;
  }

  pub fn record_features(&mut self, count: usize) {
    self.features_generated += count;
  }

  /// Keeps the warning for the final report.
  pub fn record_warning(&mut self, warning: AnnotationWarning) {
    self.warnings.push(warning);
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum AnnotationWarning {
  #[strum(to_string = "'{referenced_by}' references unknown type '{id}'")]
  MissingType { id: String, referenced_by: String },
  #[strum(to_string = "[{method_id}] cannot resolve field path '{field_path}': {reason}")]
  UnresolvedFieldPath {
    method_id: String,
    field_path: String,
    reason: String,
  },
  #[strum(to_string = "[{method_id}] unsupported HTTP verb '{verb}'")]
  UnsupportedVerb { method_id: String, verb: String },
  #[strum(
    to_string = "{count} services are generated without per-service features (threshold {threshold}); consider enabling `per-service-features`"
  )]
  ServiceCountAdvisory { count: usize, threshold: usize },
}

impl AnnotationWarning {
  /// Advisories describe the configuration, not a problem in the model.
  pub fn is_advisory(&self) -> bool {
    matches!(self, Self::ServiceCountAdvisory { .. })
  }
}
