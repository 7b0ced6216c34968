//! Per-service Cargo features.
//!
//! Each retained service contributes one feature. A type used by a service is
//! gated on that feature, so a crate built with a subset of features only
//! compiles the types those services need.

use itertools::Itertools;

use super::{
  AnnotationContext,
  annotations::{AnnotatedModel, FeatureGates, GateOperator},
  methods::RetainedService,
  metrics::{AnnotationStats, AnnotationWarning},
};

/// Feature names of the retained services, sorted and deduplicated.
pub(crate) fn all_features(services: &[RetainedService<'_>]) -> Vec<String> {
  services
    .iter()
    .map(|service| service.feature.clone())
    .sorted()
    .dedup()
    .collect()
}

/// Configured default features, or every service feature.
pub(crate) fn default_features(ctx: &AnnotationContext<'_>, all_features: &[String]) -> Vec<String> {
  ctx
    .options
    .default_features
    .clone()
    .unwrap_or_else(|| all_features.to_vec())
}

/// Gates own-package types on the features of the services that use them.
///
/// Gates only ever grow. Types no service reaches are gated on every feature
/// with `all`.
pub(crate) fn apply_feature_gates<'a>(
  ctx: &AnnotationContext<'a>,
  services: &[RetainedService<'a>],
  model: &mut AnnotatedModel,
) {
  for service in services {
    let used = ctx.types.reachable_from(service.seed_types());
    for id in used {
      if let Some(message) = model.messages.get_mut(id).filter(|m| !m.basic) {
        add_gate(&mut message.feature_gates, &service.feature);
      } else if let Some(enumeration) = model.enums.get_mut(id).filter(|e| !e.basic) {
        add_gate(&mut enumeration.feature_gates, &service.feature);
      }
    }
  }

  let every_feature = FeatureGates {
    features: services.iter().map(|service| service.feature.clone()).collect(),
    operator: GateOperator::All,
  };
  let ungated_messages = model
    .messages
    .values_mut()
    .filter(|m| !m.basic)
    .map(|m| &mut m.feature_gates);
  let ungated_enums = model
    .enums
    .values_mut()
    .filter(|e| !e.basic)
    .map(|e| &mut e.feature_gates);
  for gates in ungated_messages.chain(ungated_enums).filter(|gates| gates.is_empty()) {
    gates.clone_from(&every_feature);
  }
}

fn add_gate(gates: &mut FeatureGates, feature: &str) {
  gates.add(feature);
  gates.operator = GateOperator::Any;
}

/// Advises enabling per-service features for large crates built without them.
pub(crate) fn check_service_count(ctx: &AnnotationContext<'_>, retained: usize, stats: &mut AnnotationStats) {
  let threshold = ctx.options.service_advisory_threshold;
  if !ctx.options.per_service_features && retained > threshold {
    stats.record_warning(AnnotationWarning::ServiceCountAdvisory {
      count: retained,
      threshold,
    });
  }
}
