use super::{
  AnnotationContext,
  annotations::{AnnotatedModel, MethodAnnotation, PathBindingAnnotation, ServiceAnnotation},
  config::CodecOptions,
  doc_lines,
  errors::ConfigError,
  metrics::{AnnotationStats, AnnotationWarning},
  naming::identifiers::{to_feature_name, to_rust_field_name, to_rust_type_name},
  resource_names::resource_name_candidates,
  routing::{annotate_binding, is_idempotent},
  types::UNKNOWN_TYPE,
};
use crate::model::{EMPTY_MESSAGE_ID, Method, Service};

/// A service with at least one generated method.
#[derive(Debug, Clone)]
pub(crate) struct RetainedService<'a> {
  pub service: &'a Service,
  pub feature: String,
  pub methods: Vec<&'a Method>,
}

impl<'a> RetainedService<'a> {
  /// Request and response type IDs of the generated methods.
  pub fn seed_types(&self) -> impl Iterator<Item = &'a str> + '_ {
    self
      .methods
      .iter()
      .copied()
      .flat_map(|method| [method.input_type_id.as_str(), method.output_type_id.as_str()])
  }
}

/// Streaming methods and methods without HTTP bindings are gRPC-only.
pub(crate) fn is_generated(options: &CodecOptions, method: &Method) -> bool {
  options.include_grpc_only_methods || (!method.is_streaming() && method.path_info.is_some())
}

/// Annotates the service and its generated methods.
///
/// Returns `None` when no method is generated; such a service is dropped.
pub(crate) fn annotate_service<'a>(
  ctx: &AnnotationContext<'_>,
  service: &'a Service,
  model: &mut AnnotatedModel,
  stats: &mut AnnotationStats,
) -> Result<Option<RetainedService<'a>>, ConfigError> {
  let (generated, skipped): (Vec<&Method>, Vec<&Method>) =
    service.methods.iter().partition(|method| is_generated(ctx.options, method));
  for method in &skipped {
    tracing::debug!(method = %method.id, "skipping gRPC-only method");
    stats.record_skipped_method();
  }
  if generated.is_empty() {
    tracing::debug!(service = %service.id, "service has no generated methods");
    return Ok(None);
  }

  let name = to_rust_type_name(&service.name);
  for method in &generated {
    let annotation = annotate_method(ctx, &name, method, model, stats)?;
    model.methods.insert(method.id.clone(), annotation);
    stats.record_method();
  }

  let feature = to_feature_name(&service.name);
  model.services.insert(
    service.id.clone(),
    ServiceAnnotation {
      module_name: to_rust_field_name(&service.name),
      name,
      feature_name: feature.clone(),
      default_host: service.default_host.clone(),
      methods: generated.iter().map(|method| method.id.clone()).collect(),
      docs: doc_lines(&service.documentation),
    },
  );
  stats.record_service();

  Ok(Some(RetainedService {
    service,
    feature,
    methods: generated,
  }))
}

fn annotate_method(
  ctx: &AnnotationContext<'_>,
  service_name: &str,
  method: &Method,
  model: &AnnotatedModel,
  stats: &mut AnnotationStats,
) -> Result<MethodAnnotation, ConfigError> {
  let input_type = type_name(ctx, model, &method.input_type_id, &method.id, stats)?;
  let return_type = if method.output_type_id == EMPTY_MESSAGE_ID {
    UNKNOWN_TYPE.to_string()
  } else {
    type_name(ctx, model, &method.output_type_id, &method.id, stats)?
  };

  let (resource_names, path_bindings) = match ctx.index.message(&method.input_type_id) {
    Some(input) => {
      let bindings: Vec<PathBindingAnnotation> = method
        .path_info
        .iter()
        .flat_map(|info| {
          info
            .bindings
            .iter()
            .map(move |binding| (binding, info.body_field_path.as_deref()))
        })
        .map(|(binding, body)| annotate_binding(ctx.index, &method.id, input, binding, body, stats))
        .collect();
      (resource_name_candidates(ctx.index, method, input, stats), bindings)
    }
    None => (vec![], vec![]),
  };

  let bindings = method
    .path_info
    .as_ref()
    .map(|info| info.bindings.as_slice())
    .unwrap_or_default();

  Ok(MethodAnnotation {
    name: to_rust_field_name(&method.name),
    builder_name: to_rust_type_name(&method.name),
    service_name: service_name.to_string(),
    input_type,
    return_type,
    resource_names,
    path_bindings,
    is_idempotent: is_idempotent(bindings),
    docs: doc_lines(&method.documentation),
  })
}

/// Qualified name of a request or response type.
///
/// Types annotated in an earlier phase are reused; anything else is qualified
/// on demand. Unknown IDs degrade to `()`.
fn type_name(
  ctx: &AnnotationContext<'_>,
  model: &AnnotatedModel,
  id: &str,
  referenced_by: &str,
  stats: &mut AnnotationStats,
) -> Result<String, ConfigError> {
  if let Some(name) = model.type_qualified_name(id) {
    return Ok(name.to_string());
  }
  match ctx.qualifier.by_id(id)? {
    Some(name) => Ok(name.qualified),
    None => {
      stats.record_warning(AnnotationWarning::MissingType {
        id: id.to_string(),
        referenced_by: referenced_by.to_string(),
      });
      Ok(UNKNOWN_TYPE.to_string())
    }
  }
}
