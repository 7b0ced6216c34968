use super::{
  AnnotationContext,
  annotations::{AnnotatedModel, FieldAnnotation, MessageAnnotation, OneOfAnnotation},
  doc_lines,
  errors::ConfigError,
  metrics::AnnotationStats,
  naming::identifiers::{to_rust_field_name, to_rust_type_name, to_snake_no_mangling},
  oneof::best_field,
  serde_as,
  types::resolve_field_type,
};
use crate::model::{Field, Message};

/// Annotates a message with only its naming data.
pub(crate) fn annotate_basic_message(
  ctx: &AnnotationContext<'_>,
  message: &Message,
  model: &mut AnnotatedModel,
) -> Result<(), ConfigError> {
  let names = ctx.qualifier.message(message)?;
  model.messages.insert(
    message.id.clone(),
    MessageAnnotation {
      module_name: ctx.qualifier.module_name(message),
      name: names.name,
      module_path: names.module_path,
      qualified_name: names.qualified,
      relative_name: names.relative,
      example_name: names.example,
      alias: names.alias,
      basic: true,
      ..Default::default()
    },
  );
  Ok(())
}

/// Annotates an own-package message with its fields and oneofs.
pub(crate) fn annotate_message(
  ctx: &AnnotationContext<'_>,
  message: &Message,
  model: &mut AnnotatedModel,
  stats: &mut AnnotationStats,
) -> Result<(), ConfigError> {
  let names = ctx.qualifier.message(message)?;

  for field in &message.fields {
    let annotation = annotate_field(ctx, message, &names.name, field, stats)?;
    model.fields.insert(field.id.clone(), annotation);
  }

  for oneof in &message.oneofs {
    let oneof_names = ctx.qualifier.oneof(message, &names, oneof);
    model.oneofs.insert(
      oneof.id.clone(),
      OneOfAnnotation {
        enum_name: oneof_names.enum_name,
        field_name: oneof_names.field_name,
        qualified_name: oneof_names.qualified,
        relative_name: oneof_names.relative,
        alias: oneof_names.alias,
        example_field: best_field(message.oneof_fields(oneof)).map(|field| field.id.clone()),
        branches: message.oneof_fields(oneof).map(|field| field.id.clone()).collect(),
        docs: doc_lines(&oneof.documentation),
      },
    );
  }

  model.messages.insert(
    message.id.clone(),
    MessageAnnotation {
      module_name: ctx.qualifier.module_name(message),
      name: names.name,
      module_path: names.module_path,
      qualified_name: names.qualified,
      relative_name: names.relative,
      example_name: names.example,
      alias: names.alias,
      internal: ctx.options.internal_types.contains(&message.id),
      deprecated: message.deprecated,
      docs: doc_lines(&message.documentation),
      basic: false,
      has_nested_types: ctx.index.has_nested_types(&message.id),
      fields: message.fields.iter().map(|field| field.id.clone()).collect(),
      oneofs: message.oneofs.iter().map(|oneof| oneof.id.clone()).collect(),
      ..Default::default()
    },
  );
  Ok(())
}

fn annotate_field(
  ctx: &AnnotationContext<'_>,
  container: &Message,
  container_name: &str,
  field: &Field,
  stats: &mut AnnotationStats,
) -> Result<FieldAnnotation, ConfigError> {
  let is_boxed = serde_as::needs_box(&ctx.types, &container.id, field);
  let resolved = resolve_field_type(ctx, field, is_boxed, stats)?;

  Ok(FieldAnnotation {
    field_name: to_rust_field_name(&field.name),
    setter_name: format!("set_{}", to_snake_no_mangling(&field.name)),
    branch_name: field.is_oneof().then(|| to_rust_type_name(&field.name)),
    field_type: resolved.field_type,
    primitive_field_type: resolved.primitive_field_type,
    serde_as: serde_as::field_adapter(ctx.index, field, ctx.options.bytes_alphabet),
    skip_if_is_default: serde_as::skip_if_is_default(field),
    is_boxed,
    alias: ctx.qualifier.field_alias(container, container_name, field),
    docs: doc_lines(&field.documentation),
  })
}

