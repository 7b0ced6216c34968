use super::{
  AnnotationContext,
  errors::ConfigError,
  metrics::{AnnotationStats, AnnotationWarning},
};
use crate::model::{Field, FieldType};

/// Stand-in for a type the model does not define.
pub(crate) const UNKNOWN_TYPE: &str = "()";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedType {
  pub field_type: String,
  pub primitive_field_type: String,
}

fn scalar_type(typez: FieldType) -> Option<&'static str> {
  match typez {
    FieldType::Double => Some("f64"),
    FieldType::Float => Some("f32"),
    FieldType::Int64 | FieldType::Sint64 | FieldType::Sfixed64 => Some("i64"),
    FieldType::Uint64 | FieldType::Fixed64 => Some("u64"),
    FieldType::Int32 | FieldType::Sint32 | FieldType::Sfixed32 => Some("i32"),
    FieldType::Uint32 | FieldType::Fixed32 => Some("u32"),
    FieldType::Bool => Some("bool"),
    FieldType::String => Some("std::string::String"),
    FieldType::Bytes => Some("::bytes::Bytes"),
    FieldType::Message | FieldType::Enum => None,
  }
}

/// Rust type of one element of `field`: a scalar or the qualified message/enum name.
///
/// A type ID missing from the model is reported and resolves to `()`.
pub(crate) fn element_type(
  ctx: &AnnotationContext<'_>,
  field: &Field,
  referenced_by: &str,
  stats: &mut AnnotationStats,
) -> Result<String, ConfigError> {
  if let Some(scalar) = scalar_type(field.typez) {
    return Ok(scalar.to_string());
  }

  let type_id = field.type_id.as_deref().unwrap_or_default();
  match ctx.qualifier.by_id(type_id)? {
    Some(name) => Ok(name.qualified),
    None => {
      stats.record_warning(AnnotationWarning::MissingType {
        id: type_id.to_string(),
        referenced_by: referenced_by.to_string(),
      });
      Ok(UNKNOWN_TYPE.to_string())
    }
  }
}

/// Resolves the full field type, including container and presence wrappers.
pub(crate) fn resolve_field_type(
  ctx: &AnnotationContext<'_>,
  field: &Field,
  is_boxed: bool,
  stats: &mut AnnotationStats,
) -> Result<ResolvedType, ConfigError> {
  if field.map {
    return resolve_map_type(ctx, field, stats);
  }

  let primitive = element_type(ctx, field, &field.id, stats)?;
  let field_type = if field.repeated {
    format!("std::vec::Vec<{primitive}>")
  } else if is_boxed && field.is_oneof() {
    format!("std::boxed::Box<{primitive}>")
  } else if is_boxed {
    format!("std::option::Option<std::boxed::Box<{primitive}>>")
  } else if field.optional || (field.typez.is_message() && !field.is_oneof()) {
    format!("std::option::Option<{primitive}>")
  } else {
    primitive.clone()
  };

  Ok(ResolvedType {
    field_type,
    primitive_field_type: primitive,
  })
}

fn resolve_map_type(
  ctx: &AnnotationContext<'_>,
  field: &Field,
  stats: &mut AnnotationStats,
) -> Result<ResolvedType, ConfigError> {
  let entry_id = field.type_id.as_deref().unwrap_or_default();
  let (Some(key), Some(value)) = (ctx.index.map_key_field(entry_id), ctx.index.map_value_field(entry_id)) else {
    stats.record_warning(AnnotationWarning::MissingType {
      id: entry_id.to_string(),
      referenced_by: field.id.clone(),
    });
    let fallback = format!("std::collections::HashMap<{UNKNOWN_TYPE}, {UNKNOWN_TYPE}>");
    return Ok(ResolvedType {
      field_type: fallback.clone(),
      primitive_field_type: fallback,
    });
  };

  let key_type = element_type(ctx, key, &field.id, stats)?;
  let value_type = element_type(ctx, value, &field.id, stats)?;
  let map_type = format!("std::collections::HashMap<{key_type}, {value_type}>");
  Ok(ResolvedType {
    field_type: map_type.clone(),
    primitive_field_type: map_type,
  })
}
