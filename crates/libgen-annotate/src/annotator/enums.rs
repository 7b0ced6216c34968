use std::collections::BTreeSet;

use super::{
  AnnotationContext,
  annotations::{AnnotatedModel, EnumAnnotation, EnumExample, EnumValueAnnotation},
  doc_lines,
  errors::ConfigError,
  naming::identifiers::{to_rust_const_name, to_rust_type_name},
};
use crate::model::{Enum, EnumValue};

const MAX_EXAMPLES: usize = 3;

/// Variant name for a value, dropping the enum-name prefix protobuf style
/// guides require (`STATE_ENABLED` in `State` becomes `Enabled`).
///
/// The prefix stays when stripping would leave nothing or a leading digit.
pub(crate) fn variant_name(enum_name: &str, value_name: &str) -> String {
  let prefix = format!("{}_", to_rust_const_name(enum_name));
  let stripped = value_name
    .strip_prefix(&prefix)
    .filter(|rest| !rest.is_empty() && !rest.starts_with(|c: char| c.is_ascii_digit()))
    .unwrap_or(value_name);
  to_rust_type_name(&stripped.to_ascii_lowercase())
}

/// Annotates an enum and all of its values.
///
/// External enums are `basic`: naming data only.
pub(crate) fn annotate_enum(
  ctx: &AnnotationContext<'_>,
  enumeration: &Enum,
  basic: bool,
  model: &mut AnnotatedModel,
) -> Result<(), ConfigError> {
  let names = ctx.qualifier.enumeration(enumeration)?;
  if basic {
    model.enums.insert(
      enumeration.id.clone(),
      EnumAnnotation {
        name: names.name,
        module_path: names.module_path,
        qualified_name: names.qualified,
        relative_name: names.relative,
        example_name: names.example,
        alias: names.alias,
        basic,
        ..Default::default()
      },
    );
    return Ok(());
  }

  let mut seen = BTreeSet::new();
  let mut unique_values: Vec<&EnumValue> = vec![];
  for value in &enumeration.values {
    let variant = variant_name(&enumeration.name, &value.name);
    if seen.insert(variant.to_ascii_lowercase()) {
      unique_values.push(value);
    }
    model.enum_values.insert(
      value.id.clone(),
      EnumValueAnnotation {
        variant_name: variant,
        constant_name: to_rust_const_name(&value.name),
        number: value.number,
        docs: doc_lines(&value.documentation),
      },
    );
  }

  let examples = unique_values
    .iter()
    .filter(|value| !value.deprecated && value.number != 0)
    .take(MAX_EXAMPLES)
    .map(|value| EnumExample {
      value_id: value.id.clone(),
      expression: format!("{}::{}", names.example, variant_name(&enumeration.name, &value.name)),
    })
    .collect();

  model.enums.insert(
    enumeration.id.clone(),
    EnumAnnotation {
      name: names.name,
      module_path: names.module_path,
      qualified_name: names.qualified,
      relative_name: names.relative,
      example_name: names.example,
      alias: names.alias,
      unique_values: unique_values.iter().map(|value| value.id.clone()).collect(),
      examples,
      internal: ctx.options.internal_types.contains(&enumeration.id),
      deprecated: enumeration.deprecated,
      docs: doc_lines(&enumeration.documentation),
      ..Default::default()
    },
  );
  Ok(())
}
