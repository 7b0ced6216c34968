use std::collections::BTreeSet;

use super::{
  accessors::{field_accessor, is_singular_message},
  annotations::ResourceNameCandidate,
  metrics::{AnnotationStats, AnnotationWarning},
};
use crate::model::{ApiIndex, Field, FieldType, Message, Method};

fn is_resource_field(field: &Field) -> bool {
  field.typez == FieldType::String && !field.repeated && !field.map && field.resource_reference
}

/// Dotted field paths bound by any of the method's path variables.
pub(crate) fn path_parameters(method: &Method) -> BTreeSet<String> {
  method
    .path_info
    .iter()
    .flat_map(|info| &info.bindings)
    .flat_map(|binding| binding.template.variables())
    .map(|variable| variable.dotted_path())
    .collect()
}

/// Fields of the request that may hold the name of the targeted resource.
///
/// Top-level candidates rank before nested ones, and path parameters before
/// other fields. Scanning stops one message below the request.
pub(crate) fn resource_name_candidates(
  index: &ApiIndex<'_>,
  method: &Method,
  input: &Message,
  stats: &mut AnnotationStats,
) -> Vec<ResourceNameCandidate> {
  let path_parameters = path_parameters(method);
  let mut paths: Vec<Vec<String>> = vec![];

  for field in &input.fields {
    if is_resource_field(field) {
      paths.push(vec![field.name.clone()]);
    } else if is_singular_message(field) {
      let type_id = field.type_id.as_deref().unwrap_or_default();
      let Some(nested) = index.message(type_id) else {
        stats.record_warning(AnnotationWarning::MissingType {
          id: type_id.to_string(),
          referenced_by: field.id.clone(),
        });
        continue;
      };
      paths.extend(
        nested
          .fields
          .iter()
          .filter(|inner| is_resource_field(inner))
          .map(|inner| vec![field.name.clone(), inner.name.clone()]),
      );
    }
  }

  let mut candidates = paths
    .into_iter()
    .filter_map(|path| {
      let accessor = field_accessor(index, input, &path).ok()?;
      Some(ResourceNameCandidate {
        is_nested: path.len() > 1,
        is_path_parameter: path_parameters.contains(&path.join(".")),
        accessor,
        field_path: path,
      })
    })
    .collect::<Vec<_>>();

  candidates.sort_by_key(|c| (c.is_nested, !c.is_path_parameter));
  candidates
}
