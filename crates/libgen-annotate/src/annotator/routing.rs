//! Routing annotations: compiled path templates, substitutions, and query parameters.

use std::collections::BTreeSet;

use http::Method as HttpMethod;
use itertools::Itertools;

use super::{
  accessors::{field_accessor, is_singular_message},
  annotations::{BindingSubstitution, PathBindingAnnotation, QueryParameter, TemplateSegment},
  metrics::{AnnotationStats, AnnotationWarning},
  naming::identifiers::to_rust_field_name,
};
use crate::model::{ApiIndex, Message, PathBinding, PathSegment, PathTemplate, PathVariable};

const WHOLE_REQUEST_BODY: &str = "*";
const SINGLE_WILDCARD: &str = "*";
const MULTI_WILDCARD: &str = "**";
const SUPPORTED_VERBS: [HttpMethod; 5] = [
  HttpMethod::GET,
  HttpMethod::POST,
  HttpMethod::PUT,
  HttpMethod::PATCH,
  HttpMethod::DELETE,
];

/// Compiles a variable's sub-template into literal and wildcard segments.
///
/// Literal text between wildcards, separators included, collapses into one
/// literal. `**` is trailing only as the last of several segments.
pub(crate) fn compile_variable_template(segments: &[String]) -> Vec<TemplateSegment> {
  let mut compiled = vec![];
  let mut buffer = String::new();
  let count = segments.len();

  for (position, segment) in segments.iter().enumerate() {
    if position > 0 {
      buffer.push('/');
    }
    match segment.as_str() {
      SINGLE_WILDCARD => {
        flush_literal(&mut buffer, &mut compiled);
        compiled.push(TemplateSegment::SingleWildcard);
      }
      MULTI_WILDCARD => {
        flush_literal(&mut buffer, &mut compiled);
        if position + 1 == count && count > 1 {
          compiled.push(TemplateSegment::TrailingMultiWildcard);
        } else {
          compiled.push(TemplateSegment::MultiWildcard);
        }
      }
      literal => buffer.push_str(literal),
    }
  }
  flush_literal(&mut buffer, &mut compiled);
  compiled
}

fn flush_literal(buffer: &mut String, compiled: &mut Vec<TemplateSegment>) {
  if !buffer.is_empty() {
    compiled.push(TemplateSegment::Literal(std::mem::take(buffer)));
  }
}

fn template_expr(segments: &[TemplateSegment]) -> String {
  format!("&[{}]", segments.iter().map(TemplateSegment::to_rust).join(", "))
}

/// The path with each variable replaced by `{}`, like `/v1/{}/secrets:access`.
pub(crate) fn path_format(template: &PathTemplate) -> String {
  let mut path = String::new();
  for segment in &template.segments {
    path.push('/');
    match segment {
      PathSegment::Literal(literal) => path.push_str(literal),
      PathSegment::Variable(_) => path.push_str("{}"),
    }
  }
  if let Some(verb) = &template.verb {
    path.push(':');
    path.push_str(verb);
  }
  path
}

/// The verb as an HTTP method, or `None` for verbs a binding cannot use.
pub(crate) fn parse_verb(verb: &str) -> Option<HttpMethod> {
  let method = HttpMethod::from_bytes(verb.to_ascii_uppercase().as_bytes()).ok()?;
  SUPPORTED_VERBS.contains(&method).then_some(method)
}

/// Methods without bindings, or with any POST or PATCH binding, are not idempotent.
pub(crate) fn is_idempotent(bindings: &[PathBinding]) -> bool {
  !bindings.is_empty()
    && bindings
      .iter()
      .filter_map(|binding| parse_verb(&binding.verb))
      .all(|verb| verb != HttpMethod::POST && verb != HttpMethod::PATCH)
}

pub(crate) fn annotate_binding(
  index: &ApiIndex<'_>,
  method_id: &str,
  input: &Message,
  binding: &PathBinding,
  body: Option<&str>,
  stats: &mut AnnotationStats,
) -> PathBindingAnnotation {
  let verb = match parse_verb(&binding.verb) {
    Some(verb) => verb.as_str().to_string(),
    None => {
      stats.record_warning(AnnotationWarning::UnsupportedVerb {
        method_id: method_id.to_string(),
        verb: binding.verb.clone(),
      });
      binding.verb.to_ascii_uppercase()
    }
  };

  let substitutions = binding
    .template
    .variables()
    .map(|variable| substitution(index, method_id, input, variable, stats))
    .collect();

  let query_params = query_parameters(input, &binding.template, body);
  let query_params_can_fail = query_params.iter().any(|param| param.is_structured);

  PathBindingAnnotation {
    verb,
    path_fmt: path_format(&binding.template),
    substitutions,
    query_params,
    has_body: body.is_some(),
    query_params_can_fail,
  }
}

fn substitution(
  index: &ApiIndex<'_>,
  method_id: &str,
  input: &Message,
  variable: &PathVariable,
  stats: &mut AnnotationStats,
) -> BindingSubstitution {
  let field_path = variable.dotted_path();
  let field_accessor = match field_accessor(index, input, &variable.field_path) {
    Ok(accessor) => accessor,
    Err(error) => {
      stats.record_warning(AnnotationWarning::UnresolvedFieldPath {
        method_id: method_id.to_string(),
        field_path: field_path.clone(),
        reason: error.to_string(),
      });
      String::new()
    }
  };
  let template = compile_variable_template(&variable.segments);

  BindingSubstitution {
    template_expr: template_expr(&template),
    field_path,
    field_accessor,
    template,
  }
}

/// Top-level request fields sent as query parameters: neither bound by the
/// path nor carried in the body.
fn query_parameters(input: &Message, template: &PathTemplate, body: Option<&str>) -> Vec<QueryParameter> {
  if body == Some(WHOLE_REQUEST_BODY) {
    return vec![];
  }

  let consumed = template
    .variables()
    .filter_map(|variable| variable.field_path.first())
    .map(String::as_str)
    .collect::<BTreeSet<_>>();

  input
    .fields
    .iter()
    .filter(|field| !consumed.contains(field.name.as_str()) && body != Some(field.name.as_str()))
    .map(|field| QueryParameter {
      name: field.name.clone(),
      field_name: to_rust_field_name(&field.name),
      is_optional: field.optional || is_singular_message(field),
      is_repeated: field.repeated,
      is_structured: field.typez.is_message(),
    })
    .collect()
}
