//! Accessor-chain expressions that read a (possibly nested) request field.
//!
//! The chain starts from `Some(&req)` and threads an `Option` through every
//! hop, so a missing optional message or an unset oneof branch short-circuits
//! to `None`. Every hop borrows; nothing is cloned or moved.

use strum::Display;

use super::naming::identifiers::to_rust_field_name;
use crate::model::{ApiIndex, Field, FieldType, Message};

const CHAIN_ROOT: &str = "Some(&req)";

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub(crate) enum AccessorError {
  #[strum(to_string = "empty field path")]
  EmptyPath,
  #[strum(to_string = "no field '{field}' in '{message_id}'")]
  UnknownField { field: String, message_id: String },
  #[strum(to_string = "field '{field}' is not a singular message")]
  NotAMessage { field: String },
  #[strum(to_string = "unknown message '{id}'")]
  MissingMessage { id: String },
}

impl std::error::Error for AccessorError {}

/// Builds the chain for `path`, which evaluates to `Option<&T>` (or
/// `Option<&str>` for a singular string leaf).
pub(crate) fn field_accessor<'a>(
  index: &ApiIndex<'a>,
  root: &'a Message,
  path: &[String],
) -> Result<String, AccessorError> {
  let (last, intermediate) = path.split_last().ok_or(AccessorError::EmptyPath)?;

  let mut message = root;
  let mut expression = CHAIN_ROOT.to_string();
  for name in intermediate {
    let field = lookup(message, name)?;
    if !is_singular_message(field) {
      return Err(AccessorError::NotAMessage { field: name.clone() });
    }
    expression.push_str(&hop(field));
    let type_id = field.type_id.as_deref().unwrap_or_default();
    message = index
      .message(type_id)
      .ok_or_else(|| AccessorError::MissingMessage { id: type_id.to_string() })?;
  }

  let leaf = lookup(message, last)?;
  expression.push_str(&hop(leaf));
  if leaf.typez == FieldType::String && !leaf.repeated && !leaf.map {
    expression.push_str(".map(|s| s.as_str())");
  }

  Ok(expression)
}

pub(crate) fn is_singular_message(field: &Field) -> bool {
  field.typez.is_message() && !field.repeated && !field.map
}

fn lookup<'a>(message: &'a Message, name: &str) -> Result<&'a Field, AccessorError> {
  message.field(name).ok_or_else(|| AccessorError::UnknownField {
    field: name.to_string(),
    message_id: message.id.clone(),
  })
}

fn hop(field: &Field) -> String {
  let name = to_rust_field_name(&field.name);
  if field.is_oneof() {
    format!(".and_then(|m| m.{name}())")
  } else if field.optional || is_singular_message(field) {
    format!(".and_then(|m| m.{name}.as_ref())")
  } else {
    format!(".map(|m| &m.{name})")
  }
}
