//! The linked API model handed to the annotator.
//!
//! Entities reference each other by fully-qualified ID (for example
//! `.google.cloud.secretmanager.v1.Secret`). Nesting is expressed through
//! `parent` IDs rather than ownership, so every message and enum of the API,
//! own-package or external, lives in a flat list in declaration order.

mod index;
mod path;

#[cfg(test)]
mod tests;

pub use index::ApiIndex;
pub use path::{PathBinding, PathInfo, PathParseError, PathSegment, PathTemplate, PathVariable};
use serde::{Deserialize, Serialize};
use strum::Display;

pub const EMPTY_MESSAGE_ID: &str = ".google.protobuf.Empty";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase", default)]
pub struct Api {
  #[builder(into)]
  pub name: String,
  #[builder(into)]
  pub package_name: String,
  #[builder(default, into)]
  pub title: String,
  #[builder(into)]
  pub description: Option<String>,
  #[builder(default)]
  pub messages: Vec<Message>,
  #[builder(default)]
  pub enums: Vec<Enum>,
  #[builder(default)]
  pub services: Vec<Service>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase", default)]
pub struct Message {
  #[builder(into)]
  pub id: String,
  #[builder(into)]
  pub name: String,
  #[builder(into)]
  pub package: String,
  #[builder(into)]
  pub parent: Option<String>,
  #[builder(default, into)]
  pub documentation: String,
  #[builder(default)]
  pub deprecated: bool,
  #[builder(default)]
  pub fields: Vec<Field>,
  #[builder(default)]
  pub oneofs: Vec<OneOf>,
  #[builder(default)]
  pub is_map_entry: bool,
}

impl Message {
  pub fn field(&self, name: &str) -> Option<&Field> {
    self.fields.iter().find(|f| f.name == name)
  }

  /// Members of a oneof, in declaration order.
  pub fn oneof_fields<'a>(&'a self, oneof: &'a OneOf) -> impl Iterator<Item = &'a Field> {
    self
      .fields
      .iter()
      .filter(move |f| f.oneof.as_deref() == Some(oneof.id.as_str()))
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FieldType {
  Double,
  Float,
  Int64,
  Uint64,
  Int32,
  Fixed64,
  Fixed32,
  Bool,
  #[default]
  String,
  Bytes,
  Uint32,
  Sfixed32,
  Sfixed64,
  Sint32,
  Sint64,
  Message,
  Enum,
}

impl FieldType {
  #[must_use]
  pub fn is_message(self) -> bool {
    matches!(self, Self::Message)
  }

  #[must_use]
  pub fn is_string_like(self) -> bool {
    matches!(self, Self::String | Self::Bytes)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase", default)]
pub struct Field {
  #[builder(into)]
  pub id: String,
  #[builder(into)]
  pub name: String,
  #[builder(default)]
  pub typez: FieldType,
  /// Message or enum ID for `FieldType::Message` and `FieldType::Enum`.
  #[builder(into)]
  pub type_id: Option<String>,
  #[builder(default)]
  pub repeated: bool,
  /// Explicit presence (proto3 `optional`).
  #[builder(default)]
  pub optional: bool,
  #[builder(default)]
  pub map: bool,
  #[builder(default)]
  pub deprecated: bool,
  #[builder(default)]
  pub resource_reference: bool,
  /// ID of the oneof this field belongs to.
  #[builder(into)]
  pub oneof: Option<String>,
  #[builder(default, into)]
  pub documentation: String,
}

impl Field {
  #[must_use]
  pub fn is_oneof(&self) -> bool {
    self.oneof.is_some()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase", default)]
pub struct OneOf {
  #[builder(into)]
  pub id: String,
  #[builder(into)]
  pub name: String,
  #[builder(default, into)]
  pub documentation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase", default)]
pub struct Enum {
  #[builder(into)]
  pub id: String,
  #[builder(into)]
  pub name: String,
  #[builder(into)]
  pub package: String,
  #[builder(into)]
  pub parent: Option<String>,
  #[builder(default, into)]
  pub documentation: String,
  #[builder(default)]
  pub deprecated: bool,
  #[builder(default)]
  pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase", default)]
pub struct EnumValue {
  #[builder(into)]
  pub id: String,
  #[builder(into)]
  pub name: String,
  #[builder(default)]
  pub number: i32,
  #[builder(default)]
  pub deprecated: bool,
  #[builder(default, into)]
  pub documentation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
  #[builder(into)]
  pub id: String,
  #[builder(into)]
  pub name: String,
  #[builder(into)]
  pub package: String,
  #[builder(default, into)]
  pub documentation: String,
  #[builder(default, into)]
  pub default_host: String,
  #[builder(default)]
  pub deprecated: bool,
  #[builder(default)]
  pub methods: Vec<Method>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase", default)]
pub struct Method {
  #[builder(into)]
  pub id: String,
  #[builder(into)]
  pub name: String,
  #[builder(default, into)]
  pub documentation: String,
  #[builder(into)]
  pub input_type_id: String,
  #[builder(into)]
  pub output_type_id: String,
  #[builder(default)]
  pub client_side_streaming: bool,
  #[builder(default)]
  pub server_side_streaming: bool,
  #[builder(default)]
  pub deprecated: bool,
  pub path_info: Option<PathInfo>,
}

impl Method {
  #[must_use]
  pub fn is_streaming(&self) -> bool {
    self.client_side_streaming || self.server_side_streaming
  }
}
