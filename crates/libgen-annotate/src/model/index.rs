use std::collections::{BTreeMap, BTreeSet};

use super::{Api, Enum, Field, Message};

/// ID lookup tables over an [`Api`].
#[derive(Debug)]
pub struct ApiIndex<'a> {
  api: &'a Api,
  messages: BTreeMap<&'a str, &'a Message>,
  enums: BTreeMap<&'a str, &'a Enum>,
  parents: BTreeSet<&'a str>,
}

impl<'a> ApiIndex<'a> {
  pub fn new(api: &'a Api) -> Self {
    let messages = api.messages.iter().map(|m| (m.id.as_str(), m)).collect();
    let enums = api.enums.iter().map(|e| (e.id.as_str(), e)).collect();
    let parents = api
      .messages
      .iter()
      .filter(|m| !m.is_map_entry)
      .filter_map(|m| m.parent.as_deref())
      .chain(api.enums.iter().filter_map(|e| e.parent.as_deref()))
      .collect();

    Self {
      api,
      messages,
      enums,
      parents,
    }
  }

  pub fn api(&self) -> &'a Api {
    self.api
  }

  pub fn message(&self, id: &str) -> Option<&'a Message> {
    self.messages.get(id).copied()
  }

  pub fn enum_by_id(&self, id: &str) -> Option<&'a Enum> {
    self.enums.get(id).copied()
  }

  /// Whether any message or enum (map entries aside) is nested in `id`.
  pub fn has_nested_types(&self, id: &str) -> bool {
    self.parents.contains(id)
  }

  pub fn is_own_package(&self, package: &str) -> bool {
    package == self.api.package_name
  }

  /// Unqualified source name of a message or enum.
  pub fn type_source_name(&self, id: &str) -> Option<&'a str> {
    self
      .message(id)
      .map(|m| m.name.as_str())
      .or_else(|| self.enum_by_id(id).map(|e| e.name.as_str()))
  }

  /// Enclosing messages of a type, outermost first.
  ///
  /// The walk stops at the first parent ID missing from the index.
  pub fn enclosing_messages(&self, parent: Option<&str>) -> Vec<&'a Message> {
    let mut chain = vec![];
    let mut current = parent;
    while let Some(id) = current {
      let Some(message) = self.message(id) else {
        break;
      };
      if chain.iter().any(|m: &&Message| m.id == message.id) {
        break;
      }
      chain.push(message);
      current = message.parent.as_deref();
    }
    chain.reverse();
    chain
  }

  /// The value field of a map entry message.
  pub fn map_value_field(&self, entry_id: &str) -> Option<&'a Field> {
    self.message(entry_id).and_then(|entry| entry.field("value"))
  }

  pub fn map_key_field(&self, entry_id: &str) -> Option<&'a Field> {
    self.message(entry_id).and_then(|entry| entry.field("key"))
  }
}
