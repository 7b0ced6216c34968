//! Qualified, relative, and example names for messages, enums, and oneofs.
//!
//! A qualified name is built from the root module (the configured module path
//! for own-package types, or the alias of an extern-package mapping), one
//! snake_case module per enclosing message, and the PascalCase leaf.

use std::collections::{BTreeMap, BTreeSet};

use super::{
  config::CodecOptions,
  errors::ConfigError,
  naming::identifiers::{ensure_unique, to_rust_field_name, to_rust_type_name},
};
use crate::model::{ApiIndex, Enum, Field, FieldType, Message, OneOf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QualifiedName {
  /// Leaf identifier, after overrides and collision aliases.
  pub name: String,
  /// Module the type is declared in.
  pub module_path: String,
  pub qualified: String,
  pub relative: String,
  pub example: String,
  /// Set when a scope collision renamed the type.
  pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OneOfNames {
  pub enum_name: String,
  pub field_name: String,
  pub qualified: String,
  pub relative: String,
  pub alias: Option<String>,
}

pub(crate) struct Qualifier<'a> {
  index: &'a ApiIndex<'a>,
  options: &'a CodecOptions,
  crate_namespace: String,
  scope_aliases: BTreeMap<&'a str, String>,
}

impl<'a> Qualifier<'a> {
  pub fn new(index: &'a ApiIndex<'a>, options: &'a CodecOptions, crate_namespace: String) -> Self {
    let scope_aliases = resolve_scope_collisions(index, options);
    Self {
      index,
      options,
      crate_namespace,
      scope_aliases,
    }
  }

  pub fn crate_namespace(&self) -> &str {
    &self.crate_namespace
  }

  pub fn message(&self, message: &Message) -> Result<QualifiedName, ConfigError> {
    self.qualify(&message.id, &message.name, &message.package, message.parent.as_deref())
  }

  pub fn enumeration(&self, enumeration: &Enum) -> Result<QualifiedName, ConfigError> {
    self.qualify(
      &enumeration.id,
      &enumeration.name,
      &enumeration.package,
      enumeration.parent.as_deref(),
    )
  }

  /// Qualifies any known message or enum by ID.
  pub fn by_id(&self, id: &str) -> Result<Option<QualifiedName>, ConfigError> {
    if let Some(message) = self.index.message(id) {
      return self.message(message).map(Some);
    }
    if let Some(enumeration) = self.index.enum_by_id(id) {
      return self.enumeration(enumeration).map(Some);
    }
    Ok(None)
  }

  /// Target leaf name of a type, honoring overrides and collision aliases.
  pub fn target_name(&self, id: &str, source_name: &str) -> String {
    self
      .scope_aliases
      .get(id)
      .cloned()
      .unwrap_or_else(|| leaf_name(self.options, id, source_name))
  }

  /// Module holding the types nested in `message`.
  pub fn module_name(&self, message: &Message) -> String {
    to_rust_field_name(&self.target_name(&message.id, &message.name))
  }

  pub fn relative_name(&self, qualified: &str) -> String {
    let prefix = format!("{}::", self.options.module_path);
    qualified.strip_prefix(&prefix).unwrap_or(qualified).to_string()
  }

  /// Alias used when a field's type shares its unqualified name with the container.
  pub fn field_alias(&self, container: &Message, container_name: &str, field: &Field) -> Option<String> {
    let target_id = match field.typez {
      FieldType::Message if field.map => {
        let entry = field.type_id.as_deref()?;
        let value = self.index.map_value_field(entry)?;
        if !matches!(value.typez, FieldType::Message | FieldType::Enum) {
          return None;
        }
        value.type_id.as_deref()?
      }
      FieldType::Message | FieldType::Enum => field.type_id.as_deref()?,
      _ => return None,
    };

    if target_id == container.id {
      return None;
    }
    let source_name = self.index.type_source_name(target_id)?;
    if self.target_name(target_id, source_name) != container_name {
      return None;
    }

    let alias = to_rust_type_name(&field.name);
    if alias == container_name {
      Some(format!("{alias}Field"))
    } else {
      Some(alias)
    }
  }

  pub fn oneof(&self, container: &Message, container_name: &QualifiedName, oneof: &OneOf) -> OneOfNames {
    let enum_name = to_rust_type_name(&oneof.name);
    let qualified = format!(
      "{}::{}::{enum_name}",
      container_name.module_path,
      self.module_name(container)
    );
    let alias = (enum_name == container_name.name).then(|| format!("{enum_name}OneOf"));
    OneOfNames {
      field_name: to_rust_field_name(&oneof.name),
      relative: self.relative_name(&qualified),
      qualified,
      enum_name,
      alias,
    }
  }

  fn qualify(
    &self,
    id: &str,
    source_name: &str,
    package: &str,
    parent: Option<&str>,
  ) -> Result<QualifiedName, ConfigError> {
    let module_path = self
      .index
      .enclosing_messages(parent)
      .into_iter()
      .fold(self.root_module(package, id)?, |path, scope| {
        format!("{path}::{}", self.module_name(scope))
      });
    let name = self.target_name(id, source_name);
    let qualified = format!("{module_path}::{name}");
    let relative = self.relative_name(&qualified);
    let example = if self.index.is_own_package(package) {
      self.own_example_name(&relative)
    } else {
      qualified.clone()
    };

    Ok(QualifiedName {
      alias: self.scope_aliases.get(id).cloned(),
      name,
      module_path,
      qualified,
      relative,
      example,
    })
  }

  fn root_module(&self, package: &str, referenced_by: &str) -> Result<String, ConfigError> {
    if self.index.is_own_package(package) {
      return Ok(self.options.module_path.clone());
    }
    let source = package.trim_start_matches('.');
    self
      .options
      .extern_package_for(source)
      .map(|pkg| pkg.alias.clone())
      .ok_or_else(|| ConfigError::MissingPackageMapping {
        package: source.to_string(),
        referenced_by: referenced_by.to_string(),
      })
  }

  fn own_example_name(&self, relative: &str) -> String {
    match self.options.module_path.strip_prefix("crate") {
      Some(rest) => format!("{}{rest}::{relative}", self.crate_namespace),
      None => format!("{}::{}::{relative}", self.crate_namespace, self.options.module_path),
    }
  }
}

fn leaf_name(options: &CodecOptions, id: &str, source_name: &str) -> String {
  options
    .name_overrides
    .get(id)
    .cloned()
    .unwrap_or_else(|| to_rust_type_name(source_name))
}

/// Renames types whose target names collide within one module scope.
///
/// Messages claim names before enums, each in declaration order. Map entries
/// never get a Rust type and take no part.
fn resolve_scope_collisions<'a>(index: &ApiIndex<'a>, options: &CodecOptions) -> BTreeMap<&'a str, String> {
  let api = index.api();
  let declared = api
    .messages
    .iter()
    .filter(|m| !m.is_map_entry)
    .map(|m| (m.id.as_str(), m.name.as_str(), m.package.as_str(), m.parent.as_deref()))
    .chain(
      api
        .enums
        .iter()
        .map(|e| (e.id.as_str(), e.name.as_str(), e.package.as_str(), e.parent.as_deref())),
    );

  let mut used: BTreeMap<(&str, Option<&str>), BTreeSet<String>> = BTreeMap::new();
  let mut aliases = BTreeMap::new();
  for (id, source_name, package, parent) in declared {
    let names = used.entry((package, parent)).or_default();
    let name = leaf_name(options, id, source_name);
    let unique = ensure_unique(&name, names);
    if unique != name {
      aliases.insert(id, unique.clone());
    }
    names.insert(unique);
  }
  aliases
}
