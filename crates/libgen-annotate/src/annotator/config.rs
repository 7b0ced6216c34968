//! Validated codec options.
//!
//! The upstream configuration arrives as a string-keyed map. Every key is
//! checked against the recognized set when the options are built, so an
//! unsupported option fails the pass before any annotation happens.

use std::{
  collections::{BTreeMap, BTreeSet},
  str::FromStr,
};

use strum::{Display, EnumString};

use super::errors::ConfigError;

pub(crate) const DEFAULT_MODULE_PATH: &str = "crate::model";
pub(crate) const DEFAULT_SERVICE_ADVISORY_THRESHOLD: usize = 15;
const PACKAGE_KEY_PREFIX: &str = "package:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "kebab-case")]
enum OptionKey {
  PackageNameOverride,
  ModulePath,
  PerServiceFeatures,
  DefaultFeatures,
  IncludeGrpcOnlyMethods,
  GenerateSetterSamples,
  GenerateRpcSamples,
  BytesAlphabet,
  TemplateOverride,
  Version,
  CopyrightYear,
  NameOverrides,
  InternalTypes,
  ServiceAdvisoryThreshold,
}

/// Alphabet used by the base64 adapter for `bytes` fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum BytesAlphabet {
  #[default]
  Standard,
  UrlSafe,
}

/// A `package:<alias>` mapping from proto packages to an external crate.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct ExternPackage {
  /// Name the crate is imported under in generated code.
  #[builder(into)]
  pub alias: String,
  #[builder(into)]
  pub crate_name: String,
  #[builder(default)]
  pub sources: Vec<String>,
  #[builder(into)]
  pub feature: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
#[allow(clippy::struct_excessive_bools)]
pub struct CodecOptions {
  #[builder(into)]
  pub package_name_override: Option<String>,
  #[builder(default = DEFAULT_MODULE_PATH.to_string(), into)]
  pub module_path: String,
  #[builder(default)]
  pub per_service_features: bool,
  pub default_features: Option<Vec<String>>,
  #[builder(default)]
  pub include_grpc_only_methods: bool,
  #[builder(default)]
  pub generate_setter_samples: bool,
  #[builder(default)]
  pub generate_rpc_samples: bool,
  #[builder(default)]
  pub bytes_alphabet: BytesAlphabet,
  #[builder(into)]
  pub template_override: Option<String>,
  #[builder(into)]
  pub version: Option<String>,
  #[builder(into)]
  pub copyright_year: Option<String>,
  #[builder(default)]
  pub name_overrides: BTreeMap<String, String>,
  #[builder(default)]
  pub internal_types: BTreeSet<String>,
  #[builder(default = DEFAULT_SERVICE_ADVISORY_THRESHOLD)]
  pub service_advisory_threshold: usize,
  #[builder(default)]
  pub extern_packages: Vec<ExternPackage>,
}

impl Default for CodecOptions {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl CodecOptions {
  /// Builds validated options from the raw key/value map.
  pub fn from_options<'a, I>(options: I) -> Result<Self, ConfigError>
  where
    I: IntoIterator<Item = (&'a str, &'a str)>,
  {
    let mut parsed = Self::default();

    for (key, value) in options {
      if let Some(alias) = key.strip_prefix(PACKAGE_KEY_PREFIX) {
        parsed.extern_packages.push(parse_extern_package(key, alias, value)?);
        continue;
      }

      let option = OptionKey::from_str(key).map_err(|_| ConfigError::UnknownOption { key: key.to_string() })?;
      match option {
        OptionKey::PackageNameOverride => parsed.package_name_override = Some(value.to_string()),
        OptionKey::ModulePath => parsed.module_path = value.to_string(),
        OptionKey::PerServiceFeatures => parsed.per_service_features = parse_bool(key, value)?,
        OptionKey::DefaultFeatures => parsed.default_features = Some(parse_list(value)),
        OptionKey::IncludeGrpcOnlyMethods => parsed.include_grpc_only_methods = parse_bool(key, value)?,
        OptionKey::GenerateSetterSamples => parsed.generate_setter_samples = parse_bool(key, value)?,
        OptionKey::GenerateRpcSamples => parsed.generate_rpc_samples = parse_bool(key, value)?,
        OptionKey::BytesAlphabet => {
          parsed.bytes_alphabet = BytesAlphabet::from_str(value).map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
          })?;
        }
        OptionKey::TemplateOverride => parsed.template_override = Some(value.to_string()),
        OptionKey::Version => parsed.version = Some(value.to_string()),
        OptionKey::CopyrightYear => parsed.copyright_year = Some(value.to_string()),
        OptionKey::NameOverrides => parsed.name_overrides = parse_name_overrides(key, value)?,
        OptionKey::InternalTypes => parsed.internal_types = parse_list(value).into_iter().collect(),
        OptionKey::ServiceAdvisoryThreshold => {
          parsed.service_advisory_threshold = value.parse().map_err(|_| ConfigError::InvalidInteger {
            key: key.to_string(),
            value: value.to_string(),
          })?;
        }
      }
    }

    parsed.extern_packages.sort_by(|a, b| a.alias.cmp(&b.alias));
    Ok(parsed)
  }

  /// The crate name: the override, or the API package with dots replaced by dashes.
  pub fn crate_name(&self, api_package: &str) -> String {
    self
      .package_name_override
      .clone()
      .unwrap_or_else(|| api_package.trim_start_matches('.').replace('.', "-"))
  }

  pub fn extern_package_for(&self, source_package: &str) -> Option<&ExternPackage> {
    self
      .extern_packages
      .iter()
      .find(|pkg| pkg.sources.iter().any(|s| s == source_package))
  }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value {
    "true" => Ok(true),
    "false" => Ok(false),
    _ => Err(ConfigError::InvalidBool {
      key: key.to_string(),
      value: value.to_string(),
    }),
  }
}

fn parse_list(value: &str) -> Vec<String> {
  value
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(ToString::to_string)
    .collect()
}

fn parse_name_overrides(key: &str, value: &str) -> Result<BTreeMap<String, String>, ConfigError> {
  parse_list(value)
    .into_iter()
    .map(|entry| {
      let (id, name) = entry
        .split_once('=')
        .filter(|(id, name)| !id.is_empty() && !name.is_empty())
        .ok_or_else(|| ConfigError::InvalidNameOverride {
          key: key.to_string(),
          entry: entry.clone(),
        })?;
      Ok((id.to_string(), name.to_string()))
    })
    .collect()
}

/// Parses `package=<crate>,source=<proto package>[,source=...][,feature=<name>]`.
fn parse_extern_package(key: &str, alias: &str, value: &str) -> Result<ExternPackage, ConfigError> {
  let invalid = |reason: &str| ConfigError::InvalidPackageSpec {
    key: key.to_string(),
    value: value.to_string(),
    reason: reason.to_string(),
  };

  if alias.is_empty() {
    return Err(invalid("empty alias"));
  }

  let mut crate_name = None;
  let mut sources = vec![];
  let mut feature = None;

  for entry in parse_list(value) {
    let (sub_key, sub_value) = entry.split_once('=').ok_or_else(|| invalid("expected key=value"))?;
    match sub_key {
      "package" => crate_name = Some(sub_value.to_string()),
      "source" => sources.push(sub_value.trim_start_matches('.').to_string()),
      "feature" => feature = Some(sub_value.to_string()),
      _ => return Err(invalid(&format!("unknown key `{sub_key}`"))),
    }
  }

  let crate_name = crate_name.ok_or_else(|| invalid("missing `package`"))?;
  if sources.is_empty() {
    return Err(invalid("missing `source`"));
  }

  Ok(ExternPackage {
    alias: alias.to_string(),
    crate_name,
    sources,
    feature,
  })
}
