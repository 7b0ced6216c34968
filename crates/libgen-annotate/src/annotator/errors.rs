use thiserror::Error;

/// Fatal problems with the codec options or package mappings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
  #[error("unknown codec option `{key}`")]
  UnknownOption { key: String },
  #[error("codec option `{key}` expects `true` or `false`, got `{value}`")]
  InvalidBool { key: String, value: String },
  #[error("codec option `{key}` expects a non-negative integer, got `{value}`")]
  InvalidInteger { key: String, value: String },
  #[error("codec option `{key}` has an unsupported value `{value}`")]
  InvalidValue { key: String, value: String },
  #[error("invalid package mapping `{key}` = `{value}`: {reason}")]
  InvalidPackageSpec { key: String, value: String, reason: String },
  #[error("invalid name override `{entry}` in `{key}`: expected ID=Name")]
  InvalidNameOverride { key: String, entry: String },
  #[error("package `{package}` (used by `{referenced_by}`) has no `package:` mapping")]
  MissingPackageMapping { package: String, referenced_by: String },
}

/// Errors that abort an annotation pass.
#[derive(Debug, Error)]
pub enum AnnotateError {
  #[error(transparent)]
  Config(#[from] ConfigError),
  #[error("annotation phases form a cycle at `{0}`")]
  PhaseCycle(String),
}
