use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum PathParseError {
  #[strum(to_string = "path template '{template}' must start with '/'")]
  MissingLeadingSlash { template: String },
  #[strum(to_string = "unclosed '{{' at position {position} in '{template}'")]
  UnclosedBrace { template: String, position: usize },
  #[strum(to_string = "unmatched '}}' at position {position} in '{template}'")]
  UnmatchedClosingBrace { template: String, position: usize },
  #[strum(to_string = "nested '{{' at position {position} in '{template}'")]
  NestedBraces { template: String, position: usize },
  #[strum(to_string = "empty variable in '{template}'")]
  EmptyVariable { template: String },
  #[strum(to_string = "empty segment in '{template}'")]
  EmptySegment { template: String },
  #[strum(to_string = "wildcard '{segment}' outside a variable in '{template}'")]
  UnboundWildcard { template: String, segment: String },
}

impl std::error::Error for PathParseError {}

/// HTTP routing information for a method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase", default)]
pub struct PathInfo {
  #[builder(default)]
  pub bindings: Vec<PathBinding>,
  /// `*` for the whole request, a top-level field name, or `None` for no body.
  #[builder(into)]
  pub body_field_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase")]
pub struct PathBinding {
  #[builder(into)]
  pub verb: String,
  pub template: PathTemplate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSegment {
  Literal(String),
  Variable(PathVariable),
}

/// A `{field.path=sub/template/*}` binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathVariable {
  pub field_path: Vec<String>,
  /// Literal, `*`, and `**` segments. A bare `{name}` binds `["*"]`.
  pub segments: Vec<String>,
}

impl PathVariable {
  #[must_use]
  pub fn dotted_path(&self) -> String {
    self.field_path.join(".")
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PathTemplate {
  pub segments: Vec<PathSegment>,
  pub verb: Option<String>,
}

impl PathTemplate {
  pub fn parse(template: &str) -> Result<Self, PathParseError> {
    let Some(rest) = template.strip_prefix('/') else {
      return Err(PathParseError::MissingLeadingSlash {
        template: template.to_string(),
      });
    };

    let (body, verb) = split_verb(rest);
    let segments = split_top_level(template, body)?
      .into_iter()
      .map(|raw| parse_segment(template, raw))
      .collect::<Result<Vec<_>, _>>()?;

    Ok(Self {
      segments,
      verb: verb.map(ToString::to_string),
    })
  }

  pub fn variables(&self) -> impl Iterator<Item = &PathVariable> {
    self.segments.iter().filter_map(|segment| match segment {
      PathSegment::Variable(variable) => Some(variable),
      PathSegment::Literal(_) => None,
    })
  }
}

impl FromStr for PathTemplate {
  type Err = PathParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

impl TryFrom<String> for PathTemplate {
  type Error = PathParseError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Self::parse(&value)
  }
}

impl From<PathTemplate> for String {
  fn from(value: PathTemplate) -> Self {
    value.to_string()
  }
}

impl fmt::Display for PathTemplate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for segment in &self.segments {
      f.write_str("/")?;
      match segment {
        PathSegment::Literal(lit) => f.write_str(lit)?,
        PathSegment::Variable(variable) => {
          write!(f, "{{{}", variable.dotted_path())?;
          if variable.segments != ["*"] {
            write!(f, "={}", variable.segments.join("/"))?;
          }
          f.write_str("}")?;
        }
      }
    }
    if let Some(verb) = &self.verb {
      write!(f, ":{verb}")?;
    }
    Ok(())
  }
}

/// Splits the custom verb (`:cancel`) off the final segment, ignoring colons inside variables.
fn split_verb(rest: &str) -> (&str, Option<&str>) {
  let last_close = rest.rfind('}').map_or(0, |pos| pos + 1);
  let colon = rest[last_close..]
    .rfind(':')
    .filter(|pos| !rest[last_close + pos..].contains('/'));
  match colon {
    Some(pos) => {
      let split = last_close + pos;
      (&rest[..split], Some(&rest[split + 1..]))
    }
    None => (rest, None),
  }
}

fn split_top_level<'a>(template: &str, body: &'a str) -> Result<Vec<&'a str>, PathParseError> {
  let mut parts = vec![];
  let mut depth = 0usize;
  let mut start = 0;
  // `body` is the template minus the leading '/'.
  let offset = 1;

  for (pos, ch) in body.char_indices() {
    match ch {
      '{' if depth > 0 => {
        return Err(PathParseError::NestedBraces {
          template: template.to_string(),
          position: offset + pos,
        });
      }
      '{' => depth += 1,
      '}' if depth == 0 => {
        return Err(PathParseError::UnmatchedClosingBrace {
          template: template.to_string(),
          position: offset + pos,
        });
      }
      '}' => depth -= 1,
      '/' if depth == 0 => {
        parts.push(&body[start..pos]);
        start = pos + 1;
      }
      _ => {}
    }
  }

  if depth > 0 {
    let position = offset + body.rfind('{').unwrap_or(0);
    return Err(PathParseError::UnclosedBrace {
      template: template.to_string(),
      position,
    });
  }

  parts.push(&body[start..]);
  Ok(parts)
}

fn parse_segment(template: &str, raw: &str) -> Result<PathSegment, PathParseError> {
  if raw.is_empty() {
    return Err(PathParseError::EmptySegment {
      template: template.to_string(),
    });
  }

  let Some(inner) = raw.strip_prefix('{') else {
    if raw == "*" || raw == "**" {
      return Err(PathParseError::UnboundWildcard {
        template: template.to_string(),
        segment: raw.to_string(),
      });
    }
    return Ok(PathSegment::Literal(raw.to_string()));
  };

  let Some(inner) = inner.strip_suffix('}') else {
    return Err(PathParseError::UnclosedBrace {
      template: template.to_string(),
      position: template.find(raw).unwrap_or(0),
    });
  };

  let (field_path, sub_template) = inner.split_once('=').unwrap_or((inner, "*"));
  if field_path.is_empty() || sub_template.is_empty() {
    return Err(PathParseError::EmptyVariable {
      template: template.to_string(),
    });
  }

  let segments = sub_template.split('/').map(ToString::to_string).collect::<Vec<_>>();
  if segments.iter().any(String::is_empty) {
    return Err(PathParseError::EmptySegment {
      template: template.to_string(),
    });
  }

  Ok(PathSegment::Variable(PathVariable {
    field_path: field_path.split('.').map(ToString::to_string).collect(),
    segments,
  }))
}
