use crate::model::{PathParseError, PathSegment, PathTemplate, PathVariable};

fn variable(field_path: &[&str], segments: &[&str]) -> PathSegment {
  PathSegment::Variable(PathVariable {
    field_path: field_path.iter().map(ToString::to_string).collect(),
    segments: segments.iter().map(ToString::to_string).collect(),
  })
}

fn literal(text: &str) -> PathSegment {
  PathSegment::Literal(text.to_string())
}

#[test]
fn test_parse_templates() {
  let cases = [
    (
      "/v1/{name=projects/*/secrets/*}",
      vec![literal("v1"), variable(&["name"], &["projects", "*", "secrets", "*"])],
      None,
    ),
    (
      "/v1/{parent=projects/*}/secrets",
      vec![literal("v1"), variable(&["parent"], &["projects", "*"]), literal("secrets")],
      None,
    ),
    (
      "/v1/{secret.name=projects/*/secrets/*}:addVersion",
      vec![
        literal("v1"),
        variable(&["secret", "name"], &["projects", "*", "secrets", "*"]),
      ],
      Some("addVersion"),
    ),
    ("/v1/{name}", vec![literal("v1"), variable(&["name"], &["*"])], None),
    (
      "/v1/projects:search",
      vec![literal("v1"), literal("projects")],
      Some("search"),
    ),
    (
      "/v1/{name=projects/*/locations/**}",
      vec![literal("v1"), variable(&["name"], &["projects", "*", "locations", "**"])],
      None,
    ),
  ];

  for (input, segments, verb) in cases {
    let template = PathTemplate::parse(input).unwrap();
    assert_eq!(template.segments, segments, "failed for input {input:?}");
    assert_eq!(template.verb.as_deref(), verb, "failed for input {input:?}");
  }
}

#[test]
fn test_display_round_trips_canonical_form() {
  let cases = [
    "/v1/{name=projects/*/secrets/*}",
    "/v1/{parent=projects/*}/secrets",
    "/v1/{secret.name=projects/*/secrets/*}:addVersion",
    "/v1/{name}",
    "/v1/projects:search",
  ];
  for input in cases {
    let template: PathTemplate = input.parse().unwrap();
    assert_eq!(template.to_string(), input, "failed for input {input:?}");
  }
}

#[test]
fn test_parse_errors() {
  let cases: [(&str, fn(&PathParseError) -> bool); 6] = [
    ("v1/{name}", |e| matches!(e, PathParseError::MissingLeadingSlash { .. })),
    ("/v1/{name", |e| matches!(e, PathParseError::UnclosedBrace { .. })),
    ("/v1/name}", |e| matches!(e, PathParseError::UnmatchedClosingBrace { .. })),
    ("/v1/{a={b}}", |e| matches!(e, PathParseError::NestedBraces { .. })),
    ("/v1/{=projects/*}", |e| matches!(e, PathParseError::EmptyVariable { .. })),
    ("/v1//secrets", |e| matches!(e, PathParseError::EmptySegment { .. })),
  ];
  for (input, is_expected) in cases {
    let err = PathTemplate::parse(input).unwrap_err();
    assert!(is_expected(&err), "unexpected error {err:?} for input {input:?}");
  }
}

#[test]
fn test_variables_and_dotted_paths() {
  let template = PathTemplate::parse("/v1/{secret.name=projects/*}/{version}").unwrap();
  let paths = template.variables().map(PathVariable::dotted_path).collect::<Vec<_>>();
  assert_eq!(paths, ["secret.name", "version"]);
}

#[test]
fn test_serde_uses_template_string() {
  let template: PathTemplate = serde_json::from_str(r#""/v1/{name=projects/*}:cancel""#).unwrap();
  assert_eq!(template.verb.as_deref(), Some("cancel"));
  assert_eq!(
    serde_json::to_string(&template).unwrap(),
    r#""/v1/{name=projects/*}:cancel""#
  );
  assert!(serde_json::from_str::<PathTemplate>(r#""v1/missing-slash""#).is_err());
}
