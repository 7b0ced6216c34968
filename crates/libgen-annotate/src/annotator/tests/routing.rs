use super::support::{api, binding, id, message, message_field, resource_field, scalar};
use crate::{
  annotator::{
    annotations::TemplateSegment,
    metrics::{AnnotationStats, AnnotationWarning},
    routing::{annotate_binding, compile_variable_template, is_idempotent, path_format},
  },
  model::{Api, ApiIndex, Field, FieldType, OneOf, PathTemplate},
};

fn segments(raw: &[&str]) -> Vec<String> {
  raw.iter().map(ToString::to_string).collect()
}

fn literal(text: &str) -> TemplateSegment {
  TemplateSegment::Literal(text.to_string())
}

#[test]
fn test_compile_variable_templates() {
  let cases = [
    (vec!["*"], vec![TemplateSegment::SingleWildcard]),
    (vec!["**"], vec![TemplateSegment::MultiWildcard]),
    (
      vec!["projects", "*"],
      vec![literal("projects/"), TemplateSegment::SingleWildcard],
    ),
    (
      vec!["projects", "*", "secrets", "*"],
      vec![
        literal("projects/"),
        TemplateSegment::SingleWildcard,
        literal("/secrets/"),
        TemplateSegment::SingleWildcard,
      ],
    ),
    (
      vec!["projects", "*", "locations", "**"],
      vec![
        literal("projects/"),
        TemplateSegment::SingleWildcard,
        literal("/locations/"),
        TemplateSegment::TrailingMultiWildcard,
      ],
    ),
    (
      vec!["**", "versions"],
      vec![TemplateSegment::MultiWildcard, literal("/versions")],
    ),
    (vec!["projects", "global"], vec![literal("projects/global")]),
  ];

  for (input, expected) in cases {
    assert_eq!(
      compile_variable_template(&segments(&input)),
      expected,
      "failed for input {input:?}"
    );
  }
}

#[test]
fn test_template_segments_render_as_rust() {
  let rendered = [
    literal("projects/"),
    TemplateSegment::SingleWildcard,
    TemplateSegment::TrailingMultiWildcard,
  ]
  .iter()
  .map(TemplateSegment::to_rust)
  .collect::<Vec<_>>();
  assert_eq!(
    rendered,
    [
      r#"Segment::Literal("projects/")"#,
      "Segment::SingleWildcard",
      "Segment::TrailingMultiWildcard",
    ]
  );
}

#[test]
fn test_path_format() {
  let cases = [
    ("/v1/{name=projects/*/secrets/*}", "/v1/{}"),
    ("/v1/{parent=projects/*}/secrets", "/v1/{}/secrets"),
    ("/v1/{name=projects/*/secrets/*/versions/*}:access", "/v1/{}:access"),
    ("/v1/projects:search", "/v1/projects:search"),
  ];
  for (input, expected) in cases {
    let template = PathTemplate::parse(input).unwrap();
    assert_eq!(path_format(&template), expected, "failed for input {input:?}");
  }
}

#[test]
fn test_idempotency() {
  let cases = [
    (vec![], false),
    (vec![binding("GET", "/v1/{name}")], true),
    (vec![binding("delete", "/v1/{name}")], true),
    (vec![binding("PUT", "/v1/{name}")], true),
    (vec![binding("POST", "/v1/{parent}")], false),
    (vec![binding("PATCH", "/v1/{name}")], false),
    (
      vec![binding("GET", "/v1/{name}"), binding("POST", "/v1/{name}:get")],
      false,
    ),
  ];
  for (bindings, expected) in cases {
    assert_eq!(is_idempotent(&bindings), expected, "failed for input {bindings:?}");
  }
}

fn request_api() -> Api {
  let mut request = message(
    "UpdateSecretRequest",
    vec![
      message_field("secret", id("Secret")),
      message_field("update_mask", ".google.protobuf.FieldMask"),
      scalar("request_id", FieldType::String),
      Field {
        repeated: true,
        ..scalar("tags", FieldType::String)
      },
      Field {
        optional: true,
        ..scalar("page_size", FieldType::Int32)
      },
      Field {
        oneof: Some(id("UpdateSecretRequest.target")),
        ..message_field("payload", id("Secret"))
      },
    ],
  );
  request.oneofs = vec![
    OneOf::builder()
      .id(id("UpdateSecretRequest.target"))
      .name("target")
      .build(),
  ];
  api(
    vec![
      request,
      message(
        "Secret",
        vec![resource_field("name"), message_field("rotation", id("Rotation"))],
      ),
      message("Rotation", vec![Field {
        optional: true,
        ..scalar("period", FieldType::String)
      }]),
    ],
    vec![],
    vec![],
  )
}

#[test]
fn test_binding_with_nested_variable_and_body_field() {
  let api = request_api();
  let index = ApiIndex::new(&api);
  let input = index.message(&id("UpdateSecretRequest")).unwrap();
  let mut stats = AnnotationStats::default();

  let annotation = annotate_binding(
    &index,
    "UpdateSecret",
    input,
    &binding("patch", "/v1/{secret.name=projects/*/secrets/*}"),
    Some("secret"),
    &mut stats,
  );

  assert_eq!(annotation.verb, "PATCH");
  assert_eq!(annotation.path_fmt, "/v1/{}");
  assert!(annotation.has_body);
  assert!(stats.warnings.is_empty());

  let substitution = &annotation.substitutions[0];
  assert_eq!(substitution.field_path, "secret.name");
  assert_eq!(
    substitution.field_accessor,
    "Some(&req).and_then(|m| m.secret.as_ref()).map(|m| &m.name).map(|s| s.as_str())"
  );
  assert_eq!(
    substitution.template_expr,
    r#"&[Segment::Literal("projects/"), Segment::SingleWildcard, Segment::Literal("/secrets/"), Segment::SingleWildcard]"#
  );

  let query = annotation
    .query_params
    .iter()
    .map(|param| param.name.as_str())
    .collect::<Vec<_>>();
  assert_eq!(query, ["update_mask", "request_id", "tags", "page_size", "payload"]);
  assert!(annotation.query_params_can_fail);

  let page_size = &annotation.query_params[3];
  assert!(page_size.is_optional);
  assert!(!page_size.is_repeated);
  let tags = &annotation.query_params[2];
  assert!(tags.is_repeated);
  assert!(!tags.is_structured);
}

#[test]
fn test_binding_with_whole_request_body_has_no_query() {
  let api = request_api();
  let index = ApiIndex::new(&api);
  let input = index.message(&id("UpdateSecretRequest")).unwrap();
  let mut stats = AnnotationStats::default();

  let annotation = annotate_binding(
    &index,
    "UpdateSecret",
    input,
    &binding("POST", "/v1/{secret.name=projects/*/secrets/*}:update"),
    Some("*"),
    &mut stats,
  );
  assert!(annotation.query_params.is_empty());
  assert!(!annotation.query_params_can_fail);
  assert_eq!(annotation.path_fmt, "/v1/{}:update");
}

#[test]
fn test_scalar_only_query_cannot_fail() {
  let api = api(
    vec![message(
      "GetSecretRequest",
      vec![resource_field("name"), scalar("view", FieldType::Enum)],
    )],
    vec![],
    vec![],
  );
  let index = ApiIndex::new(&api);
  let input = index.message(&id("GetSecretRequest")).unwrap();
  let mut stats = AnnotationStats::default();

  let annotation = annotate_binding(
    &index,
    "GetSecret",
    input,
    &binding("GET", "/v1/{name=projects/*/secrets/*}"),
    None,
    &mut stats,
  );
  assert!(!annotation.has_body);
  assert_eq!(annotation.query_params.len(), 1);
  assert_eq!(annotation.query_params[0].field_name, "view");
  assert!(!annotation.query_params_can_fail);
}

#[test]
fn test_accessor_chains() {
  let api = request_api();
  let index = ApiIndex::new(&api);
  let input = index.message(&id("UpdateSecretRequest")).unwrap();

  let cases = [
    (
      "/v1/{request_id}",
      "Some(&req).map(|m| &m.request_id).map(|s| s.as_str())",
    ),
    (
      "/v1/{payload.name}",
      "Some(&req).and_then(|m| m.payload()).map(|m| &m.name).map(|s| s.as_str())",
    ),
    (
      "/v1/{secret.rotation.period}",
      "Some(&req).and_then(|m| m.secret.as_ref()).and_then(|m| m.rotation.as_ref()).and_then(|m| m.period.as_ref()).map(|s| s.as_str())",
    ),
    ("/v1/{page_size}", "Some(&req).and_then(|m| m.page_size.as_ref())"),
  ];
  for (template, expected) in cases {
    let mut stats = AnnotationStats::default();
    let annotation = annotate_binding(&index, "M", input, &binding("GET", template), None, &mut stats);
    assert_eq!(
      annotation.substitutions[0].field_accessor, expected,
      "failed for input {template:?}"
    );
    assert!(stats.warnings.is_empty(), "unexpected warnings for {template:?}");
  }
}

#[test]
fn test_unresolvable_paths_degrade_with_warning() {
  let api = request_api();
  let index = ApiIndex::new(&api);
  let input = index.message(&id("UpdateSecretRequest")).unwrap();

  let cases = ["/v1/{missing}", "/v1/{request_id.name}", "/v1/{tags.name}"];
  for template in cases {
    let mut stats = AnnotationStats::default();
    let annotation = annotate_binding(&index, "M", input, &binding("GET", template), None, &mut stats);
    assert_eq!(annotation.substitutions[0].field_accessor, "", "failed for input {template:?}");
    assert!(
      matches!(
        stats.warnings.as_slice(),
        [AnnotationWarning::UnresolvedFieldPath { .. }]
      ),
      "failed for input {template:?}"
    );
  }
}

#[test]
fn test_unsupported_verb_is_reported() {
  let api = request_api();
  let index = ApiIndex::new(&api);
  let input = index.message(&id("UpdateSecretRequest")).unwrap();
  let mut stats = AnnotationStats::default();

  let annotation = annotate_binding(&index, "M", input, &binding("trace", "/v1/{request_id}"), None, &mut stats);
  assert_eq!(annotation.verb, "TRACE");
  assert_eq!(
    stats.warnings,
    [AnnotationWarning::UnsupportedVerb {
      method_id: "M".to_string(),
      verb: "trace".to_string(),
    }]
  );
}
