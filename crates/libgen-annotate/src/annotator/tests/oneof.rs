use super::support::{annotate, api, id, message, message_field, scalar};
use crate::{
  annotator::{config::CodecOptions, oneof::best_field},
  model::{Field, FieldType, OneOf},
};

fn member(field: Field) -> Field {
  Field {
    oneof: Some(id("Holder.choice")),
    ..field
  }
}

fn deprecated(field: Field) -> Field {
  Field {
    deprecated: true,
    ..field
  }
}

fn repeated(field: Field) -> Field {
  Field { repeated: true, ..field }
}

fn map(field: Field) -> Field {
  Field { map: true, ..field }
}

#[test]
fn test_best_field_selection() {
  let cases = [
    (
      "message beats scalar",
      vec![scalar("a", FieldType::String), message_field("b", id("Thing"))],
      "b",
    ),
    (
      "non-deprecated beats deprecated message",
      vec![deprecated(message_field("a", id("Thing"))), scalar("b", FieldType::String)],
      "b",
    ),
    (
      "non-map beats map",
      vec![map(message_field("a", id("Entry"))), scalar("b", FieldType::Int32)],
      "b",
    ),
    (
      "non-repeated beats repeated",
      vec![repeated(message_field("a", id("Thing"))), scalar("b", FieldType::Int32)],
      "b",
    ),
    (
      "ties keep declaration order",
      vec![scalar("a", FieldType::String), scalar("b", FieldType::Int64)],
      "a",
    ),
    (
      "first of equal messages wins",
      vec![
        scalar("a", FieldType::Bool),
        message_field("b", id("Thing")),
        message_field("c", id("Other")),
      ],
      "b",
    ),
  ];

  for (description, fields, expected) in cases {
    let best = best_field(&fields).map(|field| field.name.as_str());
    assert_eq!(best, Some(expected), "failed for case {description:?}");
  }
}

#[test]
fn test_best_field_of_empty_oneof() {
  assert!(best_field(&Vec::<Field>::new()).is_none());
}

#[test]
fn test_oneof_annotation() {
  let mut holder = message(
    "Holder",
    vec![
      member(scalar("text", FieldType::String)),
      member(message_field("thing", id("Thing"))),
      scalar("other", FieldType::Int32),
    ],
  );
  holder.oneofs = vec![OneOf::builder().id(id("Holder.choice")).name("choice").build()];
  let api = api(vec![holder, message("Thing", vec![])], vec![], vec![]);

  let output = annotate(&api, CodecOptions::default());
  let oneof = &output.model.oneofs[&id("Holder.choice")];
  assert_eq!(oneof.enum_name, "Choice");
  assert_eq!(oneof.field_name, "choice");
  assert_eq!(oneof.qualified_name, "crate::model::holder::Choice");
  assert_eq!(oneof.relative_name, "holder::Choice");
  assert_eq!(oneof.alias, None);
  assert_eq!(oneof.example_field.as_deref(), Some(id("Holder.thing").as_str()));
  assert_eq!(oneof.branches, [id("Holder.text"), id("Holder.thing")]);

  let thing = &output.model.fields[&id("Holder.thing")];
  assert_eq!(thing.branch_name.as_deref(), Some("Thing"));
  assert!(thing.is_boxed);
  assert_eq!(thing.field_type, "std::boxed::Box<crate::model::Thing>");
  assert_eq!(output.model.fields[&id("Holder.other")].branch_name, None);
}
