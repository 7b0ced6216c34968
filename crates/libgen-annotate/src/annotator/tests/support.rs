use crate::{
  annotator::{
    config::CodecOptions,
    orchestrator::{AnnotationOutput, Annotator},
  },
  model::{Api, Enum, EnumValue, Field, FieldType, Message, Method, PathBinding, PathInfo, PathTemplate, Service},
};

pub(super) const PACKAGE: &str = "google.cloud.secretmanager.v1";
pub(super) const CRATE_NAMESPACE: &str = "google_cloud_secretmanager_v1";

/// Fully-qualified ID of an own-package type.
pub(super) fn id(name: &str) -> String {
  format!(".{PACKAGE}.{name}")
}

pub(super) fn wkt_id(name: &str) -> String {
  format!(".google.protobuf.{name}")
}

/// Gives each field the ID `<message ID>.<field name>`.
fn owned_fields(message_id: &str, fields: Vec<Field>) -> Vec<Field> {
  fields
    .into_iter()
    .map(|mut field| {
      field.id = format!("{message_id}.{}", field.name);
      field
    })
    .collect()
}

pub(super) fn message(name: &str, fields: Vec<Field>) -> Message {
  Message::builder()
    .id(id(name))
    .name(name)
    .package(PACKAGE)
    .fields(owned_fields(&id(name), fields))
    .build()
}

/// A message declared inside `parent` (an own-package path like `Secret`).
pub(super) fn nested_message(parent: &str, name: &str, fields: Vec<Field>) -> Message {
  Message::builder()
    .id(id(&format!("{parent}.{name}")))
    .name(name)
    .package(PACKAGE)
    .parent(id(parent))
    .fields(owned_fields(&id(&format!("{parent}.{name}")), fields))
    .build()
}

pub(super) fn wkt_message(name: &str) -> Message {
  Message::builder()
    .id(wkt_id(name))
    .name(name)
    .package("google.protobuf")
    .build()
}

/// A `map<K, V>` entry nested in `parent`.
pub(super) fn map_entry(parent: &str, name: &str, key: FieldType, value: Field) -> Message {
  Message::builder()
    .id(id(&format!("{parent}.{name}")))
    .name(name)
    .package(PACKAGE)
    .parent(id(parent))
    .is_map_entry(true)
    .fields(owned_fields(
      &id(&format!("{parent}.{name}")),
      vec![Field::builder().id("key").name("key").typez(key).build(), value],
    ))
    .build()
}

pub(super) fn scalar(name: &str, typez: FieldType) -> Field {
  Field::builder().id(name).name(name).typez(typez).build()
}

pub(super) fn message_field(name: &str, type_id: impl Into<String>) -> Field {
  Field::builder()
    .id(name)
    .name(name)
    .typez(FieldType::Message)
    .type_id(type_id)
    .build()
}

pub(super) fn resource_field(name: &str) -> Field {
  Field::builder()
    .id(name)
    .name(name)
    .typez(FieldType::String)
    .resource_reference(true)
    .build()
}

pub(super) fn enumeration(name: &str, values: &[(&str, i32)]) -> Enum {
  Enum::builder()
    .id(id(name))
    .name(name)
    .package(PACKAGE)
    .values(
      values
        .iter()
        .map(|(value, number)| {
          EnumValue::builder()
            .id(id(&format!("{name}.{value}")))
            .name(*value)
            .number(*number)
            .build()
        })
        .collect(),
    )
    .build()
}

pub(super) fn binding(verb: &str, template: &str) -> PathBinding {
  PathBinding::builder()
    .verb(verb)
    .template(PathTemplate::parse(template).expect("valid test template"))
    .build()
}

/// A method of `SecretManagerService`; `output` is a full type ID.
pub(super) fn http_method(
  name: &str,
  input: &str,
  output: &str,
  bindings: Vec<PathBinding>,
  body: Option<&str>,
) -> Method {
  Method::builder()
    .id(id(&format!("SecretManagerService.{name}")))
    .name(name)
    .input_type_id(id(input))
    .output_type_id(output)
    .path_info(PathInfo::builder().bindings(bindings).maybe_body_field_path(body).build())
    .build()
}

pub(super) fn service(name: &str, methods: Vec<Method>) -> Service {
  Service::builder()
    .id(id(name))
    .name(name)
    .package(PACKAGE)
    .default_host("secretmanager.googleapis.com")
    .methods(methods)
    .build()
}

pub(super) fn api(messages: Vec<Message>, enums: Vec<Enum>, services: Vec<Service>) -> Api {
  Api::builder()
    .name("secretmanager")
    .package_name(PACKAGE)
    .title("Secret Manager API")
    .messages(messages)
    .enums(enums)
    .services(services)
    .build()
}

pub(super) fn options(pairs: &[(&str, &str)]) -> CodecOptions {
  CodecOptions::from_options(pairs.iter().copied()).expect("valid test options")
}

/// Options mapping `google.protobuf` to the `wkt` crate.
pub(super) fn wkt_options(extra: &[(&str, &str)]) -> CodecOptions {
  let mut pairs = vec![("package:wkt", "package=google-cloud-wkt,source=google.protobuf")];
  pairs.extend_from_slice(extra);
  options(&pairs)
}

pub(super) fn annotate(api: &Api, options: CodecOptions) -> AnnotationOutput {
  Annotator::new(api, options).annotate().expect("annotation should succeed")
}
