use std::path::Path;

use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};

use super::load_api;
use crate::{
  annotator::{config::CodecOptions, methods::is_generated, naming::identifiers::to_feature_name},
  model::{Api, Method},
  ui::{Colors, colors::to_comfy, term_width},
};

const GRPC_ONLY: &str = "gRPC";

fn new_table(headers: &[&str], colors: &Colors) -> Table {
  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut row = Row::new();
  for header in headers {
    row.add_cell(Cell::new(header).fg(to_comfy(colors.label())));
  }
  table.set_header(row);
  table
}

/// One row per service: name, feature, generated/total methods, host.
fn service_rows(api: &Api) -> Vec<[String; 4]> {
  let options = CodecOptions::default();
  let mut rows = api
    .services
    .iter()
    .map(|service| {
      let generated = service.methods.iter().filter(|m| is_generated(&options, m)).count();
      [
        service.name.clone(),
        to_feature_name(&service.name),
        format!("{generated}/{}", service.methods.len()),
        service.default_host.clone(),
      ]
    })
    .collect::<Vec<_>>();
  rows.sort();
  rows
}

/// Verb and path of the first binding, or `gRPC` for methods without one.
fn method_route(method: &Method) -> (String, String) {
  match method.path_info.as_ref().and_then(|info| info.bindings.first()) {
    Some(binding) if !method.is_streaming() => (binding.verb.to_ascii_uppercase(), binding.template.to_string()),
    _ => (GRPC_ONLY.to_string(), String::new()),
  }
}

pub async fn list_services(input: &Path, colors: &Colors) -> anyhow::Result<()> {
  let api = load_api(input).await?;

  let mut table = new_table(&["SERVICE", "FEATURE", "METHODS", "HOST"], colors);
  for [name, feature, methods, host] in service_rows(&api) {
    let mut row = Row::new();
    row.add_cell(
      Cell::new(name)
        .fg(to_comfy(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(Cell::new(feature).fg(to_comfy(colors.primary())));
    row.add_cell(
      Cell::new(methods)
        .fg(to_comfy(colors.accent()))
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(Cell::new(host).fg(to_comfy(colors.primary())));
    table.add_row(row);
  }

  println!("{table}");
  Ok(())
}

pub async fn list_methods(input: &Path, colors: &Colors) -> anyhow::Result<()> {
  let api = load_api(input).await?;

  let mut methods = api
    .services
    .iter()
    .flat_map(|service| &service.methods)
    .map(|method| {
      let (verb, path) = method_route(method);
      (method.id.trim_start_matches('.').to_string(), verb, path)
    })
    .collect::<Vec<_>>();
  methods.sort();

  let mut table = new_table(&["METHOD", "VERB", "PATH"], colors);
  for (id, verb, path) in methods {
    let mut row = Row::new();
    row.add_cell(
      Cell::new(id)
        .fg(to_comfy(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(
      Cell::new(verb)
        .fg(to_comfy(colors.accent()))
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(Cell::new(path).fg(to_comfy(colors.primary())));
    table.add_row(row);
  }

  println!("{table}");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::{PathBinding, PathInfo, PathTemplate, Service};

  fn method(name: &str, binding: Option<(&str, &str)>) -> Method {
    let path_info = binding.map(|(verb, template)| {
      PathInfo::builder()
        .bindings(vec![
          PathBinding::builder()
            .verb(verb)
            .template(PathTemplate::parse(template).unwrap())
            .build(),
        ])
        .build()
    });
    Method::builder()
      .id(format!(".test.v1.Library.{name}"))
      .name(name)
      .input_type_id(".test.v1.Request")
      .output_type_id(".test.v1.Response")
      .maybe_path_info(path_info)
      .build()
  }

  #[test]
  fn test_method_route() {
    let cases = [
      (Some(("get", "/v1/{name=shelves/*}")), ("GET", "/v1/{name=shelves/*}")),
      (Some(("POST", "/v1/shelves")), ("POST", "/v1/shelves")),
      (None, (GRPC_ONLY, "")),
    ];
    for (binding, (verb, path)) in cases {
      let actual = method_route(&method("GetShelf", binding));
      assert_eq!(actual, (verb.to_string(), path.to_string()), "failed for input {binding:?}");
    }
  }

  #[test]
  fn test_service_rows_count_generated_methods() {
    let api = Api::builder()
      .name("library")
      .package_name("test.v1")
      .services(vec![
        Service::builder()
          .id(".test.v1.Library")
          .name("Library")
          .package("test.v1")
          .default_host("library.googleapis.com")
          .methods(vec![
            method("GetShelf", Some(("GET", "/v1/{name=shelves/*}"))),
            method("StreamShelves", None),
          ])
          .build(),
        Service::builder()
          .id(".test.v1.Admin")
          .name("Admin")
          .package("test.v1")
          .build(),
      ])
      .build();

    let rows = service_rows(&api);
    assert_eq!(
      rows,
      [
        ["Admin".to_string(), "admin".to_string(), "0/0".to_string(), String::new()],
        [
          "Library".to_string(),
          "library".to_string(),
          "1/2".to_string(),
          "library.googleapis.com".to_string(),
        ],
      ]
    );
  }
}
