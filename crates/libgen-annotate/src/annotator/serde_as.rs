//! Selection of `serde_with` adapters for fields whose JSON form differs from
//! the Rust type: 64-bit integers travel as strings, floats accept `NaN` and
//! infinities as strings, bytes are base64.

use super::{config::BytesAlphabet, dependencies::TypeGraph};
use crate::model::{ApiIndex, Field, FieldType};

const I32: &str = "wkt::internal::I32";
const I64: &str = "wkt::internal::I64";
const U32: &str = "wkt::internal::U32";
const U64: &str = "wkt::internal::U64";
const F32: &str = "wkt::internal::F32";
const F64: &str = "wkt::internal::F64";
const BASE64: &str = "serde_with::base64::Base64";
const BASE64_URL_SAFE: &str = "serde_with::base64::Base64<serde_with::base64::UrlSafe>";
const DISPLAY_FROM_STR: &str = "serde_with::DisplayFromStr";
const SAME: &str = "serde_with::Same";

const WRAPPER_PREFIX: &str = ".google.protobuf.";

fn bytes_adapter(alphabet: BytesAlphabet) -> &'static str {
  match alphabet {
    BytesAlphabet::Standard => BASE64,
    BytesAlphabet::UrlSafe => BASE64_URL_SAFE,
  }
}

/// Adapter for a scalar kind, or `None` when the default serialization applies.
pub(crate) fn scalar_adapter(typez: FieldType, alphabet: BytesAlphabet) -> Option<&'static str> {
  match typez {
    FieldType::Int32 | FieldType::Sint32 | FieldType::Sfixed32 => Some(I32),
    FieldType::Int64 | FieldType::Sint64 | FieldType::Sfixed64 => Some(I64),
    FieldType::Uint32 | FieldType::Fixed32 => Some(U32),
    FieldType::Uint64 | FieldType::Fixed64 => Some(U64),
    FieldType::Float => Some(F32),
    FieldType::Double => Some(F64),
    FieldType::Bytes => Some(bytes_adapter(alphabet)),
    FieldType::Bool | FieldType::String | FieldType::Enum | FieldType::Message => None,
  }
}

/// Adapter for a well-known wrapper message, keyed by message ID.
pub(crate) fn wrapper_adapter(type_id: &str, alphabet: BytesAlphabet) -> Option<&'static str> {
  let wrapper = type_id.strip_prefix(WRAPPER_PREFIX)?;
  let wrapped = match wrapper {
    "DoubleValue" => FieldType::Double,
    "FloatValue" => FieldType::Float,
    "Int64Value" => FieldType::Int64,
    "UInt64Value" => FieldType::Uint64,
    "Int32Value" => FieldType::Int32,
    "UInt32Value" => FieldType::Uint32,
    "BytesValue" => FieldType::Bytes,
    _ => return None,
  };
  scalar_adapter(wrapped, alphabet)
}

fn is_wrapper(field: &Field) -> bool {
  field.typez.is_message()
    && field.type_id.as_deref().is_some_and(|id| {
      id.strip_prefix(WRAPPER_PREFIX)
        .is_some_and(|name| name.ends_with("Value") && name != "Value")
    })
}

/// Adapter for one element of the field, ignoring `repeated` and presence.
fn element_adapter(field: &Field, alphabet: BytesAlphabet) -> Option<&'static str> {
  match field.typez {
    FieldType::Message => field.type_id.as_deref().and_then(|id| wrapper_adapter(id, alphabet)),
    typez => scalar_adapter(typez, alphabet),
  }
}

fn map_key_adapter(key: &Field, alphabet: BytesAlphabet) -> Option<&'static str> {
  match key.typez {
    FieldType::Bool => Some(DISPLAY_FROM_STR),
    _ => element_adapter(key, alphabet),
  }
}

/// The `serde_as` annotation for a field, if any.
pub(crate) fn field_adapter(index: &ApiIndex<'_>, field: &Field, alphabet: BytesAlphabet) -> Option<String> {
  if field.map {
    return map_adapter(index, field, alphabet);
  }

  let adapter = element_adapter(field, alphabet)?;
  if field.repeated {
    Some(format!("std::vec::Vec<{adapter}>"))
  } else if field.is_oneof() {
    Some(adapter.to_string())
  } else if field.optional || is_wrapper(field) {
    Some(format!("std::option::Option<{adapter}>"))
  } else {
    Some(adapter.to_string())
  }
}

fn map_adapter(index: &ApiIndex<'_>, field: &Field, alphabet: BytesAlphabet) -> Option<String> {
  let entry = field.type_id.as_deref()?;
  let key = index.map_key_field(entry).and_then(|k| map_key_adapter(k, alphabet));
  let value = index.map_value_field(entry).and_then(|v| element_adapter(v, alphabet));
  if key.is_none() && value.is_none() {
    return None;
  }
  Some(format!(
    "std::collections::HashMap<{}, {}>",
    key.unwrap_or(SAME),
    value.unwrap_or(SAME)
  ))
}

/// String and bytes fields are always serialized.
pub(crate) fn skip_if_is_default(field: &Field) -> bool {
  !field.typez.is_string_like()
}

/// Singular message fields are boxed when recursive or held in a oneof.
pub(crate) fn needs_box(types: &TypeGraph<'_>, container_id: &str, field: &Field) -> bool {
  if !field.typez.is_message() || field.repeated || field.map {
    return false;
  }
  if field.is_oneof() {
    return true;
  }
  field
    .type_id
    .as_deref()
    .is_some_and(|target| types.is_recursive(container_id, target))
}
