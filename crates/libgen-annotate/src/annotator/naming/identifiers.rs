use std::{
  collections::{BTreeSet, HashSet},
  sync::LazyLock,
};

use any_ascii::any_ascii;
use inflections::Inflect;
use regex::Regex;

/// Keywords in use by the language. `self` is handled separately.
const STRICT_KEYWORDS: &[&str] = &[
  "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern", "false", "fn", "for",
  "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static", "struct",
  "super", "trait", "true", "type", "unsafe", "use", "where", "while",
];

/// Keywords reserved for future use, plus edition keywords.
const RESERVED_KEYWORDS: &[&str] = &[
  "abstract", "become", "box", "do", "final", "gen", "macro", "override", "priv", "try", "typeof", "unsized",
  "virtual", "yield",
];

static KEYWORDS: LazyLock<HashSet<&str>> =
  LazyLock::new(|| STRICT_KEYWORDS.iter().chain(RESERVED_KEYWORDS).copied().collect());

/// Type names that would shadow a prelude item or keyword in generated modules.
static RESERVED_PASCAL_CASE: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  [
    "Clone", "Copy", "Display", "Option", "Result", "Self", "Send", "Sync", "Type", "Vec",
  ]
  .into_iter()
  .collect()
});

const RAW_PREFIX: &str = "r#";
const RESERVED_TYPE_SUFFIX: &str = "Type";

static INVALID_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());
static MULTI_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());

/// Transliterates to ASCII, replaces invalid characters with underscores, collapses
/// consecutive underscores, and trims leading and trailing underscores.
pub(crate) fn sanitize(input: &str) -> String {
  if input.is_empty() {
    return String::new();
  }

  let ascii = any_ascii(input);
  let replaced = INVALID_CHARS_RE.replace_all(&ascii, "_");
  let collapsed = MULTI_UNDERSCORE_RE.replace_all(&replaced, "_");

  collapsed.trim_matches('_').to_string()
}

fn strip_raw_prefix(name: &str) -> &str {
  name.strip_prefix(RAW_PREFIX).unwrap_or(name)
}

/// Ensures a name is unique within a set of used names, appending a numeric suffix if needed.
pub(crate) fn ensure_unique(base_name: &str, used_names: &BTreeSet<String>) -> String {
  if !used_names.contains(base_name) {
    return base_name.to_string();
  }
  let mut i = 2;
  loop {
    let new_name = format!("{base_name}{i}");
    if !used_names.contains(&new_name) {
      return new_name;
    }
    i += 1;
  }
}

/// Converts a name into `snake_case` without keyword mangling.
///
/// Used where the identifier is always combined with a prefix, like setter
/// names (`set_type`), so a keyword can never appear on its own.
pub(crate) fn to_snake_no_mangling(name: &str) -> String {
  let mut ident = sanitize(strip_raw_prefix(name)).to_snake_case();
  if ident.is_empty() {
    return "_".to_string();
  }
  prefix_if_digit_start(&mut ident, '_');
  ident
}

/// Converts a string into a valid Rust field, method, or module name (`snake_case`).
///
/// # Rules:
/// 1. A raw identifier prefix (`r#`) on the input is ignored, so the conversion is idempotent.
/// 2. Sanitizes the base string and converts to `snake_case`.
/// 3. `self` becomes `self_`.
/// 4. Other keywords get a raw identifier prefix (`r#`).
/// 5. A leading digit is prefixed with `_`; an empty result becomes `_`.
pub(crate) fn to_rust_field_name(name: &str) -> String {
  let ident = to_snake_no_mangling(name);

  if ident == "self" {
    return "self_".to_string();
  }

  if KEYWORDS.contains(ident.as_str()) {
    return format!("{RAW_PREFIX}{ident}");
  }

  ident
}

/// Converts a string into a valid Rust type name (`PascalCase`).
///
/// # Rules:
/// 1. If the input already has mixed case (both upper and lowercase, no separators), preserve capitalization.
/// 2. Otherwise, sanitizes the base string and converts to `PascalCase` using word boundaries.
/// 3. Names that shadow prelude types get a `Type` suffix.
/// 4. A leading digit is prefixed with `T`; an empty result becomes `Unnamed`.
pub(crate) fn to_rust_type_name(name: &str) -> String {
  let name = strip_raw_prefix(name);

  let has_separators = name.contains(['-', '_', '.', ' ']);
  let has_upper = name.chars().any(|c| c.is_ascii_uppercase());
  let has_lower = name.chars().any(|c| c.is_ascii_lowercase());
  let appears_mixed_case = !has_separators && has_upper && has_lower;

  let ascii = any_ascii(name);
  let mut ident: String = if appears_mixed_case {
    let cleaned: String = ascii.chars().filter(char::is_ascii_alphanumeric).collect();
    let mut chars = cleaned.chars();
    match chars.next() {
      None => String::new(),
      Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
  } else {
    let joined: String = split_words(&ascii).into_iter().map(capitalize).collect();
    // Single-letter words join into an all-caps run ("a_b" -> "AB"), which
    // would read as one word next time. Settle on that reading now.
    if joined.chars().any(|c| c.is_ascii_lowercase()) {
      joined
    } else {
      split_words(&joined).into_iter().map(capitalize).collect()
    }
  };

  if ident.is_empty() {
    return "Unnamed".to_string();
  }

  if RESERVED_PASCAL_CASE.contains(ident.as_str()) {
    ident.push_str(RESERVED_TYPE_SUFFIX);
  }

  prefix_if_digit_start(&mut ident, 'T');
  ident
}

/// Converts a string into a `SCREAMING_SNAKE_CASE` constant name.
pub(crate) fn to_rust_const_name(input: &str) -> String {
  let sanitized = sanitize(input);
  if sanitized.is_empty() {
    return "UNNAMED".to_string();
  }

  let mut ident = sanitized.to_constant_case();
  prefix_if_digit_start(&mut ident, '_');
  ident
}

/// Cargo feature name for a service (`SecretManagerService` -> `secret-manager-service`).
pub(crate) fn to_feature_name(name: &str) -> String {
  to_snake_no_mangling(name).trim_start_matches('_').replace('_', "-")
}

/// The identifier a crate is referenced by in Rust code (`google-cloud-wkt` -> `google_cloud_wkt`).
pub(crate) fn to_crate_namespace(crate_name: &str) -> String {
  crate_name.replace('-', "_")
}

fn prefix_if_digit_start(ident: &mut String, prefix: char) {
  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, prefix);
  }
}

/// Splits ASCII text into words at non-alphanumeric characters and case
/// boundaries: `displayName` is `display`, `Name` and `HTTPServer` is `HTTP`, `Server`.
fn split_words(ascii: &str) -> Vec<&str> {
  let bytes = ascii.as_bytes();
  let mut words = vec![];
  let mut start: Option<usize> = None;

  for (i, byte) in bytes.iter().enumerate() {
    if !byte.is_ascii_alphanumeric() {
      if let Some(begin) = start.take() {
        words.push(&ascii[begin..i]);
      }
      continue;
    }
    let Some(begin) = start else {
      start = Some(i);
      continue;
    };
    let after_lower = bytes[i - 1].is_ascii_lowercase();
    let before_lower = bytes.get(i + 1).is_some_and(u8::is_ascii_lowercase);
    if byte.is_ascii_uppercase() && (after_lower || before_lower) {
      words.push(&ascii[begin..i]);
      start = Some(i);
    }
  }
  if let Some(begin) = start {
    words.push(&ascii[begin..]);
  }
  words
}

fn capitalize(word: &str) -> String {
  let mut chars = word.chars();
  match chars.next() {
    Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
    None => String::new(),
  }
}
