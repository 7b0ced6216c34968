use std::cmp::Ordering;

use crate::model::Field;

/// Preference of a oneof member for samples: higher is better.
///
/// Criteria in priority order: not deprecated, not a map, not repeated, message typed.
fn preference(field: &Field) -> (bool, bool, bool, bool) {
  (!field.deprecated, !field.map, !field.repeated, field.typez.is_message())
}

/// Picks the member used to build examples for a oneof.
///
/// A later member replaces the current pick only when strictly preferred, so
/// ties keep the first declared field.
pub(crate) fn best_field<'a, I>(fields: I) -> Option<&'a Field>
where
  I: IntoIterator<Item = &'a Field>,
{
  fields.into_iter().fold(None, |best, candidate| match best {
    Some(current) if preference(candidate).cmp(&preference(current)) != Ordering::Greater => Some(current),
    _ => Some(candidate),
  })
}
