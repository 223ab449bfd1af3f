use std::{borrow::Cow, iter::once};

use serde_json::Value;

use super::alias_tables::{FieldAliases, PROBE_LOCATIONS};

/// Finds the value of a logical field in a payload of unknown shape.
///
/// Candidate keys are `field_name` followed by `aliases`, in that order; for
/// each candidate every entry of [`PROBE_LOCATIONS`] is tried before moving
/// on to the next candidate. The first value that is neither `null` nor an
/// empty string is returned.
pub(crate) fn locate<'a>(
    payload: &'a Value,
    field_name: &str,
    aliases: &[&str],
) -> Option<&'a Value> {
    once(field_name)
        .chain(aliases.iter().copied())
        .find_map(|name| {
            PROBE_LOCATIONS.iter().find_map(|location| {
                let path = match *location {
                    "" => Cow::Borrowed(name),
                    prefix => Cow::Owned(format!("{prefix}.{name}")),
                };
                lookup_path(payload, &path).filter(|v| is_present(v))
            })
        })
}

pub(crate) fn locate_field<'a>(payload: &'a Value, field: &FieldAliases) -> Option<&'a Value> {
    locate(payload, field.name, field.aliases)
}

/// First of `paths` that resolves to an object.
pub(crate) fn locate_section<'a>(payload: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths
        .iter()
        .find_map(|path| lookup_path(payload, path).filter(|v| v.is_object()))
}

/// Walks a dotted path. Numeric segments index into arrays.
pub(crate) fn lookup_path<'a>(payload: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(payload, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

pub(crate) fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}
