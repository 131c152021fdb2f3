//! Expansion of flattened attribute maps.
//!
//! State stores nested attributes as a flat map of dotted keys:
//!
//! ```text
//! tags.%            = "1"
//! tags.Name         = "web"
//! ingress.#         = "1"
//! ingress.0.port    = "443"
//! ```
//!
//! `name.#` holds the element count of a list (or set), `name.%` the entry
//! count of a map. Set elements use hash values instead of ordinal indexes, so
//! the count is only a hint and elements are ordered numerically.

use crate::error::{Error, Result};
use crate::types::{AttributeValue, Primitive};
use std::collections::{BTreeMap, BTreeSet};

/// Delimiter between path segments in flat keys.
pub const KEY_DELIMITER: char = '.';

/// Placeholder written for values that were not known at plan time.
pub const UNKNOWN_VALUE: &str = "74D93920-ED26-11E3-AC10-0800200C9A66";

/// Reconstruct the value stored under `key`.
///
/// Returns `None` when nothing in the map is addressed by `key`.
pub fn expand(map: &BTreeMap<String, String>, key: &str) -> Result<Option<AttributeValue>> {
    if let Some(value) = map.get(key) {
        return Ok(Some(AttributeValue::Primitive(primitive(value))));
    }

    if let Some(count) = map.get(&format!("{key}.#")) {
        if count == UNKNOWN_VALUE {
            return Ok(Some(AttributeValue::string(count.as_str())));
        }
        return expand_list(map, key, count).map(Some);
    }

    let prefix = format!("{key}{KEY_DELIMITER}");
    if map.keys().any(|k| k.starts_with(&prefix)) {
        return expand_map(map, &prefix).map(Some);
    }

    Ok(None)
}

fn primitive(value: &str) -> Primitive {
    match value {
        "true" => Primitive::Bool(true),
        "false" => Primitive::Bool(false),
        _ => Primitive::String(value.to_string()),
    }
}

fn expand_list(map: &BTreeMap<String, String>, key: &str, count: &str) -> Result<AttributeValue> {
    let count: u64 = count.parse().map_err(|_| Error::InvalidFlatmap {
        key: format!("{key}.#"),
        message: format!("count '{count}' is not a number"),
    })?;

    // Nested lists and sets that no longer exist keep stale children around
    // with a zero count.
    if count == 0 {
        return Ok(AttributeValue::List(Vec::new()));
    }

    let prefix = format!("{key}{KEY_DELIMITER}");
    // index -> whether the element key carries the computed marker
    let mut indexes: BTreeMap<u64, bool> = BTreeMap::new();

    for flat_key in map.keys() {
        let Some(rest) = flat_key.strip_prefix(&prefix) else {
            continue;
        };
        let segment = rest.split(KEY_DELIMITER).next().unwrap_or(rest);
        if segment == "#" {
            continue;
        }

        let (segment, computed) = match segment.strip_prefix('~') {
            Some(stripped) => (stripped, true),
            None => (segment, false),
        };
        let index: u64 = segment.parse().map_err(|_| Error::InvalidFlatmap {
            key: flat_key.clone(),
            message: format!("list index '{segment}' is not a number"),
        })?;

        let entry = indexes.entry(index).or_insert(false);
        *entry |= computed;
    }

    let mut items = Vec::with_capacity(indexes.len());
    for (index, computed) in indexes {
        let element_key = if computed {
            format!("{prefix}~{index}")
        } else {
            format!("{prefix}{index}")
        };
        if let Some(value) = expand(map, &element_key)? {
            items.push(value);
        }
    }

    Ok(AttributeValue::List(items))
}

fn expand_map(map: &BTreeMap<String, String>, prefix: &str) -> Result<AttributeValue> {
    // Submaps may not carry a count, so a missing one still means a map.
    if map.get(&format!("{prefix}%")).is_some_and(|count| count == "0") {
        return Ok(AttributeValue::Map(BTreeMap::new()));
    }

    let names: BTreeSet<&str> = map
        .keys()
        .filter_map(|k| k.strip_prefix(prefix))
        .map(|rest| rest.split(KEY_DELIMITER).next().unwrap_or(rest))
        .filter(|name| *name != "%")
        .collect();

    let mut entries = BTreeMap::new();
    for name in names {
        if let Some(value) = expand(map, &format!("{prefix}{name}"))? {
            entries.insert(name.to_string(), value);
        }
    }

    Ok(AttributeValue::Map(entries))
}
