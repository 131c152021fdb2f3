//! Writer for raw resource block text.
//!
//! Produces unformatted block syntax: one assignment or block per line, no
//! indentation. The formatter owns the final layout.

use crate::attributes::{AttributeSource, plan_attributes};
use crate::error::{Error, Result};
use crate::flatmap::{self, KEY_DELIMITER};
use crate::types::{AttributeValue, LabelSource, Overlay, Primitive, RenderOptions, ResourceState};
use std::collections::BTreeMap;

/// Replacement for the path delimiter in block labels.
pub const LABEL_DELIMITER_REPLACEMENT: &str = "_";

/// Make an identifier usable as a block label.
pub fn sanitize_resource_id(id: &str) -> String {
    id.replace(KEY_DELIMITER, LABEL_DELIMITER_REPLACEMENT)
}

/// Quote a string literal.
///
/// Template markers are doubled so state text is never interpolated.
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');

    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' | '%' if chars.peek() == Some(&'{') => {
                out.push(c);
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => out.push(c),
        }
    }

    out.push('"');
    out
}

/// Render a primitive as a literal.
///
/// Booleans are quoted text on purpose.
pub fn primitive_value_string(value: &Primitive) -> String {
    match value {
        Primitive::String(s) => quote_string(s),
        Primitive::Bool(b) => format!("\"{b}\""),
        Primitive::Int(i) => i.to_string(),
        Primitive::Unrecognized(kind) => {
            log::warn!("rendering unsupported value of kind '{kind}' as 'unknown'");
            "unknown".to_string()
        }
    }
}

/// Render `name = <literal>`.
pub fn primitive_attribute_string(name: &str, value: &Primitive) -> String {
    let literal = primitive_value_string(value);
    // Known empty-value artifact in recorded state.
    if name == "date" && literal == "\"\"" {
        return String::new();
    }

    format!("{name} = {literal}\n")
}

/// Render `name = [ ... ]` for a list of primitives.
pub fn primitive_list_string(name: &str, items: &[AttributeValue]) -> Result<String> {
    let mut out = format!("{name} = [\n");

    for (index, item) in items.iter().enumerate() {
        match item {
            AttributeValue::Primitive(value) => {
                out.push_str(&primitive_value_string(value));
                out.push(',');
            }
            _ => {
                return Err(Error::MixedList {
                    name: name.to_string(),
                    index,
                });
            }
        }
    }

    out.push_str("]\n");
    Ok(out)
}

/// Render `name { ... }` with entries in key order.
///
/// Keys are written bare, so a key that is not an identifier (`aws:stack-name`,
/// or `kubernetes.io/role` after flat-key splitting) makes the block fail to
/// format. Exclude such attributes to render the rest of the resource.
pub fn map_attribute_string(name: &str, entries: &BTreeMap<String, AttributeValue>) -> Result<String> {
    let mut out = format!("{name} {{\n");

    for (key, value) in entries {
        out.push_str(&attribute_string(key, value)?);
    }

    out.push_str("}\n");
    Ok(out)
}

/// Render any attribute value under `name`.
///
/// A list of maps becomes one block per element, all named `name`.
pub fn attribute_string(name: &str, value: &AttributeValue) -> Result<String> {
    match value {
        AttributeValue::Primitive(p) => Ok(primitive_attribute_string(name, p)),
        AttributeValue::Map(entries) => map_attribute_string(name, entries),
        AttributeValue::List(items) => match items.first() {
            None | Some(AttributeValue::Primitive(_)) => primitive_list_string(name, items),
            Some(AttributeValue::Map(_)) => {
                let mut out = String::new();
                for (index, item) in items.iter().enumerate() {
                    let AttributeValue::Map(entries) = item else {
                        return Err(Error::MixedList {
                            name: name.to_string(),
                            index,
                        });
                    };
                    out.push_str(&map_attribute_string(name, entries)?);
                }
                Ok(out)
            }
            Some(AttributeValue::List(_)) => Err(Error::NestedList {
                name: name.to_string(),
            }),
        },
    }
}

/// Render the `depends_on` list, or nothing when there are no dependencies.
///
/// Order is kept as recorded.
pub fn depends_on_string(dependencies: &[String]) -> String {
    if dependencies.is_empty() {
        return String::new();
    }

    let mut out = String::from("depends_on = [\n");
    for dependency in dependencies {
        out.push_str(&quote_string(dependency));
        out.push(',');
    }
    out.push_str("]\n");
    out
}

/// Block label for a resource.
pub fn resource_label(state: &ResourceState, label: LabelSource) -> String {
    let id = match label {
        LabelSource::Id => state.primary_id.as_str(),
        LabelSource::Address => state.address_name().unwrap_or(&state.primary_id),
    };
    sanitize_resource_id(id)
}

/// Render the complete, unformatted resource block.
pub fn resource_raw_string(
    state: &ResourceState,
    overlay: &Overlay,
    options: &RenderOptions,
) -> Result<String> {
    let mut out = format!(
        "resource {} {} {{\n",
        quote_string(&state.resource_type),
        quote_string(&resource_label(state, options.label))
    );

    for planned in plan_attributes(state, overlay) {
        let name = planned.name.as_str();

        let value = match planned.source {
            AttributeSource::Default => match overlay.defaults.get(name) {
                Some(value) => value.clone(),
                None => continue,
            },
            AttributeSource::State => match flatmap::expand(&state.attributes, name)? {
                Some(value) => value,
                None => {
                    log::debug!("{}: nothing to expand for '{name}'", state.resource_type);
                    continue;
                }
            },
        };

        if options.skip_empty_collections
            && planned.source == AttributeSource::State
            && value.is_empty_collection()
        {
            log::debug!("{}: skipping empty {} '{name}'", state.resource_type, value.shape());
            continue;
        }

        out.push_str(&attribute_string(name, &value)?);
    }

    out.push_str(&depends_on_string(&state.dependencies));
    out.push_str("}\n");

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, AttributeValue)]) -> BTreeMap<String, AttributeValue> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_sanitize_resource_id_with_periods() {
        assert_eq!(sanitize_resource_id("my.test.resource.name"), "my_test_resource_name");
        assert_eq!(sanitize_resource_id("plain"), "plain");
    }

    #[test]
    fn test_quote_string_escapes() {
        assert_eq!(quote_string("mystring"), "\"mystring\"");
        assert_eq!(
            quote_string("\"mykey\": \"myvalue\""),
            "\"\\\"mykey\\\": \\\"myvalue\\\"\""
        );
        assert_eq!(quote_string("a\\b"), "\"a\\\\b\"");
        assert_eq!(quote_string("line1\nline2\t"), "\"line1\\nline2\\t\"");
        assert_eq!(quote_string("bell\u{7}"), "\"bell\\u0007\"");
    }

    #[test]
    fn test_quote_string_doubles_template_markers() {
        assert_eq!(quote_string("${var.x}"), "\"$${var.x}\"");
        assert_eq!(quote_string("%{ if }"), "\"%%{ if }\"");
        assert_eq!(quote_string("cost: $5 or 10%"), "\"cost: $5 or 10%\"");
    }

    #[test]
    fn test_primitive_value_string() {
        assert_eq!(primitive_value_string(&Primitive::from("x")), "\"x\"");
        assert_eq!(primitive_value_string(&Primitive::Bool(true)), "\"true\"");
        assert_eq!(primitive_value_string(&Primitive::Bool(false)), "\"false\"");
        assert_eq!(
            primitive_value_string(&Primitive::Unrecognized("float".to_string())),
            "unknown"
        );
    }

    #[test]
    fn test_primitive_value_string_with_ints() {
        let values = [
            Primitive::from(1i8),
            Primitive::from(16i16),
            Primitive::from(-32i32),
            Primitive::from(64i64),
        ];
        let expected = ["1", "16", "-32", "64"];

        for (value, expected) in values.iter().zip(expected) {
            assert_eq!(primitive_value_string(value), expected);
        }
    }

    #[test]
    fn test_primitive_attribute_string() {
        assert_eq!(
            primitive_attribute_string("mykey", &Primitive::from("myvalue")),
            "mykey = \"myvalue\"\n"
        );
        assert_eq!(
            primitive_attribute_string("mykey", &Primitive::Bool(false)),
            "mykey = \"false\"\n"
        );
        assert_eq!(primitive_attribute_string("mykey", &Primitive::Int(8)), "mykey = 8\n");
    }

    #[test]
    fn test_date_carve_out() {
        assert_eq!(primitive_attribute_string("date", &Primitive::from("")), "");
        assert_eq!(
            primitive_attribute_string("date", &Primitive::from("2020-01-01")),
            "date = \"2020-01-01\"\n"
        );
        assert_eq!(primitive_attribute_string("other", &Primitive::from("")), "other = \"\"\n");
    }

    #[test]
    fn test_primitive_list_string() {
        let items = vec![AttributeValue::string("sg-xxxxxxxx"), AttributeValue::string("sg-xxxxxxxx")];

        assert_eq!(
            primitive_list_string("security_groups", &items).unwrap(),
            "security_groups = [\n\"sg-xxxxxxxx\",\"sg-xxxxxxxx\",]\n"
        );
    }

    #[test]
    fn test_empty_list_renders() {
        assert_eq!(
            attribute_string("names", &AttributeValue::List(vec![])).unwrap(),
            "names = [\n]\n"
        );
    }

    #[test]
    fn test_map_attribute_string_is_sorted() {
        let entries = map(&[("b", "b".into()), ("a", "a".into())]);

        assert_eq!(
            map_attribute_string("tags", &entries).unwrap(),
            "tags {\na = \"a\"\nb = \"b\"\n}\n"
        );
    }

    #[test]
    fn test_empty_map_renders() {
        assert_eq!(
            attribute_string("tags", &AttributeValue::Map(BTreeMap::new())).unwrap(),
            "tags {\n}\n"
        );
    }

    #[test]
    fn test_list_of_maps_repeats_block() {
        let value = AttributeValue::List(vec![
            AttributeValue::Map(map(&[("port", 80i64.into())])),
            AttributeValue::Map(map(&[("port", 443i64.into())])),
        ]);

        assert_eq!(
            attribute_string("ingress", &value).unwrap(),
            "ingress {\nport = 80\n}\ningress {\nport = 443\n}\n"
        );
    }

    #[test]
    fn test_nested_values_in_map() {
        let value = AttributeValue::Map(map(&[
            ("cidrs", AttributeValue::List(vec!["10.0.0.0/8".into()])),
            ("variables", AttributeValue::Map(map(&[("a", "value".into())]))),
        ]));

        assert_eq!(
            attribute_string("environment", &value).unwrap(),
            "environment {\ncidrs = [\n\"10.0.0.0/8\",]\nvariables {\na = \"value\"\n}\n}\n"
        );
    }

    #[test]
    fn test_mixed_list_is_rejected() {
        let primitive_first = AttributeValue::List(vec![
            "a".into(),
            AttributeValue::Map(BTreeMap::new()),
        ]);
        let err = attribute_string("names", &primitive_first).unwrap_err();
        assert!(matches!(err, Error::MixedList { index: 1, .. }));

        let map_first = AttributeValue::List(vec![
            AttributeValue::Map(BTreeMap::new()),
            AttributeValue::Map(BTreeMap::new()),
            "a".into(),
        ]);
        let err = attribute_string("rules", &map_first).unwrap_err();
        assert!(matches!(err, Error::MixedList { index: 2, .. }));
    }

    #[test]
    fn test_nested_list_is_rejected() {
        let value = AttributeValue::List(vec![AttributeValue::List(vec![])]);
        let err = attribute_string("matrix", &value).unwrap_err();
        assert!(matches!(err, Error::NestedList { .. }));
    }

    #[test]
    fn test_depends_on_string() {
        assert_eq!(depends_on_string(&[]), "");
        assert_eq!(
            depends_on_string(&["y".to_string(), "x".to_string()]),
            "depends_on = [\n\"y\",\"x\",]\n"
        );
    }

    #[test]
    fn test_resource_raw_string() {
        let state = ResourceState::new("resource_type", "my.resource")
            .with_attribute("name", "myname")
            .with_attribute("myexcludekey", "myexcludeval")
            .with_attribute("id", "my.resource")
            .with_dependency("mydep");
        let overlay = Overlay::new().with_exclude("myexcludekey");

        let raw = resource_raw_string(&state, &overlay, &RenderOptions::default()).unwrap();

        assert_eq!(
            raw,
            "resource \"resource_type\" \"my_resource\" {\nname = \"myname\"\ndepends_on = [\n\"mydep\",]\n}\n"
        );
    }

    #[test]
    fn test_resource_raw_string_default_only() {
        let state = ResourceState::new("widget", "w").with_attribute("name", "x");
        let overlay = Overlay::new().with_default("region", "us-east-1");

        let raw = resource_raw_string(&state, &overlay, &RenderOptions::default()).unwrap();

        assert!(raw.contains("region = \"us-east-1\"\n"));
        assert!(raw.find("name =").unwrap() < raw.find("region =").unwrap());
    }

    #[test]
    fn test_resource_raw_string_skip_empty_collections() {
        let state = ResourceState::new("widget", "w")
            .with_attribute("tags.%", "0")
            .with_attribute("names.#", "0");
        let overlay = Overlay::new().with_default("labels", AttributeValue::Map(BTreeMap::new()));

        let kept = resource_raw_string(&state, &overlay, &RenderOptions::default()).unwrap();
        assert!(kept.contains("tags {\n}\n"));
        assert!(kept.contains("names = [\n]\n"));

        let options = RenderOptions {
            skip_empty_collections: true,
            ..Default::default()
        };
        let skipped = resource_raw_string(&state, &overlay, &options).unwrap();
        assert!(!skipped.contains("tags"));
        assert!(!skipped.contains("names"));
        // Defaults are rendered as given.
        assert!(skipped.contains("labels {\n}\n"));
    }

    #[test]
    fn test_resource_label_from_address() {
        let state = ResourceState::new("aws_instance", "i-0abc").with_address("aws_instance.web.1");

        assert_eq!(resource_label(&state, LabelSource::Id), "i-0abc");
        assert_eq!(resource_label(&state, LabelSource::Address), "web_1");

        let no_address = ResourceState::new("aws_instance", "a.b");
        assert_eq!(resource_label(&no_address, LabelSource::Address), "a_b");
    }
}
