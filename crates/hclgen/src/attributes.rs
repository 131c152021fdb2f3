//! Top-level attribute discovery and overlay resolution.
//!
//! Decides which attributes of a resource are rendered, in which order, and
//! whether each value comes from state or from a default.

use crate::flatmap::KEY_DELIMITER;
use crate::types::{Excludes, Overlay, ResourceState};
use std::collections::{BTreeMap, BTreeSet};

/// The instance identifier only ever appears in the block header.
pub const ID_ATTRIBUTE: &str = "id";

/// Where a rendered attribute value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeSource {
    /// Expanded from the flattened state attributes
    State,
    /// Taken from the overlay defaults (the name is absent from state)
    Default,
}

/// An attribute that survived exclusion, in output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAttribute {
    pub name: String,
    pub source: AttributeSource,
}

/// Collect the unique top-level names of a flattened attribute map.
///
/// `tags.%` and `tags.Name` both yield `tags`.
pub fn discover_attribute_names(attributes: &BTreeMap<String, String>) -> BTreeSet<String> {
    attributes
        .keys()
        .map(|key| match key.split_once(KEY_DELIMITER) {
            Some((name, _)) => name.to_string(),
            None => key.clone(),
        })
        .collect()
}

/// A copy of the caller's excludes with `id` added.
pub fn effective_excludes(excludes: &Excludes) -> Excludes {
    let mut effective = excludes.clone();
    effective.insert(ID_ATTRIBUTE.to_string());
    effective
}

/// Resolve the attributes to render for a resource, sorted by name.
///
/// Names come from state plus any default whose name is absent from state.
/// Absence is decided here, once: a default only applies to names state does
/// not mention at all.
pub fn plan_attributes(state: &ResourceState, overlay: &Overlay) -> Vec<PlannedAttribute> {
    let excludes = effective_excludes(&overlay.excludes);

    // name -> absent from state
    let mut names: BTreeMap<String, bool> = discover_attribute_names(&state.attributes)
        .into_iter()
        .map(|name| (name, false))
        .collect();

    for name in overlay.defaults.keys() {
        names.entry(name.clone()).or_insert(true);
    }

    names
        .into_iter()
        .filter(|(name, _)| {
            let excluded = excludes.contains(name);
            if excluded {
                log::trace!("{}: excluding attribute '{name}'", state.resource_type);
            }
            !excluded
        })
        .map(|(name, absent)| {
            let source = if absent && overlay.defaults.contains_key(&name) {
                log::debug!("{}: using default for '{name}'", state.resource_type);
                AttributeSource::Default
            } else {
                AttributeSource::State
            };
            PlannedAttribute { name, source }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(planned: &[PlannedAttribute]) -> Vec<&str> {
        planned.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_discover_with_dupes() {
        let state = ResourceState::new("aws_lambda_function", "fn")
            .with_attribute("name", "test")
            .with_attribute("environment.#", "1")
            .with_attribute("environment.0.variables.%", "1")
            .with_attribute("environment.0.variables.a", "value");

        let discovered = discover_attribute_names(&state.attributes);

        assert_eq!(discovered.len(), 2);
        assert!(discovered.contains("name"));
        assert!(discovered.contains("environment"));
    }

    #[test]
    fn test_discover_without_dupes() {
        let state = ResourceState::new("aws_instance", "i-1")
            .with_attribute("name", "test")
            .with_attribute("tags.%", "0");

        let discovered = discover_attribute_names(&state.attributes);

        assert_eq!(
            discovered.into_iter().collect::<Vec<_>>(),
            vec!["name".to_string(), "tags".to_string()]
        );
    }

    #[test]
    fn test_effective_excludes_leaves_caller_untouched() {
        let caller: Excludes = ["arn".to_string()].into_iter().collect();

        let effective = effective_excludes(&caller);

        assert!(effective.contains("id"));
        assert!(effective.contains("arn"));
        assert!(!caller.contains("id"));
    }

    #[test]
    fn test_plan_is_sorted_and_skips_id() {
        let state = ResourceState::new("widget", "w")
            .with_attribute("zone", "a")
            .with_attribute("id", "w")
            .with_attribute("ami", "ami-1")
            .with_attribute("tags.%", "0");

        let planned = plan_attributes(&state, &Overlay::new());

        assert_eq!(names(&planned), vec!["ami", "tags", "zone"]);
        assert!(planned.iter().all(|p| p.source == AttributeSource::State));
    }

    #[test]
    fn test_plan_default_only_attribute() {
        let state = ResourceState::new("widget", "w").with_attribute("name", "x");
        let overlay = Overlay::new().with_default("region", "us-east-1");

        let planned = plan_attributes(&state, &overlay);

        assert_eq!(
            planned,
            vec![
                PlannedAttribute {
                    name: "name".to_string(),
                    source: AttributeSource::State,
                },
                PlannedAttribute {
                    name: "region".to_string(),
                    source: AttributeSource::Default,
                },
            ]
        );
    }

    #[test]
    fn test_plan_state_wins_over_default_when_present() {
        let state = ResourceState::new("widget", "w").with_attribute("tags.%", "0");
        let overlay = Overlay::new().with_default("tags", "ignored");

        let planned = plan_attributes(&state, &overlay);

        assert_eq!(planned[0].source, AttributeSource::State);
    }

    #[test]
    fn test_plan_exclusion_wins_over_default_and_state() {
        let state = ResourceState::new("widget", "w").with_attribute("arn", "arn:x");
        let overlay = Overlay::new()
            .with_default("arn", "default")
            .with_default("owner", "ops")
            .with_exclude("arn")
            .with_exclude("owner");

        assert!(plan_attributes(&state, &overlay).is_empty());
    }

    #[test]
    fn test_plan_id_default_is_still_excluded() {
        let state = ResourceState::new("widget", "w");
        let overlay = Overlay::new().with_default("id", "forced");

        assert!(plan_attributes(&state, &overlay).is_empty());
    }
}
