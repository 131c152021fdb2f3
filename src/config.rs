use crate::paths::ConfigLocation;
use anyhow::{Context, Result};
use hclgen::{AttributeValue, LabelSource, Overlay, Primitive};
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

// ============================================================================
// Config Schema
// ============================================================================

/// Overlay configuration, usually `~/.config/terraconf/config.toml`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TerraconfConfig {
    /// Attributes excluded from every resource type
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Leave out empty lists and maps recorded in state
    #[serde(default)]
    pub skip_empty: bool,

    /// Block label source
    #[serde(default)]
    pub label: LabelSource,

    /// Render unsupported default values as `unknown` instead of failing
    #[serde(default)]
    pub lenient: bool,

    /// Per resource type overlays, keyed by type name
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceTypeConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceTypeConfig {
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub defaults: toml::Table,
}

impl TerraconfConfig {
    /// Load the config, treating a missing discovered file as empty.
    pub fn load(location: &ConfigLocation) -> Result<Self> {
        let path = location.path();

        if let ConfigLocation::Discovered(_) = location
            && !path.exists()
        {
            log::debug!("Config file {} does not exist, using no overlay", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file: {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        log::debug!(
            "Loaded config from {} ({} resource type(s))",
            path.display(),
            config.resources.len()
        );
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid TOML format in terraconf config")
    }
}

// ============================================================================
// Default Value Conversion
// ============================================================================

/// How to treat default values of kinds the renderer cannot express.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValuePolicy {
    /// Fail with the attribute path
    Strict,
    /// Keep them, rendered as `unknown`
    Lenient,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("default '{path}' is a {kind}, which cannot be rendered (use --lenient to render it as 'unknown')")]
    Unsupported { path: String, kind: &'static str },
}

/// Convert a TOML default into an attribute value.
///
/// `path` names the value in error messages (`tags.Owner`, `ports[1]`).
pub fn convert_value(
    path: &str,
    value: &toml::Value,
    policy: ValuePolicy,
) -> std::result::Result<AttributeValue, ValueError> {
    match value {
        toml::Value::String(s) => Ok(AttributeValue::string(s.as_str())),
        toml::Value::Integer(i) => Ok(AttributeValue::from(*i)),
        toml::Value::Boolean(b) => Ok(AttributeValue::from(*b)),
        toml::Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| convert_value(&format!("{path}[{i}]"), item, policy))
            .collect::<std::result::Result<Vec<_>, ValueError>>()
            .map(AttributeValue::List),
        toml::Value::Table(table) => table
            .iter()
            .map(|(key, item)| {
                convert_value(&format!("{path}.{key}"), item, policy)
                    .map(|converted| (key.clone(), converted))
            })
            .collect::<std::result::Result<BTreeMap<_, _>, ValueError>>()
            .map(AttributeValue::Map),
        toml::Value::Float(_) => unsupported(path, "float", policy),
        toml::Value::Datetime(_) => unsupported(path, "datetime", policy),
    }
}

fn unsupported(
    path: &str,
    kind: &'static str,
    policy: ValuePolicy,
) -> std::result::Result<AttributeValue, ValueError> {
    match policy {
        ValuePolicy::Strict => Err(ValueError::Unsupported {
            path: path.to_string(),
            kind,
        }),
        ValuePolicy::Lenient => Ok(AttributeValue::Primitive(Primitive::Unrecognized(
            kind.to_string(),
        ))),
    }
}

// ============================================================================
// Overlays
// ============================================================================

/// Overlays resolved from config, ready to apply per resource type.
#[derive(Debug, Default)]
pub struct Overlays {
    global: Overlay,
    per_type: BTreeMap<String, Overlay>,
}

impl Overlays {
    /// Build overlays from config plus excludes given on the command line.
    pub fn from_config(
        config: &TerraconfConfig,
        extra_excludes: &[String],
        policy: ValuePolicy,
    ) -> Result<Self> {
        let mut global = Overlay::new();
        global
            .excludes
            .extend(config.exclude.iter().chain(extra_excludes).cloned());

        let mut per_type = BTreeMap::new();
        for (resource_type, type_config) in &config.resources {
            let mut overlay = Overlay::new();
            overlay.excludes.extend(type_config.exclude.iter().cloned());

            for (name, value) in &type_config.defaults {
                let value = convert_value(name, value, policy)
                    .with_context(|| format!("Invalid defaults for resource type {resource_type}"))?;
                overlay.defaults.insert(name.clone(), value);
            }

            per_type.insert(resource_type.clone(), overlay);
        }

        Ok(Self { global, per_type })
    }

    /// The overlay for one resource type (global excludes included).
    pub fn for_type(&self, resource_type: &str) -> Overlay {
        let mut overlay = self.global.clone();
        if let Some(type_overlay) = self.per_type.get(resource_type) {
            overlay.merge(type_overlay);
        }
        overlay
    }
}
