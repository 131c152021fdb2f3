//! Serde model of a state document.

use crate::types::ResourceState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A parsed state document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateDocument {
    pub version: u64,
    #[serde(default)]
    pub terraform_version: Option<String>,
    #[serde(default)]
    pub serial: u64,
    #[serde(default)]
    pub lineage: Option<String>,
    #[serde(default)]
    pub modules: Vec<ModuleEntry>,
}

/// One module and the resources recorded for it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleEntry {
    #[serde(default)]
    pub path: Vec<String>,
    /// Keyed by resource address, e.g. `aws_instance.web`
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceEntry {
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub primary: Option<InstanceEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstanceEntry {
    pub id: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl ModuleEntry {
    /// Dotted module path, e.g. `root.network`.
    pub fn display_path(&self) -> String {
        if self.path.is_empty() {
            "root".to_string()
        } else {
            self.path.join(".")
        }
    }
}

impl StateDocument {
    /// All resources with a primary instance, module by module in document
    /// order and by address within a module.
    pub fn resources(&self) -> Vec<ResourceState> {
        let mut resources = Vec::new();

        for module in &self.modules {
            for (address, entry) in &module.resources {
                let Some(primary) = &entry.primary else {
                    log::debug!(
                        "skipping {address} in module {}: no primary instance",
                        module.display_path()
                    );
                    continue;
                };

                resources.push(ResourceState {
                    resource_type: entry.resource_type.clone(),
                    primary_id: primary.id.clone(),
                    attributes: primary.attributes.clone(),
                    dependencies: entry.depends_on.clone(),
                    address: Some(address.clone()),
                });
            }
        }

        resources
    }
}
