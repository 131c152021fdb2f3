//! Core types for rendering resource state.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A scalar attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primitive {
    /// Rendered quoted and escaped
    String(String),
    /// Rendered as the quoted text `"true"` / `"false"`
    Bool(bool),
    /// Rendered as bare decimal digits
    Int(i64),
    /// A value of a kind the renderer does not support, kept only when the
    /// caller asked for lenient conversion. Rendered as the literal `unknown`.
    /// The payload describes the original kind.
    Unrecognized(String),
}

/// A reconstructed attribute value: a primitive, an ordered list or a map.
///
/// Maps are ordered by key so serialization never depends on insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Primitive(Primitive),
    List(Vec<AttributeValue>),
    Map(BTreeMap<String, AttributeValue>),
}

impl AttributeValue {
    /// Shorthand for a string primitive.
    pub fn string(value: impl Into<String>) -> Self {
        Self::Primitive(Primitive::String(value.into()))
    }

    /// Check if the value is an empty list or an empty map
    pub fn is_empty_collection(&self) -> bool {
        match self {
            Self::Primitive(_) => false,
            Self::List(items) => items.is_empty(),
            Self::Map(entries) => entries.is_empty(),
        }
    }

    /// Short name of the value's shape, for messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Primitive(_) => "primitive",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

impl From<Primitive> for AttributeValue {
    fn from(value: Primitive) -> Self {
        Self::Primitive(value)
    }
}

impl From<String> for Primitive {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Primitive {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<bool> for Primitive {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! impl_int_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Primitive {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }

            impl From<$ty> for AttributeValue {
                fn from(value: $ty) -> Self {
                    Self::Primitive(Primitive::from(value))
                }
            }
        )*
    };
}

impl_int_from!(i8, i16, i32, i64, u8, u16, u32);

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Primitive(Primitive::String(value))
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Primitive(Primitive::Bool(value))
    }
}

impl From<Vec<AttributeValue>> for AttributeValue {
    fn from(items: Vec<AttributeValue>) -> Self {
        Self::List(items)
    }
}

impl From<BTreeMap<String, AttributeValue>> for AttributeValue {
    fn from(entries: BTreeMap<String, AttributeValue>) -> Self {
        Self::Map(entries)
    }
}

/// Default values keyed by top-level attribute name.
pub type Defaults = BTreeMap<String, AttributeValue>;

/// Top-level attribute names to leave out of the output.
pub type Excludes = BTreeSet<String>;

/// Caller-supplied adjustments applied on top of raw state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlay {
    /// Used when state has no value for the name
    pub defaults: Defaults,
    /// Omitted regardless of state or defaults
    pub excludes: Excludes,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a default value for a top-level attribute
    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    /// Exclude a top-level attribute
    pub fn with_exclude(mut self, name: impl Into<String>) -> Self {
        self.excludes.insert(name.into());
        self
    }

    /// Merge another overlay into this one. Defaults from `other` win.
    pub fn merge(&mut self, other: &Overlay) {
        self.defaults
            .extend(other.defaults.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.excludes.extend(other.excludes.iter().cloned());
    }
}

/// One resource as recorded in state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceState {
    /// Resource type, e.g. `aws_instance`
    pub resource_type: String,
    /// Primary instance identifier (may contain the path delimiter)
    pub primary_id: String,
    /// Flattened attributes (`tags.%`, `tags.Name`, `ingress.#`, ...)
    pub attributes: BTreeMap<String, String>,
    /// Dependency identifiers in recorded order
    pub dependencies: Vec<String>,
    /// Resource address in the state document, e.g. `aws_instance.web`
    pub address: Option<String>,
}

impl ResourceState {
    pub fn new(resource_type: impl Into<String>, primary_id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            primary_id: primary_id.into(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_dependency(mut self, dependency: impl Into<String>) -> Self {
        self.dependencies.push(dependency.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Name part of the address (`web` for `aws_instance.web`).
    ///
    /// Counted instances keep their index (`web.1`).
    pub fn address_name(&self) -> Option<&str> {
        let address = self.address.as_deref()?;
        let rest = address
            .strip_prefix("data.")
            .unwrap_or(address)
            .strip_prefix(self.resource_type.as_str())?;
        rest.strip_prefix('.').filter(|name| !name.is_empty())
    }
}

/// Where the block label comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelSource {
    /// The primary instance identifier
    #[default]
    Id,
    /// The name part of the state address, falling back to the identifier
    Address,
}

/// Options that change rendering output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Leave out empty lists and maps that come from state
    pub skip_empty_collections: bool,
    /// Block label source
    pub label: LabelSource,
}
