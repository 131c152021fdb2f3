//! # hclgen
//!
//! Render recorded infrastructure state as declarative HCL resource blocks.
//!
//! State stores each resource as a flat map of dotted attribute keys. This
//! crate rebuilds the nested values, applies an overlay of excludes and
//! defaults, and writes deterministic block text:
//!
//! - attributes are sorted by name, map entries by key
//! - `id` never appears as an attribute, only as the block label
//! - dependencies keep their recorded order
//!
//! ## Example
//!
//! ```
//! use hclgen::{Overlay, Renderer, ResourceState};
//!
//! let state = ResourceState::new("aws_instance", "i-0abc")
//!     .with_attribute("id", "i-0abc")
//!     .with_attribute("ami", "ami-123")
//!     .with_attribute("tags.%", "1")
//!     .with_attribute("tags.Name", "web");
//!
//! let overlay = Overlay::new().with_default("monitoring", false);
//! let config = Renderer::new().render(&state, &overlay).unwrap();
//!
//! assert!(config.starts_with("resource \"aws_instance\" \"i-0abc\" {"));
//! assert!(config.contains("monitoring = \"false\""));
//! ```
//!
//! ## Formatting
//!
//! Raw block text goes through a [`Formatter`]. The default [`HclFormatter`]
//! re-emits canonical layout and reports invalid text as
//! [`Error::Format`], which carries the raw text so nothing is lost.

pub mod attributes;
pub mod error;
pub mod flatmap;
pub mod format;
pub mod renderer;
pub mod state;
pub mod types;
pub mod writer;

pub use attributes::{AttributeSource, PlannedAttribute, discover_attribute_names, plan_attributes};
pub use error::{Error, Result};
pub use format::{Formatter, HclFormatter, RawFormatter};
pub use renderer::{Renderer, render_resource};
pub use state::StateDocument;
pub use types::{
    AttributeValue, Defaults, Excludes, LabelSource, Overlay, Primitive, RenderOptions,
    ResourceState,
};
