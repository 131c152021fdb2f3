//! Reading recorded infrastructure state.
//!
//! Only the legacy JSON layout (schema versions 1 to 3) is understood:
//! ```text
//! { "version": 3, "modules": [ { "path": ["root"], "resources": {
//!     "aws_instance.web": { "type": "aws_instance", "depends_on": [],
//!         "primary": { "id": "i-0abc", "attributes": { ... } } } } } ] }
//! ```

pub mod document;
pub mod parser;

pub use document::{InstanceEntry, ModuleEntry, ResourceEntry, StateDocument};
pub use parser::{parse_file, parse_string};
