//! Rendering of complete resource blocks.

use crate::error::Result;
use crate::format::{Formatter, HclFormatter};
use crate::types::{Defaults, Excludes, Overlay, RenderOptions, ResourceState};
use crate::writer;

/// Renders resources with a formatter and fixed options.
///
/// Rendering is pure given its inputs, so one renderer can be shared across
/// threads.
pub struct Renderer {
    formatter: Box<dyn Formatter>,
    options: RenderOptions,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Create a renderer with the HCL formatter and default options.
    pub fn new() -> Self {
        Self {
            formatter: Box::new(HclFormatter),
            options: RenderOptions::default(),
        }
    }

    pub fn with_formatter(mut self, formatter: Box<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Render a resource and pass it through the formatter.
    ///
    /// A formatter failure is returned as [`crate::Error::Format`] with the
    /// raw text attached.
    pub fn render(&self, state: &ResourceState, overlay: &Overlay) -> Result<String> {
        let raw = self.render_raw(state, overlay)?;
        log::trace!(
            "formatting {} bytes with the {} formatter",
            raw.len(),
            self.formatter.name()
        );
        self.formatter.format(&raw)
    }

    /// Render a resource without formatting.
    pub fn render_raw(&self, state: &ResourceState, overlay: &Overlay) -> Result<String> {
        writer::resource_raw_string(state, overlay, &self.options)
    }
}

/// Render one resource with the HCL formatter and default options.
///
/// `excludes` is read, never modified; `id` is always excluded.
pub fn render_resource(
    state: &ResourceState,
    defaults: &Defaults,
    excludes: &Excludes,
) -> Result<String> {
    let overlay = Overlay {
        defaults: defaults.clone(),
        excludes: excludes.clone(),
    };
    Renderer::new().render(state, &overlay)
}
