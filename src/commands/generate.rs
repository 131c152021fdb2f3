use anyhow::{Context as _, Result, bail};
use colored::Colorize;
use hclgen::{Formatter, HclFormatter, RawFormatter, RenderOptions, Renderer, ResourceState};
use rayon::prelude::*;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::Context;
use crate::cli::GenerateArgs;
use crate::config::{Overlays, TerraconfConfig, ValuePolicy};
use crate::paths;
use crate::ui;

/// A resource that did not render cleanly.
#[derive(Debug)]
pub struct Failure {
    pub address: String,
    pub message: String,
    /// Raw text was emitted in place of formatted text
    pub raw_emitted: bool,
}

/// Joined output of a run plus what went wrong.
#[derive(Debug, Default)]
pub struct Rendered {
    pub output: String,
    pub rendered: usize,
    pub failures: Vec<Failure>,
}

pub fn run(ctx: &Context, args: GenerateArgs) -> Result<()> {
    let location = paths::config_file(args.config.as_deref())?;
    let config = TerraconfConfig::load(&location)?;

    let policy = if args.lenient || config.lenient {
        ValuePolicy::Lenient
    } else {
        ValuePolicy::Strict
    };
    let overlays = Overlays::from_config(&config, &args.exclude, policy)?;

    let options = RenderOptions {
        skip_empty_collections: args.skip_empty || config.skip_empty,
        label: args.label.map_or(config.label, Into::into),
    };
    let formatter: Box<dyn Formatter> = if args.no_format {
        Box::new(RawFormatter)
    } else {
        Box::new(HclFormatter)
    };
    let renderer = Renderer::new()
        .with_formatter(formatter)
        .with_options(options);

    let document = hclgen::state::parse_file(&args.state)
        .with_context(|| format!("Failed to read state file {}", args.state.display()))?;
    let resources: Vec<ResourceState> = document
        .resources()
        .into_iter()
        .filter(|r| args.types.is_empty() || args.types.contains(&r.resource_type))
        .collect();

    log::info!(
        "Rendering {} from {}",
        ui::plural(resources.len(), "resource"),
        args.state.display()
    );

    let rendered = render_all(&renderer, &overlays, &resources, args.jobs)?;

    if let Some(check_path) = &args.check {
        check(check_path, &rendered.output, ctx.quiet)?;
    } else if let Some(output_path) = &args.output {
        fs::write(output_path, &rendered.output)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        if !ctx.quiet {
            ui::success(&format!(
                "Wrote {} to {}",
                ui::plural(rendered.rendered, "resource"),
                output_path.display()
            ));
        }
    } else {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(rendered.output.as_bytes())
            .context("Failed to write to stdout")?;
        stdout.flush().context("Failed to write to stdout")?;
    }

    report_failures(&rendered.failures)
}

/// Render resources on a thread pool, keeping input order.
pub fn render_all(
    renderer: &Renderer,
    overlays: &Overlays,
    resources: &[ResourceState],
    jobs: usize,
) -> Result<Rendered> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("Failed to create render thread pool")?;

    let results: Vec<hclgen::Result<String>> = pool.install(|| {
        resources
            .par_iter()
            .map(|resource| {
                let overlay = overlays.for_type(&resource.resource_type);
                renderer.render(resource, &overlay)
            })
            .collect()
    });

    Ok(collect_output(resources, results))
}

/// Join rendered blocks with a blank line between resources.
///
/// Formatter failures still contribute their raw text; other failures drop
/// the resource.
fn collect_output(resources: &[ResourceState], results: Vec<hclgen::Result<String>>) -> Rendered {
    let mut blocks = Vec::with_capacity(results.len());
    let mut rendered = Rendered::default();

    for (resource, result) in resources.iter().zip(results) {
        let address = resource
            .address
            .clone()
            .unwrap_or_else(|| format!("{}.{}", resource.resource_type, resource.primary_id));

        match result {
            Ok(text) => {
                log::debug!("Rendered {address}");
                blocks.push(text);
                rendered.rendered += 1;
            }
            Err(e) => {
                log::error!("{address}: {e}");
                let raw_emitted = match e.raw_text() {
                    Some(raw) => {
                        blocks.push(raw.to_string());
                        true
                    }
                    None => false,
                };
                rendered.failures.push(Failure {
                    address,
                    message: e.to_string(),
                    raw_emitted,
                });
            }
        }
    }

    rendered.output = blocks.join("\n");
    rendered
}

/// Compare generated output against an existing file.
fn check(path: &Path, generated: &str, quiet: bool) -> Result<()> {
    let existing = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if !has_drift(&existing, generated) {
        if !quiet {
            ui::success(&format!("{} is up to date", path.display()));
        }
        return Ok(());
    }

    ui::header(&format!("Drift in {}", path.display()));
    let diff = similar::TextDiff::from_lines(existing.as_str(), generated);
    for change in diff.iter_all_changes() {
        match change.tag() {
            similar::ChangeTag::Delete => eprint!("{}", format!("- {change}").red()),
            similar::ChangeTag::Insert => eprint!("{}", format!("+ {change}").green()),
            similar::ChangeTag::Equal => {}
        }
    }

    bail!("{} differs from the generated config", path.display())
}

fn has_drift(existing: &str, generated: &str) -> bool {
    similar::TextDiff::from_lines(existing, generated)
        .iter_all_changes()
        .any(|change| change.tag() != similar::ChangeTag::Equal)
}

fn report_failures(failures: &[Failure]) -> Result<()> {
    if failures.is_empty() {
        return Ok(());
    }

    for failure in failures {
        ui::error(&format!("{}: {}", failure.address, failure.message));
        if failure.raw_emitted {
            ui::dim("unformatted text was written in its place");
        }
    }

    bail!("{} could not be rendered", ui::plural(failures.len(), "resource"))
}
