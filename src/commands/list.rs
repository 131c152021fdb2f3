use anyhow::{Context as _, Result};
use colored::Colorize;
use hclgen::{ResourceState, discover_attribute_names};

use crate::Context;
use crate::cli::ListArgs;
use crate::ui;

pub fn run(ctx: &Context, args: ListArgs) -> Result<()> {
    let document = hclgen::state::parse_file(&args.state)
        .with_context(|| format!("Failed to read state file {}", args.state.display()))?;

    let resources: Vec<ResourceState> = document
        .resources()
        .into_iter()
        .filter(|r| args.types.is_empty() || args.types.contains(&r.resource_type))
        .collect();

    if !ctx.quiet {
        ui::header(&format!(
            "{} in {}",
            ui::plural(resources.len(), "resource"),
            args.state.display()
        ));
    }

    for resource in &resources {
        println!("{}", summary_line(resource));

        if ctx.verbose > 0 {
            let names: Vec<String> = discover_attribute_names(&resource.attributes)
                .into_iter()
                .collect();
            ui::dim(&names.join(", "));
        }
    }

    if resources.is_empty() && !ctx.quiet {
        ui::warn("No resources matched");
    }

    Ok(())
}

/// `address  type  id  (N attributes)`
fn summary_line(resource: &ResourceState) -> String {
    let count = discover_attribute_names(&resource.attributes).len();
    format!(
        "{}  {}  {}  {}",
        resource.address.as_deref().unwrap_or("-").bold(),
        resource.resource_type.cyan(),
        resource.primary_id,
        format!("({})", ui::plural(count, "attribute")).dimmed()
    )
}
