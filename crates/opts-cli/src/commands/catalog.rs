//! Commands that describe the stock classes

use colored::Colorize;
use opts_catalog::{catalog, class};
use opts_core::doc::render_class;

use crate::error::Result;

/// Run the doc command
pub fn run_doc(name: &str) -> Result<()> {
    let schema = class(name)?;
    print!("{}", render_class(schema));
    Ok(())
}

/// Run the classes command
pub fn run_classes() -> Result<()> {
    let registry = catalog();

    println!("{}", "Options Classes".bold());
    println!();
    for schema in registry.iter() {
        let parents = &schema.lineage()[1..];
        if parents.is_empty() {
            println!("  {}", schema.name().green());
        } else {
            println!(
                "  {:<22} {}",
                schema.name().green(),
                format!("extends {}", parents.join(" > ")).dimmed()
            );
        }
    }
    println!();
    println!(
        "{} {} classes registered. Use {} for details.",
        "Total:".dimmed(),
        registry.len(),
        "opts doc <CLASS>".cyan()
    );

    Ok(())
}
