//! Markdown documentation for options classes

use crate::schema::Schema;
use crate::types::OptType;

/// Render the options and sections of a class as Markdown.
///
/// Output is deterministic: options and sections are listed in sorted order.
pub fn render_class(schema: &Schema) -> String {
    let mut out = format!("# {}\n", schema.name());

    if schema.lineage().len() > 1 {
        out.push_str(&format!("\nExtends `{}`.\n", schema.lineage()[1..].join("` > `")));
    }

    let names: Vec<&str> = schema.option_names().collect();
    if !names.is_empty() {
        out.push_str("\n| Option | Aliases | Types | Values | Default | Description |\n");
        out.push_str("|---|---|---|---|---|---|\n");
        for name in names {
            let cells = [
                format!("`{name}`"),
                code_list(schema.aliases_of(name).into_iter().map(str::to_string)),
                type_cell(schema.types_of(name), schema.list_depth(name)),
                code_list(
                    schema
                        .allowed_values(name)
                        .unwrap_or_default()
                        .iter()
                        .map(|v| v.to_string()),
                ),
                schema
                    .default_of(name)
                    .map(|v| format!("`{v}`"))
                    .unwrap_or_default(),
                schema.description(name).unwrap_or_default().to_string(),
            ];
            out.push_str(&format!("| {} |\n", cells.join(" | ")));
        }
    }

    if !schema.sections().is_empty() || schema.tagged().is_some() {
        out.push_str("\n## Sections\n\n");
        for (name, cls) in schema.sections() {
            out.push_str(&format!("- `{name}`: `{}`\n", cls.name()));
        }
        if let Some(union) = schema.tagged() {
            let mut kinds: Vec<String> = union
                .kinds()
                .iter()
                .map(|(tag, cls)| format!("`{tag}` → `{}`", cls.name()))
                .collect();
            if let Some(cls) = union.fallback() {
                kinds.push(format!("otherwise `{}`", cls.name()));
            }
            out.push_str(&format!(
                "- any other key, by `{}`: {}\n",
                union.field(),
                kinds.join(", ")
            ));
        }
    }
    out
}

fn code_list(items: impl Iterator<Item = String>) -> String {
    items.map(|s| format!("`{s}`")).collect::<Vec<_>>().join(", ")
}

fn type_cell(types: Option<&[OptType]>, depth: usize) -> String {
    let base = match types {
        Some(types) => types.iter().map(|t| t.name()).collect::<Vec<_>>().join(" or "),
        None => "any".to_string(),
    };
    (0..depth).fold(base, |inner, _| format!("list[{inner}]"))
}
