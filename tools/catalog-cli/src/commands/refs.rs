//! Show the reference data behind the filter controls.

use anyhow::Result;
use catalog_core::catalog::Category;
use catalog_query::ReferenceData;

use super::RefsArgs;
use crate::context::Context;

/// Run the refs command.
pub async fn run(args: RefsArgs, ctx: &Context) -> Result<()> {
    let store = ctx.store()?;
    let spinner = ctx.output.spinner("Loading reference data...");
    let reference = ReferenceData::load(&store).await;
    spinner.finish_and_clear();

    if ctx.output.is_json() {
        ctx.output.json(&reference);
        return Ok(());
    }

    let out = &ctx.output;

    out.header("Categories");
    if args.flat {
        for category in &reference.categories {
            out.list_item(&format!("{} ({})", category.name, category.slug));
        }
    } else {
        for line in category_tree(&reference.categories) {
            out.list_item(&line);
        }
    }

    out.header("Flavors");
    for flavor in &reference.flavors {
        out.list_item(&format!("{} ({})", flavor.name, flavor.id));
    }

    out.header("Weights");
    for weight in reference.weights_by_magnitude() {
        out.list_item(&format!("{} ({})", weight.label(), weight.id));
    }

    out.header("Price");
    out.kv("max", &reference.max_price.to_string());

    Ok(())
}

/// Indented category lines, children under their parent. Categories whose
/// parent is missing are listed as roots.
fn category_tree(categories: &[Category]) -> Vec<String> {
    fn walk(categories: &[Category], parent: &Category, depth: usize, lines: &mut Vec<String>) {
        for child in categories
            .iter()
            .filter(|c| c.parent_id.as_ref() == Some(&parent.id))
        {
            lines.push(format!("{}{} ({})", "  ".repeat(depth), child.name, child.slug));
            if depth < 8 {
                walk(categories, child, depth + 1, lines);
            }
        }
    }

    let mut lines = Vec::new();
    let roots = categories.iter().filter(|c| match &c.parent_id {
        None => true,
        Some(parent) => !categories.iter().any(|other| &other.id == parent),
    });
    for root in roots {
        lines.push(format!("{} ({})", root.name, root.slug));
        walk(categories, root, 1, &mut lines);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_tree() {
        let protein = Category::new_root("c1", "Protein", "protein");
        let whey = Category::new_child(&protein, "c2", "Whey", "whey");
        let orphan = Category::new_child(
            &Category::new_root("missing", "Gone", "gone"),
            "c3",
            "Orphan",
            "orphan",
        );
        let categories = vec![protein, whey, orphan];

        assert_eq!(
            category_tree(&categories),
            vec![
                "Protein (protein)".to_string(),
                "  Whey (whey)".to_string(),
                "Orphan (orphan)".to_string(),
            ]
        );
    }
}
