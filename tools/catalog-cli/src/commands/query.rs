//! Resolve one listing query.

use anyhow::{bail, Result};
use catalog_core::catalog::resolve_image_url;
use catalog_core::search::{codec, FilterCriteria, SortPreset};
use catalog_query::{QueryOutcome, ReferenceData, ResolvedPage};
use serde_json::{json, Value};
use tracing::info;

use super::QueryArgs;
use crate::context::Context;
use crate::output::{page_window_label, price_label};

/// Run the query command.
pub async fn run(args: QueryArgs, ctx: &Context) -> Result<()> {
    let base = match &args.url {
        Some(query) => codec::decode(query),
        None => FilterCriteria::new().with_pagination(1, ctx.config.query.page_size),
    };
    let criteria = args.filters.apply_to(base)?;

    if let Some(preset) = &args.filters.preset {
        if SortPreset::parse(preset)?.is_price_approximation() {
            ctx.output
                .warn("Price presets are served by creation date; the store has no price sort");
        }
    }

    let resolver = ctx.resolver()?;
    let spinner = ctx.output.spinner("Loading products...");
    let (outcome, reference) = tokio::join!(
        resolver.resolve(&criteria),
        ReferenceData::load(resolver.store())
    );
    spinner.finish_and_clear();

    let page = match outcome {
        QueryOutcome::Completed(page) => page,
        QueryOutcome::Superseded(generation) => bail!("Query {} was superseded", generation),
    };
    info!(
        generation = %page.generation,
        total = page.pagination().total,
        excluded = page.excluded.len(),
        "query resolved"
    );

    if ctx.output.is_json() {
        ctx.output.json(&page_json(&page));
    } else {
        render_page(ctx, &page, &reference);
    }

    match page.error_message() {
        Some(message) => bail!(message),
        None => Ok(()),
    }
}

/// Print a resolved page for humans.
pub fn render_page(ctx: &Context, page: &ResolvedPage, reference: &ReferenceData) {
    let out = &ctx.output;

    out.header("Products");
    for label in reference.active_filter_labels(&page.criteria) {
        out.list_item(&label);
    }

    if let Some(message) = page.error_message() {
        out.error(message);
        return;
    }

    if let Some(state) = page.empty_state() {
        out.warn(state.message());
        for action in state.clear_actions() {
            out.list_item(action.label());
        }
        return;
    }

    let media_base = ctx.config.store.media_base_url.as_deref();
    println!();
    for product in page.products() {
        let price = price_label(product);
        out.table_row(
            &[product.name.as_str(), price.as_str(), product.slug.as_str()],
            &[40, 28, 24],
        );
        if let Some(path) = product.display_image() {
            let image = media_base.map_or_else(|| path.to_string(), |base| {
                resolve_image_url(base, path)
            });
            out.debug(&image);
        }
    }

    let pagination = page.pagination();
    println!();
    out.kv(
        "Showing",
        &format!(
            "{}-{} of {}",
            pagination.start_item(),
            pagination.end_item(),
            pagination.total
        ),
    );
    if pagination.pages > 1 {
        out.kv(
            "Pages",
            &page_window_label(&pagination.page_window(), pagination.page),
        );
    }
    if !page.detail_failures.is_empty() {
        out.warn(&format!(
            "{} product(s) skipped: details could not be loaded",
            page.detail_failures.len()
        ));
    }
    out.debug(&format!("share: {}", codec::to_url("/products", &page.criteria)));
}

/// Machine-readable view of a resolved page.
pub fn page_json(page: &ResolvedPage) -> Value {
    let empty_state = page.empty_state().map(|state| {
        json!({
            "kind": state,
            "message": state.message(),
            "actions": state.clear_actions(),
        })
    });

    json!({
        "generation": page.generation.to_string(),
        "query": codec::encode(&page.criteria),
        "products": page.products(),
        "pagination": page.pagination(),
        "excluded": page.excluded,
        "detailFailures": page.detail_failures,
        "error": page.error_message(),
        "emptyState": empty_state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::search::{EmptyState, Pagination, ProductPage};
    use catalog_query::GenerationCounter;

    #[test]
    fn test_page_json_empty_state() {
        let criteria = FilterCriteria::new().with_flavor("F1").with_weight("W1");
        let page = ResolvedPage {
            generation: GenerationCounter::default().begin().generation(),
            page: ProductPage::new(Vec::new(), Pagination::empty(1, 20)),
            criteria,
            error: None,
            excluded: vec!["a".to_string()],
            detail_failures: Vec::new(),
        };

        let value = page_json(&page);
        assert_eq!(value["query"], "flavor=F1&weight=W1");
        assert_eq!(value["excluded"], json!(["a"]));
        assert_eq!(value["error"], Value::Null);
        assert_eq!(
            value["emptyState"]["message"],
            EmptyState::FlavorAndWeight.message()
        );
        assert_eq!(value["emptyState"]["actions"][0], "flavor");
    }
}
