//! Encode and decode shareable listing URLs.

use anyhow::Result;
use catalog_core::search::{codec, FilterCriteria};

use super::{UrlArgs, UrlCommand};
use crate::context::Context;

/// Run the url command.
pub async fn run(args: UrlArgs, ctx: &Context) -> Result<()> {
    match args.command {
        UrlCommand::Encode { filters, path } => {
            let criteria = filters.apply_to(FilterCriteria::new())?;
            let url = codec::to_url(&path, &criteria);
            if ctx.output.is_json() {
                ctx.output.json(&serde_json::json!({
                    "url": url,
                    "query": codec::encode(&criteria),
                }));
            } else {
                println!("{}", url);
            }
        }
        UrlCommand::Decode { query } => {
            let criteria = codec::decode(&query);
            if ctx.output.is_json() {
                ctx.output.json(&criteria);
            } else {
                print_criteria(ctx, &criteria);
            }
        }
    }

    Ok(())
}

fn print_criteria(ctx: &Context, criteria: &FilterCriteria) {
    let out = &ctx.output;
    out.header("Criteria");

    let unset = || "-".to_string();
    out.kv("search", &criteria.search.clone().unwrap_or_else(unset));
    out.kv("category", &criteria.category.clone().unwrap_or_else(unset));
    out.kv(
        "flavor",
        &criteria.flavor.as_ref().map_or_else(unset, |f| f.to_string()),
    );
    out.kv(
        "weight",
        &criteria.weight.as_ref().map_or_else(unset, |w| w.to_string()),
    );
    out.kv(
        "minPrice",
        &criteria.min_price.map_or_else(unset, |p| p.to_string()),
    );
    out.kv(
        "maxPrice",
        &criteria.max_price.map_or_else(unset, |p| p.to_string()),
    );
    out.kv(
        "sort",
        &format!("{} {}", criteria.sort.as_str(), criteria.order.as_str()),
    );
    out.kv("page", &criteria.page.to_string());
    out.kv("limit", &criteria.limit.to_string());
    out.kv("canonical", &codec::encode(criteria));
}
