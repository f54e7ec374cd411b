//! CLI command implementations.

pub mod browse;
pub mod config;
pub mod query;
pub mod refs;
pub mod url;

use anyhow::{bail, Result};
use catalog_core::search::{FilterChange, FilterCriteria, SortField, SortOrder, SortPreset};
use catalog_core::{FlavorId, Price, WeightId};
use clap::{Args, Subcommand};

/// Filter flags shared by `query` and `url encode`.
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Free-text search over name and description.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Category slug.
    #[arg(long)]
    pub category: Option<String>,

    /// Flavor id.
    #[arg(long)]
    pub flavor: Option<String>,

    /// Weight id.
    #[arg(long)]
    pub weight: Option<String>,

    /// Lower price bound, inclusive.
    #[arg(long)]
    pub min_price: Option<String>,

    /// Upper price bound, inclusive.
    #[arg(long)]
    pub max_price: Option<String>,

    /// Sort field (createdAt, updatedAt, name, featured).
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort order (asc, desc).
    #[arg(long)]
    pub order: Option<String>,

    /// Sort preset (newest, oldest, name-asc, name-desc, price-low, price-high).
    #[arg(long, conflicts_with_all = ["sort", "order"])]
    pub preset: Option<String>,

    /// Page number, 1-indexed.
    #[arg(short, long)]
    pub page: Option<u32>,

    /// Products per page.
    #[arg(short, long)]
    pub limit: Option<u32>,
}

impl FilterArgs {
    /// The edits these flags make, in application order. Bad sort, order,
    /// preset or price values are rejected rather than defaulted.
    pub fn changes(&self) -> Result<Vec<FilterChange>> {
        let mut changes = Vec::new();

        if let Some(search) = &self.search {
            changes.push(FilterChange::Search(search.clone()));
        }
        if let Some(category) = &self.category {
            changes.push(FilterChange::Category(Some(category.clone())));
        }
        if let Some(flavor) = &self.flavor {
            changes.push(FilterChange::Flavor(Some(FlavorId::new(flavor.as_str()))));
        }
        if let Some(weight) = &self.weight {
            changes.push(FilterChange::Weight(Some(WeightId::new(weight.as_str()))));
        }
        if self.min_price.is_some() {
            changes.push(FilterChange::MinPrice(parse_price(
                self.min_price.as_deref(),
                "min-price",
            )?));
        }
        if self.max_price.is_some() {
            changes.push(FilterChange::MaxPrice(parse_price(
                self.max_price.as_deref(),
                "max-price",
            )?));
        }

        if let Some(preset) = &self.preset {
            changes.push(FilterChange::Preset(SortPreset::parse(preset)?));
        } else if self.sort.is_some() || self.order.is_some() {
            let field = match &self.sort {
                Some(sort) => SortField::parse(sort)?,
                None => SortField::default(),
            };
            let order = match &self.order {
                Some(order) => SortOrder::parse(order)?,
                None => SortOrder::default(),
            };
            changes.push(FilterChange::Sort(field, order));
        }

        if let Some(limit) = self.limit {
            changes.push(FilterChange::PageSize(limit));
        }
        if let Some(page) = self.page {
            if page == 0 {
                bail!("--page must be at least 1");
            }
            changes.push(FilterChange::Page(page));
        }

        Ok(changes)
    }

    /// Overlay the flags on `base`. Like any filter edit, this starts over
    /// at page 1 unless `--page` is given.
    pub fn apply_to(&self, base: FilterCriteria) -> Result<FilterCriteria> {
        let criteria = self
            .changes()?
            .into_iter()
            .fold(base, |criteria, change| criteria.apply(change));

        if let (Some(min), Some(max)) = (criteria.min_price, criteria.max_price) {
            if min > max {
                bail!("minimum price {} is above maximum price {}", min, max);
            }
        }

        Ok(criteria)
    }
}

fn parse_price(value: Option<&str>, flag: &str) -> Result<Option<Price>> {
    match value {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => match Price::parse(raw) {
            Ok(price) => Ok(Some(price)),
            Err(e) => bail!("--{}: {}", flag, e),
        },
    }
}

/// Arguments for the query command.
#[derive(Args)]
pub struct QueryArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Start from a storefront URL query string; flags override it.
    #[arg(short, long)]
    pub url: Option<String>,
}

/// Arguments for the url command.
#[derive(Args)]
pub struct UrlArgs {
    #[command(subcommand)]
    pub command: UrlCommand,
}

#[derive(Subcommand)]
pub enum UrlCommand {
    /// Build a shareable listing URL from filter flags.
    Encode {
        #[command(flatten)]
        filters: FilterArgs,

        /// Listing path the query string is appended to.
        #[arg(long, default_value = "/products")]
        path: String,
    },
    /// Show the criteria a URL query string decodes to.
    Decode {
        /// Query string, with or without the leading '?'.
        query: String,
    },
}

/// Arguments for the refs command.
#[derive(Args)]
pub struct RefsArgs {
    /// Also print the flat category list.
    #[arg(long)]
    pub flat: bool,
}

/// Arguments for the browse command.
#[derive(Args)]
pub struct BrowseArgs {
    /// Start from a storefront URL query string.
    #[arg(short, long)]
    pub url: Option<String>,

    /// Quiet period for typed searches, in milliseconds.
    #[arg(long)]
    pub debounce_ms: Option<u64>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Set a config value.
    Set {
        /// Config key (dot-separated).
        key: String,
        /// Value to set.
        value: String,
    },
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::search::codec;

    #[test]
    fn test_flags_overlay_url_criteria() {
        let base = codec::decode("search=whey&flavor=F1&page=3");
        let args = FilterArgs {
            weight: Some("W1".to_string()),
            min_price: Some("500".to_string()),
            ..FilterArgs::default()
        };
        let criteria = args.apply_to(base).unwrap();

        assert_eq!(criteria.search.as_deref(), Some("whey"));
        assert_eq!(criteria.flavor.as_ref().map(|f| f.as_str()), Some("F1"));
        assert_eq!(criteria.weight.as_ref().map(|w| w.as_str()), Some("W1"));
        assert_eq!(criteria.min_price, Some(Price::from_units(500)));
        assert_eq!(criteria.page, 1);

        let paged = FilterArgs {
            page: Some(2),
            ..FilterArgs::default()
        };
        assert_eq!(paged.apply_to(criteria).unwrap().page, 2);
    }

    #[test]
    fn test_preset_and_pagination() {
        let args = FilterArgs {
            preset: Some("name-asc".to_string()),
            limit: Some(50),
            ..FilterArgs::default()
        };
        let criteria = args.apply_to(FilterCriteria::default()).unwrap();
        assert_eq!(criteria.sort, SortField::Name);
        assert_eq!(criteria.order, SortOrder::Asc);
        assert_eq!(criteria.limit, 50);
        assert_eq!(criteria.page, 1);
    }

    #[test]
    fn test_rejects_bad_values() {
        let bogus_sort = FilterArgs {
            sort: Some("price".to_string()),
            ..FilterArgs::default()
        };
        assert!(bogus_sort.apply_to(FilterCriteria::default()).is_err());

        let inverted = FilterArgs {
            min_price: Some("900".to_string()),
            max_price: Some("100".to_string()),
            ..FilterArgs::default()
        };
        assert!(inverted.apply_to(FilterCriteria::default()).is_err());

        let empty_max = FilterArgs {
            min_price: Some("100".to_string()),
            max_price: Some(String::new()),
            ..FilterArgs::default()
        };
        let criteria = empty_max.apply_to(FilterCriteria::default()).unwrap();
        assert_eq!(criteria.max_price, None);
    }
}
