//! Shareable URL query codec.
//!
//! Criteria encode to `application/x-www-form-urlencoded` query strings whose
//! keys match the criteria field names. Spaces become `+`. Fields at their
//! default are left out, so default criteria encode to an empty string and
//! `decode(encode(c)) == c` for any valid criteria.

use crate::ids::{FlavorId, WeightId};
use crate::price::Price;
use crate::search::{FilterCriteria, SortField, SortOrder, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use tracing::warn;
use url::form_urlencoded;

/// Encode criteria as a query string (without the leading `?`).
pub fn encode(criteria: &FilterCriteria) -> String {
    let mut out = form_urlencoded::Serializer::new(String::new());

    if let Some(search) = &criteria.search {
        out.append_pair("search", search);
    }
    if let Some(category) = &criteria.category {
        out.append_pair("category", category);
    }
    if let Some(flavor) = &criteria.flavor {
        out.append_pair("flavor", flavor.as_str());
    }
    if let Some(weight) = &criteria.weight {
        out.append_pair("weight", weight.as_str());
    }
    if let Some(min) = criteria.min_price {
        out.append_pair("minPrice", &min.amount_string());
    }
    if let Some(max) = criteria.max_price {
        out.append_pair("maxPrice", &max.amount_string());
    }
    if !criteria.is_default_sort() {
        out.append_pair("sort", criteria.sort.as_str());
        out.append_pair("order", criteria.order.as_str());
    }
    if criteria.page != 1 {
        out.append_pair("page", &criteria.page.to_string());
    }
    if criteria.limit != DEFAULT_PAGE_SIZE {
        out.append_pair("limit", &criteria.limit.to_string());
    }

    out.finish()
}

/// Decode a query string into criteria. Never fails.
///
/// A leading `?` is accepted. Unknown keys are ignored and the first
/// occurrence of a repeated key wins. Unparseable values fall back to their
/// defaults: prices are dropped, an unknown sort becomes `createdAt`.
pub fn decode(query: &str) -> FilterCriteria {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut criteria = FilterCriteria::default();
    let mut seen: Vec<String> = Vec::new();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if seen.iter().any(|k| *k == key) {
            continue;
        }
        seen.push(key.to_string());

        if value.is_empty() {
            continue;
        }

        match key.as_ref() {
            "search" => criteria.search = Some(value.into_owned()),
            "category" => criteria.category = Some(value.into_owned()),
            "flavor" => criteria.flavor = Some(FlavorId::new(value.into_owned())),
            "weight" => criteria.weight = Some(WeightId::new(value.into_owned())),
            "minPrice" => criteria.min_price = decode_price("minPrice", &value),
            "maxPrice" => criteria.max_price = decode_price("maxPrice", &value),
            "sort" => criteria.sort = SortField::parse_or_default(&value),
            "order" => criteria.order = SortOrder::parse_or_default(&value),
            "page" => {
                criteria.page = value.parse::<u32>().ok().filter(|p| *p >= 1).unwrap_or(1)
            }
            "limit" => {
                criteria.limit = value
                    .parse::<u32>()
                    .ok()
                    .filter(|l| (1..=MAX_PAGE_SIZE).contains(l))
                    .unwrap_or(DEFAULT_PAGE_SIZE)
            }
            _ => {}
        }
    }

    criteria
}

fn decode_price(key: &str, value: &str) -> Option<Price> {
    match Price::parse(value) {
        Ok(price) => Some(price),
        Err(e) => {
            warn!(key, value, error = %e, "ignoring unparseable price");
            None
        }
    }
}

/// Join a page path and the encoded criteria into a shareable URL.
pub fn to_url(path: &str, criteria: &FilterCriteria) -> String {
    let query = encode(criteria);
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}
