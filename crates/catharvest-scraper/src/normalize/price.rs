//! Price aggregation across a product's SKUs.

use std::collections::BTreeSet;

use serde_json::Value;

use super::path::{deep_get, flag_is_set};

/// Offer types that mark a SKU as discounted even without an explicit flag.
const SALE_OFFER_TYPES: [&str; 2] = ["sale", "clearance"];

/// Aggregated price facts for one product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSummary {
    /// Highest compare-at value, else highest sale price.
    pub regular_price: Option<f64>,
    /// `(min, max)` of sale-flagged prices.
    pub sale_range: Option<(f64, f64)>,
    pub is_on_sale: bool,
    /// Distinct rounded savings percentages, ascending.
    pub savings_percentages: Vec<i64>,
}

/// Folds every SKU's `price` block into one [`PriceSummary`].
///
/// Non-numeric values are ignored rather than rejected.
#[must_use]
pub fn summarize_prices(skus: &[Value]) -> PriceSummary {
    let mut regulars: Vec<f64> = Vec::new();
    let mut sale_prices: Vec<f64> = Vec::new();
    let mut savings: BTreeSet<i64> = BTreeSet::new();

    for sku in skus {
        if let Some(compare_at) = numeric(sku, &["price", "compareAt", "value"]) {
            regulars.push(compare_at);
        }

        let offer_type = deep_get(sku, &["price", "price", "offerType"]).and_then(Value::as_str);
        let on_sale = deep_get(sku, &["price", "price", "sale"]).is_some_and(flag_is_set)
            || offer_type.is_some_and(|t| SALE_OFFER_TYPES.contains(&t));
        if on_sale {
            if let Some(price) = numeric(sku, &["price", "price", "value"]) {
                sale_prices.push(price);
            }
        }

        if let Some(pct) = numeric(sku, &["price", "savingsPercentage"]) {
            if pct.is_finite() {
                #[allow(clippy::cast_possible_truncation)]
                savings.insert(pct.round_ties_even() as i64);
            }
        }
    }

    let sale_range = min_max(&sale_prices);
    PriceSummary {
        regular_price: max_of(&regulars).or_else(|| sale_range.map(|(_, max)| max)),
        sale_range,
        is_on_sale: !sale_prices.is_empty(),
        savings_percentages: savings.into_iter().collect(),
    }
}

/// A JSON number at `path`; booleans and numeric strings do not count.
fn numeric(sku: &Value, path: &[&str]) -> Option<f64> {
    deep_get(sku, path).and_then(Value::as_f64)
}

fn max_of(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let min = values.iter().copied().reduce(f64::min)?;
    let max = values.iter().copied().reduce(f64::max)?;
    Some((min, max))
}
