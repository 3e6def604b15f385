//! Assembly of the normalized output document.

use serde_json::{json, Map, Value};

use super::availability::summarize_availability;
use super::fields::{
    categories, extract_brand, extract_breadcrumbs, extract_canonical_url, extract_colors,
    extract_description, extract_featured_image, extract_features, extract_images,
    extract_name, extract_product_id, extract_sizes, extract_specs, extract_taxonomy,
    extract_videos,
};
use super::path::{product_get, product_skus};
use super::price::summarize_prices;
use super::prune::prune;
use super::ratings::resolve_ratings;

/// Product flags copied verbatim into `shippingAndEligibility`.
const SHIPPING_FLAGS: [&str; 8] = [
    "sapGender",
    "eligibleForShipping",
    "allSkusAreBopusOnly",
    "anyOversizeCharges",
    "anySkuShippingRestrictions",
    "anySkusAreMembersOnly",
    "allDisplayableSkusArePreorder",
    "allDisplayableSkusAreBackorder",
];

/// Builds the pruned output document for one raw product payload.
///
/// Relative URLs are resolved against `base_url`. The raw `skus` array is
/// attached after pruning, verbatim, whenever the payload carries one.
#[must_use]
pub fn normalize_document(payload: &Value, base_url: &str) -> Value {
    let skus = product_skus(payload);
    let price = summarize_prices(skus);
    let ratings = resolve_ratings(payload);
    let breadcrumbs = extract_breadcrumbs(payload, base_url);
    let (tax_cat, tax_cat_root) = extract_taxonomy(payload);
    let sale_range = price.sale_range.map(|(min, max)| [min, max]);
    let savings = Some(price.savings_percentages).filter(|p| !p.is_empty());
    let availability = summarize_availability(skus).map(|a| a.as_str());

    let shipping: Map<String, Value> = SHIPPING_FLAGS
        .iter()
        .map(|&flag| {
            let value = product_get(payload, &[flag]).cloned().unwrap_or(Value::Null);
            (flag.to_owned(), value)
        })
        .collect();

    let core = json!({
        "productId": extract_product_id(payload),
        "productName": extract_name(payload),
        "brand": extract_brand(payload, base_url),
        "description": extract_description(payload),
        "media": {
            "featuredImage": extract_featured_image(payload, base_url),
            "allImages": extract_images(payload, base_url),
            "videos": extract_videos(payload, base_url),
        },
        "price": {
            "regularPrice": price.regular_price,
            "salePriceRange": sale_range,
            "isOnSale": price.is_on_sale,
            "savingsPercentage": savings,
        },
        "colors": extract_colors(payload),
        "sizes": extract_sizes(payload),
        "availability": availability,
        "features": extract_features(payload),
        "specs": extract_specs(payload),
        "ratings": {
            "averageRating": ratings.average_rating,
            "reviewCount": ratings.review_count,
            "ratingHistogram": ratings.histogram,
            "topRated": ratings.top_rated,
        },
        "metadata": {
            "canonicalUrl": extract_canonical_url(payload, base_url),
            "breadcrumbs": breadcrumbs,
            "categories": categories(&breadcrumbs),
            "taxCat": tax_cat,
            "taxCatRoot": tax_cat_root,
        },
        "shippingAndEligibility": shipping,
    });

    let mut document = prune(core);
    if let (Value::Object(out), Some(raw)) = (&mut document, raw_skus(payload)) {
        out.insert("skus".to_owned(), raw.clone());
    }
    document
}

/// The source `skus` value when the key is present and not null.
fn raw_skus(payload: &Value) -> Option<&Value> {
    product_get(payload, &["skus"]).filter(|v| !v.is_null())
}

#[cfg(test)]
#[path = "document_test.rs"]
mod tests;
