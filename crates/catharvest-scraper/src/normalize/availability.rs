//! Availability summary over a product's SKUs.

use std::fmt;

use serde_json::Value;

use super::path::flag_is_set;

/// Fraction of unavailable SKUs at or above which stock counts as limited.
const LIMITED_RATIO: f64 = 0.5;

/// One of four mutually exclusive stock states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Unavailable,
    Limited,
    PartiallyAvailable,
    InStock,
}

impl Availability {
    /// Human-readable sentence written into the output document.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unavailable => "Unavailable — All SKUs are currently unavailable.",
            Self::Limited => {
                "Limited — Many SKUs are unavailable; some colors/sizes may be on clearance or backorder."
            }
            Self::PartiallyAvailable => {
                "Partially available — Some sizes or colors are out of stock."
            }
            Self::InStock => "In stock — Most options available.",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies the SKU list; `None` when there are no SKUs.
///
/// No sellable SKU means [`Availability::Unavailable`] regardless of the
/// other flags. Otherwise the unavailable ratio picks the state.
#[must_use]
pub fn summarize_availability(skus: &[Value]) -> Option<Availability> {
    if skus.is_empty() {
        return None;
    }

    let sellable = skus
        .iter()
        .filter(|s| s.get("sellable").is_some_and(flag_is_set))
        .count();
    if sellable == 0 {
        return Some(Availability::Unavailable);
    }

    let unavailable = skus.iter().filter(|s| is_unavailable(s)).count();
    #[allow(clippy::cast_precision_loss)]
    let ratio = unavailable as f64 / skus.len() as f64;

    Some(if ratio >= LIMITED_RATIO {
        Availability::Limited
    } else if ratio > 0.0 {
        Availability::PartiallyAvailable
    } else {
        Availability::InStock
    })
}

fn is_unavailable(sku: &Value) -> bool {
    sku.get("unavailable").is_some_and(flag_is_set)
        || sku.get("status").and_then(Value::as_str) == Some("UNAVAILABLE")
}
