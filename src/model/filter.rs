use serde::{Deserialize, Serialize};

use super::item::{ALL_CATEGORIES, Condition};

/// Result ordering for a catalog query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Most recently created first
    #[default]
    Newest,
    Oldest,
    PriceLow,
    PriceHigh,
    /// Most viewed first
    Popular,
    /// Unrecognized sort key: keep the filtered input order
    #[serde(other)]
    InputOrder,
}

impl SortBy {
    /// Parse a sort key. Unknown keys fall back to `InputOrder`.
    pub fn parse(s: &str) -> SortBy {
        match s.trim() {
            "newest" => SortBy::Newest,
            "oldest" => SortBy::Oldest,
            "price_low" => SortBy::PriceLow,
            "price_high" => SortBy::PriceHigh,
            "popular" => SortBy::Popular,
            _ => SortBy::InputOrder,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Newest => "newest",
            SortBy::Oldest => "oldest",
            SortBy::PriceLow => "price_low",
            SortBy::PriceHigh => "price_high",
            SortBy::Popular => "popular",
            SortBy::InputOrder => "input",
        }
    }
}

/// Active search constraints plus sort order.
///
/// `min_price` / `max_price` of `0` (or anything not a positive finite number)
/// mean "no bound". This also means a genuinely free item cannot be isolated with
/// `max_price = 0`; that quirk is kept on purpose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    pub category: String,
    pub condition: Option<Condition>,
    pub min_price: f64,
    pub max_price: f64,
    pub location: String,
    pub sort_by: SortBy,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            category: ALL_CATEGORIES.to_string(),
            condition: None,
            min_price: 0.0,
            max_price: 0.0,
            location: String::new(),
            sort_by: SortBy::Newest,
        }
    }
}

impl FilterConfig {
    /// Lower price bound, if one is in effect
    pub fn min_bound(&self) -> Option<f64> {
        active_bound(self.min_price)
    }

    /// Upper price bound, if one is in effect
    pub fn max_bound(&self) -> Option<f64> {
        active_bound(self.max_price)
    }

    /// True if any constraint narrows the result. Sort order does not count.
    pub fn has_active_filters(&self) -> bool {
        (!self.category.is_empty() && self.category != ALL_CATEGORIES)
            || self.condition.is_some()
            || self.min_bound().is_some()
            || self.max_bound().is_some()
            || !self.location.is_empty()
    }

    /// Reset every constraint and the sort order to defaults
    pub fn clear(&mut self) {
        *self = FilterConfig::default();
    }
}

fn active_bound(v: f64) -> Option<f64> {
    if v.is_finite() && v > 0.0 { Some(v) } else { None }
}
