use std::cmp::Ordering;

use crate::model::filter::{FilterConfig, SortBy};
use crate::model::item::{ALL_CATEGORIES, Item};

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Run a catalog query: text match, then every active filter, then sort.
///
/// Returns a fresh vector of references into `items` on every call. Items are
/// never modified. Items with equal sort keys keep their input order.
pub fn query_catalog<'a>(items: &'a [Item], query: &str, filters: &FilterConfig) -> Vec<&'a Item> {
    let query = query.to_lowercase();
    let location = filters.location.to_lowercase();

    let mut result: Vec<&Item> = items
        .iter()
        .filter(|item| matches_text(item, &query))
        .filter(|item| matches_category(item, &filters.category))
        .filter(|item| filters.condition.is_none_or(|c| item.condition == c))
        .filter(|item| matches_price(item, filters))
        .filter(|item| matches_location_lower(item, &location))
        .collect();

    sort_items(&mut result, filters.sort_by);

    tracing::debug!(
        total = items.len(),
        matched = result.len(),
        sort = filters.sort_by.as_str(),
        "catalog query"
    );
    result
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Case-insensitive substring match against title, description, or any tag.
/// An empty (or whitespace) query matches everything. Otherwise the query is
/// matched as given, surrounding whitespace included.
pub fn matches_text(item: &Item, query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    item.title.to_lowercase().contains(&query)
        || item.description.to_lowercase().contains(&query)
        || item.tags.iter().any(|t| t.to_lowercase().contains(&query))
}

/// Exact, case-sensitive category match. The `All` sentinel matches everything.
pub fn matches_category(item: &Item, category: &str) -> bool {
    category == ALL_CATEGORIES || category.is_empty() || item.category == category
}

/// Inclusive price band. Inactive bounds (0, negative, NaN) are ignored.
pub fn matches_price(item: &Item, filters: &FilterConfig) -> bool {
    filters.min_bound().is_none_or(|min| item.price >= min)
        && filters.max_bound().is_none_or(|max| item.price <= max)
}

/// Case-insensitive substring match on location. Empty matches everything.
pub fn matches_location(item: &Item, location: &str) -> bool {
    matches_location_lower(item, &location.to_lowercase())
}

fn matches_location_lower(item: &Item, location: &str) -> bool {
    location.is_empty() || item.location.to_lowercase().contains(location)
}

// ---------------------------------------------------------------------------
// Sort
// ---------------------------------------------------------------------------

/// Stable sort by the given key. `InputOrder` leaves the slice untouched.
pub fn sort_items(items: &mut [&Item], sort_by: SortBy) {
    let cmp: fn(&&Item, &&Item) -> Ordering = match sort_by {
        SortBy::Newest => |a, b| b.created_at.cmp(&a.created_at),
        SortBy::Oldest => |a, b| a.created_at.cmp(&b.created_at),
        SortBy::PriceLow => |a, b| a.price.total_cmp(&b.price),
        SortBy::PriceHigh => |a, b| b.price.total_cmp(&a.price),
        SortBy::Popular => |a, b| b.view_count.cmp(&a.view_count),
        SortBy::InputOrder => return,
    };
    items.sort_by(cmp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::Condition;
    use chrono::{TimeZone, Utc};

    fn item(id: &str, title: &str, price: f64, category: &str, day: u32, views: u64) -> Item {
        Item {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            price,
            currency: "NZD".to_string(),
            condition: Condition::Good,
            category: category.to_string(),
            location: "Auckland CBD".to_string(),
            seller: None,
            images: Vec::new(),
            tags: Vec::new(),
            created_at: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
            view_count: views,
        }
    }

    fn ids(result: &[&Item]) -> Vec<String> {
        result.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_text_match_is_or_across_fields() {
        let mut a = item("a", "Guitar", 650.0, "Musical Instruments", 1, 0);
        a.tags = vec!["Fender".into()];
        assert!(matches_text(&a, "fend"));
        assert!(matches_text(&a, "GUI"));
        assert!(matches_text(&a, "   "));
        assert!(!matches_text(&a, "piano"));
        a.description = "Sunburst finish".into();
        assert!(matches_text(&a, "sunburst"));
    }

    #[test]
    fn test_text_match_keeps_surrounding_whitespace() {
        let mut a = item("a", "MacBook Pro", 1200.0, "Electronics", 1, 0);
        a.tags = vec!["Laptop".into()];
        assert!(!matches_text(&a, "pro "));
        assert!(!matches_text(&a, " macbook"));
        assert!(matches_text(&a, "book pro"));
    }

    #[test]
    fn test_category_is_case_sensitive() {
        let a = item("a", "X", 1.0, "Electronics", 1, 0);
        assert!(matches_category(&a, "Electronics"));
        assert!(matches_category(&a, "All"));
        assert!(!matches_category(&a, "electronics"));
    }

    #[test]
    fn test_price_bounds_inclusive() {
        let a = item("a", "X", 180.0, "Fashion", 1, 0);
        let mut f = FilterConfig {
            min_price: 180.0,
            max_price: 180.0,
            ..Default::default()
        };
        assert!(matches_price(&a, &f));
        f.min_price = 180.01;
        assert!(!matches_price(&a, &f));
        f.min_price = f64::NAN;
        f.max_price = f64::NAN;
        assert!(matches_price(&a, &f));
    }

    #[test]
    fn test_inverted_price_band_matches_nothing() {
        let items = vec![item("a", "X", 100.0, "Fashion", 1, 0)];
        let f = FilterConfig {
            min_price: 500.0,
            max_price: 50.0,
            ..Default::default()
        };
        assert!(query_catalog(&items, "", &f).is_empty());
    }

    #[test]
    fn test_ties_keep_input_order() {
        let items = vec![
            item("a", "A", 10.0, "Books", 3, 5),
            item("b", "B", 5.0, "Books", 2, 5),
            item("c", "C", 10.0, "Books", 1, 5),
        ];
        let mut f = FilterConfig {
            sort_by: SortBy::Popular,
            ..Default::default()
        };
        assert_eq!(ids(&query_catalog(&items, "", &f)), vec!["a", "b", "c"]);
        f.sort_by = SortBy::PriceHigh;
        assert_eq!(ids(&query_catalog(&items, "", &f)), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_input_order_sort_is_noop() {
        let items = vec![
            item("a", "A", 30.0, "Books", 1, 0),
            item("b", "B", 10.0, "Books", 3, 0),
            item("c", "C", 20.0, "Books", 2, 0),
        ];
        let f = FilterConfig {
            sort_by: SortBy::parse("bogus"),
            ..Default::default()
        };
        assert_eq!(ids(&query_catalog(&items, "", &f)), vec!["a", "b", "c"]);
    }
}
