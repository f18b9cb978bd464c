use crate::model::filter::{FilterConfig, SortBy};
use crate::model::item::Item;
use crate::ops::catalog_query::query_catalog;

/// Find an item by ID
pub fn find_item<'a>(items: &'a [Item], id: &str) -> Option<&'a Item> {
    items.iter().find(|i| i.id == id)
}

/// Bump an item's view count. Returns the new count, or None if not found.
pub fn record_view(items: &mut [Item], id: &str) -> Option<u64> {
    let item = items.iter_mut().find(|i| i.id == id)?;
    item.view_count = item.view_count.saturating_add(1);
    Some(item.view_count)
}

/// The `limit` most recently created items
pub fn latest(items: &[Item], limit: usize) -> Vec<&Item> {
    top_by(items, SortBy::Newest, limit)
}

/// The `limit` most viewed items
pub fn most_viewed(items: &[Item], limit: usize) -> Vec<&Item> {
    top_by(items, SortBy::Popular, limit)
}

fn top_by(items: &[Item], sort_by: SortBy, limit: usize) -> Vec<&Item> {
    let filters = FilterConfig {
        sort_by,
        ..Default::default()
    };
    let mut result = query_catalog(items, "", &filters);
    result.truncate(limit);
    result
}

/// Next free numeric item ID (max existing numeric ID + 1)
pub fn next_item_id(items: &[Item]) -> String {
    let max = items
        .iter()
        .filter_map(|i| i.id.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    max.saturating_add(1).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::Condition;
    use chrono::{TimeZone, Utc};

    fn item(id: &str, day: u32, views: u64) -> Item {
        Item {
            id: id.to_string(),
            title: format!("Item {}", id),
            description: String::new(),
            price: 10.0,
            currency: "NZD".to_string(),
            condition: Condition::Fair,
            category: "Books".to_string(),
            location: "Hamilton".to_string(),
            seller: None,
            images: Vec::new(),
            tags: Vec::new(),
            created_at: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            view_count: views,
        }
    }

    #[test]
    fn test_latest_and_most_viewed() {
        let items = vec![item("1", 5, 10), item("2", 9, 3), item("3", 7, 40)];
        let l: Vec<_> = latest(&items, 2).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(l, vec!["2", "3"]);
        let p: Vec<_> = most_viewed(&items, 5).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(p, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_record_view_increments() {
        let mut items = vec![item("1", 1, 41)];
        assert_eq!(record_view(&mut items, "1"), Some(42));
        assert_eq!(record_view(&mut items, "nope"), None);
    }

    #[test]
    fn test_next_id_skips_non_numeric() {
        let mut items = vec![item("7", 1, 0), item("abc", 1, 0)];
        assert_eq!(next_item_id(&items), "8");
        items.clear();
        assert_eq!(next_item_id(&items), "1");
    }

    #[test]
    fn test_next_id_saturates_at_max() {
        let items = vec![item("18446744073709551615", 1, 0)];
        assert_eq!(next_item_id(&items), "18446744073709551615");
    }
}
