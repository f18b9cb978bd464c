use crate::model::draft::{ListingPayload, MAX_IMAGES};
use crate::model::item::is_listable_category;

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_DESCRIPTION_CHARS: usize = 5000;
pub const MAX_LOCATION_CHARS: usize = 100;
pub const MAX_TAGS: usize = 10;
pub const MIN_PRICE: f64 = 0.01;
pub const MAX_PRICE: f64 = 999_999.99;
pub const MAX_QUANTITY: u32 = 999;

/// Check a payload against the catalog's acceptance rules.
/// Returns every violation found, in field order.
pub fn check_payload(p: &ListingPayload) -> Vec<String> {
    let mut problems = Vec::new();

    let title_len = p.title.chars().count();
    if title_len == 0 {
        problems.push("title is required".to_string());
    } else if title_len > MAX_TITLE_CHARS {
        problems.push(format!("title must not exceed {} characters", MAX_TITLE_CHARS));
    }

    let desc_len = p.description.chars().count();
    if desc_len == 0 {
        problems.push("description is required".to_string());
    } else if desc_len > MAX_DESCRIPTION_CHARS {
        problems.push(format!(
            "description must not exceed {} characters",
            MAX_DESCRIPTION_CHARS
        ));
    }

    if !(MIN_PRICE..=MAX_PRICE).contains(&p.price) {
        problems.push(format!("price must be between {} and {}", MIN_PRICE, MAX_PRICE));
    }
    if !(1..=MAX_QUANTITY).contains(&p.quantity) {
        problems.push(format!("quantity must be between 1 and {}", MAX_QUANTITY));
    }
    if !is_listable_category(&p.category) {
        problems.push(format!("unknown category \"{}\"", p.category));
    }
    if p.location.chars().count() > MAX_LOCATION_CHARS {
        problems.push(format!("location must not exceed {} characters", MAX_LOCATION_CHARS));
    }
    if p.images.len() > MAX_IMAGES {
        problems.push(format!("at most {} images allowed", MAX_IMAGES));
    }
    if p.tags.len() > MAX_TAGS {
        problems.push(format!("at most {} tags allowed", MAX_TAGS));
    }

    problems
}
