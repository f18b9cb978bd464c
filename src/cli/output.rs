use serde::Serialize;

use crate::model::draft::{DraftField, ListingDraft};
use crate::model::item::Item;
use crate::model::locale::{Language, category_label, condition_label};
use crate::ops::listing_workflow::Step;
use crate::util::unicode::fit_to_width;

const TITLE_CELLS: usize = 36;
const CONDITION_CELLS: usize = 9;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ItemJson<'a> {
    #[serde(flatten)]
    pub item: &'a Item,
    pub favorite: bool,
}

#[derive(Serialize)]
pub struct SearchJson<'a> {
    pub query_string: String,
    pub total: usize,
    pub items: Vec<ItemJson<'a>>,
}

#[derive(Serialize)]
pub struct RecoveryEntryJson {
    pub timestamp: String,
    pub category: String,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// `$1200` for whole amounts, `$12.50` otherwise
pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("${:.0}", price)
    } else {
        format!("${:.2}", price)
    }
}

/// One-line summary: favorite mark, id, title, price, condition, location
pub fn format_item_line(item: &Item, lang: Language, favorite: bool) -> String {
    let mark = if favorite { '*' } else { ' ' };
    format!(
        "{}{:>4}  {}  {:>8}  {}  {}",
        mark,
        item.id,
        fit_to_width(&item.title, TITLE_CELLS),
        format_price(item.price),
        fit_to_width(condition_label(item.condition, lang), CONDITION_CELLS),
        item.location
    )
}

/// Detailed item view
pub fn format_item_detail(item: &Item, lang: Language, favorite: bool) -> Vec<String> {
    let mut lines = vec![
        format!("[{}] {}", item.id, item.title),
        format!("price: {} {}", format_price(item.price), item.currency),
        format!("condition: {}", condition_label(item.condition, lang)),
        format!("category: {}", category_label(&item.category, lang)),
        format!("location: {}", item.location),
    ];
    if let Some(seller) = &item.seller {
        lines.push(format!("seller: {}", seller));
    }
    if !item.tags.is_empty() {
        lines.push(format!("tags: {}", hash_tags(item.tags.iter().map(|t| t.as_str()))));
    }
    lines.push(format!("images: {}", item.images.len()));
    lines.push(format!("listed: {}", item.created_at.format("%Y-%m-%d")));
    lines.push(format!("views: {}", item.view_count));
    if favorite {
        lines.push("favorite: yes".to_string());
    }
    if !item.description.is_empty() {
        lines.push(String::new());
        lines.extend(item.description.lines().map(|l| l.to_string()));
    }
    lines
}

fn hash_tags<'a>(tags: impl Iterator<Item = &'a str>) -> String {
    tags.map(|t| format!("#{}", t)).collect::<Vec<_>>().join(" ")
}

/// `Step 2/4: Photos`
pub fn format_step_header(step: Step, lang: Language) -> String {
    format!("Step {}/{}: {}", step.number(), Step::ALL.len(), step.title(lang))
}

/// Every draft field, marking required-but-empty ones
pub fn format_draft(draft: &ListingDraft, lang: Language) -> Vec<String> {
    let show = |field: DraftField, value: String| {
        if draft.is_filled(field) {
            format!("{}: {}", field.as_str(), value)
        } else {
            format!("{}: (missing)", field.as_str())
        }
    };
    let mut lines = vec![
        show(DraftField::Title, draft.title.clone()),
        show(DraftField::Description, draft.description.clone()),
        show(
            DraftField::Price,
            draft.price_value().map(format_price).unwrap_or_default(),
        ),
        show(
            DraftField::Condition,
            draft
                .condition
                .map(|c| condition_label(c, lang).to_string())
                .unwrap_or_default(),
        ),
        show(
            DraftField::Category,
            category_label(&draft.category, lang).to_string(),
        ),
        show(DraftField::Location, draft.location.clone()),
        format!("quantity: {}", draft.quantity),
        show(DraftField::Images, draft.images().join(", ")),
    ];
    if draft.tag_count() > 0 {
        lines.push(format!("tags: {}", hash_tags(draft.tags())));
    }
    lines
}

/// Comma-separated field names, for gating messages
pub fn format_missing(fields: &[DraftField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
