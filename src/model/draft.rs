use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::item::{ALL_CATEGORIES, Condition};

/// Maximum number of images a listing can carry
pub const MAX_IMAGES: usize = 10;

/// A single field of a listing draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftField {
    Title,
    Description,
    Price,
    Condition,
    Category,
    Location,
    Quantity,
    Images,
    Tags,
}

impl DraftField {
    pub fn as_str(self) -> &'static str {
        match self {
            DraftField::Title => "title",
            DraftField::Description => "description",
            DraftField::Price => "price",
            DraftField::Condition => "condition",
            DraftField::Category => "category",
            DraftField::Location => "location",
            DraftField::Quantity => "quantity",
            DraftField::Images => "images",
            DraftField::Tags => "tags",
        }
    }

    pub fn parse(s: &str) -> Option<DraftField> {
        match s {
            "title" => Some(DraftField::Title),
            "description" | "desc" => Some(DraftField::Description),
            "price" => Some(DraftField::Price),
            "condition" => Some(DraftField::Condition),
            "category" => Some(DraftField::Category),
            "location" => Some(DraftField::Location),
            "quantity" | "qty" => Some(DraftField::Quantity),
            "images" => Some(DraftField::Images),
            "tags" => Some(DraftField::Tags),
            _ => None,
        }
    }
}

/// An in-progress listing, filled in across the workflow steps.
///
/// Price is kept as entered; it only becomes a number when the draft is frozen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    pub price: String,
    pub condition: Option<Condition>,
    pub category: String,
    pub location: String,
    pub quantity: u32,
    images: Vec<String>,
    tags: IndexSet<String>,
}

impl Default for ListingDraft {
    fn default() -> Self {
        ListingDraft {
            title: String::new(),
            description: String::new(),
            price: String::new(),
            condition: None,
            category: String::new(),
            location: String::new(),
            quantity: 1,
            images: Vec::new(),
            tags: IndexSet::new(),
        }
    }
}

impl ListingDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.as_str())
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Add a tag. Returns false (and changes nothing) if the trimmed tag is
    /// empty or already present.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() {
            return false;
        }
        self.tags.insert(tag.to_string())
    }

    /// Remove a tag, keeping the order of the rest. Returns whether it was present.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        self.tags.shift_remove(tag.trim())
    }

    /// Append images, silently dropping any beyond `MAX_IMAGES`.
    /// Returns how many were actually added.
    pub fn add_images<I, S>(&mut self, refs: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let room = MAX_IMAGES.saturating_sub(self.images.len());
        let before = self.images.len();
        self.images.extend(refs.into_iter().take(room).map(Into::into));
        self.images.len() - before
    }

    /// Remove the image at `index` (0-based)
    pub fn remove_image(&mut self, index: usize) -> Option<String> {
        if index < self.images.len() {
            Some(self.images.remove(index))
        } else {
            None
        }
    }

    pub fn increment_quantity(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    /// Decrement quantity, never going below 1
    pub fn decrement_quantity(&mut self) {
        self.quantity = self.quantity.saturating_sub(1).max(1);
    }

    /// Parsed price, if the entered text is a positive finite number
    pub fn price_value(&self) -> Option<f64> {
        let v: f64 = self.price.trim().parse().ok()?;
        if v.is_finite() && v > 0.0 { Some(v) } else { None }
    }

    /// Whether a field currently holds a usable value
    pub fn is_filled(&self, field: DraftField) -> bool {
        match field {
            DraftField::Title => !self.title.trim().is_empty(),
            DraftField::Description => !self.description.trim().is_empty(),
            DraftField::Price => self.price_value().is_some(),
            DraftField::Condition => self.condition.is_some(),
            DraftField::Category => {
                let c = self.category.trim();
                !c.is_empty() && c != ALL_CATEGORIES
            }
            DraftField::Location => !self.location.trim().is_empty(),
            DraftField::Quantity => self.quantity >= 1,
            DraftField::Images => !self.images.is_empty(),
            DraftField::Tags => true,
        }
    }

    /// Freeze the draft into the payload handed to the catalog.
    /// Returns None if the price or condition is not set.
    pub fn freeze(&self) -> Option<ListingPayload> {
        Some(ListingPayload {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            price: self.price_value()?,
            condition: self.condition?,
            category: self.category.trim().to_string(),
            location: self.location.trim().to_string(),
            quantity: self.quantity,
            images: self.images.clone(),
            tags: self.tags.iter().cloned().collect(),
        })
    }
}

/// A finished listing, ready to be created in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingPayload {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub condition: Condition,
    pub category: String,
    pub location: String,
    pub quantity: u32,
    pub images: Vec<String>,
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_duplicate_tag_is_kept_once() {
        let mut d = ListingDraft::new();
        assert!(d.add_tag("vintage"));
        assert!(!d.add_tag("vintage"));
        assert!(!d.add_tag("  vintage "));
        assert!(!d.add_tag("   "));
        assert_eq!(d.tags().collect::<Vec<_>>(), vec!["vintage"]);
    }

    #[test]
    fn test_remove_tag_keeps_order() {
        let mut d = ListingDraft::new();
        d.add_tag("a");
        d.add_tag("b");
        d.add_tag("c");
        assert!(d.remove_tag("b"));
        assert!(!d.remove_tag("b"));
        assert_eq!(d.tags().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_images_capped_at_ten() {
        let mut d = ListingDraft::new();
        let refs: Vec<String> = (1..=12).map(|i| format!("img{}.jpg", i)).collect();
        assert_eq!(d.add_images(refs.clone()), 10);
        assert_eq!(d.images(), &refs[..10]);
        assert_eq!(d.add_images(["more.jpg"]), 0);
        assert_eq!(d.images().len(), MAX_IMAGES);
    }

    #[test]
    fn test_images_fill_remaining_room() {
        let mut d = ListingDraft::new();
        d.add_images((0..8).map(|i| format!("a{}", i)));
        assert_eq!(d.add_images(["x", "y", "z"]), 2);
        assert_eq!(&d.images()[8..], &["x".to_string(), "y".to_string()]);
        assert_eq!(d.remove_image(0), Some("a0".to_string()));
        assert_eq!(d.remove_image(20), None);
    }

    #[test]
    fn test_quantity_never_below_one() {
        let mut d = ListingDraft::new();
        d.decrement_quantity();
        assert_eq!(d.quantity, 1);
        d.increment_quantity();
        d.increment_quantity();
        assert_eq!(d.quantity, 3);
    }

    #[test]
    fn test_price_must_be_positive_number() {
        let mut d = ListingDraft::new();
        for bad in ["", "abc", "0", "-3", "NaN", "inf"] {
            d.price = bad.to_string();
            assert!(!d.is_filled(DraftField::Price), "{bad:?} accepted");
        }
        d.price = " 10.50 ".to_string();
        assert_eq!(d.price_value(), Some(10.5));
    }

    #[test]
    fn test_freeze_trims_and_copies() {
        let mut d = ListingDraft::new();
        d.title = " Road Bike ".into();
        d.description = "Carbon frame".into();
        d.price = "1800".into();
        d.condition = Some(Condition::Good);
        d.category = "Sports".into();
        d.location = "Dunedin".into();
        d.add_tag("bike");
        d.add_images(["bike.jpg"]);

        let p = d.freeze().unwrap();
        assert_eq!(p.title, "Road Bike");
        assert_eq!(p.price, 1800.0);
        assert_eq!(p.tags, vec!["bike".to_string()]);
        assert_eq!(p.quantity, 1);

        d.condition = None;
        assert!(d.freeze().is_none());
    }
}
