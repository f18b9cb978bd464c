use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category sentinel meaning "no category constraint"
pub const ALL_CATEGORIES: &str = "All";

/// The fixed set of categories, sentinel first
pub const CATEGORIES: &[&str] = &[
    ALL_CATEGORIES,
    "Electronics",
    "Fashion",
    "Gaming",
    "Sports",
    "Home & Garden",
    "Musical Instruments",
    "Furniture",
    "Books",
    "Toys & Games",
];

/// Whether `name` is a real (non-sentinel) category
pub fn is_listable_category(name: &str) -> bool {
    name != ALL_CATEGORIES && CATEGORIES.contains(&name)
}

/// Item condition as graded by the seller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Condition {
    New,
    LikeNew,
    Good,
    Fair,
}

impl Condition {
    pub const ALL: [Condition; 4] = [
        Condition::New,
        Condition::LikeNew,
        Condition::Good,
        Condition::Fair,
    ];

    /// Wire name, e.g. `LIKE_NEW`
    pub fn as_str(self) -> &'static str {
        match self {
            Condition::New => "NEW",
            Condition::LikeNew => "LIKE_NEW",
            Condition::Good => "GOOD",
            Condition::Fair => "FAIR",
        }
    }

    /// Parse a wire name. Case-insensitive; `-` and space are accepted for `_`.
    pub fn parse(s: &str) -> Option<Condition> {
        let norm: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();
        Condition::ALL.into_iter().find(|c| c.as_str() == norm)
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single marketplace listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Non-negative amount in `currency`
    pub price: f64,
    pub currency: String,
    pub condition: Condition,
    pub category: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub view_count: u64,
}
