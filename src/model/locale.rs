use serde::{Deserialize, Serialize};

use super::item::Condition;

/// Display language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }

    pub fn parse(s: &str) -> Option<Language> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Language::En),
            "zh" => Some(Language::Zh),
            _ => None,
        }
    }
}

const CATEGORY_ZH: &[(&str, &str)] = &[
    ("All", "全部"),
    ("Electronics", "电子产品"),
    ("Fashion", "时尚"),
    ("Gaming", "游戏"),
    ("Sports", "运动"),
    ("Home & Garden", "家居园艺"),
    ("Musical Instruments", "乐器"),
    ("Furniture", "家具"),
    ("Books", "图书"),
    ("Toys & Games", "玩具游戏"),
];

/// Translate a category name. Unknown names are returned unchanged.
pub fn category_label(category: &str, lang: Language) -> &str {
    match lang {
        Language::En => category,
        Language::Zh => CATEGORY_ZH
            .iter()
            .find(|(en, _)| *en == category)
            .map(|(_, zh)| *zh)
            .unwrap_or(category),
    }
}

pub fn condition_label(condition: Condition, lang: Language) -> &'static str {
    match (lang, condition) {
        (Language::En, Condition::New) => "New",
        (Language::En, Condition::LikeNew) => "Like New",
        (Language::En, Condition::Good) => "Good",
        (Language::En, Condition::Fair) => "Fair",
        (Language::Zh, Condition::New) => "全新",
        (Language::Zh, Condition::LikeNew) => "几乎全新",
        (Language::Zh, Condition::Good) => "良好",
        (Language::Zh, Condition::Fair) => "一般",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_category_translates_to_itself() {
        assert_eq!(category_label("Books", Language::Zh), "图书");
        assert_eq!(category_label("Spaceships", Language::Zh), "Spaceships");
        assert_eq!(category_label("Books", Language::En), "Books");
    }

    #[test]
    fn test_language_parse() {
        assert_eq!(Language::parse("ZH"), Some(Language::Zh));
        assert_eq!(Language::parse("fr"), None);
    }
}
