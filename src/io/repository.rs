use std::path::PathBuf;

use chrono::Utc;

use crate::io::lock::LockError;
use crate::model::config::DEFAULT_CURRENCY;
use crate::model::draft::ListingPayload;
use crate::model::item::Item;
use crate::ops::catalog_ops::next_item_id;
use crate::ops::listing_rules::check_payload;

/// Error type for item repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("listing rejected: {}", .0.join("; "))]
    Rejected(Vec<String>),
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where items come from and where new listings go
pub trait ItemRepository {
    fn fetch_items(&self) -> Result<Vec<Item>, RepoError>;
    fn create_item(&mut self, payload: &ListingPayload) -> Result<Item, RepoError>;
}

/// Validate a payload and turn it into a new item appended after `existing`
pub fn build_item(
    payload: &ListingPayload,
    existing: &[Item],
    currency: &str,
) -> Result<Item, RepoError> {
    let problems = check_payload(payload);
    if !problems.is_empty() {
        return Err(RepoError::Rejected(problems));
    }
    Ok(Item {
        id: next_item_id(existing),
        title: payload.title.clone(),
        description: payload.description.clone(),
        price: payload.price,
        currency: currency.to_string(),
        condition: payload.condition,
        category: payload.category.clone(),
        location: payload.location.clone(),
        seller: None,
        images: payload.images.clone(),
        tags: payload.tags.clone(),
        created_at: Utc::now(),
        view_count: 0,
    })
}

/// In-memory repository for fixtures and tests
#[derive(Debug, Default)]
pub struct MemoryRepository {
    pub items: Vec<Item>,
    /// When set, every `create_item` call fails with this message
    pub fail_with: Option<String>,
}

impl MemoryRepository {
    pub fn new(items: Vec<Item>) -> Self {
        MemoryRepository {
            items,
            fail_with: None,
        }
    }
}

impl ItemRepository for MemoryRepository {
    fn fetch_items(&self) -> Result<Vec<Item>, RepoError> {
        Ok(self.items.clone())
    }

    fn create_item(&mut self, payload: &ListingPayload) -> Result<Item, RepoError> {
        if let Some(msg) = &self.fail_with {
            return Err(RepoError::Unavailable(msg.clone()));
        }
        let item = build_item(payload, &self.items, DEFAULT_CURRENCY)?;
        self.items.push(item.clone());
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::Condition;

    fn payload() -> ListingPayload {
        ListingPayload {
            title: "Ski Set".into(),
            description: "Skis, boots, poles".into(),
            price: 450.0,
            condition: Condition::Good,
            category: "Sports".into(),
            location: "Queenstown".into(),
            quantity: 1,
            images: vec!["ski.jpg".into()],
            tags: vec!["ski".into()],
        }
    }

    #[test]
    fn test_memory_repo_assigns_ids() {
        let mut repo = MemoryRepository::default();
        let a = repo.create_item(&payload()).unwrap();
        let b = repo.create_item(&payload()).unwrap();
        assert_eq!(a.id, "1");
        assert_eq!(b.id, "2");
        assert_eq!(b.view_count, 0);
        assert_eq!(b.currency, "NZD");
        assert_eq!(repo.fetch_items().unwrap().len(), 2);
    }

    #[test]
    fn test_memory_repo_rejects_invalid() {
        let mut repo = MemoryRepository::default();
        let mut p = payload();
        p.category = "Nowhere".into();
        let err = repo.create_item(&p).unwrap_err();
        assert!(matches!(err, RepoError::Rejected(_)));
        assert!(err.to_string().contains("unknown category"));
        assert!(repo.items.is_empty());
    }

    #[test]
    fn test_memory_repo_can_fail() {
        let mut repo = MemoryRepository::default();
        repo.fail_with = Some("offline".into());
        let err = repo.create_item(&payload()).unwrap_err();
        assert_eq!(err.to_string(), "catalog unavailable: offline");
    }
}
