use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::models::{Item, ItemId, NewItem};

/// Failure reported by an [`ItemRepository`] implementation
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage query failed: {0}")]
    Query(String),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound)
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository trait for Item persistence
///
/// Implementations must be safe to share between concurrent requests. A
/// lookup, update or delete of an unknown id fails with
/// [`RepositoryError::NotFound`].
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// List every item
    async fn find_all(&self) -> RepositoryResult<Vec<Item>>;

    /// Get an item by ID
    async fn find_by_id(&self, id: ItemId) -> RepositoryResult<Item>;

    /// Persist a new item, assigning its id and timestamps
    async fn create(&self, item: NewItem) -> RepositoryResult<Item>;

    /// Overwrite the stored item with the same id
    async fn update(&self, item: Item) -> RepositoryResult<Item>;

    /// Delete an item by ID
    async fn delete(&self, id: ItemId) -> RepositoryResult<()>;

    /// Number of items per category name
    async fn summary_by_category(&self) -> RepositoryResult<HashMap<String, u64>>;
}

#[derive(Debug)]
struct InMemoryState {
    items: BTreeMap<ItemId, Item>,
    next_id: ItemId,
}

impl Default for InMemoryState {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
            next_id: 1,
        }
    }
}

/// In-memory implementation of ItemRepository (for development/testing)
///
/// Ids are assigned sequentially from 1 and never reused.
#[derive(Debug, Default, Clone)]
pub struct InMemoryItemRepository {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items
    pub async fn len(&self) -> usize {
        self.state.read().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.items.is_empty()
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> RepositoryResult<Vec<Item>> {
        let state = self.state.read().await;
        let items: Vec<Item> = state.items.values().cloned().collect();

        tracing::debug!(count = items.len(), "Listed items");
        Ok(items)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ItemId) -> RepositoryResult<Item> {
        let state = self.state.read().await;
        state.items.get(&id).cloned().ok_or(RepositoryError::NotFound)
    }

    #[instrument(skip(self, item), fields(item_name = %item.name))]
    async fn create(&self, item: NewItem) -> RepositoryResult<Item> {
        let mut state = self.state.write().await;

        let id = state.next_id;
        state.next_id += 1;

        let item = Item::from_new(id, item, Utc::now());
        state.items.insert(id, item.clone());

        tracing::info!(item_id = %id, "Created item");
        Ok(item)
    }

    #[instrument(skip(self, item), fields(item_id = %item.id))]
    async fn update(&self, mut item: Item) -> RepositoryResult<Item> {
        let mut state = self.state.write().await;

        let stored = state
            .items
            .get_mut(&item.id)
            .ok_or(RepositoryError::NotFound)?;

        // created_at belongs to the store, not the caller
        item.created_at = stored.created_at;
        item.updated_at = Utc::now();
        *stored = item.clone();

        tracing::info!(item_id = %item.id, "Updated item");
        Ok(item)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ItemId) -> RepositoryResult<()> {
        let mut state = self.state.write().await;

        if state.items.remove(&id).is_some() {
            tracing::info!(item_id = %id, "Deleted item");
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    #[instrument(skip(self))]
    async fn summary_by_category(&self) -> RepositoryResult<HashMap<String, u64>> {
        let state = self.state.read().await;

        let mut counts = HashMap::new();
        for item in state.items.values() {
            *counts.entry(item.category.to_string()).or_insert(0) += 1;
        }

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn new_item(name: &str, category: Category) -> NewItem {
        NewItem {
            name: name.to_string(),
            category,
            brand: "Hermès".to_string(),
            purchase_price: 1_000,
            purchase_date: "2024-03-01".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = InMemoryItemRepository::new();

        let first = repo.create(new_item("Birkin", Category::Bag)).await.unwrap();
        let second = repo.create(new_item("Kelly", Category::Bag)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.created_at, first.updated_at);

        let fetched = repo.find_by_id(second.id).await.unwrap();
        assert_eq!(fetched, second);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = InMemoryItemRepository::new();

        let first = repo.create(new_item("Birkin", Category::Bag)).await.unwrap();
        repo.delete(first.id).await.unwrap();
        let second = repo.create(new_item("Kelly", Category::Bag)).await.unwrap();

        assert_eq!(second.id, 2);
        assert!(repo.find_by_id(first.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_find_all_is_ordered_by_id() {
        let repo = InMemoryItemRepository::new();
        for name in ["c", "a", "b"] {
            repo.create(new_item(name, Category::Other)).await.unwrap();
        }

        let names: Vec<_> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.name)
            .collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_update_keeps_created_at_and_bumps_updated_at() {
        let repo = InMemoryItemRepository::new();
        let created = repo.create(new_item("Birkin", Category::Bag)).await.unwrap();

        let mut changed = created.clone();
        changed.name = "Birkin 30".to_string();
        changed.created_at = Utc::now() + chrono::Duration::days(1);

        let updated = repo.update(changed).await.unwrap();
        assert_eq!(updated.name, "Birkin 30");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let repo = InMemoryItemRepository::new();
        let ghost = Item::from_new(42, new_item("Ghost", Category::Other), Utc::now());

        assert!(repo.find_by_id(42).await.unwrap_err().is_not_found());
        assert!(repo.update(ghost).await.unwrap_err().is_not_found());
        assert!(repo.delete(42).await.unwrap_err().is_not_found());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_summary_by_category() {
        let repo = InMemoryItemRepository::new();
        repo.create(new_item("Birkin", Category::Bag)).await.unwrap();
        repo.create(new_item("Kelly", Category::Bag)).await.unwrap();
        repo.create(new_item("Oyster", Category::Watch)).await.unwrap();

        let counts = repo.summary_by_category().await.unwrap();
        assert_eq!(counts.get("bag"), Some(&2));
        assert_eq!(counts.get("watch"), Some(&1));
        assert_eq!(counts.get("shoes"), None);
        assert_eq!(repo.len().await, 3);
    }
}
