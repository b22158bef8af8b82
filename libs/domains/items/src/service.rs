//! Item Service - validation and error translation over an [`ItemRepository`]

use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ItemError, ItemResult};
use crate::models::{
    Category, CategorySummary, CreateItemInput, Item, ItemId, NewItem, UpdateItemInput,
};
use crate::repository::ItemRepository;

/// Item service providing the inventory use cases
///
/// Each operation validates its input before touching the repository,
/// translates a repository "not found" into [`ItemError::NotFound`] and wraps
/// every other repository failure with the operation it came from.
/// Cancellation is the caller's: dropping the returned future drops the
/// in-flight repository call.
pub struct ItemService<R: ItemRepository> {
    repository: Arc<R>,
}

impl<R: ItemRepository> ItemService<R> {
    /// Create a new ItemService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create an ItemService sharing an existing repository handle
    pub fn from_shared(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// List all items in repository order
    #[instrument(skip(self))]
    pub async fn get_all_items(&self) -> ItemResult<Vec<Item>> {
        self.repository
            .find_all()
            .await
            .map_err(ItemError::repository("failed to retrieve items"))
    }

    /// Get an item by ID
    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn get_item_by_id(&self, id: ItemId) -> ItemResult<Item> {
        ensure_valid_id(id)?;
        self.find_existing(id, "failed to retrieve item").await
    }

    /// Create a new item
    #[instrument(skip(self, input), fields(item_name = %input.name))]
    pub async fn create_item(&self, input: CreateItemInput) -> ItemResult<Item> {
        let item = NewItem::new(input)?;

        self.repository
            .create(item)
            .await
            .map_err(ItemError::repository("failed to create item"))
    }

    /// Apply a partial update to an existing item
    ///
    /// Returns the item as reported back by the repository.
    #[instrument(skip(self, input), fields(item_id = %id))]
    pub async fn update_item(&self, id: ItemId, input: UpdateItemInput) -> ItemResult<Item> {
        ensure_valid_id(id)?;

        let mut item = self
            .find_existing(id, "failed to retrieve item for update")
            .await?;

        input
            .validate()
            .map_err(|e| ItemError::Validation(e.to_string()))?;

        item.apply_update(input);

        self.repository
            .update(item)
            .await
            .map_err(ItemError::repository("failed to update item"))
    }

    /// Delete an item
    ///
    /// The existence check and the delete are separate repository calls; if
    /// the item disappears in between, the delete's own error is returned.
    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn delete_item(&self, id: ItemId) -> ItemResult<()> {
        ensure_valid_id(id)?;

        self.find_existing(id, "failed to check item existence").await?;

        self.repository
            .delete(id)
            .await
            .map_err(ItemError::repository("failed to delete item"))
    }

    /// Count items per valid category
    #[instrument(skip(self))]
    pub async fn get_category_summary(&self) -> ItemResult<CategorySummary> {
        let counts = self
            .repository
            .summary_by_category()
            .await
            .map_err(ItemError::repository("failed to get category summary"))?;

        let unknown: Vec<&str> = counts
            .keys()
            .map(String::as_str)
            .filter(|name| name.parse::<Category>().is_err())
            .collect();
        if !unknown.is_empty() {
            tracing::warn!(
                categories = ?unknown,
                "Repository reported unrecognized categories; they count towards total only"
            );
        }

        Ok(CategorySummary::from_counts(&counts, Category::names()))
    }

    async fn find_existing(&self, id: ItemId, context: &'static str) -> ItemResult<Item> {
        self.repository.find_by_id(id).await.map_err(|err| {
            if err.is_not_found() {
                ItemError::NotFound(id)
            } else {
                ItemError::repository(context)(err)
            }
        })
    }
}

impl<R: ItemRepository> Clone for ItemService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

fn ensure_valid_id(id: ItemId) -> ItemResult<()> {
    if id <= 0 {
        return Err(ItemError::Validation(format!(
            "id must be a positive integer, got {id}"
        )));
    }
    Ok(())
}
