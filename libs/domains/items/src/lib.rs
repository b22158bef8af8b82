//! Items Domain
//!
//! Inventory items: validated creation, partial updates, deletion and a
//! per-category summary, on top of a pluggable repository.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← Validation, error translation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + in-memory implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entity, inputs, summary
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_items::{CreateItemInput, InMemoryItemRepository, ItemService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = ItemService::new(InMemoryItemRepository::new());
//!
//! let item = service
//!     .create_item(CreateItemInput {
//!         name: "Speedmaster".to_string(),
//!         category: "watch".to_string(),
//!         brand: "Omega".to_string(),
//!         purchase_price: 700_000,
//!         purchase_date: "2022-07-20".to_string(),
//!     })
//!     .await?;
//!
//! let summary = service.get_category_summary().await?;
//! assert_eq!(summary.categories["watch"], 1);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod models;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{ItemError, ItemResult};
pub use models::{
    Category, CategorySummary, CreateItemInput, Item, ItemId, NewItem, UpdateItemInput,
};
pub use repository::{InMemoryItemRepository, ItemRepository, RepositoryError, RepositoryResult};
pub use service::ItemService;

#[cfg(feature = "testing")]
pub use repository::MockItemRepository;
