use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use validator::Validate;

use crate::error::{ItemError, ItemResult};

/// Identifier assigned to an item by the store
pub type ItemId = i64;

/// Accepted layout of `purchase_date`
pub const PURCHASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Custom validator for purchase dates
fn validate_purchase_date(date: &str) -> Result<(), validator::ValidationError> {
    NaiveDate::parse_from_str(date, PURCHASE_DATE_FORMAT)
        .map(|_| ())
        .map_err(|_| {
            validator::ValidationError::new("invalid_purchase_date")
                .with_message("purchase_date must be a date in YYYY-MM-DD format".into())
        })
}

/// Item category
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    Watch,
    Bag,
    Jewelry,
    Shoes,
    Other,
}

impl Category {
    /// Names of every valid category, in declaration order
    pub fn names() -> impl Iterator<Item = &'static str> {
        Category::iter().map(<&'static str>::from)
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// Item entity - an inventory record as persisted by the repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier
    pub id: ItemId,
    /// Item name
    pub name: String,
    /// Classification, one of [`Category`]
    pub category: Category,
    /// Brand or maker
    pub brand: String,
    /// Price paid, in the smallest currency unit
    pub purchase_price: i64,
    /// Purchase date as `YYYY-MM-DD`
    pub purchase_date: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating an item
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateItemInput {
    #[validate(length(
        min = 1,
        max = 100,
        message = "name must be between 1 and 100 characters"
    ))]
    pub name: String,
    pub category: String,
    #[validate(length(
        min = 1,
        max = 100,
        message = "brand must be between 1 and 100 characters"
    ))]
    pub brand: String,
    #[validate(range(min = 0, message = "purchase_price must be 0 or greater"))]
    pub purchase_price: i64,
    #[validate(custom(function = "validate_purchase_date"))]
    pub purchase_date: String,
}

/// Request body for a partial update
///
/// `None` leaves the stored value untouched; `Some` must pass the same rule
/// as on creation.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct UpdateItemInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(
        min = 1,
        max = 100,
        message = "name must be between 1 and 100 characters"
    ))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(
        min = 1,
        max = 100,
        message = "brand must be between 1 and 100 characters"
    ))]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "purchase_price must be 0 or greater"))]
    pub purchase_price: Option<i64>,
}

/// A validated item that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub category: Category,
    pub brand: String,
    pub purchase_price: i64,
    pub purchase_date: String,
}

impl NewItem {
    /// Validate a [`CreateItemInput`] and turn it into a storable item
    pub fn new(input: CreateItemInput) -> ItemResult<Self> {
        input
            .validate()
            .map_err(|e| ItemError::Validation(e.to_string()))?;

        let category = input.category.parse::<Category>().map_err(|_| {
            ItemError::Validation(format!(
                "category must be one of: {}",
                Category::names().collect::<Vec<_>>().join(", ")
            ))
        })?;

        Ok(Self {
            name: input.name,
            category,
            brand: input.brand,
            purchase_price: input.purchase_price,
            purchase_date: input.purchase_date,
        })
    }
}

impl Item {
    /// Materialize a stored item from a [`NewItem`]
    pub fn from_new(id: ItemId, new_item: NewItem, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new_item.name,
            category: new_item.category,
            brand: new_item.brand,
            purchase_price: new_item.purchase_price,
            purchase_date: new_item.purchase_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply the present fields of an [`UpdateItemInput`]
    ///
    /// `updated_at` is left alone; the store owns it.
    pub fn apply_update(&mut self, update: UpdateItemInput) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(brand) = update.brand {
            self.brand = brand;
        }
        if let Some(purchase_price) = update.purchase_price {
            self.purchase_price = purchase_price;
        }
    }
}

/// Item counts per category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub categories: BTreeMap<String, u64>,
    pub total: u64,
}

impl CategorySummary {
    /// Build a summary from raw per-category counts.
    ///
    /// Every name in `valid_categories` appears in the result, zero-filled
    /// when `counts` has no entry for it. `total` sums every raw count,
    /// including those for names outside `valid_categories`.
    pub fn from_counts<'a, I>(counts: &HashMap<String, u64>, valid_categories: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let total = counts.values().sum();

        let categories = valid_categories
            .into_iter()
            .map(|name| (name.to_string(), counts.get(name).copied().unwrap_or(0)))
            .collect();

        Self { categories, total }
    }

    /// Sum of the per-category values actually reported in `categories`
    pub fn categorized_total(&self) -> u64 {
        self.categories.values().sum()
    }
}
