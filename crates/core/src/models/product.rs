//! Catalog products, reviews and the admin product draft.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Category, Price, ProductId, ReviewId};

/// Stock level below which a product counts as low stock.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Rating given to a product created from a draft before any submissions.
pub const SEED_RATING: f64 = 5.0;

/// Placeholder image used by new drafts.
pub const PLACEHOLDER_IMAGE: &str = "https://picsum.photos/400/400";

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub category: Category,
    /// Running mean of all submitted ratings, one decimal place.
    pub rating: f64,
    /// Number of ratings folded into `rating`.
    #[serde(default)]
    pub rating_count: u32,
    pub stock: u32,
    /// Newest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviews: Vec<Review>,
}

impl Product {
    /// Fold one more rating into the running mean.
    ///
    /// The new mean is `(rating * count + new) / (count + 1)` rounded to one
    /// decimal place. Nothing prevents repeated submissions.
    pub fn record_rating(&mut self, rating: u8) {
        let count = self.rating_count;
        let new_count = count.saturating_add(1);
        let mean = self
            .rating
            .mul_add(f64::from(count), f64::from(rating))
            / f64::from(new_count);
        self.rating = round_one_decimal(mean);
        self.rating_count = new_count;
    }

    /// Prepend a review and fold its rating into the running mean.
    pub fn add_review(&mut self, review: Review) {
        self.record_rating(review.rating);
        self.reviews.insert(0, review);
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.stock < LOW_STOCK_THRESHOLD
    }
}

/// Round to one decimal place using the exact binary value of `value`.
///
/// `4.35` is stored as `4.3499999...` and rounds down to `4.3`, the same
/// result the storefront shows. Scaling by ten first would round it up.
fn round_one_decimal(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// A customer review. Owned by exactly one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub user_name: String,
    pub rating: u8,
    pub comment: String,
    pub date: DateTime<Utc>,
}

/// Errors validating a review or a bare rating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),
    #[error("reviewer name is required")]
    MissingName,
    #[error("review comment is required")]
    MissingComment,
}

/// Validate a star rating.
///
/// # Errors
///
/// Returns [`ReviewError::RatingOutOfRange`] outside `1..=5`.
pub const fn validate_rating(rating: u8) -> Result<u8, ReviewError> {
    if rating >= 1 && rating <= 5 {
        Ok(rating)
    } else {
        Err(ReviewError::RatingOutOfRange(rating))
    }
}

/// A review form as submitted by a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDraft {
    pub user_name: String,
    pub rating: u8,
    pub comment: String,
}

impl ReviewDraft {
    /// Validate the form and stamp it into a [`Review`].
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError`] if the name or comment is blank or the rating is
    /// out of range.
    pub fn submit(self) -> Result<Review, ReviewError> {
        let user_name = self.user_name.trim();
        let comment = self.comment.trim();
        if user_name.is_empty() {
            return Err(ReviewError::MissingName);
        }
        if comment.is_empty() {
            return Err(ReviewError::MissingComment);
        }
        let rating = validate_rating(self.rating)?;
        Ok(Review {
            id: ReviewId::generate(),
            user_name: user_name.to_owned(),
            rating,
            comment: comment.to_owned(),
            date: Utc::now(),
        })
    }
}

/// Errors validating a [`ProductDraft`] at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("product name is required")]
    MissingName,
    #[error("product price is required")]
    MissingPrice,
    #[error("product price cannot be negative")]
    NegativePrice,
    #[error("product category is required")]
    MissingCategory,
}

/// An in-progress product edit from the admin console.
///
/// Fields are filled incrementally and validated once in [`build`](Self::build).
/// A draft created from an existing product keeps its id, rating and reviews.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    id: Option<ProductId>,
    name: Option<String>,
    price: Option<Price>,
    description: String,
    image: String,
    category: Option<Category>,
    stock: u32,
    rating: Option<(f64, u32)>,
    reviews: Vec<Review>,
}

impl ProductDraft {
    /// A blank draft for a new product.
    #[must_use]
    pub fn new() -> Self {
        Self {
            price: Some(Price::ZERO),
            category: Some(Category::Power),
            image: PLACEHOLDER_IMAGE.to_owned(),
            ..Self::default()
        }
    }

    /// A draft pre-filled from an existing product.
    #[must_use]
    pub fn edit(product: &Product) -> Self {
        Self {
            id: Some(product.id.clone()),
            name: Some(product.name.clone()),
            price: Some(product.price),
            description: product.description.clone(),
            image: product.image.clone(),
            category: Some(product.category),
            stock: product.stock,
            rating: Some((product.rating, product.rating_count)),
            reviews: product.reviews.clone(),
        }
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<ProductId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub const fn price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    #[must_use]
    pub const fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub const fn stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    /// The id this draft will be saved under, if already known.
    #[must_use]
    pub const fn existing_id(&self) -> Option<&ProductId> {
        self.id.as_ref()
    }

    /// The current name field, used to prompt the description service.
    #[must_use]
    pub fn current_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Validate and produce the product record.
    ///
    /// New products get a fresh id and the seed rating baseline
    /// (rating 5.0 counted as one submission).
    ///
    /// # Errors
    ///
    /// Returns [`DraftError`] for a blank name, missing or negative price, or
    /// missing category.
    pub fn build(self) -> Result<Product, DraftError> {
        let name = self
            .name
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty())
            .ok_or(DraftError::MissingName)?;
        let price = self.price.ok_or(DraftError::MissingPrice)?;
        if price.is_negative() {
            return Err(DraftError::NegativePrice);
        }
        let category = self.category.ok_or(DraftError::MissingCategory)?;
        let (rating, rating_count) = self.rating.unwrap_or((SEED_RATING, 1));

        Ok(Product {
            id: self.id.unwrap_or_else(ProductId::generate),
            name,
            price,
            description: self.description,
            image: self.image,
            category,
            rating,
            rating_count,
            stock: self.stock,
            reviews: self.reviews,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn product(rating: f64, rating_count: u32) -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "SonicWave Elite TWS".to_owned(),
            price: Price::new(dec!(129)),
            description: String::new(),
            image: String::new(),
            category: Category::Audio,
            rating,
            rating_count,
            stock: 85,
            reviews: Vec::new(),
        }
    }

    #[test]
    fn test_record_rating_running_mean() {
        let mut p = product(4.0, 9);
        p.record_rating(5);
        assert!((p.rating - 4.1).abs() < f64::EPSILON);
        assert_eq!(p.rating_count, 10);
    }

    #[test]
    fn test_record_rating_rounds_stored_binary_value() {
        // (3.7 + 5) / 2 is 4.3499999... in binary
        let mut p = product(3.7, 1);
        p.record_rating(5);
        assert!((p.rating - 4.3).abs() < f64::EPSILON);
        assert_eq!(p.rating_count, 2);
    }

    #[test]
    fn test_round_one_decimal() {
        assert!((round_one_decimal(4.25) - 4.3).abs() < f64::EPSILON);
        assert!((round_one_decimal(3.04) - 3.0).abs() < f64::EPSILON);
        assert!((round_one_decimal(5.0) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_first_rating_replaces_zero_count_seed() {
        let mut p = product(4.8, 0);
        p.record_rating(2);
        assert!((p.rating - 2.0).abs() < f64::EPSILON);
        assert_eq!(p.rating_count, 1);
    }

    #[test]
    fn test_add_review_prepends_and_aggregates() {
        let mut p = product(5.0, 1);
        let first = ReviewDraft {
            user_name: "Asha".to_owned(),
            rating: 3,
            comment: "Fine".to_owned(),
        }
        .submit()
        .unwrap();
        let second = ReviewDraft {
            user_name: "Ravi".to_owned(),
            rating: 4,
            comment: "Good".to_owned(),
        }
        .submit()
        .unwrap();
        p.add_review(first);
        p.add_review(second);
        assert_eq!(p.reviews.first().unwrap().user_name, "Ravi");
        assert_eq!(p.rating_count, 3);
        assert!((p.rating - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_review_draft_validation() {
        let blank = ReviewDraft {
            user_name: " ".to_owned(),
            rating: 4,
            comment: "ok".to_owned(),
        };
        assert_eq!(blank.submit(), Err(ReviewError::MissingName));

        let zero = ReviewDraft {
            user_name: "Asha".to_owned(),
            rating: 0,
            comment: "ok".to_owned(),
        };
        assert_eq!(zero.submit(), Err(ReviewError::RatingOutOfRange(0)));
    }

    #[test]
    fn test_new_draft_gets_id_and_seed_rating() {
        let p = ProductDraft::new()
            .name("PowerBank 20K")
            .price(Price::new(dec!(39.5)))
            .stock(12)
            .build()
            .unwrap();
        assert_eq!(p.id.as_str().len(), crate::types::id::TOKEN_LENGTH);
        assert!((p.rating - SEED_RATING).abs() < f64::EPSILON);
        assert_eq!(p.rating_count, 1);
        assert_eq!(p.category, Category::Power);
    }

    #[test]
    fn test_edit_draft_keeps_identity_and_rating() {
        let original = product(4.3, 20);
        let edited = ProductDraft::edit(&original)
            .price(Price::new(dec!(99)))
            .build()
            .unwrap();
        assert_eq!(edited.id, original.id);
        assert_eq!(edited.rating_count, 20);
        assert_eq!(edited.price, Price::new(dec!(99)));
    }

    #[test]
    fn test_draft_requires_name_and_valid_price() {
        assert_eq!(ProductDraft::new().build(), Err(DraftError::MissingName));
        assert_eq!(
            ProductDraft::new()
                .name("Cable")
                .price(Price::new(dec!(-1)))
                .build(),
            Err(DraftError::NegativePrice)
        );
    }

    #[test]
    fn test_missing_rating_count_defaults_to_zero() {
        let json = r#"{
            "id": "1",
            "name": "ThunderCharge 65W GaN",
            "price": 49.99,
            "description": "Charger",
            "image": "https://picsum.photos/seed/charger/400/400",
            "category": "Power",
            "rating": 4.8,
            "stock": 120
        }"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert_eq!(p.rating_count, 0);
        assert!(p.reviews.is_empty());
        assert_eq!(p.price, Price::from_cents(4999));
    }
}
