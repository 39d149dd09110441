//! Catalog browsing, ratings, reviews, wishlist and profile edits.

use std::cmp::Ordering;
use std::str::FromStr;

use tracing::info;
use uhsin_core::{
    Category, Price, Product, ProductId, ProfileUpdate, Review, ReviewDraft, User,
    validate_rating,
};

use super::Store;
use crate::cache::CacheKey;
use crate::error::{Result, StoreError, add_breadcrumb};
use crate::remote::SyncOp;

/// Maximum number of related products shown on a product page.
pub const RELATED_LIMIT: usize = 8;

/// Product list ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Featured,
    PriceLowToHigh,
    PriceHighToLow,
    /// Highest rated first.
    Rating,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "featured" => Ok(Self::Featured),
            "price-asc" | "price-low" | "price_low_to_high" => Ok(Self::PriceLowToHigh),
            "price-desc" | "price-high" | "price_high_to_low" => Ok(Self::PriceHighToLow),
            "rating" => Ok(Self::Rating),
            other => Err(format!(
                "unknown sort order {other:?} (expected featured, price-asc, price-desc or rating)"
            )),
        }
    }
}

/// Filters for the product list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub category: Option<Category>,
    /// Case-insensitive substring of the product name.
    pub search: Option<String>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    pub in_stock_only: bool,
    pub sort: SortOrder,
}

impl ProductQuery {
    fn matches(&self, product: &Product, needle: Option<&str>) -> bool {
        self.category.is_none_or(|c| product.category == c)
            && needle.is_none_or(|n| product.name.to_lowercase().contains(n))
            && self.min_price.is_none_or(|min| product.price >= min)
            && self.max_price.is_none_or(|max| product.price <= max)
            && (!self.in_stock_only || product.in_stock())
    }
}

impl Store {
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    fn product_mut(&mut self, id: &ProductId) -> Result<&mut Product> {
        self.products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| StoreError::ProductNotFound(id.clone()))
    }

    /// Filter and sort the catalog.
    #[must_use]
    pub fn search(&self, query: &ProductQuery) -> Vec<&Product> {
        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut found: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| query.matches(p, needle.as_deref()))
            .collect();

        match query.sort {
            SortOrder::Featured => {}
            SortOrder::PriceLowToHigh => found.sort_by(|a, b| a.price.cmp(&b.price)),
            SortOrder::PriceHighToLow => found.sort_by(|a, b| b.price.cmp(&a.price)),
            SortOrder::Rating => found.sort_by(|a, b| {
                b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal)
            }),
        }
        found
    }

    /// Other products in the same category.
    #[must_use]
    pub fn related_products(&self, id: &ProductId) -> Vec<&Product> {
        let Some(product) = self.product(id) else {
            return Vec::new();
        };
        self.products
            .iter()
            .filter(|p| p.category == product.category && p.id != product.id)
            .take(RELATED_LIMIT)
            .collect()
    }

    /// Fold a star rating into a product's running mean.
    ///
    /// Repeat submissions are not prevented.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Review`] for ratings outside 1..=5, or
    /// [`StoreError::ProductNotFound`].
    pub fn rate_product(&mut self, id: &ProductId, rating: u8) -> Result<&Product> {
        let rating = validate_rating(rating)?;
        let product = self.product_mut(id)?;
        product.record_rating(rating);
        let snapshot = product.clone();

        info!(product_id = %id, rating = snapshot.rating, count = snapshot.rating_count, "product rated");
        self.persist_keys(&[CacheKey::Products]);
        self.sync(SyncOp::UpdateProduct(snapshot));
        self.product(id).ok_or_else(|| StoreError::ProductNotFound(id.clone()))
    }

    /// Prepend a review and fold its rating into the running mean.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Review`] for an incomplete form, or
    /// [`StoreError::ProductNotFound`].
    pub fn add_review(&mut self, id: &ProductId, draft: ReviewDraft) -> Result<Review> {
        let review = draft.submit()?;
        let product = self.product_mut(id)?;
        product.add_review(review.clone());
        let snapshot = product.clone();

        info!(product_id = %id, rating = review.rating, "review added");
        self.persist_keys(&[CacheKey::Products]);
        self.sync(SyncOp::UpdateProduct(snapshot));
        Ok(review)
    }

    // =========================================================================
    // Wishlist and profile
    // =========================================================================

    /// Flip wishlist membership for the signed-in user.
    ///
    /// Returns `true` if the product is now on the wishlist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SignInRequired`] when signed out.
    pub fn toggle_wishlist(&mut self, id: &ProductId) -> Result<bool> {
        let listed = self.require_user_mut()?.toggle_wishlist(id);
        add_breadcrumb("wishlist", if listed { "added" } else { "removed" }, &[(
            "product_id",
            id.as_str(),
        )]);
        self.commit_current_user();
        Ok(listed)
    }

    /// Catalog products on the signed-in user's wishlist.
    ///
    /// Ids that no longer resolve are skipped. Empty when signed out.
    #[must_use]
    pub fn wishlist_products(&self) -> Vec<&Product> {
        let Some(user) = &self.user else {
            return Vec::new();
        };
        self.products
            .iter()
            .filter(|p| user.wishlist.contains(&p.id))
            .collect()
    }

    /// Save profile edits for the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SignInRequired`] when signed out.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<&User> {
        update.apply_to(self.require_user_mut()?);
        self.commit_current_user();
        info!("profile updated");
        self.require_user()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;
    use uhsin_core::{ReviewError, View};

    use super::super::testing::{offline_store, shopper, signed_in};
    use super::*;

    #[test]
    fn test_search_filters_and_sorts() {
        let store = offline_store();
        let query = ProductQuery {
            max_price: Some(Price::new(dec!(50))),
            sort: SortOrder::PriceLowToHigh,
            ..ProductQuery::default()
        };
        let names: Vec<_> = store.search(&query).into_iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, [
            "HyperConnect HDMI 2.1",
            "ShieldPro Laptop Sleeve",
            "ThunderCharge 65W GaN"
        ]);

        let query = ProductQuery {
            search: Some("  SONIC ".to_owned()),
            ..ProductQuery::default()
        };
        assert_eq!(store.search(&query).len(), 1);

        let query = ProductQuery {
            category: Some(Category::Input),
            ..ProductQuery::default()
        };
        assert_eq!(store.search(&query)[0].id.as_str(), "5");
    }

    #[test]
    fn test_in_stock_filter() {
        let mut store = offline_store();
        store.products[0].stock = 0;
        let query = ProductQuery {
            in_stock_only: true,
            ..ProductQuery::default()
        };
        assert_eq!(store.search(&query).len(), 4);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("price-desc".parse::<SortOrder>().unwrap(), SortOrder::PriceHighToLow);
        assert_eq!("Rating".parse::<SortOrder>().unwrap(), SortOrder::Rating);
        assert!("cheapest".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_related_products_exclude_self() {
        let mut store = offline_store();
        for n in 0..10 {
            let mut extra = store.products[1].clone();
            extra.id = ProductId::new(format!("audio-{n}"));
            store.products.push(extra);
        }
        let related = store.related_products(&ProductId::new("2"));
        assert_eq!(related.len(), RELATED_LIMIT);
        assert!(related.iter().all(|p| p.id.as_str() != "2"));
        assert!(related.iter().all(|p| p.category == Category::Audio));
    }

    #[test]
    fn test_rate_product_running_mean() {
        let mut store = offline_store();
        let id = ProductId::new("1");
        store.products[0].rating = 4.0;
        store.products[0].rating_count = 9;
        let product = store.rate_product(&id, 5).unwrap();
        assert!((product.rating - 4.1).abs() < f64::EPSILON);
        assert_eq!(product.rating_count, 10);

        let err = store.rate_product(&id, 6).unwrap_err();
        assert!(matches!(err, StoreError::Review(ReviewError::RatingOutOfRange(6))));
    }

    #[test]
    fn test_add_review_prepends() {
        let mut store = offline_store();
        let id = ProductId::new("4");
        for comment in ["first", "second"] {
            store
                .add_review(&id, ReviewDraft {
                    user_name: "Meera".to_owned(),
                    rating: 4,
                    comment: comment.to_owned(),
                })
                .unwrap();
        }
        let product = store.product(&id).unwrap();
        assert_eq!(product.reviews[0].comment, "second");
        assert_eq!(product.reviews.len(), 2);
    }

    #[test]
    fn test_wishlist_requires_sign_in() {
        let mut store = offline_store();
        let err = store.toggle_wishlist(&ProductId::new("1")).unwrap_err();
        assert_eq!(err.redirect(), Some(View::Auth));
    }

    #[test]
    fn test_wishlist_toggle_mirrors_roster() {
        let mut store = signed_in(shopper());
        let id = ProductId::new("3");
        assert!(store.toggle_wishlist(&id).unwrap());
        assert_eq!(store.wishlist_products().len(), 1);
        assert!(store.users[0].wishlist.contains(&id));

        assert!(!store.toggle_wishlist(&id).unwrap());
        assert!(store.wishlist_products().is_empty());
        assert!(store.users[0].wishlist.is_empty());
    }

    #[test]
    fn test_update_profile_mirrors_roster() {
        let mut store = signed_in(shopper());
        let mut form = ProfileUpdate::from_user(store.user().unwrap());
        form.name = "Meera Kulkarni".to_owned();
        store.update_profile(form).unwrap();
        assert_eq!(store.user().unwrap().name, "Meera Kulkarni");
        assert_eq!(store.users[0].name, "Meera Kulkarni");
    }
}
