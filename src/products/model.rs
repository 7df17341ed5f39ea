use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Review embedded in its product. Mutated only through the product so the
/// derived fields stay consistent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user: ObjectId,
    pub name: String,
    pub rating: f64,
    pub comment: String,
}

/// Product document in the `products` collection. `rating` and `noOfReviews`
/// are derived from `reviews` and recomputed on every review mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub rating: f64,
    pub category: String,
    pub brand: String,
    #[serde(default = "default_stock")]
    pub stock: i64,
    #[serde(default)]
    pub no_of_reviews: u32,
    #[serde(default)]
    pub reviews: Vec<Review>,
    pub user: ObjectId,
    pub created_at: DateTime,
}

fn default_stock() -> i64 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Added,
    Updated,
}

#[derive(Debug, Error, PartialEq)]
#[error("Not enough stock of {name}: {available} left, {requested} requested")]
pub struct StockShortage {
    pub name: String,
    pub available: i64,
    pub requested: i64,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        category: impl Into<String>,
        brand: impl Into<String>,
        stock: i64,
        owner: ObjectId,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            price,
            rating: 0.0,
            category: category.into(),
            brand: brand.into(),
            stock,
            no_of_reviews: 0,
            reviews: Vec::new(),
            user: owner,
            created_at: DateTime::now(),
        }
    }

    /// One review per account: an existing review by the same account is
    /// updated in place, otherwise a new one is appended.
    pub fn upsert_review(
        &mut self,
        reviewer: ObjectId,
        reviewer_name: &str,
        rating: f64,
        comment: &str,
    ) -> ReviewAction {
        let action = match self.reviews.iter_mut().find(|r| r.user == reviewer) {
            Some(existing) => {
                existing.rating = rating;
                existing.comment = comment.to_owned();
                ReviewAction::Updated
            }
            None => {
                self.reviews.push(Review {
                    id: ObjectId::new(),
                    user: reviewer,
                    name: reviewer_name.to_owned(),
                    rating,
                    comment: comment.to_owned(),
                });
                ReviewAction::Added
            }
        };
        self.recompute_review_aggregates();
        action
    }

    /// Returns false when no review carries the id.
    pub fn remove_review(&mut self, review_id: ObjectId) -> bool {
        let before = self.reviews.len();
        self.reviews.retain(|r| r.id != review_id);
        if self.reviews.len() == before {
            return false;
        }
        self.recompute_review_aggregates();
        true
    }

    fn recompute_review_aggregates(&mut self) {
        self.no_of_reviews = self.reviews.len() as u32;
        self.rating = if self.reviews.is_empty() {
            0.0
        } else {
            self.reviews.iter().map(|r| r.rating).sum::<f64>() / self.reviews.len() as f64
        };
    }

    /// Decrements stock for a fulfilled line item, refusing to go negative.
    pub fn take_stock(&mut self, quantity: i64) -> Result<(), StockShortage> {
        if quantity > self.stock {
            return Err(StockShortage {
                name: self.name.clone(),
                available: self.stock,
                requested: quantity,
            });
        }
        self.stock -= quantity;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product::new(
            "Widget",
            "A widget",
            19.99,
            "gadgets",
            "Acme",
            10,
            ObjectId::new(),
        )
    }

    #[test]
    fn new_product_has_zero_rating_and_no_reviews() {
        let p = product();
        assert_eq!(p.rating, 0.0);
        assert_eq!(p.no_of_reviews, 0);
        assert!(p.reviews.is_empty());
    }

    #[test]
    fn adding_reviews_recomputes_mean_and_count() {
        let mut p = product();
        assert_eq!(
            p.upsert_review(ObjectId::new(), "Ada", 4.0, "good"),
            ReviewAction::Added
        );
        assert_eq!(
            p.upsert_review(ObjectId::new(), "Grace", 2.0, "meh"),
            ReviewAction::Added
        );
        assert_eq!(p.no_of_reviews, 2);
        assert_eq!(p.rating, 3.0);
    }

    #[test]
    fn same_account_review_is_updated_in_place() {
        let mut p = product();
        let reviewer = ObjectId::new();
        p.upsert_review(reviewer, "Ada", 1.0, "broken");
        assert_eq!(
            p.upsert_review(reviewer, "Ada", 5.0, "fixed by update"),
            ReviewAction::Updated
        );
        assert_eq!(p.no_of_reviews, 1);
        assert_eq!(p.rating, 5.0);
        assert_eq!(p.reviews[0].comment, "fixed by update");
    }

    #[test]
    fn removing_a_review_recomputes_aggregates() {
        let mut p = product();
        p.upsert_review(ObjectId::new(), "Ada", 4.0, "good");
        p.upsert_review(ObjectId::new(), "Grace", 2.0, "meh");
        let target = p.reviews[0].id;
        assert!(p.remove_review(target));
        assert_eq!(p.no_of_reviews, 1);
        assert_eq!(p.rating, 2.0);
    }

    #[test]
    fn removing_last_review_resets_rating_to_zero() {
        let mut p = product();
        p.upsert_review(ObjectId::new(), "Ada", 4.0, "good");
        let target = p.reviews[0].id;
        assert!(p.remove_review(target));
        assert_eq!(p.rating, 0.0);
        assert_eq!(p.no_of_reviews, 0);
    }

    #[test]
    fn removing_unknown_review_is_a_noop() {
        let mut p = product();
        p.upsert_review(ObjectId::new(), "Ada", 4.0, "good");
        assert!(!p.remove_review(ObjectId::new()));
        assert_eq!(p.no_of_reviews, 1);
        assert_eq!(p.rating, 4.0);
    }

    #[test]
    fn take_stock_decrements_by_exact_quantity() {
        let mut p = product();
        p.take_stock(3).unwrap();
        assert_eq!(p.stock, 7);
        p.take_stock(7).unwrap();
        assert_eq!(p.stock, 0);
    }

    #[test]
    fn take_stock_refuses_to_go_negative() {
        let mut p = product();
        let err = p.take_stock(11).unwrap_err();
        assert_eq!(err.available, 10);
        assert_eq!(err.requested, 11);
        assert_eq!(p.stock, 10);
    }

    #[test]
    fn document_field_names_match_the_collection() {
        let doc = mongodb::bson::to_document(&product()).unwrap();
        assert!(doc.contains_key("noOfReviews"));
        assert!(doc.contains_key("createdAt"));
        assert!(doc.contains_key("stock"));
        assert!(!doc.contains_key("_id")); // unset until insert
    }
}
