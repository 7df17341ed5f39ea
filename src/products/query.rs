use mongodb::bson::{doc, Document};
use serde::Deserialize;

/// Listing filters as they arrive on the query string. `category` and `brand`
/// accept repeated keys (`category=a&category=b`).
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default)]
    pub brand: Vec<String>,
    pub rating: Option<f64>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<i64>,
}

impl ListQuery {
    /// Filter over the whole collection; pagination is applied separately so
    /// the total count reflects this filter.
    pub fn filter_doc(&self) -> Document {
        let mut filter = Document::new();
        if !self.category.is_empty() {
            filter.insert("category", doc! { "$in": self.category.clone() });
        }
        if !self.brand.is_empty() {
            filter.insert("brand", doc! { "$in": self.brand.clone() });
        }
        if let Some(rating) = self.rating {
            // Exclusive minimum.
            filter.insert("rating", doc! { "$gt": rating });
        }
        filter
    }

    /// Sort document, only when both key and a recognized direction are given.
    pub fn sort_doc(&self) -> Option<Document> {
        let key = self.sort.as_deref()?;
        let direction = match self.order.as_deref()? {
            "asc" => 1,
            "desc" => -1,
            _ => return None,
        };
        let mut sort = Document::new();
        sort.insert(key, direction);
        Some(sort)
    }

    /// skip = limit × (page − 1); pagination only kicks in when both are set.
    pub fn skip_count(&self) -> Option<u64> {
        let page = self.page?;
        let limit = self.limit?;
        if limit <= 0 {
            return None;
        }
        Some(limit as u64 * page.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_matches_everything() {
        let q = ListQuery::default();
        assert!(q.filter_doc().is_empty());
        assert!(q.sort_doc().is_none());
        assert!(q.skip_count().is_none());
    }

    #[test]
    fn categories_and_brands_compose_in_clauses() {
        let q = ListQuery {
            category: vec!["shoes".into(), "hats".into()],
            brand: vec!["Acme".into()],
            ..Default::default()
        };
        let filter = q.filter_doc();
        assert_eq!(
            filter.get_document("category").unwrap(),
            &doc! { "$in": ["shoes", "hats"] }
        );
        assert_eq!(
            filter.get_document("brand").unwrap(),
            &doc! { "$in": ["Acme"] }
        );
    }

    #[test]
    fn rating_filter_is_exclusive_minimum() {
        let q = ListQuery {
            rating: Some(4.0),
            ..Default::default()
        };
        assert_eq!(
            q.filter_doc().get_document("rating").unwrap(),
            &doc! { "$gt": 4.0 }
        );
    }

    #[test]
    fn sort_requires_key_and_known_direction() {
        let q = ListQuery {
            sort: Some("price".into()),
            order: Some("desc".into()),
            ..Default::default()
        };
        assert_eq!(q.sort_doc().unwrap(), doc! { "price": -1 });

        let q = ListQuery {
            sort: Some("price".into()),
            order: Some("sideways".into()),
            ..Default::default()
        };
        assert!(q.sort_doc().is_none());

        let q = ListQuery {
            sort: Some("price".into()),
            order: None,
            ..Default::default()
        };
        assert!(q.sort_doc().is_none());
    }

    #[test]
    fn skip_is_limit_times_previous_pages() {
        let q = ListQuery {
            page: Some(3),
            limit: Some(10),
            ..Default::default()
        };
        assert_eq!(q.skip_count(), Some(20));
    }

    #[test]
    fn first_and_zeroth_page_skip_nothing() {
        for page in [0, 1] {
            let q = ListQuery {
                page: Some(page),
                limit: Some(10),
                ..Default::default()
            };
            assert_eq!(q.skip_count(), Some(0));
        }
    }
}
