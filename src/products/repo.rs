use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::ReturnDocument;

use super::dto::UpdateProductRequest;
use super::model::Product;
use super::query::ListQuery;
use crate::store::Store;

impl Product {
    pub async fn find_by_name(store: &Store, name: &str) -> anyhow::Result<Option<Product>> {
        Ok(store.products().find_one(doc! { "name": name }).await?)
    }

    pub async fn find_by_id(store: &Store, id: ObjectId) -> anyhow::Result<Option<Product>> {
        Ok(store.products().find_one(doc! { "_id": id }).await?)
    }

    pub async fn insert(store: &Store, product: &mut Product) -> anyhow::Result<()> {
        let result = store.products().insert_one(&*product).await?;
        product.id = result.inserted_id.as_object_id();
        Ok(())
    }

    /// Writes the whole document back (single-document read-modify-write).
    pub async fn save(store: &Store, product: &Product) -> anyhow::Result<()> {
        let id = product
            .id
            .ok_or_else(|| anyhow::anyhow!("product has no id"))?;
        store
            .products()
            .replace_one(doc! { "_id": id }, product)
            .await?;
        Ok(())
    }

    /// Filtered page of products plus the total count of the filtered set
    /// before pagination.
    pub async fn list(store: &Store, query: &ListQuery) -> anyhow::Result<(Vec<Product>, u64)> {
        let filter = query.filter_doc();
        let collection = store.products();

        let mut find = collection.find(filter.clone());
        if let Some(sort) = query.sort_doc() {
            find = find.sort(sort);
        }
        // Pagination only kicks in when both page and limit are present.
        if let (Some(skip), Some(limit)) = (query.skip_count(), query.limit) {
            find = find.skip(skip).limit(limit);
        }
        let products = find.await?.try_collect().await?;
        let total = collection.count_documents(filter).await?;
        Ok((products, total))
    }

    /// Case-insensitive substring match on the product name.
    pub async fn search(store: &Store, keyword: &str) -> anyhow::Result<Vec<Product>> {
        Ok(store
            .products()
            .find(doc! { "name": { "$regex": keyword, "$options": "i" } })
            .await?
            .try_collect()
            .await?)
    }

    pub async fn update_fields(
        store: &Store,
        id: ObjectId,
        update: &UpdateProductRequest,
    ) -> anyhow::Result<Option<Product>> {
        let mut set = Document::new();
        if let Some(name) = &update.name {
            set.insert("name", name);
        }
        if let Some(description) = &update.description {
            set.insert("description", description);
        }
        if let Some(price) = update.price {
            set.insert("price", price);
        }
        if let Some(category) = &update.category {
            set.insert("category", category);
        }
        if let Some(brand) = &update.brand {
            set.insert("brand", brand);
        }
        if let Some(stock) = update.stock {
            set.insert("stock", stock);
        }
        if set.is_empty() {
            return Self::find_by_id(store, id).await;
        }
        Ok(store
            .products()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?)
    }

    pub async fn delete(store: &Store, id: ObjectId) -> anyhow::Result<bool> {
        let result = store.products().delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
