use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};

use super::model::Order;
use crate::store::Store;

impl Order {
    pub async fn find_by_id(store: &Store, id: ObjectId) -> anyhow::Result<Option<Order>> {
        Ok(store.orders().find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_by_user(store: &Store, user: ObjectId) -> anyhow::Result<Vec<Order>> {
        Ok(store
            .orders()
            .find(doc! { "user": user })
            .await?
            .try_collect()
            .await?)
    }

    pub async fn list(store: &Store) -> anyhow::Result<Vec<Order>> {
        Ok(store.orders().find(doc! {}).await?.try_collect().await?)
    }

    pub async fn insert(store: &Store, order: &mut Order) -> anyhow::Result<()> {
        let result = store.orders().insert_one(&*order).await?;
        order.id = result.inserted_id.as_object_id();
        Ok(())
    }

    /// Writes the whole document back (single-document read-modify-write).
    pub async fn save(store: &Store, order: &Order) -> anyhow::Result<()> {
        let id = order
            .id
            .ok_or_else(|| anyhow::anyhow!("order has no id"))?;
        store.orders().replace_one(doc! { "_id": id }, order).await?;
        Ok(())
    }

    pub async fn delete(store: &Store, id: ObjectId) -> anyhow::Result<bool> {
        let result = store.orders().delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
