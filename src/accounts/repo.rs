use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime};
use mongodb::options::ReturnDocument;

use super::model::{Account, Role};
use crate::store::Store;

impl Account {
    pub async fn find_by_email(store: &Store, email: &str) -> anyhow::Result<Option<Account>> {
        Ok(store.accounts().find_one(doc! { "email": email }).await?)
    }

    pub async fn find_by_id(store: &Store, id: ObjectId) -> anyhow::Result<Option<Account>> {
        Ok(store.accounts().find_one(doc! { "_id": id }).await?)
    }

    /// Looks up an account holding the digest with an unexpired expiry; an
    /// expired or already-consumed token matches nothing.
    pub async fn find_by_reset_digest(
        store: &Store,
        digest: &str,
    ) -> anyhow::Result<Option<Account>> {
        Ok(store
            .accounts()
            .find_one(doc! {
                "resetPasswordToken": digest,
                "resetPasswordExpire": { "$gt": DateTime::now() },
            })
            .await?)
    }

    pub async fn insert(store: &Store, account: &mut Account) -> anyhow::Result<()> {
        let result = store.accounts().insert_one(&*account).await?;
        account.id = result.inserted_id.as_object_id();
        Ok(())
    }

    /// Writes the whole document back (single-document read-modify-write).
    pub async fn save(store: &Store, account: &Account) -> anyhow::Result<()> {
        let id = account.object_id()?;
        store
            .accounts()
            .replace_one(doc! { "_id": id }, account)
            .await?;
        Ok(())
    }

    pub async fn list(store: &Store) -> anyhow::Result<Vec<Account>> {
        Ok(store.accounts().find(doc! {}).await?.try_collect().await?)
    }

    pub async fn update_profile(
        store: &Store,
        id: ObjectId,
        name: &str,
        email: &str,
    ) -> anyhow::Result<Option<Account>> {
        Ok(store
            .accounts()
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": { "name": name, "email": email } },
            )
            .return_document(ReturnDocument::After)
            .await?)
    }

    pub async fn update_role(
        store: &Store,
        id: ObjectId,
        name: &str,
        email: &str,
        role: Role,
    ) -> anyhow::Result<Option<Account>> {
        Ok(store
            .accounts()
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": { "name": name, "email": email, "role": role.to_string() } },
            )
            .return_document(ReturnDocument::After)
            .await?)
    }

    pub async fn delete(store: &Store, id: ObjectId) -> anyhow::Result<bool> {
        let result = store.accounts().delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
