use anyhow::Context;
use mongodb::{Client, Collection, Database};

use crate::accounts::model::Account;
use crate::orders::model::Order;
use crate::products::model::Product;

/// Handle to the document store, constructed once at startup and passed down
/// through `AppState`.
#[derive(Clone)]
pub struct Store {
    db: Database,
}

impl Store {
    pub async fn connect(url: &str, db_name: &str) -> anyhow::Result<Self> {
        let client = Client::with_uri_str(url)
            .await
            .context("connect to document store")?;
        Ok(Self {
            db: client.database(db_name),
        })
    }

    pub fn accounts(&self) -> Collection<Account> {
        self.db.collection("users")
    }

    pub fn products(&self) -> Collection<Product> {
        self.db.collection("products")
    }

    pub fn orders(&self) -> Collection<Order> {
        self.db.collection("orders")
    }
}
