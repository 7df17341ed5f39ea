use std::sync::Arc;

use crate::config::AppConfig;
use crate::mailer::{Mailer, SmtpMailer};
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Arc<AppConfig>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let store = Store::connect(&config.mongo_url, &config.mongo_db).await?;
        let mailer = Arc::new(SmtpMailer::new(&config.smtp)?) as Arc<dyn Mailer>;
        Ok(Self {
            store,
            config,
            mailer,
        })
    }
}
