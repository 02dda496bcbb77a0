//! MongoDB-backed [`DocumentStore`].

use super::{DocumentStore, StoreError};
use crate::config::StoreConfig;
use async_trait::async_trait;
use eventhub_framework::bson::{doc, Bson, Document};
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::Client;
use std::sync::{Mutex, PoisonError};
use tracing::{info, instrument};

const APP_NAME: &str = "eventhub";

/// A pooled MongoDB client.
///
/// The driver's `Client` is a handle to a shared connection pool; every request clones
/// it out of the slot and works against the same pool.
pub struct MongoStore {
    settings: StoreConfig,
    client: Mutex<Option<Client>>,
}

impl MongoStore {
    pub fn new(settings: StoreConfig) -> Self {
        Self {
            settings,
            client: Mutex::new(None),
        }
    }

    fn client(&self) -> Result<Client, StoreError> {
        self.client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(StoreError::NotConnected)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    #[instrument(skip(self), fields(cluster = %self.settings.cluster, database = %self.settings.database))]
    async fn connect(&self) -> Result<(), StoreError> {
        // Parse errors can echo the connection string, so only a fixed message is kept.
        let mut options = ClientOptions::parse(self.settings.connection_uri())
            .await
            .map_err(|_| StoreError::Connection("connection settings are not valid".into()))?;
        options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
        options.app_name = Some(APP_NAME.to_owned());

        let client =
            Client::with_options(options).map_err(|e| StoreError::Connection(e.to_string()))?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Liveness(e.to_string()))?;

        *self.client.lock().unwrap_or_else(PoisonError::into_inner) = Some(client);
        info!("Connected to MongoDB");
        Ok(())
    }

    async fn insert(&self, collection: &str, document: Document) -> Result<Bson, StoreError> {
        let result = self
            .client()?
            .database(&self.settings.database)
            .collection::<Document>(collection)
            .insert_one(document)
            .await
            .map_err(|e| StoreError::Insert {
                collection: collection.to_owned(),
                reason: e.to_string(),
            })?;
        Ok(result.inserted_id)
    }

    async fn disconnect(&self) -> Result<(), StoreError> {
        let client = self
            .client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match client {
            Some(client) => {
                client.shutdown().await;
                info!("Disconnected from MongoDB");
            }
            None => info!("MongoDB was never connected"),
        }
        Ok(())
    }
}
