use crate::models::Item;
use mongodb::{
    bson::doc, options::IndexOptions, Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for inventory-service");

        let items = self.items();

        let sku_index = IndexModel::builder()
            .keys(doc! { "sku": 1 })
            .options(
                IndexOptions::builder()
                    .name("sku_lookup".to_string())
                    .sparse(true)
                    .build(),
            )
            .build();

        items.create_index(sku_index, None).await.map_err(|e| {
            tracing::error!("Failed to create sku index on items collection: {}", e);
            AppError::from(e)
        })?;
        tracing::info!("Created index on items.sku");

        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_order".to_string())
                    .build(),
            )
            .build();

        items
            .create_index(created_at_index, None)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to create created_at index on items collection: {}",
                    e
                );
                AppError::from(e)
            })?;
        tracing::info!("Created index on items.created_at");

        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn items(&self) -> Collection<Item> {
        self.db.collection("items")
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}
