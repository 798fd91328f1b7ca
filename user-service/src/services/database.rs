use crate::config::MongoConfig;
use crate::models::{NewUser, User};
use crate::services::repository::{parse_id, StoreError, UserRepository};
use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Client as MongoClient, Collection, Database,
};
use service_core::error::AppError;

/// Shared MongoDB handle. The driver pools connections internally, so one
/// instance is created at startup and cloned into every request.
#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
    collection: String,
}

impl MongoDb {
    pub async fn connect(config: &MongoConfig) -> Result<Self, AppError> {
        tracing::info!(uri = %config.uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(&config.uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", config.uri, e);
            AppError::from(e)
        })?;
        let db = client.database(&config.database);
        tracing::info!(
            database = %config.database,
            collection = %config.collection,
            "Successfully connected to MongoDB database"
        );
        Ok(Self {
            client,
            db,
            collection: config.collection.clone(),
        })
    }

    pub fn users(&self) -> Collection<User> {
        self.db.collection(&self.collection)
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl UserRepository for MongoDb {
    async fn create(&self, new_user: NewUser) -> Result<ObjectId, StoreError> {
        let id = ObjectId::new();
        let user = new_user.into_user(id);

        self.users().insert_one(&user, None).await.map_err(|e| {
            tracing::error!(user_id = %id, "Failed to insert user: {}", e);
            StoreError::from(e)
        })?;

        Ok(id)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let oid = parse_id(id)?;

        self.users()
            .find_one(doc! { "_id": oid }, None)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %oid, "Failed to look up user: {}", e);
                StoreError::from(e)
            })
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let oid = parse_id(id)?;

        let result = self
            .users()
            .delete_one(doc! { "_id": oid }, None)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %oid, "Failed to delete user: {}", e);
                StoreError::from(e)
            })?;

        Ok(result.deleted_count == 1)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                StoreError::from(e)
            })?;
        Ok(())
    }
}
