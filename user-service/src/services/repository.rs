use crate::models::{NewUser, User};
use async_trait::async_trait;
use dashmap::DashMap;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The identifier is not a 24-char hex ObjectId.
    #[error("invalid user id '{0}'")]
    InvalidId(String),

    #[error("store error: {0}")]
    Database(#[from] mongodb::error::Error),
}

/// Handlers resolve `InvalidId` as "not found" before converting, so one
/// that still reaches this conversion is a server fault.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidId(_) => AppError::InternalError(anyhow::Error::new(err)),
            StoreError::Database(e) => AppError::from(e),
        }
    }
}

pub fn parse_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

/// Persistence for user documents.
///
/// Absence is reported through `Option`/`bool`; `Err` is reserved for ids
/// that cannot be parsed and for failures of the store itself.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Assigns a fresh identifier, stores the user and returns the identifier.
    async fn create(&self, new_user: NewUser) -> Result<ObjectId, StoreError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;
    /// Returns `true` when a user was removed.
    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError>;
    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Process-local store, for running without MongoDB.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<ObjectId, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<ObjectId, StoreError> {
        let id = ObjectId::new();
        self.users.insert(id, new_user.into_user(id));
        Ok(id)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let oid = parse_id(id)?;
        Ok(self.users.get(&oid).map(|entry| entry.value().clone()))
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let oid = parse_id(id)?;
        Ok(self.users.remove(&oid).is_some())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
