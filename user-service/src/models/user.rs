//! User model - a named person with one embedded postal address.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Postal address embedded in a user document. Free text, never validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub apt: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// User document as stored in the `user` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub address: Address,
}

/// Request to create a user.
///
/// Absent fields decode to empty strings. Any `_id` sent by the client is
/// ignored; identifiers are only ever assigned on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewUser {
    pub name: String,
    pub address: Address,
}

impl NewUser {
    pub fn into_user(self, id: ObjectId) -> User {
        User {
            id,
            name: self.name,
            address: self.address,
        }
    }
}

/// Wire form of a user: `_id` as a 24-char hex string.
///
/// `UserResponse::default()` is the zero-value user returned for lookups
/// that find nothing; its `_id` is the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub address: Address,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_hex(),
            name: user.name,
            address: user.address,
        }
    }
}
