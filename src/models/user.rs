use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

pub const USERS_COLLECTION: &str = "users";

/// User document as stored in the `users` collection.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    pub email: String,
    /// bcrypt hash, never the clear password
    pub password: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub profile: Profile,
    pub created_at: Option<BsonDateTime>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Profile {
    pub phone: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

fn default_role() -> String {
    "member".to_string()
}

impl User {
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: ObjectId::new(),
            name,
            email,
            password: password_hash,
            role: default_role(),
            profile: Profile::default(),
            created_at: Some(BsonDateTime::now()),
        }
    }
}

/// The part of a user that is safe to hand out.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, utoipa::ToSchema)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_hex(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}
