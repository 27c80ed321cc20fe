use super::{to_utc, PublicUser};
use chrono::{DateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const EVENTS_COLLECTION: &str = "events";

/// Event document (`events` collection).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: Option<BsonDateTime>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub capacity: i64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub category: String,
    pub image: Option<String>,
    #[serde(default)]
    pub registrations: Vec<Registration>,
}

/// Embedded in its event; never addressed on its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Registration {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user: ObjectId,
    pub date: BsonDateTime,
    pub participants: i64,
}

impl Registration {
    pub fn new(user: ObjectId, participants: i64) -> Self {
        Self {
            id: ObjectId::new(),
            user,
            date: BsonDateTime::now(),
            participants,
        }
    }
}

impl Event {
    pub fn registered_participants(&self) -> i64 {
        self.registrations.iter().map(|r| r.participants).sum()
    }

    /// Whether `participants` more seats still fit under `capacity`.
    pub fn has_room_for(&self, participants: i64) -> bool {
        self.registered_participants()
            .checked_add(participants)
            .is_some_and(|total| total <= self.capacity)
    }

    pub fn user_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.registrations.iter().map(|r| r.user)
    }

    pub fn into_response(self, users: &HashMap<ObjectId, PublicUser>) -> EventResponse {
        EventResponse {
            id: self.id.to_hex(),
            title: self.title,
            description: self.description,
            date: self.date.and_then(to_utc),
            location: self.location,
            capacity: self.capacity,
            price: self.price,
            category: self.category,
            image: self.image,
            registrations: self
                .registrations
                .into_iter()
                .map(|r| RegistrationResponse {
                    id: r.id.to_hex(),
                    user: users.get(&r.user).cloned(),
                    date: to_utc(r.date),
                    participants: r.participants,
                })
                .collect(),
        }
    }
}

/// Body of `POST /api/events/{id}/reservations`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    pub user_id: String,
    pub participants: i64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct EventResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: Option<DateTime<Utc>>,
    pub location: String,
    pub capacity: i64,
    pub price: f64,
    pub category: String,
    pub image: Option<String>,
    pub registrations: Vec<RegistrationResponse>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RegistrationResponse {
    #[serde(rename = "_id")]
    pub id: String,
    /// `null` when the referenced user no longer exists
    pub user: Option<PublicUser>,
    pub date: Option<DateTime<Utc>>,
    pub participants: i64,
}
