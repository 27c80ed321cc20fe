pub mod event;
pub mod formation;
pub mod user;

pub use event::*;
pub use formation::*;
pub use user::*;

use chrono::{DateTime, Utc};
use mongodb::bson::DateTime as BsonDateTime;

/// BSON dates go out as RFC 3339 strings, not extended JSON.
pub(crate) fn to_utc(date: BsonDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(date.timestamp_millis())
}
