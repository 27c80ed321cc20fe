pub mod auth_service;
pub mod dashboard_service;
pub mod event_service;
pub mod formation_service;

use crate::database::DataStore;
use crate::models::PublicUser;
use crate::utils::AppError;
use mongodb::bson::oid::ObjectId;
use std::collections::{HashMap, HashSet};

fn parse_object_id(raw: &str, what: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw.trim())
        .map_err(|_| AppError::Validation(format!("Invalid {} ID", what)))
}

/// Loads the referenced users in one query, keyed by id.
async fn resolve_public_users(
    store: &dyn DataStore,
    ids: Vec<ObjectId>,
) -> Result<HashMap<ObjectId, PublicUser>, AppError> {
    let ids: Vec<ObjectId> = ids.into_iter().collect::<HashSet<_>>().into_iter().collect();

    let users = store.find_users_by_ids(&ids).await?;
    Ok(users
        .iter()
        .map(|user| (user.id, PublicUser::from(user)))
        .collect())
}
