use super::{parse_object_id, resolve_public_users};
use crate::database::DataStore;
use crate::models::{EnrollmentRequest, FormationResponse, Student};
use crate::utils::AppError;

pub async fn list_formations(store: &dyn DataStore) -> Result<Vec<FormationResponse>, AppError> {
    let formations = store.list_formations().await?;

    let user_ids: Vec<_> = formations.iter().flat_map(|f| f.user_ids()).collect();
    let users = resolve_public_users(store, user_ids).await?;

    Ok(formations
        .into_iter()
        .map(|formation| formation.into_response(&users))
        .collect())
}

/// Appends a fresh student entry. Enrolling twice adds a second entry.
pub async fn enroll_in_formation(
    store: &dyn DataStore,
    formation_id: &str,
    request: &EnrollmentRequest,
) -> Result<(), AppError> {
    let formation_oid = parse_object_id(formation_id, "formation")?;
    let user_oid = parse_object_id(&request.user_id, "user")?;

    if !store
        .append_student(&formation_oid, &Student::enroll(user_oid))
        .await?
    {
        return Err(AppError::NotFound("Formation not found".to_string()));
    }

    Ok(())
}
