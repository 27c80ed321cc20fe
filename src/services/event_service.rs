use super::{parse_object_id, resolve_public_users};
use crate::database::DataStore;
use crate::models::{EventResponse, Registration, ReservationRequest};
use crate::utils::AppError;

const CAPACITY_REACHED: &str = "Maximum capacity reached";

/// All events, with each registration's user resolved to its public summary.
pub async fn list_events(store: &dyn DataStore) -> Result<Vec<EventResponse>, AppError> {
    let events = store.list_events().await?;

    let user_ids: Vec<_> = events.iter().flat_map(|e| e.user_ids()).collect();
    let users = resolve_public_users(store, user_ids).await?;

    Ok(events
        .into_iter()
        .map(|event| event.into_response(&users))
        .collect())
}

/// Adds a registration to an event, refusing it if the seats would go over
/// capacity.
///
/// The capacity condition is checked twice: once against the fetched event
/// for a fast rejection, and again by the store when appending, so
/// concurrent requests can never push the total past `capacity`.
pub async fn register_for_event(
    store: &dyn DataStore,
    event_id: &str,
    request: &ReservationRequest,
) -> Result<(), AppError> {
    let event_oid = parse_object_id(event_id, "event")?;
    let user_oid = parse_object_id(&request.user_id, "user")?;

    if request.participants < 1 {
        return Err(AppError::Validation(
            "Participants must be at least 1".to_string(),
        ));
    }

    let event = store
        .find_event(&event_oid)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    if !event.has_room_for(request.participants) {
        log::info!(
            "🚫 Event {} full: {}/{} taken, {} requested",
            event_id,
            event.registered_participants(),
            event.capacity,
            request.participants
        );
        return Err(AppError::CapacityExceeded(CAPACITY_REACHED.to_string()));
    }

    let registration = Registration::new(user_oid, request.participants);
    if !store
        .append_registration_within_capacity(&event_oid, &registration)
        .await?
    {
        // Another registration took the remaining seats in between.
        log::info!("🚫 Event {} filled up concurrently", event_id);
        return Err(AppError::CapacityExceeded(CAPACITY_REACHED.to_string()));
    }

    Ok(())
}
