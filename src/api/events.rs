use actix_web::{web, HttpResponse, ResponseError};
use crate::api::ensure_same_user;
use crate::database::DataStore;
use crate::models::{EventResponse, ReservationRequest};
use crate::services::auth_service::Claims;
use crate::services::event_service;

#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    responses(
        (status = 200, description = "All events with their registrations", body = [EventResponse]),
        (status = 500, description = "Store failure")
    )
)]
pub async fn list_events(store: web::Data<dyn DataStore>) -> HttpResponse {
    log::info!("📅 GET /events");

    match event_service::list_events(store.get_ref()).await {
        Ok(events) => {
            log::info!("✅ Fetched {} events", events.len());
            HttpResponse::Ok().json(events)
        }
        Err(e) => {
            log::error!("❌ Error fetching events: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/events/{id}/reservations",
    tag = "Events",
    params(("id" = String, Path, description = "Event ID")),
    request_body = ReservationRequest,
    responses(
        (status = 200, description = "Reservation confirmed"),
        (status = 400, description = "Invalid request or capacity exceeded"),
        (status = 404, description = "Event not found")
    ),
    security((), ("bearer_auth" = []))
)]
pub async fn create_reservation(
    store: web::Data<dyn DataStore>,
    path: web::Path<String>,
    request: web::Json<ReservationRequest>,
    claims: Option<web::ReqData<Claims>>,
) -> HttpResponse {
    let event_id = path.into_inner();
    log::info!(
        "🎟️  POST /events/{}/reservations - user: {}, participants: {}",
        event_id,
        request.user_id,
        request.participants
    );

    if let Err(e) = ensure_same_user(claims.as_deref(), &request.user_id) {
        return e.error_response();
    }

    match event_service::register_for_event(store.get_ref(), &event_id, &request).await {
        Ok(()) => {
            log::info!("✅ Reservation confirmed for event {}", event_id);
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Reservation confirmed"
            }))
        }
        Err(e) => {
            log::warn!("❌ Reservation failed for event {}: {}", event_id, e);
            e.error_response()
        }
    }
}
