use actix_web::{web, HttpResponse, ResponseError};
use crate::api::ensure_same_user;
use crate::database::DataStore;
use crate::models::{EnrollmentRequest, FormationResponse};
use crate::services::auth_service::Claims;
use crate::services::formation_service;

#[utoipa::path(
    get,
    path = "/api/formations",
    tag = "Formations",
    responses(
        (status = 200, description = "All formations with their students", body = [FormationResponse]),
        (status = 500, description = "Store failure")
    )
)]
pub async fn list_formations(store: web::Data<dyn DataStore>) -> HttpResponse {
    log::info!("🎓 GET /formations");

    match formation_service::list_formations(store.get_ref()).await {
        Ok(formations) => HttpResponse::Ok().json(formations),
        Err(e) => {
            log::error!("❌ Error fetching formations: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/formations/{id}/register",
    tag = "Formations",
    params(("id" = String, Path, description = "Formation ID")),
    request_body = EnrollmentRequest,
    responses(
        (status = 200, description = "Enrollment confirmed"),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Formation not found")
    ),
    security((), ("bearer_auth" = []))
)]
pub async fn enroll(
    store: web::Data<dyn DataStore>,
    path: web::Path<String>,
    request: web::Json<EnrollmentRequest>,
    claims: Option<web::ReqData<Claims>>,
) -> HttpResponse {
    let formation_id = path.into_inner();
    log::info!("🎓 POST /formations/{}/register - user: {}", formation_id, request.user_id);

    if let Err(e) = ensure_same_user(claims.as_deref(), &request.user_id) {
        return e.error_response();
    }

    match formation_service::enroll_in_formation(store.get_ref(), &formation_id, &request).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Enrollment confirmed"
        })),
        Err(e) => {
            log::warn!("❌ Enrollment failed for formation {}: {}", formation_id, e);
            e.error_response()
        }
    }
}
