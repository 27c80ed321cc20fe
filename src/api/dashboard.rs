use actix_web::{web, HttpResponse, ResponseError};
use crate::database::DataStore;
use crate::services::dashboard_service::{self, DashboardStats};

#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Entity counts", body = DashboardStats),
        (status = 500, description = "Store failure")
    )
)]
pub async fn get_stats(store: web::Data<dyn DataStore>) -> HttpResponse {
    log::info!("📊 GET /dashboard/stats");

    match dashboard_service::get_stats(store.get_ref()).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => {
            log::error!("❌ Error computing stats: {}", e);
            e.error_response()
        }
    }
}
