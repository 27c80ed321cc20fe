use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ashilac Backend API",
        version = "1.0.0",
        description = "Membership and event management API. \n\n**Authentication:** register or log in to obtain a JWT. When the server runs with `REQUIRE_AUTH=true`, reservations and enrollments need it as a Bearer token.\n\n**Features:**\n- Member registration and login\n- Event listing and capacity-checked reservations\n- Training course (formation) enrollment\n- Dashboard counts\n\nThe broadcast chat runs as a separate WebSocket listener and is not part of this document."
    ),
    paths(
        // Auth
        crate::api::auth::register,
        crate::api::auth::login,

        // Events
        crate::api::events::list_events,
        crate::api::events::create_reservation,

        // Formations
        crate::api::formations::list_formations,
        crate::api::formations::enroll,

        // Dashboard & Health
        crate::api::dashboard::get_stats,
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::AuthResponse,
            crate::models::PublicUser,
            crate::models::EventResponse,
            crate::models::RegistrationResponse,
            crate::models::ReservationRequest,
            crate::models::FormationResponse,
            crate::models::StudentResponse,
            crate::models::ScheduleSlot,
            crate::models::EnrollmentRequest,
            crate::services::dashboard_service::DashboardStats,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Member registration and login."),
        (name = "Events", description = "Event listing and reservations."),
        (name = "Formations", description = "Training courses and enrollment."),
        (name = "Dashboard", description = "Aggregate counts."),
        (name = "Health", description = "Service health check."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by /api/auth/login"))
                        .build()
                ),
            );
        }
    }
}
