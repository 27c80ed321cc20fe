pub mod auth;
pub mod dashboard;
pub mod events;
pub mod formations;
pub mod health;
pub mod swagger;

use crate::middleware::AuthMiddleware;
use crate::services::auth_service::{Claims, TokenSigner};
use crate::utils::AppError;
use actix_web::{error::InternalError, web, ResponseError};

/// Registers every HTTP route. Shared by the server and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig, signer: TokenSigner, require_auth: bool) {
    let guard = AuthMiddleware::new(signer, require_auth);

    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let response = AppError::Validation(err.to_string()).error_response();
        InternalError::from_response(err, response).into()
    }))
    .route("/health", web::get().to(health::health_check))
    .service(
        web::scope("/api")
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login)),
            )
            .route("/events", web::get().to(events::list_events))
            .service(
                web::resource("/events/{id}/reservations")
                    .wrap(guard.clone())
                    .route(web::post().to(events::create_reservation)),
            )
            .route("/formations", web::get().to(formations::list_formations))
            .service(
                web::resource("/formations/{id}/register")
                    .wrap(guard)
                    .route(web::post().to(formations::enroll)),
            )
            .route("/dashboard/stats", web::get().to(dashboard::get_stats)),
    );
}

/// When the request carries verified claims, the body may only act for the
/// token's own user.
pub(crate) fn ensure_same_user(claims: Option<&Claims>, user_id: &str) -> Result<(), AppError> {
    match claims {
        Some(claims) if claims.user_id != user_id.trim() => Err(AppError::Auth(
            "Token does not match userId".to_string(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::{fixtures, MemoryStore};
    use crate::database::DataStore;
    use actix_web::{http::StatusCode, test as actix_test, App};
    use mongodb::bson::oid::ObjectId;
    use serde_json::{json, Value};
    use std::sync::Arc;

    const SECRET: &str = "handler-test-secret";

    macro_rules! app {
        ($store:expr, $require_auth:expr) => {{
            let store: Arc<dyn DataStore> = $store.clone();
            actix_test::init_service(
                App::new()
                    .app_data(web::Data::from(store))
                    .app_data(web::Data::new(TokenSigner::new(SECRET)))
                    .configure(|cfg| configure(cfg, TokenSigner::new(SECRET), $require_auth)),
            )
            .await
        }};
    }

    fn post(uri: &str, body: Value) -> actix_test::TestRequest {
        actix_test::TestRequest::post().uri(uri).set_json(body)
    }

    #[actix_web::test]
    async fn test_register_and_login_over_http() {
        let store = Arc::new(MemoryStore::default());
        let app = app!(store, false);

        let body = json!({ "name": "Awa", "email": "awa@example.org", "password": "pw" });
        let resp = actix_test::call_service(&app, post("/api/auth/register", body.clone()).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let registered: Value = actix_test::read_body_json(resp).await;
        assert!(registered["token"].as_str().is_some());
        assert_eq!(registered["user"]["email"], "awa@example.org");
        assert!(registered["user"].get("password").is_none());

        let resp = actix_test::call_service(&app, post("/api/auth/register", body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let error: Value = actix_test::read_body_json(resp).await;
        assert!(error["message"].as_str().is_some());

        let resp = actix_test::call_service(
            &app,
            post("/api/auth/login", json!({ "email": "awa@example.org", "password": "pw" })).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let logged_in: Value = actix_test::read_body_json(resp).await;
        assert_eq!(logged_in["user"]["id"], registered["user"]["id"]);

        let resp = actix_test::call_service(
            &app,
            post("/api/auth/login", json!({ "email": "awa@example.org", "password": "nope" })).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_reservation_status_codes() {
        let store = Arc::new(MemoryStore::default());
        let event = fixtures::event(10);
        store.insert_event(&event).await.unwrap();
        let app = app!(store, false);

        let uri = format!("/api/events/{}/reservations", event.id.to_hex());
        let user_id = ObjectId::new().to_hex();

        let resp = actix_test::call_service(&app, post(&uri, json!({ "userId": user_id, "participants": 7 })).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(resp).await;
        assert!(body["message"].as_str().is_some());

        let resp = actix_test::call_service(&app, post(&uri, json!({ "userId": user_id, "participants": 4 })).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let missing = format!("/api/events/{}/reservations", ObjectId::new().to_hex());
        let resp = actix_test::call_service(&app, post(&missing, json!({ "userId": user_id, "participants": 1 })).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = actix_test::call_service(&app, post(&uri, json!({ "userId": user_id })).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = actix_test::TestRequest::get().uri("/api/events").to_request();
        let events: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(events[0]["_id"], event.id.to_hex());
        assert_eq!(events[0]["registrations"][0]["participants"], 7);
    }

    #[actix_web::test]
    async fn test_formation_enrollment_and_stats() {
        let store = Arc::new(MemoryStore::default());
        let formation = fixtures::formation();
        store.insert_formation(&formation).await.unwrap();
        store.insert_event(&fixtures::event(3)).await.unwrap();
        let app = app!(store, false);

        let uri = format!("/api/formations/{}/register", formation.id.to_hex());
        let resp = actix_test::call_service(&app, post(&uri, json!({ "userId": ObjectId::new().to_hex() })).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let missing = format!("/api/formations/{}/register", ObjectId::new().to_hex());
        let resp = actix_test::call_service(&app, post(&missing, json!({ "userId": ObjectId::new().to_hex() })).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = actix_test::TestRequest::get().uri("/api/formations").to_request();
        let formations: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(formations[0]["students"][0]["progress"], 0);
        assert_eq!(formations[0]["students"][0]["completed"], false);

        let req = actix_test::TestRequest::get().uri("/api/dashboard/stats").to_request();
        let stats: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            stats,
            json!({ "members": 0, "events": 1, "formations": 1, "revenue": 1_250_000 })
        );
    }

    #[actix_web::test]
    async fn test_guard_requires_matching_token_when_enabled() {
        let store = Arc::new(MemoryStore::default());
        let event = fixtures::event(10);
        store.insert_event(&event).await.unwrap();
        let app = app!(store, true);

        let resp = actix_test::call_service(
            &app,
            post("/api/auth/register", json!({ "name": "Awa", "email": "awa@example.org", "password": "pw" }))
                .to_request(),
        )
        .await;
        let registered: Value = actix_test::read_body_json(resp).await;
        let token = registered["token"].as_str().unwrap().to_string();
        let user_id = registered["user"]["id"].as_str().unwrap().to_string();

        let uri = format!("/api/events/{}/reservations", event.id.to_hex());
        let body = json!({ "userId": user_id, "participants": 2 });

        // no token
        let resp = actix_test::call_service(&app, post(&uri, body.clone()).to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // token for someone else
        let other = json!({ "userId": ObjectId::new().to_hex(), "participants": 2 });
        let req = actix_test::TestRequest::post()
            .uri(&uri)
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .set_json(other)
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = actix_test::TestRequest::post()
            .uri(&uri)
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .set_json(body)
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        // reads stay open
        let req = actix_test::TestRequest::get().uri("/api/events").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[test]
    fn test_ensure_same_user() {
        let claims = Claims { user_id: "abc".into(), iat: 0 };
        assert!(ensure_same_user(None, "anything").is_ok());
        assert!(ensure_same_user(Some(&claims), "abc").is_ok());
        assert!(matches!(ensure_same_user(Some(&claims), "xyz"), Err(AppError::Auth(_))));
    }
}
