mod api;
mod chat;
mod config;
mod database;
mod middleware;
mod models;
mod seeds;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::{Compress, Logger}, web, App, HttpServer};
use config::AppConfig;
use database::DataStore;
use dotenv::dotenv;
use services::auth_service::TokenSigner;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn build_cors(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() {
        return Cors::permissive();
    }

    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            actix_web::http::header::AUTHORIZATION,
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::ACCEPT,
        ])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    log::info!("🚀 Starting Ashilac backend...");
    log::info!("📊 Database: {}", config.database_url);
    if config.require_auth {
        log::info!("🔒 Bearer token required on reservation and enrollment routes");
    } else {
        log::warn!("⚠️  REQUIRE_AUTH is off: reservation and enrollment routes are open");
    }

    let db = database::MongoDB::new(&config.database_url)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to connect to MongoDB: {}", e)))?;
    log::info!("✅ MongoDB connected successfully");

    let store: Arc<dyn DataStore> = Arc::new(db);

    if config.seed_demo_data {
        seeds::demo_seed::seed_demo_data(store.as_ref()).await;
    }

    let store_data = web::Data::from(store);
    let signer = TokenSigner::new(&config.jwt_secret);
    let signer_data = web::Data::new(signer.clone());

    // 💬 Chat relay on its own port
    let chat_listener = tokio::net::TcpListener::bind((config.host.as_str(), config.chat_port)).await?;
    let relay = Arc::new(chat::ChatRelay::new());

    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", config.host, config.port);

    let require_auth = config.require_auth;
    let cors_allowed_origins = config.cors_allowed_origins.clone();

    let http_server = HttpServer::new(move || {
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(store_data.clone())
            .app_data(signer_data.clone())
            .wrap(build_cors(&cors_allowed_origins))
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi)
            )
            .configure(|cfg| api::configure(cfg, signer.clone(), require_auth))
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    tokio::select! {
        result = http_server => result,
        result = chat::server::serve(chat_listener, relay) => result,
    }
}
