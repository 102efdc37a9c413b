mod api;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let mongo_uri = env::var("MONGO_URI").expect("MONGO_URI must be set");

    log::info!("🚀 Starting Bracelet Telemetry Service...");

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&mongo_uri)
        .await
        .expect("Failed to connect to MongoDB");

    let db_data = web::Data::new(db.clone());

    log::info!("✅ MongoDB connected successfully");
    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        // Devices and the web client call from anywhere; mirror the open
        // CORS policy of the deployed service.
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
            .allow_any_header()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            // Health check & metrics
            .route("/health", web::get().to(api::health::health_check))
            .route("/metrics", web::get().to(api::metrics::get_metrics))
            // Diagnostic listing
            .route("/users", web::get().to(api::users::get_users))
            // Auth endpoints
            .route("/sign_up", web::post().to(api::auth::sign_up))
            .route("/log_in", web::post().to(api::auth::log_in))
            // Bracelet linking (JWT identity)
            .service(
                web::resource("/bracelet")
                    .wrap(middleware::AuthMiddleware)
                    .route(web::get().to(api::bracelets::get_user_bracelets)),
            )
            .service(
                web::resource("/add_bracelet")
                    .wrap(middleware::AuthMiddleware)
                    .route(web::post().to(api::bracelets::add_bracelet)),
            )
            .service(
                web::resource("/remove_bracelet/{id}")
                    .wrap(middleware::AuthMiddleware)
                    .route(web::delete().to(api::bracelets::remove_bracelet)),
            )
            // Bracelet catalog & device ingestion (open endpoints)
            .route("/new_bracelet", web::post().to(api::bracelets::new_bracelet))
            .route(
                "/bracelet/{id}",
                web::get().to(api::readings::get_bracelet_data),
            )
            .route(
                "/posting_data",
                web::post().to(api::readings::posting_data),
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
