use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bracelet Telemetry Service API",
        version = "1.0.0",
        description = "REST backend for the wearable-bracelet telemetry tracker.\n\n**Authentication:** the bracelet-linking endpoints require a JWT Bearer token issued by /sign_up or /log_in. Device ingestion and catalog registration are open.",
    ),
    paths(
        // Auth
        crate::api::auth::sign_up,
        crate::api::auth::log_in,

        // Users
        crate::api::users::get_users,

        // Bracelets
        crate::api::bracelets::new_bracelet,
        crate::api::bracelets::get_user_bracelets,
        crate::api::bracelets::add_bracelet,
        crate::api::bracelets::remove_bracelet,

        // Readings
        crate::api::readings::get_bracelet_data,
        crate::api::readings::posting_data,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::services::auth_service::SignUpRequest,
            crate::services::auth_service::LogInRequest,
            crate::services::auth_service::AuthResponse,
            crate::services::bracelet_service::NewBraceletRequest,
            crate::services::bracelet_service::AddBraceletRequest,
            crate::services::reading_service::PostReadingRequest,
            crate::models::UserResponse,
            crate::models::BraceletResponse,
            crate::models::ReadingResponse,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Signup and login. Both issue the JWT used by the bracelet-linking endpoints."),
        (name = "Users", description = "Diagnostic listing of every user record (no access control)."),
        (name = "Bracelets", description = "Bracelet catalog registration and per-user linking."),
        (name = "Readings", description = "Sensor sample ingestion from devices and per-bracelet retrieval."),
        (name = "Health", description = "Health check and metrics endpoints for monitoring service status."),
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
                        .description(Some("Enter your JWT token"))
                        .build(),
                ),
            );
        }
    }
}
