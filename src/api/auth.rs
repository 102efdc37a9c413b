use actix_web::{web, HttpResponse, ResponseError};
use crate::api::metrics;
use crate::database::MongoDB;
use crate::services::auth_service;
use crate::services::auth_service::{AuthResponse, LogInRequest, SignUpRequest};

#[utoipa::path(
    post,
    path = "/sign_up",
    tag = "Auth",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "User created", body = AuthResponse),
        (status = 400, description = "Missing or malformed email/password"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn sign_up(
    db: web::Data<MongoDB>,
    request: web::Json<SignUpRequest>,
) -> HttpResponse {
    metrics::increment_request_count();
    let email = request.email.as_deref().unwrap_or("N/A");
    log::info!("📝 POST /sign_up - email: {}", email);

    match auth_service::sign_up(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Signup successful: {}", email);
            HttpResponse::Created().json(response)
        }
        Err(e) => {
            log::warn!("❌ Signup failed: {} - {:?}", email, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/log_in",
    tag = "Auth",
    request_body = LogInRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Missing email/password"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn log_in(
    db: web::Data<MongoDB>,
    request: web::Json<LogInRequest>,
) -> HttpResponse {
    metrics::increment_request_count();
    let email = request.email.as_deref().unwrap_or("N/A");
    log::info!("🔐 POST /log_in - email: {}", email);

    match auth_service::log_in(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {:?}", email, e);
            e.error_response()
        }
    }
}
