use actix_web::{web, HttpResponse, ResponseError};
use crate::api::metrics;
use crate::database::MongoDB;
use crate::models::UserResponse;
use crate::services::user_service;

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "Every user record", body = [UserResponse])
    )
)]
pub async fn get_users(db: web::Data<MongoDB>) -> HttpResponse {
    metrics::increment_request_count();
    log::info!("📋 GET /users");

    match user_service::list_users(&db).await {
        Ok(users) => {
            log::info!("✅ Listed {} users", users.len());
            HttpResponse::Ok().json(users)
        }
        Err(e) => {
            log::error!("❌ Error listing users: {:?}", e);
            e.error_response()
        }
    }
}
