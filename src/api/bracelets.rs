use actix_web::{web, HttpResponse, ResponseError};
use crate::api::metrics;
use crate::database::MongoDB;
use crate::models::{BraceletResponse, UserResponse};
use crate::services::auth_service::Claims;
use crate::services::bracelet_service;
use crate::services::bracelet_service::{AddBraceletRequest, NewBraceletRequest};

#[utoipa::path(
    post,
    path = "/new_bracelet",
    tag = "Bracelets",
    request_body = NewBraceletRequest,
    responses(
        (status = 201, description = "Bracelet registered", body = BraceletResponse),
        (status = 400, description = "Nickname missing")
    )
)]
pub async fn new_bracelet(
    db: web::Data<MongoDB>,
    request: web::Json<NewBraceletRequest>,
) -> HttpResponse {
    metrics::increment_request_count();
    log::info!("📿 POST /new_bracelet");

    match bracelet_service::register_bracelet(&db, request.into_inner()).await {
        Ok(bracelet) => {
            log::info!("✅ Bracelet registered: {}", bracelet.id);
            HttpResponse::Created().json(bracelet)
        }
        Err(e) => {
            log::warn!("❌ Bracelet registration failed: {:?}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/bracelet",
    tag = "Bracelets",
    responses(
        (status = 200, description = "Bracelets linked to the caller", body = [BraceletResponse]),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User no longer exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user_bracelets(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
) -> HttpResponse {
    metrics::increment_request_count();
    let user_id = &user.sub;
    log::info!("📋 GET /bracelet - user {}", user_id);

    match bracelet_service::list_user_bracelets(&db, user_id).await {
        Ok(bracelets) => {
            log::info!("✅ Listed {} bracelets", bracelets.len());
            HttpResponse::Ok().json(bracelets)
        }
        Err(e) => {
            log::warn!("❌ Error listing bracelets for {}: {:?}", user_id, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/add_bracelet",
    tag = "Bracelets",
    request_body = AddBraceletRequest,
    responses(
        (status = 200, description = "Bracelet linked, updated user returned", body = UserResponse),
        (status = 400, description = "Missing/invalid id or already linked"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User or bracelet not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_bracelet(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<AddBraceletRequest>,
) -> HttpResponse {
    metrics::increment_request_count();
    let user_id = &user.sub;
    log::info!("🔗 POST /add_bracelet - user {}", user_id);

    match bracelet_service::add_bracelet(&db, user_id, request.into_inner()).await {
        Ok(updated) => {
            log::info!("✅ Bracelet linked, user now has {}", updated.bracelet_ids.len());
            HttpResponse::Ok().json(updated)
        }
        Err(e) => {
            log::warn!("❌ Error linking bracelet for {}: {:?}", user_id, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/remove_bracelet/{id}",
    tag = "Bracelets",
    params(("id" = String, Path, description = "Bracelet id to unlink")),
    responses(
        (status = 200, description = "Unlinked (idempotent), pre-update user returned", body = UserResponse),
        (status = 400, description = "Invalid bracelet id"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_bracelet(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    bracelet_id: web::Path<String>,
) -> HttpResponse {
    metrics::increment_request_count();
    let user_id = &user.sub;
    log::info!("✂️  DELETE /remove_bracelet/{} - user {}", bracelet_id, user_id);

    match bracelet_service::remove_bracelet(&db, user_id, &bracelet_id).await {
        Ok(previous) => {
            log::info!("✅ Bracelet unlinked");
            HttpResponse::Ok().json(previous)
        }
        Err(e) => {
            log::warn!("❌ Error unlinking bracelet for {}: {:?}", user_id, e);
            e.error_response()
        }
    }
}
