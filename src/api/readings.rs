use actix_web::{web, HttpResponse, ResponseError};
use crate::api::metrics;
use crate::database::MongoDB;
use crate::models::ReadingResponse;
use crate::services::reading_service;
use crate::services::reading_service::PostReadingRequest;

#[utoipa::path(
    get,
    path = "/bracelet/{id}",
    tag = "Readings",
    params(("id" = String, Path, description = "Bracelet id")),
    responses(
        (status = 200, description = "One reading for the bracelet", body = ReadingResponse),
        (status = 400, description = "Invalid bracelet id"),
        (status = 404, description = "No reading for this bracelet")
    )
)]
pub async fn get_bracelet_data(
    db: web::Data<MongoDB>,
    bracelet_id: web::Path<String>,
) -> HttpResponse {
    metrics::increment_request_count();
    log::info!("📊 GET /bracelet/{}", bracelet_id);

    match reading_service::get_bracelet_reading(&db, &bracelet_id).await {
        Ok(reading) => HttpResponse::Ok().json(reading),
        Err(e) => {
            log::warn!("❌ No reading for {}: {:?}", bracelet_id, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/posting_data",
    tag = "Readings",
    request_body = PostReadingRequest,
    responses(
        (status = 201, description = "Reading stored", body = ReadingResponse),
        (status = 400, description = "Missing field or invalid bracelet id"),
        (status = 404, description = "Referenced bracelet does not exist")
    )
)]
pub async fn posting_data(
    db: web::Data<MongoDB>,
    request: web::Json<PostReadingRequest>,
) -> HttpResponse {
    metrics::increment_request_count();
    log::info!(
        "📡 POST /posting_data - bracelet: {}",
        request.bracelet_id.as_deref().unwrap_or("N/A")
    );

    match reading_service::ingest_reading(&db, &request).await {
        Ok(reading) => {
            log::info!("✅ Reading stored: {}", reading.id);
            HttpResponse::Created().json(reading)
        }
        Err(e) => {
            log::warn!("❌ Reading rejected: {:?}", e);
            e.error_response()
        }
    }
}
