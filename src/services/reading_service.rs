use crate::database::{MongoDB, BRACELETS_COLLECTION, READINGS_COLLECTION};
use crate::models::{Bracelet, Reading, ReadingResponse};
use crate::utils::error::ServiceError;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct PostReadingRequest {
    #[serde(rename = "braceletId")]
    pub bracelet_id: Option<String>,
    pub heart_rate: Option<f64>,
    pub temperature: Option<f64>,
    pub saturation: Option<f64>,
}

impl PostReadingRequest {
    /// Presence checks distinguish "field absent" from "field is zero": a
    /// measured 0 is a value, not a missing field.
    fn validate(&self) -> Result<(ObjectId, f64, f64, f64), ServiceError> {
        let missing = || {
            ServiceError::InvalidRequest(
                "Bracelet ID, heart rate, temperature and saturation are required.".to_string(),
            )
        };

        let raw_id = self
            .bracelet_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(missing)?;
        let heart_rate = self.heart_rate.ok_or_else(missing)?;
        let temperature = self.temperature.ok_or_else(missing)?;
        let saturation = self.saturation.ok_or_else(missing)?;

        let bracelet_id = ObjectId::parse_str(raw_id)
            .map_err(|_| ServiceError::InvalidRequest("Invalid bracelet ID.".to_string()))?;

        Ok((bracelet_id, heart_rate, temperature, saturation))
    }
}

/// Stores one sensor sample, stamped with the ingestion time. The referenced
/// bracelet must exist in the catalog.
pub async fn ingest_reading(
    db: &MongoDB,
    request: &PostReadingRequest,
) -> Result<ReadingResponse, ServiceError> {
    let (bracelet_id, heart_rate, temperature, saturation) = request.validate()?;

    let bracelet = db
        .collection::<Bracelet>(BRACELETS_COLLECTION)
        .find_one(doc! { "_id": bracelet_id })
        .await?;
    if bracelet.is_none() {
        return Err(ServiceError::NotFound(
            "Bracelet does not exist.".to_string(),
        ));
    }

    let reading = Reading {
        id: Some(ObjectId::new()),
        bracelet_id,
        timestamp: BsonDateTime::now(),
        heart_rate,
        temperature,
        saturation,
    };

    db.collection::<Reading>(READINGS_COLLECTION)
        .insert_one(&reading)
        .await?;

    log::info!(
        "📈 Reading stored for bracelet {}: hr={} temp={} sat={}",
        bracelet_id,
        heart_rate,
        temperature,
        saturation
    );

    Ok(ReadingResponse::from(reading))
}

/// One reading for the bracelet, first match per query order (no sort — a
/// single record, not a history).
pub async fn get_bracelet_reading(
    db: &MongoDB,
    raw_bracelet_id: &str,
) -> Result<ReadingResponse, ServiceError> {
    let bracelet_id = ObjectId::parse_str(raw_bracelet_id)
        .map_err(|_| ServiceError::InvalidRequest("Invalid bracelet ID.".to_string()))?;

    let reading = db
        .collection::<Reading>(READINGS_COLLECTION)
        .find_one(doc! { "bracelet_id": bracelet_id })
        .await?
        .ok_or_else(|| ServiceError::NotFound("Bracelet not found.".to_string()))?;

    Ok(ReadingResponse::from(reading))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::bracelet_service::{self, NewBraceletRequest};

    fn request(
        bracelet_id: Option<String>,
        heart_rate: Option<f64>,
        temperature: Option<f64>,
        saturation: Option<f64>,
    ) -> PostReadingRequest {
        PostReadingRequest {
            bracelet_id,
            heart_rate,
            temperature,
            saturation,
        }
    }

    #[test]
    fn test_zero_measurements_are_valid() {
        let req = request(
            Some(ObjectId::new().to_hex()),
            Some(0.0),
            Some(0.0),
            Some(0.0),
        );

        let (_, heart_rate, temperature, saturation) =
            req.validate().expect("zero is a value, not a gap");
        assert_eq!(heart_rate, 0.0);
        assert_eq!(temperature, 0.0);
        assert_eq!(saturation, 0.0);
    }

    #[test]
    fn test_absent_fields_are_rejected() {
        let id = ObjectId::new().to_hex();

        let cases = [
            request(None, Some(70.0), Some(36.6), Some(98.0)),
            request(Some(id.clone()), None, Some(36.6), Some(98.0)),
            request(Some(id.clone()), Some(70.0), None, Some(98.0)),
            request(Some(id), Some(70.0), Some(36.6), None),
        ];

        for case in cases {
            assert!(matches!(
                case.validate(),
                Err(ServiceError::InvalidRequest(_))
            ));
        }
    }

    #[test]
    fn test_malformed_bracelet_id_is_rejected() {
        let req = request(
            Some("zzz".to_string()),
            Some(70.0),
            Some(36.6),
            Some(98.0),
        );
        assert!(matches!(
            req.validate(),
            Err(ServiceError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_ingest_requires_existing_bracelet() {
        dotenv::dotenv().ok();
        let uri = std::env::var("MONGO_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017/bracelet_tracker".to_string());
        let db = crate::database::MongoDB::new(&uri).await.unwrap();

        let orphan = request(
            Some(ObjectId::new().to_hex()),
            Some(70.0),
            Some(36.6),
            Some(98.0),
        );
        assert!(matches!(
            ingest_reading(&db, &orphan).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_ingest_and_read_back() {
        dotenv::dotenv().ok();
        let uri = std::env::var("MONGO_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017/bracelet_tracker".to_string());
        let db = crate::database::MongoDB::new(&uri).await.unwrap();

        let bracelet = bracelet_service::register_bracelet(
            &db,
            NewBraceletRequest {
                nickname: Some("reader".to_string()),
            },
        )
        .await
        .unwrap();

        let stored = ingest_reading(
            &db,
            &request(Some(bracelet.id.clone()), Some(0.0), Some(36.6), Some(98.0)),
        )
        .await
        .expect("heart_rate of 0 must be accepted");
        assert_eq!(stored.heart_rate, 0.0);

        let fetched = get_bracelet_reading(&db, &bracelet.id).await.unwrap();
        assert_eq!(fetched.bracelet_id, bracelet.id);
    }
}
