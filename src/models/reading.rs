use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Document in the "bracelet_data" collection: one sensor sample posted by a
/// device. Immutable once written. `bracelet_id` is a validated ObjectId and
/// the referenced bracelet is checked for existence before every insert.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Reading {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub bracelet_id: ObjectId,
    pub timestamp: BsonDateTime,
    pub heart_rate: f64,
    pub temperature: f64,
    pub saturation: f64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ReadingResponse {
    pub id: String,
    pub bracelet_id: String,
    pub timestamp: String,
    pub heart_rate: f64,
    pub temperature: f64,
    pub saturation: f64,
}

impl From<Reading> for ReadingResponse {
    fn from(reading: Reading) -> Self {
        Self {
            id: reading.id.map(|id| id.to_hex()).unwrap_or_default(),
            bracelet_id: reading.bracelet_id.to_hex(),
            timestamp: reading
                .timestamp
                .try_to_rfc3339_string()
                .unwrap_or_default(),
            heart_rate: reading.heart_rate,
            temperature: reading.temperature,
            saturation: reading.saturation,
        }
    }
}
