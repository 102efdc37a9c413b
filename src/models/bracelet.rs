use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Document in the "bracelets" collection. Registered independently of any
/// user; linking happens through `User::bracelet_ids`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Bracelet {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<BsonDateTime>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BraceletResponse {
    pub id: String,
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl From<Bracelet> for BraceletResponse {
    fn from(bracelet: Bracelet) -> Self {
        Self {
            id: bracelet.id.map(|id| id.to_hex()).unwrap_or_default(),
            nickname: bracelet.nickname,
            created_at: bracelet
                .created_at
                .and_then(|dt| dt.try_to_rfc3339_string().ok()),
        }
    }
}
