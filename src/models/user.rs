use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Document in the "users" collection.
///
/// The password field holds a bcrypt hash, never plain text. It is only
/// serialized when writing to MongoDB; API responses go through
/// [`UserResponse`], which drops it.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub health_insurance_number: String,
    #[serde(default)]
    pub bracelet_ids: Vec<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<BsonDateTime>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub updated_at: Option<BsonDateTime>,
}

/// User document as exposed over HTTP (no password hash).
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub health_insurance_number: String,
    pub bracelet_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: user.name,
            surname: user.surname,
            email: user.email,
            health_insurance_number: user.health_insurance_number,
            bracelet_ids: user.bracelet_ids.iter().map(|id| id.to_hex()).collect(),
            created_at: user
                .created_at
                .and_then(|dt| dt.try_to_rfc3339_string().ok()),
            updated_at: user
                .updated_at
                .and_then(|dt| dt.try_to_rfc3339_string().ok()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, from_document};

    #[test]
    fn test_deserialize_minimal_document() {
        // Documents written before a field existed must still load
        let document = doc! {
            "_id": ObjectId::new(),
            "email": "a@b.com",
            "password": "$2b$12$hash",
        };

        let user: User = from_document(document).expect("minimal user should deserialize");
        assert_eq!(user.name, "");
        assert_eq!(user.surname, "");
        assert_eq!(user.health_insurance_number, "");
        assert!(user.bracelet_ids.is_empty());
    }

    #[test]
    fn test_response_hides_password() {
        let user = User {
            id: Some(ObjectId::new()),
            name: "Ana".to_string(),
            surname: "Kovač".to_string(),
            email: "ana@example.com".to_string(),
            password: "$2b$12$hash".to_string(),
            health_insurance_number: "123456789".to_string(),
            bracelet_ids: vec![ObjectId::new()],
            created_at: Some(BsonDateTime::now()),
            updated_at: None,
        };

        let response = UserResponse::from(user);
        let json = serde_json::to_value(&response).unwrap();

        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "ana@example.com");
        assert_eq!(json["bracelet_ids"].as_array().unwrap().len(), 1);
    }
}
