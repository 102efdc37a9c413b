use crate::database::{MongoDB, BRACELETS_COLLECTION, USERS_COLLECTION};
use crate::models::{Bracelet, BraceletResponse, User, UserResponse};
use crate::utils::error::ServiceError;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use mongodb::options::ReturnDocument;
use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct NewBraceletRequest {
    pub nickname: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AddBraceletRequest {
    #[serde(rename = "braceletId")]
    pub bracelet_id: Option<String>,
}

fn parse_bracelet_id(raw: &str) -> Result<ObjectId, ServiceError> {
    ObjectId::parse_str(raw)
        .map_err(|_| ServiceError::InvalidRequest("Invalid bracelet ID.".to_string()))
}

fn parse_user_id(raw: &str) -> Result<ObjectId, ServiceError> {
    // The id comes out of our own token; a parse failure means the token is
    // not one we minted.
    ObjectId::parse_str(raw).map_err(|_| ServiceError::Unauthorized("Invalid token".to_string()))
}

async fn find_user(db: &MongoDB, user_id: ObjectId) -> Result<User, ServiceError> {
    db.collection::<User>(USERS_COLLECTION)
        .find_one(doc! { "_id": user_id })
        .await?
        .ok_or_else(|| ServiceError::NotFound("User not found.".to_string()))
}

/// Registers a bracelet in the catalog, unassociated with any user.
pub async fn register_bracelet(
    db: &MongoDB,
    request: NewBraceletRequest,
) -> Result<BraceletResponse, ServiceError> {
    let nickname = request
        .nickname
        .filter(|n| !n.is_empty())
        .ok_or_else(|| {
            ServiceError::InvalidRequest("Bracelet nickname is required.".to_string())
        })?;

    let bracelet = Bracelet {
        id: Some(ObjectId::new()),
        nickname,
        created_at: Some(BsonDateTime::now()),
    };

    db.collection::<Bracelet>(BRACELETS_COLLECTION)
        .insert_one(&bracelet)
        .await?;

    Ok(BraceletResponse::from(bracelet))
}

/// All bracelets whose id appears in the caller's link list.
pub async fn list_user_bracelets(
    db: &MongoDB,
    user_id: &str,
) -> Result<Vec<BraceletResponse>, ServiceError> {
    let user_id = parse_user_id(user_id)?;
    let user = find_user(db, user_id).await?;

    let bracelets: Vec<Bracelet> = db
        .collection::<Bracelet>(BRACELETS_COLLECTION)
        .find(doc! { "_id": { "$in": user.bracelet_ids } })
        .await?
        .try_collect()
        .await?;

    Ok(bracelets.into_iter().map(BraceletResponse::from).collect())
}

/// Appends a bracelet id to the caller's link list. Both sides of the
/// reference must exist, and a second link of the same id is rejected.
pub async fn add_bracelet(
    db: &MongoDB,
    user_id: &str,
    request: AddBraceletRequest,
) -> Result<UserResponse, ServiceError> {
    let raw_bracelet_id = request
        .bracelet_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ServiceError::InvalidRequest("Bracelet ID is required.".to_string()))?;

    let user_id = parse_user_id(user_id)?;
    let bracelet_id = parse_bracelet_id(&raw_bracelet_id)?;

    let user = find_user(db, user_id).await?;

    let bracelet = db
        .collection::<Bracelet>(BRACELETS_COLLECTION)
        .find_one(doc! { "_id": bracelet_id })
        .await?;
    if bracelet.is_none() {
        return Err(ServiceError::NotFound(
            "Bracelet does not exist.".to_string(),
        ));
    }

    if user.bracelet_ids.contains(&bracelet_id) {
        return Err(ServiceError::InvalidRequest(
            "Bracelet is already linked to the user.".to_string(),
        ));
    }

    let updated = db
        .collection::<User>(USERS_COLLECTION)
        .find_one_and_update(
            doc! { "_id": user_id },
            doc! {
                "$push": { "bracelet_ids": bracelet_id },
                "$set": { "updated_at": BsonDateTime::now() },
            },
        )
        .return_document(ReturnDocument::After)
        .await?
        .ok_or_else(|| ServiceError::NotFound("User not found.".to_string()))?;

    log::info!("🔗 Linked bracelet {} to user {}", bracelet_id, user_id);

    Ok(UserResponse::from(updated))
}

/// Removes every occurrence of the bracelet id from the caller's link list.
/// Idempotent: an id that was never linked is not an error. Returns the
/// pre-update user record — the contract inherited from the previous
/// implementation, kept pending product clarification.
pub async fn remove_bracelet(
    db: &MongoDB,
    user_id: &str,
    raw_bracelet_id: &str,
) -> Result<UserResponse, ServiceError> {
    let user_id = parse_user_id(user_id)?;
    let bracelet_id = parse_bracelet_id(raw_bracelet_id)?;

    let previous = db
        .collection::<User>(USERS_COLLECTION)
        .find_one_and_update(
            doc! { "_id": user_id },
            doc! {
                "$pull": { "bracelet_ids": bracelet_id },
                "$set": { "updated_at": BsonDateTime::now() },
            },
        )
        .return_document(ReturnDocument::Before)
        .await?
        .ok_or_else(|| ServiceError::NotFound("User not found.".to_string()))?;

    log::info!("✂️  Unlinked bracelet {} from user {}", bracelet_id, user_id);

    Ok(UserResponse::from(previous))
}
