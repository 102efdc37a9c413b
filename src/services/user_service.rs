use crate::database::{MongoDB, USERS_COLLECTION};
use crate::models::{User, UserResponse};
use crate::utils::error::ServiceError;
use futures::TryStreamExt;
use mongodb::bson::doc;

/// Returns every user record, unfiltered. Diagnostic endpoint; password
/// hashes are stripped by the response projection.
pub async fn list_users(db: &MongoDB) -> Result<Vec<UserResponse>, ServiceError> {
    let collection = db.collection::<User>(USERS_COLLECTION);

    let users: Vec<User> = collection.find(doc! {}).await?.try_collect().await?;

    Ok(users.into_iter().map(UserResponse::from).collect())
}
