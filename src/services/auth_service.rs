use crate::database::{MongoDB, USERS_COLLECTION};
use crate::models::{User, UserResponse};
use crate::utils::error::ServiceError;
use crate::utils::validation::{is_valid_email, MIN_PASSWORD_LEN};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id (hex ObjectId)
    pub email: String,
    pub iat: usize, // issued at
    pub exp: usize, // expiration
    pub jti: String, // JWT ID
    pub aud: String, // audience
    pub iss: String, // issuer
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SignUpRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LogInRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

fn get_jwt_issuer() -> String {
    std::env::var("JWT_ISSUER").unwrap_or_else(|_| "bracelet-service".to_string())
}

fn get_jwt_audience() -> String {
    std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "bracelet-api".to_string())
}

// Generate JWT token
pub fn generate_jwt(user: &User) -> Result<String, ServiceError> {
    let user_id = user
        .id
        .as_ref()
        .ok_or_else(|| ServiceError::Internal("User has no id".to_string()))?;

    let iat = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + Duration::hours(24)).timestamp() as usize;
    let jti = Uuid::new_v4().to_string();

    let claims = Claims {
        sub: user_id.to_hex(),
        email: user.email.clone(),
        iat,
        exp,
        jti,
        aud: get_jwt_audience(),
        iss: get_jwt_issuer(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| ServiceError::Internal(format!("Failed to generate token: {}", e)))
}

// Verify JWT token
pub fn verify_token(token: &str) -> Result<Claims, ServiceError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[get_jwt_audience()]);

    let mut issuers = HashSet::new();
    issuers.insert(get_jwt_issuer());
    validation.iss = Some(issuers);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(get_jwt_secret().as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| ServiceError::Unauthorized(format!("Invalid token: {}", e)))
}

fn is_duplicate_key_error(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == 11000
    )
}

// User registration
pub async fn sign_up(db: &MongoDB, request: &SignUpRequest) -> Result<AuthResponse, ServiceError> {
    let collection = db.collection::<User>(USERS_COLLECTION);

    let email = request
        .email
        .as_deref()
        .filter(|e| !e.is_empty())
        .ok_or_else(|| {
            ServiceError::InvalidRequest("Email and password are required.".to_string())
        })?;
    let password = request
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            ServiceError::InvalidRequest("Email and password are required.".to_string())
        })?;

    // Duplicate check runs before the format checks; a taken address is
    // always reported as a conflict no matter what else is wrong.
    let existing = collection.find_one(doc! { "email": email }).await?;
    if existing.is_some() {
        return Err(ServiceError::Conflict(
            "User with this email already exists.".to_string(),
        ));
    }

    if !is_valid_email(email) {
        return Err(ServiceError::InvalidRequest(
            "Invalid email format".to_string(),
        ));
    }

    if password.len() < MIN_PASSWORD_LEN {
        return Err(ServiceError::InvalidRequest(
            "Password must be at least 6 characters long.".to_string(),
        ));
    }

    let hashed_password = hash(password, DEFAULT_COST)?;

    let new_user = User {
        id: Some(ObjectId::new()),
        name: String::new(),
        surname: String::new(),
        email: email.to_string(),
        password: hashed_password,
        health_insurance_number: String::new(),
        bracelet_ids: Vec::new(),
        created_at: Some(BsonDateTime::now()),
        updated_at: Some(BsonDateTime::now()),
    };

    // The unique email index closes the check-then-insert race: a concurrent
    // duplicate surfaces here as a duplicate-key write error.
    collection.insert_one(&new_user).await.map_err(|e| {
        if is_duplicate_key_error(&e) {
            ServiceError::Conflict("User with this email already exists.".to_string())
        } else {
            e.into()
        }
    })?;

    log::info!("✅ User registered: {}", email);

    let token = generate_jwt(&new_user)?;

    Ok(AuthResponse {
        token,
        user: UserResponse::from(new_user),
    })
}

// User login
pub async fn log_in(db: &MongoDB, request: &LogInRequest) -> Result<AuthResponse, ServiceError> {
    let collection = db.collection::<User>(USERS_COLLECTION);

    let email = request
        .email
        .as_deref()
        .filter(|e| !e.is_empty())
        .ok_or_else(|| {
            ServiceError::InvalidRequest("Email and password are required.".to_string())
        })?;
    let password = request
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            ServiceError::InvalidRequest("Email and password are required.".to_string())
        })?;

    // Same message for unknown email and wrong password
    let user = collection
        .find_one(doc! { "email": email })
        .await?
        .ok_or_else(|| ServiceError::Unauthorized("Invalid email or password.".to_string()))?;

    let valid = verify(password, &user.password)?;
    if !valid {
        return Err(ServiceError::Unauthorized(
            "Invalid email or password.".to_string(),
        ));
    }

    let token = generate_jwt(&user)?;

    Ok(AuthResponse {
        token,
        user: UserResponse::from(user),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Some(ObjectId::new()),
            name: String::new(),
            surname: String::new(),
            email: "a@b.com".to_string(),
            password: "$2b$12$hash".to_string(),
            health_insurance_number: String::new(),
            bracelet_ids: Vec::new(),
            created_at: Some(BsonDateTime::now()),
            updated_at: Some(BsonDateTime::now()),
        }
    }

    #[test]
    fn test_jwt_round_trip() {
        let user = sample_user();
        let token = generate_jwt(&user).expect("token generation should succeed");

        let claims = verify_token(&token).expect("fresh token should verify");
        assert_eq!(claims.sub, user.id.unwrap().to_hex());
        assert_eq!(claims.email, "a@b.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let result = verify_token("not-a-jwt");
        assert!(matches!(result, Err(ServiceError::Unauthorized(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let user = sample_user();
        let iat = (Utc::now() - Duration::hours(48)).timestamp() as usize;
        let exp = (Utc::now() - Duration::hours(24)).timestamp() as usize;

        let claims = Claims {
            sub: user.id.unwrap().to_hex(),
            email: user.email,
            iat,
            exp,
            jti: Uuid::new_v4().to_string(),
            aud: get_jwt_audience(),
            iss: get_jwt_issuer(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(get_jwt_secret().as_ref()),
        )
        .unwrap();

        assert!(matches!(
            verify_token(&token),
            Err(ServiceError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_token_with_wrong_audience_is_rejected() {
        let user = sample_user();
        let claims = Claims {
            sub: user.id.unwrap().to_hex(),
            email: user.email,
            iat: Utc::now().timestamp() as usize,
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            aud: "some-other-api".to_string(),
            iss: get_jwt_issuer(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(get_jwt_secret().as_ref()),
        )
        .unwrap();

        assert!(verify_token(&token).is_err());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_sign_up_duplicate_email_conflicts() {
        dotenv::dotenv().ok();
        let uri = std::env::var("MONGO_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017/bracelet_tracker".to_string());
        let db = MongoDB::new(&uri).await.unwrap();

        let email = format!("{}@test.com", Uuid::new_v4());
        let request = SignUpRequest {
            email: Some(email.clone()),
            password: Some("secret1".to_string()),
        };

        sign_up(&db, &request).await.expect("first signup succeeds");

        // Duplicate conflicts even when the second password is invalid
        let duplicate = SignUpRequest {
            email: Some(email),
            password: Some("x".to_string()),
        };
        assert!(matches!(
            sign_up(&db, &duplicate).await,
            Err(ServiceError::Conflict(_))
        ));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_log_in_rejects_wrong_password() {
        dotenv::dotenv().ok();
        let uri = std::env::var("MONGO_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017/bracelet_tracker".to_string());
        let db = MongoDB::new(&uri).await.unwrap();

        let email = format!("{}@test.com", Uuid::new_v4());
        sign_up(
            &db,
            &SignUpRequest {
                email: Some(email.clone()),
                password: Some("secret1".to_string()),
            },
        )
        .await
        .unwrap();

        let ok = log_in(
            &db,
            &LogInRequest {
                email: Some(email.clone()),
                password: Some("secret1".to_string()),
            },
        )
        .await;
        assert!(ok.is_ok());

        let wrong = log_in(
            &db,
            &LogInRequest {
                email: Some(email),
                password: Some("wrong-password".to_string()),
            },
        )
        .await;
        assert!(matches!(wrong, Err(ServiceError::Unauthorized(_))));
    }
}
