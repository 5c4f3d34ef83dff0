use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::db::store::{AccountStore, StoreError};
use crate::middleware::auth::{jwt_secret, Claims};
use crate::models::user::{SigninInput, SignupInput, User, UserSession};

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    auth_token: String,
}

pub async fn signup(
    accounts: web::Data<Arc<dyn AccountStore>>,
    input: web::Json<SignupInput>,
) -> impl Responder {
    let input = input.into_inner();

    if input.username.trim().is_empty() || input.password.is_empty() {
        return HttpResponse::BadRequest().body("Username and password are required");
    }
    if !is_valid_email(&input.email) {
        return HttpResponse::BadRequest().body("Invalid email address");
    }

    let hashed = match bcrypt::hash(&input.password, bcrypt::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(err) => {
            log::error!("Password hashing failed: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to create user");
        }
    };

    let curr_time = Utc::now();
    let user = User {
        id: None,
        username: input.username,
        email: input.email,
        password: hashed,
        created_at: Some(curr_time),
        updated_at: Some(curr_time),
    };

    match accounts.insert_user(&user).await {
        Ok(user_id) => match generate_token(&user.email, user_id) {
            Ok(token) => HttpResponse::Ok().json(TokenResponse { auth_token: token }),
            Err(_) => HttpResponse::InternalServerError().body("Token generation failed"),
        },
        Err(StoreError::Duplicate) => {
            HttpResponse::Conflict().body("Username or email already exists.")
        }
        Err(err) => {
            log::error!("Failed to create user: {}", err);
            HttpResponse::InternalServerError().body("Failed to create user")
        }
    }
}

pub async fn signin(
    accounts: web::Data<Arc<dyn AccountStore>>,
    input: web::Json<SigninInput>,
) -> impl Responder {
    let input = input.into_inner();

    match accounts.find_user_by_email(&input.email).await {
        Ok(Some(user)) => {
            if bcrypt::verify(&input.password, &user.password).unwrap_or(false) {
                let user_id = match user.id {
                    Some(id) => id,
                    None => {
                        log::error!("Stored user has no id: {}", input.email);
                        return HttpResponse::InternalServerError().body("Failed to sign in");
                    }
                };
                match generate_token(&input.email, user_id) {
                    Ok(token) => HttpResponse::Ok().json(TokenResponse { auth_token: token }),
                    Err(_) => HttpResponse::InternalServerError().body("Token generation failed"),
                }
            } else {
                HttpResponse::Unauthorized().body("Invalid credentials")
            }
        }
        Ok(None) => HttpResponse::NotFound().body("User not found"),
        Err(err) => {
            log::error!("Database error during signin: {}", err);
            HttpResponse::InternalServerError().body("Failed to process signin")
        }
    }
}

/// Tokens are stateless, so signout is an acknowledgement; the client
/// discards its token.
pub async fn logout() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "signed_out" }))
}

pub async fn user_session(
    claims: web::ReqData<Claims>,
    accounts: web::Data<Arc<dyn AccountStore>>,
) -> impl Responder {
    let user_id = match ObjectId::parse_str(&claims.user_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid user ID"),
    };

    match accounts.find_user_by_id(user_id).await {
        Ok(Some(user)) => {
            let session = UserSession {
                id: user.id.unwrap_or_default(),
                username: user.username,
                email: user.email,
                created_at: user.created_at.unwrap_or_default(),
            };
            HttpResponse::Ok().json(session)
        }
        Ok(None) => HttpResponse::NotFound().body("User not found"),
        Err(err) => {
            log::error!("Failed to fetch user: {}", err);
            HttpResponse::InternalServerError().body("Failed to fetch user")
        }
    }
}

fn is_valid_email(email: &str) -> bool {
    let re = regex::Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)*$",
    );
    re.unwrap().is_match(email)
}

fn generate_token(email: &str, user_id: ObjectId) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();

    let claims = Claims {
        sub: email.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(24)).timestamp() as usize,
        user_id: user_id.to_string(),
    };

    let header = Header::new(Algorithm::HS256);
    encode(
        &header,
        &claims,
        &EncodingKey::from_secret(jwt_secret().as_ref()),
    )
}
